use serde::{Deserialize, Serialize};

/// Integer pixel coordinate on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        dx.hypot(dy)
    }
}

impl From<egui::Pos2> for Point {
    fn from(pos: egui::Pos2) -> Self {
        Self::new(pos.x.floor() as i32, pos.y.floor() as i32)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned integer rectangle. Width and height are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Move the rectangle's origin by the given offset
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Grow the rectangle until `p` lies on or within its edges
    pub fn union_point(&self, p: Point) -> Self {
        let x = self.x.min(p.x);
        let y = self.y.min(p.y);
        Self::new(x, y, self.right().max(p.x) - x, self.bottom().max(p.y) - y)
    }

    /// Inclusive of the left/top edges, exclusive of the right/bottom edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// The four corners in clockwise order starting at the origin
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// Returns the point at the same distance from `start` as `end`, rotated onto the
/// nearest multiple of `increment_degrees` around `start`.
pub fn line(start: Point, end: Point, increment_degrees: f64) -> Point {
    if start == end || increment_degrees <= 0.0 {
        return end;
    }

    let dx = f64::from(end.x - start.x);
    let dy = f64::from(end.y - start.y);
    let length = dx.hypot(dy);

    let increment = increment_degrees.to_radians();
    let snapped = (dy.atan2(dx) / increment).round() * increment;

    Point::new(
        start.x + (length * snapped.cos()).round() as i32,
        start.y + (length * snapped.sin()).round() as i32,
    )
}

/// Square with one corner at `anchor`, extending toward `pt`; the side is the larger
/// of the horizontal and vertical distance between the two.
pub fn square_at_anchor(anchor: Point, pt: Point) -> IntRect {
    let side = (anchor.x - pt.x).abs().max((anchor.y - pt.y).abs());
    let x = if pt.x < anchor.x { anchor.x - side } else { anchor.x };
    let y = if pt.y < anchor.y { anchor.y - side } else { anchor.y };
    IntRect::new(x, y, side, side)
}

/// Smallest rectangle with both points on its corners, regardless of their order.
pub fn rectangle_from_points(a: Point, b: Point) -> IntRect {
    IntRect::new(
        a.x.min(b.x),
        a.y.min(b.y),
        (a.x - b.x).abs(),
        (a.y - b.y).abs(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathElement {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

/// A free-form outline made of straight segments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionPath {
    elements: Vec<PathElement>,
}

impl SelectionPath {
    /// Start a new path at `start`
    pub fn starting_at(start: Point) -> Self {
        Self {
            elements: vec![PathElement::MoveTo(start)],
        }
    }

    /// Closed path tracing the rectangle's corners
    pub fn from_rect(rect: IntRect) -> Self {
        let [a, b, c, d] = rect.corners();
        let mut path = Self::starting_at(a);
        path.line_to(b);
        path.line_to(c);
        path.line_to(d);
        path.close();
        path
    }

    pub fn line_to(&mut self, p: Point) {
        if self.elements.is_empty() {
            self.elements.push(PathElement::MoveTo(p));
        } else {
            self.elements.push(PathElement::LineTo(p));
        }
    }

    pub fn close(&mut self) {
        if !self.elements.is_empty() && !self.is_closed() {
            self.elements.push(PathElement::Close);
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.elements.last(), Some(PathElement::Close))
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Number of drawn segments, including the closing one
    pub fn segment_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| !matches!(e, PathElement::MoveTo(_)))
            .count()
    }

    /// All vertices in drawing order
    pub fn points(&self) -> Vec<Point> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                PathElement::MoveTo(p) | PathElement::LineTo(p) => Some(*p),
                PathElement::Close => None,
            })
            .collect()
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for element in &mut self.elements {
            match element {
                PathElement::MoveTo(p) | PathElement::LineTo(p) => *p = p.translated(dx, dy),
                PathElement::Close => {}
            }
        }
    }

    pub fn bounds(&self) -> Option<IntRect> {
        let points = self.points();
        let (first, rest) = points.split_first()?;
        let start = IntRect::new(first.x, first.y, 0, 0);
        Some(rest.iter().fold(start, |bounds, p| bounds.union_point(*p)))
    }

    /// Even-odd containment test, treating the path as implicitly closed
    pub fn contains(&self, p: Point) -> bool {
        polygon_contains(&self.points(), p)
    }
}

/// Even-odd rule, sampling at the pixel's center
pub fn polygon_contains(vertices: &[Point], p: Point) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let (px, py) = (f64::from(p.x) + 0.5, f64::from(p.y) + 0.5);
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = (f64::from(vertices[i].x), f64::from(vertices[i].y));
        let (xj, yj) = (f64::from(vertices[j].x), f64::from(vertices[j].y));
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_point_grows_both_ways() {
        let rect = IntRect::new(5, 5, 2, 2);
        assert_eq!(rect.union_point(Point::new(6, 6)), rect);
        assert_eq!(rect.union_point(Point::new(1, 9)), IntRect::new(1, 5, 6, 4));
        assert_eq!(rect.union_point(Point::new(10, 0)), IntRect::new(5, 0, 5, 7));
    }

    #[test]
    fn test_line_snaps_to_horizontal() {
        let p = line(Point::new(0, 0), Point::new(100, 3), 15.0);
        assert_eq!(p, Point::new(100, 0));
    }

    #[test]
    fn test_line_snaps_to_diagonal() {
        let p = line(Point::new(10, 10), Point::new(60, 58), 15.0);
        // 45 degrees, length preserved
        assert_eq!(p.x - 10, p.y - 10);
        let start = Point::new(10, 10);
        assert!((start.distance(p) - start.distance(Point::new(60, 58))).abs() < 1.5);
    }

    #[test]
    fn test_line_snaps_to_thirty_degrees() {
        // atan2(49, 87) is about 29.4 degrees
        assert_eq!(line(Point::new(0, 0), Point::new(87, 49), 15.0), Point::new(86, 50));
    }

    #[test]
    fn test_line_snaps_to_fifteen_degrees() {
        // About 14 degrees above the leftward horizontal
        let p = line(Point::new(200, 100), Point::new(100, 75), 15.0);
        assert_eq!(p, Point::new(100, 73));
    }

    #[test]
    fn test_line_degenerate() {
        let p = Point::new(4, 4);
        assert_eq!(line(p, p, 15.0), p);
    }

    #[test]
    fn test_square_at_anchor_quadrants() {
        let anchor = Point::new(50, 50);
        assert_eq!(square_at_anchor(anchor, Point::new(60, 80)), IntRect::new(50, 50, 30, 30));
        assert_eq!(square_at_anchor(anchor, Point::new(40, 45)), IntRect::new(40, 40, 10, 10));
        assert_eq!(square_at_anchor(anchor, Point::new(90, 20)), IntRect::new(50, 10, 40, 40));
    }

    #[test]
    fn test_rectangle_from_points_order_independent() {
        let a = Point::new(30, 5);
        let b = Point::new(10, 25);
        assert_eq!(rectangle_from_points(a, b), IntRect::new(10, 5, 20, 20));
        assert_eq!(rectangle_from_points(b, a), rectangle_from_points(a, b));
    }

    #[test]
    fn test_path_translate_keeps_topology() {
        let mut path = SelectionPath::from_rect(IntRect::new(0, 0, 10, 10));
        let before = path.segment_count();
        path.translate(3, -2);
        assert_eq!(path.segment_count(), before);
        assert_eq!(path.points()[0], Point::new(3, -2));
    }

    #[test]
    fn test_path_contains() {
        let path = SelectionPath::from_rect(IntRect::new(0, 0, 10, 10));
        assert!(path.contains(Point::new(5, 5)));
        assert!(!path.contains(Point::new(15, 5)));
    }
}
