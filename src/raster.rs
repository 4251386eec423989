//! Rasterization of outlines and filled shapes onto an RGBA image.
//!
//! Everything here clips silently against the image bounds, so tools can draw
//! shapes that extend past the canvas edge.

use crate::geometry::{IntRect, PathElement, Point, SelectionPath};
use crate::paint::{Paint, StrokeStyle};
use image::RgbaImage;

fn put(image: &mut RgbaImage, x: i32, y: i32, paint: &Paint) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x < image.width() && y < image.height() {
        image.put_pixel(x, y, paint.sample(x, y));
    }
}

/// Square pen footprint centered on (x, y)
fn stamp(image: &mut RgbaImage, x: i32, y: i32, width: u32, paint: &Paint) {
    if width <= 1 {
        put(image, x, y, paint);
        return;
    }
    // Clip the footprint first so huge pens cost no more than the image
    let left = i64::from(x) - i64::from(width / 2);
    let top = i64::from(y) - i64::from(width / 2);
    let x_end = (left + i64::from(width)).min(i64::from(image.width()));
    let y_end = (top + i64::from(width)).min(i64::from(image.height()));
    for py in top.max(0)..y_end {
        for px in left.max(0)..x_end {
            let (px, py) = (px as u32, py as u32);
            image.put_pixel(px, py, paint.sample(px, py));
        }
    }
}

/// Bresenham line; `phase` carries the dash position across connected segments.
fn line_with_phase(
    image: &mut RgbaImage,
    a: Point,
    b: Point,
    stroke: StrokeStyle,
    paint: &Paint,
    phase: &mut u32,
) {
    let (mut x, mut y) = (a.x, a.y);
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = if a.x < b.x { 1 } else { -1 };
    let sy = if a.y < b.y { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        let visible = match stroke.dash {
            Some((on, off)) => *phase % (on + off) < on,
            None => true,
        };
        if visible {
            stamp(image, x, y, stroke.width, paint);
        }
        if x == b.x && y == b.y {
            break;
        }
        *phase += 1;

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

pub fn draw_line(image: &mut RgbaImage, a: Point, b: Point, stroke: StrokeStyle, paint: &Paint) {
    let mut phase = 0;
    line_with_phase(image, a, b, stroke, paint, &mut phase);
}

/// Connects consecutive points. Fewer than two points draws nothing.
pub fn stroke_polyline(
    image: &mut RgbaImage,
    points: &[Point],
    stroke: StrokeStyle,
    paint: &Paint,
) {
    let mut phase = 0;
    for pair in points.windows(2) {
        line_with_phase(image, pair[0], pair[1], stroke, paint, &mut phase);
    }
}

/// Like [`stroke_polyline`], plus a segment from the last point back to the first.
pub fn stroke_polygon(image: &mut RgbaImage, points: &[Point], stroke: StrokeStyle, paint: &Paint) {
    if points.len() < 2 {
        return;
    }
    let mut phase = 0;
    for pair in points.windows(2) {
        line_with_phase(image, pair[0], pair[1], stroke, paint, &mut phase);
    }
    let (first, last) = (points[0], points[points.len() - 1]);
    if first != last {
        line_with_phase(image, last, first, stroke, paint, &mut phase);
    }
}

/// Count of vertices left after dropping consecutive duplicates, including the
/// wrap-around from last to first.
pub fn effective_vertex_count(points: &[Point]) -> usize {
    let mut count = 0;
    for (i, p) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        if *p != next {
            count += 1;
        }
    }
    count
}

/// Even-odd scanline fill sampled at pixel centers. Degenerate polygons with
/// fewer than three effective vertices are skipped.
pub fn fill_polygon(image: &mut RgbaImage, points: &[Point], paint: &Paint) {
    if effective_vertex_count(points) < 3 {
        return;
    }
    let min_y = points.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let max_y = points
        .iter()
        .map(|p| p.y)
        .max()
        .unwrap_or(0)
        .min(image.height() as i32 - 1);

    let mut crossings: Vec<f64> = Vec::new();
    for y in min_y..=max_y {
        let sample_y = f64::from(y) + 0.5;
        crossings.clear();

        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            let (ay, by) = (f64::from(a.y), f64::from(b.y));
            // Half-open edges so shared vertices are counted once
            if (ay <= sample_y) != (by <= sample_y) {
                let t = (sample_y - ay) / (by - ay);
                crossings.push(f64::from(a.x) + t * f64::from(b.x - a.x));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            // Pixel x is inside when its center x + 0.5 lies in [start, end)
            let start = (span[0] - 0.5).ceil() as i32;
            let end = (span[1] - 0.5).ceil() as i32;
            for x in start..end {
                put(image, x, y, paint);
            }
        }
    }
}

/// Outline of a rectangle; the right and bottom edges lie on `x + width` and
/// `y + height`.
pub fn draw_rect(image: &mut RgbaImage, rect: IntRect, stroke: StrokeStyle, paint: &Paint) {
    stroke_polygon(image, &rect.corners(), stroke, paint);
}

pub fn fill_rect(image: &mut RgbaImage, rect: IntRect, paint: &Paint) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            put(image, x, y, paint);
        }
    }
}

/// Draws every segment of a path, including its closing segment.
pub fn stroke_path(
    image: &mut RgbaImage,
    path: &SelectionPath,
    stroke: StrokeStyle,
    paint: &Paint,
) {
    let mut phase = 0;
    let mut start: Option<Point> = None;
    let mut current: Option<Point> = None;

    for element in path.elements() {
        match *element {
            PathElement::MoveTo(p) => {
                start = Some(p);
                current = Some(p);
            }
            PathElement::LineTo(p) => {
                if let Some(from) = current {
                    line_with_phase(image, from, p, stroke, paint, &mut phase);
                }
                current = Some(p);
            }
            PathElement::Close => {
                if let (Some(from), Some(to)) = (current, start) {
                    line_with_phase(image, from, to, stroke, paint, &mut phase);
                }
                current = start;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn painted(image: &RgbaImage) -> usize {
        image.pixels().filter(|p| p[3] != 0).count()
    }

    #[test]
    fn test_horizontal_line() {
        let mut image = RgbaImage::new(10, 3);
        let (a, b) = (Point::new(1, 1), Point::new(8, 1));
        draw_line(&mut image, a, b, StrokeStyle::default(), &Paint::solid(Color32::RED));
        assert_eq!(painted(&image), 8);
    }

    #[test]
    fn test_wide_pen_is_clipped_to_image() {
        let mut image = RgbaImage::new(64, 64);
        let stroke = StrokeStyle::new(100_000);
        let (a, b) = (Point::new(0, 0), Point::new(20, 0));
        draw_line(&mut image, a, b, stroke, &Paint::solid(Color32::RED));
        assert_eq!(painted(&image), 64 * 64);
    }

    #[test]
    fn test_pen_centered_on_point() {
        let mut image = RgbaImage::new(10, 10);
        let stroke = StrokeStyle::new(3);
        let p = Point::new(0, 5);
        draw_line(&mut image, p, p, stroke, &Paint::solid(Color32::RED));
        // Left column of the footprint falls off the image
        assert_eq!(painted(&image), 6);
        assert_eq!(image.get_pixel(1, 4)[3], 255);
        assert_eq!(image.get_pixel(2, 5)[3], 0);
    }

    #[test]
    fn test_single_point_polyline_draws_nothing() {
        let mut image = RgbaImage::new(4, 4);
        let red = Paint::solid(Color32::RED);
        stroke_polyline(&mut image, &[Point::new(1, 1)], StrokeStyle::default(), &red);
        assert_eq!(painted(&image), 0);
    }

    #[test]
    fn test_fill_square_polygon() {
        let mut image = RgbaImage::new(20, 20);
        let square = [Point::new(2, 2), Point::new(12, 2), Point::new(12, 12), Point::new(2, 12)];
        fill_polygon(&mut image, &square, &Paint::solid(Color32::RED));
        assert_eq!(painted(&image), 100);
    }

    #[test]
    fn test_degenerate_polygon_not_filled() {
        let mut image = RgbaImage::new(20, 20);
        let line = [Point::new(2, 2), Point::new(12, 12), Point::new(12, 12)];
        fill_polygon(&mut image, &line, &Paint::solid(Color32::RED));
        assert_eq!(painted(&image), 0);
    }

    #[test]
    fn test_clips_out_of_bounds() {
        let mut image = RgbaImage::new(5, 5);
        fill_rect(&mut image, IntRect::new(-3, -3, 20, 20), &Paint::solid(Color32::RED));
        assert_eq!(painted(&image), 25);
    }

    #[test]
    fn test_dashed_line_skips_pixels() {
        let mut image = RgbaImage::new(10, 1);
        let (a, b) = (Point::new(0, 0), Point::new(9, 0));
        draw_line(&mut image, a, b, StrokeStyle::dashed(1, 2, 2), &Paint::solid(Color32::RED));
        assert_eq!(painted(&image), 6);
    }

    #[test]
    fn test_effective_vertices() {
        let pts = [
            Point::new(0, 0),
            Point::new(5, 0),
            Point::new(5, 5),
            Point::new(0, 5),
            Point::new(0, 5),
        ];
        assert_eq!(effective_vertex_count(&pts), 4);
    }
}
