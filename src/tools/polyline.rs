//! Click-to-add-vertex tools. Double-click closes and commits a polygon,
//! Escape commits the open polyline. Holding shift snaps the segment being
//! drawn to the nearest angle increment.

use crate::canvas::Canvas;
use crate::geometry::{self, Point};
use crate::input::{KeyEvent, PointerEvent};
use crate::paint::{Paint, StrokeStyle, ToolStyle};
use crate::raster;
use crate::tools::Tool;
use egui::Key;
use image::RgbaImage;
use log::debug;

/// Angle increment, in degrees, for shift-constrained segments
pub const DEFAULT_ANGLE_INCREMENT: f64 = 15.0;

/// Draws the shapes a polyline tool produces
pub trait PolylineRenderer: Send {
    /// Edges through `points`, not closed and not filled
    fn stroke_polyline(
        &self,
        image: &mut RgbaImage,
        stroke: StrokeStyle,
        paint: &Paint,
        points: &[Point],
    );

    /// Edges through `points`, closed back to the first point
    fn stroke_polygon(
        &self,
        image: &mut RgbaImage,
        stroke: StrokeStyle,
        paint: &Paint,
        points: &[Point],
    );

    fn fill_polygon(&self, image: &mut RgbaImage, paint: &Paint, points: &[Point]);
}

/// Straight-edged polygon
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonShape;

impl PolylineRenderer for PolygonShape {
    fn stroke_polyline(
        &self,
        image: &mut RgbaImage,
        stroke: StrokeStyle,
        paint: &Paint,
        points: &[Point],
    ) {
        raster::stroke_polyline(image, points, stroke, paint);
    }

    fn stroke_polygon(
        &self,
        image: &mut RgbaImage,
        stroke: StrokeStyle,
        paint: &Paint,
        points: &[Point],
    ) {
        raster::stroke_polygon(image, points, stroke, paint);
    }

    fn fill_polygon(&self, image: &mut RgbaImage, paint: &Paint, points: &[Point]) {
        raster::fill_polygon(image, points, paint);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolylineState {
    Idle,
    /// One point placed, pointer has not moved since
    FirstPoint,
    Accumulating,
}

/// Points gathered during one polyline interaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolylineSession {
    points: Vec<Point>,
    tentative: Option<Point>,
}

impl PolylineSession {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Live pointer position not yet part of the shape
    pub fn tentative(&self) -> Option<Point> {
        self.tentative
    }

    pub fn is_active(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn state(&self) -> PolylineState {
        match (self.points.len(), self.tentative) {
            (0, _) => PolylineState::Idle,
            (1, None) => PolylineState::FirstPoint,
            _ => PolylineState::Accumulating,
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn set_tentative(&mut self, point: Point) {
        self.tentative = Some(point);
    }

    /// Append the tentative point, if there is one
    pub fn push_tentative(&mut self) {
        if let Some(point) = self.tentative {
            self.points.push(point);
        }
    }

    /// Accumulated points followed by the tentative point, for previewing
    pub fn preview_points(&self) -> Vec<Point> {
        self.points.iter().copied().chain(self.tentative).collect()
    }

    /// Take the accumulated points and return to idle
    pub fn take(&mut self) -> Vec<Point> {
        self.tentative = None;
        std::mem::take(&mut self.points)
    }
}

#[derive(Debug, Clone)]
pub struct PolylineTool<R> {
    renderer: R,
    session: PolylineSession,
    angle_increment: f64,
}

impl<R: Default> Default for PolylineTool<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R> PolylineTool<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            session: PolylineSession::default(),
            angle_increment: DEFAULT_ANGLE_INCREMENT,
        }
    }

    pub fn with_angle_increment(mut self, degrees: f64) -> Self {
        self.set_angle_increment(degrees);
        self
    }

    pub fn set_angle_increment(&mut self, degrees: f64) {
        self.angle_increment = degrees;
    }

    pub fn angle_increment(&self) -> f64 {
        self.angle_increment
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn session(&self) -> &PolylineSession {
        &self.session
    }

    pub fn points(&self) -> &[Point] {
        self.session.points()
    }

    pub fn state(&self) -> PolylineState {
        self.session.state()
    }
}

impl<R: PolylineRenderer> PolylineTool<R> {
    fn commit_polygon(&mut self, canvas: &mut dyn Canvas, style: &ToolStyle) {
        canvas.clear_scratch();
        let points = self.session.take();

        let scratch = canvas.scratch_image_mut();
        if let Some(fill) = style.fill_paint() {
            if raster::effective_vertex_count(&points) >= 3 {
                self.renderer.fill_polygon(scratch, fill, &points);
            } else {
                debug!("Skipping fill of degenerate polygon with {} points", points.len());
            }
        }
        self.renderer
            .stroke_polygon(scratch, style.stroke(), style.stroke_paint(), &points);

        canvas.commit();
        debug!("Committed polygon with {} vertices", points.len());
    }

    fn commit_polyline(&mut self, canvas: &mut dyn Canvas, style: &ToolStyle) {
        canvas.clear_scratch();
        let points = self.session.take();

        self.renderer.stroke_polyline(
            canvas.scratch_image_mut(),
            style.stroke(),
            style.stroke_paint(),
            &points,
        );

        canvas.commit();
        debug!("Committed polyline with {} points", points.len());
    }
}

impl<R: PolylineRenderer> Tool for PolylineTool<R> {
    fn name(&self) -> &'static str {
        "Polygon"
    }

    fn deactivate(&mut self, canvas: &mut dyn Canvas) {
        if self.session.is_active() {
            debug!("Discarding unfinished polyline with {} points", self.session.points().len());
        }
        self.session.take();
        canvas.clear_scratch();
        canvas.invalidate();
    }

    fn on_pointer_move(
        &mut self,
        event: &PointerEvent,
        canvas: &mut dyn Canvas,
        style: &ToolStyle,
    ) {
        // Nothing to do until the first point exists
        let Some(last) = self.session.last_point() else {
            return;
        };

        let tentative = if event.is_shift_down() {
            geometry::line(last, event.position, self.angle_increment)
        } else {
            event.position
        };
        self.session.set_tentative(tentative);

        canvas.clear_scratch();
        self.renderer.stroke_polyline(
            canvas.scratch_image_mut(),
            style.stroke(),
            style.stroke_paint(),
            &self.session.preview_points(),
        );
        canvas.invalidate();
    }

    fn on_pointer_drag(
        &mut self,
        event: &PointerEvent,
        canvas: &mut dyn Canvas,
        style: &ToolStyle,
    ) {
        self.on_pointer_move(event, canvas, style);
    }

    fn on_pointer_down(
        &mut self,
        event: &PointerEvent,
        canvas: &mut dyn Canvas,
        style: &ToolStyle,
    ) {
        if event.click_count > 1 && self.session.points().len() > 1 {
            // Double-click closes the shape
            self.session.push_tentative();
            self.commit_polygon(canvas, style);
        } else if self.session.tentative().is_none() {
            self.session.push(event.position);
        } else {
            self.session.push_tentative();
        }
    }

    fn on_key_down(&mut self, event: &KeyEvent, canvas: &mut dyn Canvas, style: &ToolStyle) {
        if event.key == Key::Escape && self.session.is_active() {
            self.session.push_tentative();
            self.commit_polyline(canvas, style);
        }
    }

    fn current_state_name(&self) -> &'static str {
        match self.state() {
            PolylineState::Idle => "Idle",
            PolylineState::FirstPoint => "FirstPoint",
            PolylineState::Accumulating => "Accumulating",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ImageCanvas;
    use image::Rgba;

    fn canvas() -> ImageCanvas {
        ImageCanvas::new(64, 64, Rgba([255, 255, 255, 255])).unwrap()
    }

    #[test]
    fn test_session_states() {
        let mut session = PolylineSession::default();
        assert_eq!(session.state(), PolylineState::Idle);
        session.push(Point::new(1, 1));
        assert_eq!(session.state(), PolylineState::FirstPoint);
        session.set_tentative(Point::new(5, 5));
        assert_eq!(session.state(), PolylineState::Accumulating);
        assert_eq!(session.preview_points(), vec![Point::new(1, 1), Point::new(5, 5)]);
        assert_eq!(session.take(), vec![Point::new(1, 1)]);
        assert_eq!(session.state(), PolylineState::Idle);
    }

    #[test]
    fn test_clicks_without_moves_accumulate() {
        let mut tool = PolygonTool::default();
        let mut canvas = canvas();
        let style = ToolStyle::default();
        tool.on_pointer_down(&PointerEvent::at(3, 3), &mut canvas, &style);
        assert_eq!(tool.state(), PolylineState::FirstPoint);
        tool.on_pointer_down(&PointerEvent::at(9, 3), &mut canvas, &style);
        assert_eq!(tool.points().len(), 2);
        assert!(tool.session().tentative().is_none());
        assert_eq!(tool.state(), PolylineState::Accumulating);
    }

    #[test]
    fn test_move_before_first_point_is_ignored() {
        let mut tool = PolygonTool::default();
        let mut canvas = canvas();
        tool.on_pointer_move(&PointerEvent::at(10, 10), &mut canvas, &ToolStyle::default());
        assert!(tool.session().tentative().is_none());
        assert!(canvas.scratch_is_clear());
    }

    #[test]
    fn test_shift_snaps_tentative_point() {
        let mut tool = PolygonTool::default();
        let mut canvas = canvas();
        let style = ToolStyle::default();
        tool.on_pointer_down(&PointerEvent::at(10, 10), &mut canvas, &style);
        tool.on_pointer_move(&PointerEvent::at(40, 12).with_shift(), &mut canvas, &style);
        assert_eq!(tool.session().tentative(), Some(Point::new(40, 10)));
    }

    #[test]
    fn test_deactivate_discards_session() {
        let mut tool = PolygonTool::default();
        let mut canvas = canvas();
        let style = ToolStyle::default();
        tool.on_pointer_down(&PointerEvent::at(10, 10), &mut canvas, &style);
        tool.on_pointer_move(&PointerEvent::at(30, 30), &mut canvas, &style);
        assert!(!canvas.scratch_is_clear());

        tool.deactivate(&mut canvas);
        assert_eq!(tool.state(), PolylineState::Idle);
        assert!(canvas.scratch_is_clear());
        assert_eq!(canvas.commit_count(), 0);
    }

    type PolygonTool = PolylineTool<PolygonShape>;
}
