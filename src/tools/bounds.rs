use crate::canvas::Canvas;
use crate::geometry::{self, IntRect, Point};
use crate::input::{KeyEvent, PointerEvent};
use crate::paint::{Paint, StrokeStyle, ToolStyle};
use crate::raster;
use crate::tools::Tool;
use egui::Key;
use image::RgbaImage;
use log::debug;

/// Draws a shape inscribed in a bounding rectangle
pub trait BoundsDrawer: Send {
    fn draw_bounds(
        &self,
        image: &mut RgbaImage,
        stroke: StrokeStyle,
        paint: &Paint,
        bounds: IntRect,
    );

    fn draw_fill(&self, image: &mut RgbaImage, fill: &Paint, bounds: IntRect);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RectangleShape;

impl BoundsDrawer for RectangleShape {
    fn draw_bounds(
        &self,
        image: &mut RgbaImage,
        stroke: StrokeStyle,
        paint: &Paint,
        bounds: IntRect,
    ) {
        raster::draw_rect(image, bounds, stroke, paint);
    }

    fn draw_fill(&self, image: &mut RgbaImage, fill: &Paint, bounds: IntRect) {
        raster::fill_rect(image, bounds, fill);
    }
}

/// Press-drag-release tool: the drag defines the bounding rectangle of a
/// shape, shift constrains it to a square.
#[derive(Debug, Clone, Default)]
pub struct BoundsTool<D> {
    drawer: D,
    anchor: Option<Point>,
    bounds: Option<IntRect>,
}

impl<D> BoundsTool<D> {
    pub fn new(drawer: D) -> Self {
        Self {
            drawer,
            anchor: None,
            bounds: None,
        }
    }

    /// Rectangle currently being previewed
    pub fn bounds(&self) -> Option<IntRect> {
        self.bounds
    }
}

impl<D: BoundsDrawer> BoundsTool<D> {
    fn redraw(&self, canvas: &mut dyn Canvas, style: &ToolStyle) {
        canvas.clear_scratch();
        if let Some(bounds) = self.bounds {
            let scratch = canvas.scratch_image_mut();
            if let Some(fill) = style.fill_paint() {
                self.drawer.draw_fill(scratch, fill, bounds);
            }
            self.drawer
                .draw_bounds(scratch, style.stroke(), style.stroke_paint(), bounds);
        }
        canvas.invalidate();
    }
}

impl<D: BoundsDrawer> Tool for BoundsTool<D> {
    fn name(&self) -> &'static str {
        "Rectangle"
    }

    fn deactivate(&mut self, canvas: &mut dyn Canvas) {
        self.anchor = None;
        self.bounds = None;
        canvas.clear_scratch();
        canvas.invalidate();
    }

    fn on_pointer_move(
        &mut self,
        _event: &PointerEvent,
        _canvas: &mut dyn Canvas,
        _style: &ToolStyle,
    ) {
    }

    fn on_pointer_down(
        &mut self,
        event: &PointerEvent,
        _canvas: &mut dyn Canvas,
        _style: &ToolStyle,
    ) {
        self.anchor = Some(event.position);
        self.bounds = None;
    }

    fn on_pointer_drag(
        &mut self,
        event: &PointerEvent,
        canvas: &mut dyn Canvas,
        style: &ToolStyle,
    ) {
        let Some(anchor) = self.anchor else {
            return;
        };
        self.bounds = Some(if event.is_shift_down() {
            geometry::square_at_anchor(anchor, event.position)
        } else {
            geometry::rectangle_from_points(anchor, event.position)
        });
        self.redraw(canvas, style);
    }

    fn on_pointer_up(&mut self, _event: &PointerEvent, canvas: &mut dyn Canvas, style: &ToolStyle) {
        self.anchor = None;
        if self.bounds.is_none() {
            return;
        }
        self.redraw(canvas, style);
        canvas.commit();
        debug!("Committed shape in {:?}", self.bounds.take());
    }

    fn on_key_down(&mut self, event: &KeyEvent, canvas: &mut dyn Canvas, _style: &ToolStyle) {
        // Escape abandons the drag in progress
        if event.key == Key::Escape && self.anchor.is_some() {
            self.deactivate(canvas);
        }
    }

    fn current_state_name(&self) -> &'static str {
        if self.bounds.is_some() {
            "Dragging"
        } else if self.anchor.is_some() {
            "Anchored"
        } else {
            "Idle"
        }
    }
}
