use crate::canvas::Canvas;
use crate::geometry::{self, IntRect, Point, SelectionPath};
use crate::input::{KeyEvent, PointerEvent};
use crate::paint::{Paint, StrokeStyle, ToolStyle};
use crate::raster;
use crate::tools::Tool;
use egui::{Color32, CursorIcon, Key};
use image::RgbaImage;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    InProgress,
    Finalized,
}

/// Shape of the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutline {
    Rect(IntRect),
    Path(SelectionPath),
}

impl SelectionOutline {
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Rect(rect) => rect.contains(p),
            Self::Path(path) => path.contains(p),
        }
    }

    pub fn bounds(&self) -> Option<IntRect> {
        match self {
            Self::Rect(rect) => Some(*rect),
            Self::Path(path) => path.bounds(),
        }
    }

    /// True when the outline encloses no area
    pub fn is_degenerate(&self) -> bool {
        self.bounds().is_none_or(|b| b.is_empty())
    }
}

/// Capabilities shared by every selection tool variant
pub trait SelectionEditor: Send {
    /// Name of the tool driving this editor
    const TOOL_NAME: &'static str;

    /// Forget the selection entirely
    fn reset_selection(&mut self);

    /// Replace the selection with `bounds`, already finalized
    fn set_selection_bounds(&mut self, bounds: IntRect);

    /// Grow the selection as the pointer moves from `initial` to `new`
    fn add_selection_point(&mut self, initial: Point, new: Point, shift_held: bool);

    /// The user let go of the pointer at `final_point`
    fn complete_selection(&mut self, final_point: Point);

    /// `None` when nothing is selected
    fn selection_outline(&self) -> Option<SelectionOutline>;

    /// Move the selection by the given offset
    fn adjust_selection_bounds(&mut self, dx: i32, dy: i32);

    fn selection_state(&self) -> SelectionState;
}

/// Rectangular (marquee) selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RectangularSelection {
    bounds: Option<IntRect>,
    state: SelectionState,
}

impl SelectionEditor for RectangularSelection {
    const TOOL_NAME: &'static str = "Selection";

    fn reset_selection(&mut self) {
        self.bounds = None;
        self.state = SelectionState::Empty;
    }

    fn set_selection_bounds(&mut self, bounds: IntRect) {
        self.bounds = Some(bounds);
        self.state = SelectionState::Finalized;
    }

    fn add_selection_point(&mut self, initial: Point, new: Point, shift_held: bool) {
        self.bounds = Some(if shift_held {
            geometry::square_at_anchor(initial, new)
        } else {
            geometry::rectangle_from_points(initial, new)
        });
        self.state = SelectionState::InProgress;
    }

    fn complete_selection(&mut self, _final_point: Point) {
        // The rectangle is already final
        if self.bounds.is_some() {
            self.state = SelectionState::Finalized;
        }
    }

    fn selection_outline(&self) -> Option<SelectionOutline> {
        self.bounds.map(SelectionOutline::Rect)
    }

    fn adjust_selection_bounds(&mut self, dx: i32, dy: i32) {
        if let Some(bounds) = &mut self.bounds {
            bounds.translate(dx, dy);
        }
    }

    fn selection_state(&self) -> SelectionState {
        self.state
    }
}

/// Free-form selection traced by the pointer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LassoSelection {
    path: Option<SelectionPath>,
    state: SelectionState,
}

impl SelectionEditor for LassoSelection {
    const TOOL_NAME: &'static str = "Lasso";

    fn reset_selection(&mut self) {
        self.path = None;
        self.state = SelectionState::Empty;
    }

    fn set_selection_bounds(&mut self, bounds: IntRect) {
        self.path = Some(SelectionPath::from_rect(bounds));
        self.state = SelectionState::Finalized;
    }

    fn add_selection_point(&mut self, initial: Point, new: Point, _shift_held: bool) {
        self.path
            .get_or_insert_with(|| SelectionPath::starting_at(initial))
            .line_to(new);
        self.state = SelectionState::InProgress;
    }

    fn complete_selection(&mut self, _final_point: Point) {
        if let Some(path) = &mut self.path {
            path.close();
            self.state = SelectionState::Finalized;
        }
    }

    fn selection_outline(&self) -> Option<SelectionOutline> {
        self.path.clone().map(SelectionOutline::Path)
    }

    fn adjust_selection_bounds(&mut self, dx: i32, dy: i32) {
        if let Some(path) = &mut self.path {
            path.translate(dx, dy);
        }
    }

    fn selection_state(&self) -> SelectionState {
        self.state
    }
}

/// Drives a [`SelectionEditor`] from pointer events and previews the outline
/// in the scratch layer. The outline itself is never committed.
#[derive(Debug, Clone, Default)]
pub struct SelectionTool<E> {
    editor: E,
    anchor: Option<Point>,
    /// Last pointer position while dragging an existing selection
    moving_from: Option<Point>,
}

impl<E: SelectionEditor> SelectionTool<E> {
    pub fn new(editor: E) -> Self {
        Self {
            editor,
            anchor: None,
            moving_from: None,
        }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    pub fn is_moving(&self) -> bool {
        self.moving_from.is_some()
    }

    /// Restore a selection programmatically and show it
    pub fn set_selection_bounds(&mut self, bounds: IntRect, canvas: &mut dyn Canvas) {
        self.editor.set_selection_bounds(bounds);
        self.redraw_outline(canvas);
    }

    pub fn clear_selection(&mut self, canvas: &mut dyn Canvas) {
        self.editor.reset_selection();
        self.anchor = None;
        self.moving_from = None;
        canvas.clear_scratch();
        canvas.invalidate();
    }

    /// Copy of the committed pixels inside the selection; transparent elsewhere
    pub fn selected_pixels(&self, canvas: &dyn Canvas) -> Option<RgbaImage> {
        let outline = self.editor.selection_outline()?;
        let source = canvas.image();
        let mut selected = RgbaImage::new(source.width(), source.height());
        let Some(bounds) = outline.bounds() else {
            return Some(selected);
        };

        // Every pixel inside a rectangle's bounds is selected
        let vertices = match &outline {
            SelectionOutline::Rect(_) => None,
            SelectionOutline::Path(path) => Some(path.points()),
        };
        let width = i32::try_from(source.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(source.height()).unwrap_or(i32::MAX);
        for y in bounds.y.max(0)..bounds.bottom().min(height) {
            for x in bounds.x.max(0)..bounds.right().min(width) {
                let p = Point::new(x, y);
                if vertices.as_deref().is_none_or(|v| geometry::polygon_contains(v, p)) {
                    let (x, y) = (x as u32, y as u32);
                    selected.put_pixel(x, y, *source.get_pixel(x, y));
                }
            }
        }
        Some(selected)
    }

    fn redraw_outline(&self, canvas: &mut dyn Canvas) {
        canvas.clear_scratch();
        let stroke = StrokeStyle::dashed(1, 4, 4);
        let paint = Paint::solid(Color32::BLACK);
        let scratch = canvas.scratch_image_mut();
        match self.editor.selection_outline() {
            Some(SelectionOutline::Rect(rect)) => raster::draw_rect(scratch, rect, stroke, &paint),
            Some(SelectionOutline::Path(path)) => {
                raster::stroke_path(scratch, &path, stroke, &paint)
            }
            None => {}
        }
        canvas.invalidate();
    }
}

impl<E: SelectionEditor> Tool for SelectionTool<E> {
    fn name(&self) -> &'static str {
        E::TOOL_NAME
    }

    fn deactivate(&mut self, canvas: &mut dyn Canvas) {
        self.clear_selection(canvas);
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
        canvas: &mut dyn Canvas,
        _style: &ToolStyle,
    ) {
        let inside_selection = self.editor.selection_state() == SelectionState::Finalized
            && self
                .editor
                .selection_outline()
                .is_some_and(|outline| outline.contains(event.position));

        if inside_selection {
            self.moving_from = Some(event.position);
            return;
        }

        self.editor.reset_selection();
        self.anchor = Some(event.position);
        canvas.clear_scratch();
        canvas.invalidate();
    }

    fn on_pointer_drag(
        &mut self,
        event: &PointerEvent,
        canvas: &mut dyn Canvas,
        _style: &ToolStyle,
    ) {
        if let Some(from) = self.moving_from {
            self.editor
                .adjust_selection_bounds(event.position.x - from.x, event.position.y - from.y);
            self.moving_from = Some(event.position);
        } else if let Some(anchor) = self.anchor {
            self.editor
                .add_selection_point(anchor, event.position, event.is_shift_down());
        } else {
            return;
        }
        self.redraw_outline(canvas);
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, canvas: &mut dyn Canvas, _style: &ToolStyle) {
        if self.moving_from.take().is_some() {
            return;
        }
        if self.anchor.take().is_none() {
            return;
        }

        self.editor.complete_selection(event.position);
        if self
            .editor
            .selection_outline()
            .is_some_and(|outline| outline.is_degenerate())
        {
            debug!("Discarding empty selection");
            self.editor.reset_selection();
        }
        self.redraw_outline(canvas);
    }

    fn on_key_down(&mut self, event: &KeyEvent, canvas: &mut dyn Canvas, _style: &ToolStyle) {
        if event.key == Key::Escape {
            self.clear_selection(canvas);
        }
    }

    fn cursor(&self) -> CursorIcon {
        if self.moving_from.is_some() {
            CursorIcon::Grabbing
        } else {
            CursorIcon::Crosshair
        }
    }

    fn current_state_name(&self) -> &'static str {
        if self.moving_from.is_some() {
            return "Moving";
        }
        match self.editor.selection_state() {
            SelectionState::Empty => "Empty",
            SelectionState::InProgress => "InProgress",
            SelectionState::Finalized => "Finalized",
        }
    }
}
