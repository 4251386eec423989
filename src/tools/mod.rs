use crate::canvas::Canvas;
use crate::input::{KeyEvent, PointerEvent, ToolInput};
use crate::paint::ToolStyle;
use egui::CursorIcon;

/// Tool trait defines the interface for all canvas tools.
///
/// One method per event kind. The canvas and style are borrowed only for the
/// duration of a single event, so exactly one tool can draw into a canvas's
/// scratch layer at a time.
pub trait Tool: Send {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Cursor shown while the tool is active
    fn cursor(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }

    /// Called when the tool is selected (activated).
    fn activate(&mut self, _canvas: &mut dyn Canvas) {
        // default: do nothing
    }

    /// Called when the tool is deselected. Discards any uncommitted preview.
    fn deactivate(&mut self, canvas: &mut dyn Canvas);

    /// Pointer moved with no button held
    fn on_pointer_move(&mut self, event: &PointerEvent, canvas: &mut dyn Canvas, style: &ToolStyle);

    /// Pointer moved with the primary button held
    fn on_pointer_drag(
        &mut self,
        _event: &PointerEvent,
        _canvas: &mut dyn Canvas,
        _style: &ToolStyle,
    ) {
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, canvas: &mut dyn Canvas, style: &ToolStyle);

    fn on_pointer_up(
        &mut self,
        _event: &PointerEvent,
        _canvas: &mut dyn Canvas,
        _style: &ToolStyle,
    ) {
    }

    fn on_key_down(&mut self, _event: &KeyEvent, _canvas: &mut dyn Canvas, _style: &ToolStyle) {}

    /// Short name of the current interaction state, for status display
    fn current_state_name(&self) -> &'static str;

    /// Route one input event to the matching handler
    fn handle_input(&mut self, input: &ToolInput, canvas: &mut dyn Canvas, style: &ToolStyle) {
        match input {
            ToolInput::PointerMove(event) => self.on_pointer_move(event, canvas, style),
            ToolInput::PointerDrag(event) => self.on_pointer_drag(event, canvas, style),
            ToolInput::PointerDown(event) => self.on_pointer_down(event, canvas, style),
            ToolInput::PointerUp(event) => self.on_pointer_up(event, canvas, style),
            ToolInput::KeyDown(event) => self.on_key_down(event, canvas, style),
        }
    }
}

// Tool implementations
pub mod bounds;
pub mod bucket;
pub mod polyline;
pub mod selection;

pub use bounds::{BoundsDrawer, BoundsTool, RectangleShape};
pub use bucket::{BucketTool, FillMode};
pub use polyline::{PolygonShape, PolylineRenderer, PolylineSession, PolylineState, PolylineTool};
pub use selection::{
    LassoSelection, RectangularSelection, SelectionEditor, SelectionOutline, SelectionState,
    SelectionTool,
};

pub type PolygonTool = PolylineTool<PolygonShape>;
pub type RectangleTool = BoundsTool<RectangleShape>;
pub type MarqueeTool = SelectionTool<RectangularSelection>;
pub type LassoTool = SelectionTool<LassoSelection>;

/// Enum representing all available tool types
/// This allows us to avoid using Box<dyn Tool> and simplifies memory management
#[derive(Debug, Clone)]
pub enum ToolType {
    Polygon(PolygonTool),
    Rectangle(RectangleTool),
    Selection(MarqueeTool),
    Lasso(LassoTool),
    Bucket(BucketTool),
}

impl ToolType {
    fn inner(&self) -> &dyn Tool {
        match self {
            Self::Polygon(tool) => tool,
            Self::Rectangle(tool) => tool,
            Self::Selection(tool) => tool,
            Self::Lasso(tool) => tool,
            Self::Bucket(tool) => tool,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Polygon(tool) => tool,
            Self::Rectangle(tool) => tool,
            Self::Selection(tool) => tool,
            Self::Lasso(tool) => tool,
            Self::Bucket(tool) => tool,
        }
    }

    /// Active selection, if this is one of the selection tools
    pub fn selection_outline(&self) -> Option<SelectionOutline> {
        match self {
            Self::Selection(tool) => tool.editor().selection_outline(),
            Self::Lasso(tool) => tool.editor().selection_outline(),
            _ => None,
        }
    }

    pub fn is_selection_tool(&self) -> bool {
        matches!(self, Self::Selection(_) | Self::Lasso(_))
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn cursor(&self) -> CursorIcon {
        self.inner().cursor()
    }

    fn activate(&mut self, canvas: &mut dyn Canvas) {
        self.inner_mut().activate(canvas)
    }

    fn deactivate(&mut self, canvas: &mut dyn Canvas) {
        self.inner_mut().deactivate(canvas)
    }

    fn on_pointer_move(
        &mut self,
        event: &PointerEvent,
        canvas: &mut dyn Canvas,
        style: &ToolStyle,
    ) {
        self.inner_mut().on_pointer_move(event, canvas, style)
    }

    fn on_pointer_drag(
        &mut self,
        event: &PointerEvent,
        canvas: &mut dyn Canvas,
        style: &ToolStyle,
    ) {
        self.inner_mut().on_pointer_drag(event, canvas, style)
    }

    fn on_pointer_down(
        &mut self,
        event: &PointerEvent,
        canvas: &mut dyn Canvas,
        style: &ToolStyle,
    ) {
        self.inner_mut().on_pointer_down(event, canvas, style)
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, canvas: &mut dyn Canvas, style: &ToolStyle) {
        self.inner_mut().on_pointer_up(event, canvas, style)
    }

    fn on_key_down(&mut self, event: &KeyEvent, canvas: &mut dyn Canvas, style: &ToolStyle) {
        self.inner_mut().on_key_down(event, canvas, style)
    }

    fn current_state_name(&self) -> &'static str {
        self.inner().current_state_name()
    }
}

/// Names accepted by [`new_tool`], in tool-picker order
pub const TOOL_NAMES: [&str; 5] = ["Polygon", "Rectangle", "Selection", "Lasso", "Bucket"];

// Factory function to create a new tool of the specified type
pub fn new_tool(tool_type: &str) -> Option<ToolType> {
    match tool_type {
        "Polygon" => Some(ToolType::Polygon(PolygonTool::default())),
        "Rectangle" => Some(ToolType::Rectangle(RectangleTool::default())),
        "Selection" => Some(ToolType::Selection(MarqueeTool::default())),
        "Lasso" => Some(ToolType::Lasso(LassoTool::default())),
        "Bucket" => Some(ToolType::Bucket(BucketTool::default())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_names_round_trip() {
        for name in TOOL_NAMES {
            let tool = new_tool(name).expect("every listed name builds a tool");
            assert_eq!(tool.name(), name);
        }
        assert!(new_tool("Airbrush").is_none());
    }

    #[test]
    fn test_selection_tools_flagged() {
        assert!(new_tool("Lasso").unwrap().is_selection_tool());
        assert!(!new_tool("Polygon").unwrap().is_selection_tool());
    }
}
