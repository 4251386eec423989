use crate::canvas::{Canvas, ImageCanvas};
use crate::config::ToolSettings;
use crate::input::InputHandler;
use crate::paint::MAX_STROKE_WIDTH;
use crate::tools::{self, Tool, ToolType, TOOL_NAMES};
use egui::color_picker::{Alpha, color_edit_button_srgba};
use egui::{Color32, Rect, TextureHandle, TextureOptions, pos2};
use image::{Rgba, RgbaImage};
use log::info;

const SETTINGS_KEY: &str = "raster_tools_settings";
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Minimal host window: a tool picker and the canvas
pub struct PaintApp {
    settings: ToolSettings,
    canvas: ImageCanvas,
    active_tool: ToolType,
    input: InputHandler,
    texture: Option<TextureHandle>,
}

impl PaintApp {
    /// Called once before the first frame. Explicit settings win over the
    /// ones persisted from the previous run.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Option<ToolSettings>) -> Self {
        let settings = settings
            .or_else(|| {
                cc.storage
                    .and_then(|storage| eframe::get_value::<ToolSettings>(storage, SETTINGS_KEY))
            })
            .filter(|settings| settings.validate().is_ok())
            .unwrap_or_default();
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: ToolSettings) -> Self {
        let (width, height) = (settings.canvas_width.max(1), settings.canvas_height.max(1));
        let canvas = ImageCanvas::from_image(RgbaImage::from_pixel(width, height, BACKGROUND));
        let mut app = Self {
            input: InputHandler::new(Rect::NOTHING, (width, height)),
            active_tool: ToolType::Polygon(tools::PolygonTool::default()),
            settings,
            canvas,
            texture: None,
        };
        app.apply_settings();
        app
    }

    pub fn canvas(&self) -> &ImageCanvas {
        &self.canvas
    }

    pub fn active_tool(&self) -> &ToolType {
        &self.active_tool
    }

    pub fn select_tool(&mut self, name: &str) {
        let Some(tool) = tools::new_tool(name) else {
            return;
        };
        self.active_tool.deactivate(&mut self.canvas);
        self.active_tool = tool;
        self.apply_settings();
        self.active_tool.activate(&mut self.canvas);
        info!("Activated {} tool", self.active_tool.name());
    }

    /// Push tool-specific settings into the active tool
    fn apply_settings(&mut self) {
        match &mut self.active_tool {
            ToolType::Polygon(tool) => tool.set_angle_increment(self.settings.angle_increment),
            ToolType::Bucket(tool) => {
                tool.set_tolerance(self.settings.tolerance);
                tool.set_connectivity(self.settings.connectivity);
                tool.set_mode(self.settings.fill_mode);
            }
            ToolType::Rectangle(_) | ToolType::Selection(_) | ToolType::Lasso(_) => {}
        }
    }

    fn upload_canvas(&mut self, ctx: &egui::Context) {
        if !self.canvas.take_redraw_request() && self.texture.is_some() {
            return;
        }
        let image = self.canvas.composite();
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        match &mut self.texture {
            Some(texture) => texture.set(color_image, TextureOptions::NEAREST),
            None => {
                let texture = ctx.load_texture("canvas", color_image, TextureOptions::NEAREST);
                self.texture = Some(texture);
            }
        }
    }

    fn tools_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        ui.separator();

        for name in TOOL_NAMES {
            if ui
                .selectable_label(self.active_tool.name() == name, name)
                .clicked()
            {
                self.select_tool(name);
            }
        }

        ui.separator();

        let mut changed = false;
        changed |= ui
            .add(
                egui::Slider::new(&mut self.settings.stroke_width, 1..=MAX_STROKE_WIDTH)
                    .text("Width"),
            )
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut self.settings.tolerance, 0..=255).text("Tolerance"))
            .changed();

        ui.horizontal(|ui| {
            ui.label("Stroke:");
            let [r, g, b, a] = self.settings.stroke_color;
            let mut color = Color32::from_rgba_unmultiplied(r, g, b, a);
            if color_edit_button_srgba(ui, &mut color, Alpha::OnlyBlend).changed() {
                self.settings.stroke_color = color.to_srgba_unmultiplied();
            }
        });

        ui.horizontal(|ui| {
            let mut fill_enabled = self.settings.fill_color.is_some();
            if ui.checkbox(&mut fill_enabled, "Fill").changed() {
                self.settings.fill_color = fill_enabled.then_some([255, 255, 255, 255]);
            }
            if let Some(fill) = &mut self.settings.fill_color {
                let [r, g, b, a] = *fill;
                let mut color = Color32::from_rgba_unmultiplied(r, g, b, a);
                if color_edit_button_srgba(ui, &mut color, Alpha::OnlyBlend).changed() {
                    *fill = color.to_srgba_unmultiplied();
                }
            }
        });

        if changed {
            self.apply_settings();
        }

        ui.separator();
        ui.label(format!("State: {}", self.active_tool.current_state_name()));
        if let Some(bounds) = self
            .active_tool
            .selection_outline()
            .and_then(|outline| outline.bounds())
        {
            ui.label(format!(
                "Selection: {}x{} at ({}, {})",
                bounds.width, bounds.height, bounds.x, bounds.y
            ));
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, SETTINGS_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("tools_panel").show(ctx, |ui| self.tools_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let (width, height) = self.canvas.size();
            let (response, painter) = ui.allocate_painter(
                egui::vec2(width as f32, height as f32),
                egui::Sense::click_and_drag(),
            );
            self.input.set_canvas_rect(response.rect);

            let style = self.settings.tool_style();
            for input in self.input.process_input(ctx) {
                self.active_tool.handle_input(&input, &mut self.canvas, &style);
            }

            if response.hovered() {
                ctx.set_cursor_icon(self.active_tool.cursor());
            }

            self.upload_canvas(ctx);
            if let Some(texture) = &self.texture {
                painter.image(
                    texture.id(),
                    response.rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switching_tools_applies_settings() {
        let settings = ToolSettings {
            tolerance: 40,
            angle_increment: 45.0,
            canvas_width: 32,
            canvas_height: 16,
            ..Default::default()
        };
        let mut app = PaintApp::with_settings(settings);
        assert_eq!(app.canvas().size(), (32, 16));
        match app.active_tool() {
            ToolType::Polygon(tool) => assert_eq!(tool.angle_increment(), 45.0),
            other => panic!("unexpected default tool {}", other.name()),
        }

        app.select_tool("Bucket");
        match app.active_tool() {
            ToolType::Bucket(tool) => assert_eq!(tool.options().tolerance, 40),
            other => panic!("unexpected tool {}", other.name()),
        }

        app.select_tool("Airbrush");
        assert_eq!(app.active_tool().name(), "Bucket");
    }
}
