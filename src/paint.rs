use egui::Color32;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// What gets applied to a pixel: a flat color or a repeating texture
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color32),
    /// Tiled over the canvas, anchored at the image origin
    Texture(Arc<RgbaImage>),
}

impl Paint {
    pub fn solid(color: Color32) -> Self {
        Self::Solid(color)
    }

    pub fn texture(image: RgbaImage) -> Self {
        Self::Texture(Arc::new(image))
    }

    /// Color this paint contributes at canvas position (x, y)
    pub fn sample(&self, x: u32, y: u32) -> Rgba<u8> {
        match self {
            Self::Solid(color) => to_rgba(*color),
            Self::Texture(texture) => {
                let (w, h) = texture.dimensions();
                if w == 0 || h == 0 {
                    return Rgba([0, 0, 0, 0]);
                }
                *texture.get_pixel(x % w, y % h)
            }
        }
    }
}

impl From<Color32> for Paint {
    fn from(color: Color32) -> Self {
        Self::Solid(color)
    }
}

pub fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

/// Widest pen the settings accept
pub const MAX_STROKE_WIDTH: u32 = 32;

/// Line attributes applied when outlining shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StrokeStyle {
    /// Width of the pen in pixels
    pub width: u32,
    /// Optional on/off dash lengths in pixels
    pub dash: Option<(u32, u32)>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self { width: 1, dash: None }
    }
}

impl StrokeStyle {
    pub fn new(width: u32) -> Self {
        Self {
            width: width.max(1),
            dash: None,
        }
    }

    pub fn dashed(width: u32, on: u32, off: u32) -> Self {
        Self {
            width: width.max(1),
            dash: Some((on.max(1), off)),
        }
    }
}

/// Style attributes a tool consumes but does not own
#[derive(Debug, Clone, PartialEq)]
pub struct ToolStyle {
    stroke: StrokeStyle,
    stroke_paint: Paint,
    fill_paint: Option<Paint>,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle::default(),
            stroke_paint: Paint::Solid(Color32::BLACK),
            fill_paint: None,
        }
    }
}

impl ToolStyle {
    pub fn new(stroke: StrokeStyle, stroke_paint: Paint, fill_paint: Option<Paint>) -> Self {
        Self {
            stroke,
            stroke_paint,
            fill_paint,
        }
    }

    pub fn stroke(&self) -> StrokeStyle {
        self.stroke
    }

    pub fn stroke_paint(&self) -> &Paint {
        &self.stroke_paint
    }

    /// `None` means no fill was requested
    pub fn fill_paint(&self) -> Option<&Paint> {
        self.fill_paint.as_ref()
    }

    pub fn set_stroke(&mut self, stroke: StrokeStyle) {
        self.stroke = stroke;
    }

    pub fn set_stroke_paint(&mut self, paint: Paint) {
        self.stroke_paint = paint;
    }

    pub fn set_fill_paint(&mut self, paint: Option<Paint>) {
        self.fill_paint = paint;
    }
}
