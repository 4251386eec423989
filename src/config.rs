use crate::error::ConfigError;
use crate::flood_fill::{Connectivity, FloodFillOptions};
use crate::paint::{MAX_STROKE_WIDTH, Paint, StrokeStyle, ToolStyle};
use crate::tools::FillMode;
use crate::tools::polyline::DEFAULT_ANGLE_INCREMENT;
use egui::Color32;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// User-adjustable tool settings, persisted as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old settings
pub struct ToolSettings {
    /// Flood-fill color tolerance, 0 for exact matches
    pub tolerance: u8,
    pub connectivity: Connectivity,
    pub fill_mode: FillMode,
    /// Snap increment for shift-constrained polyline segments, in degrees
    pub angle_increment: f64,
    pub stroke_width: u32,
    /// RGBA, unmultiplied
    pub stroke_color: [u8; 4],
    /// `None` disables shape fills
    pub fill_color: Option<[u8; 4]>,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tolerance: 0,
            connectivity: Connectivity::Four,
            fill_mode: FillMode::Replace,
            angle_increment: DEFAULT_ANGLE_INCREMENT,
            stroke_width: 2,
            stroke_color: [0, 0, 0, 255],
            fill_color: None,
            canvas_width: 640,
            canvas_height: 480,
        }
    }
}

impl ToolSettings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults if the file is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Using default tool settings ({}): {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.angle_increment > 0.0 && self.angle_increment <= 180.0) {
            return Err(ConfigError::Invalid(format!(
                "angle_increment must be in (0, 180], got {}",
                self.angle_increment
            )));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must not be empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(1..=MAX_STROKE_WIDTH).contains(&self.stroke_width) {
            return Err(ConfigError::Invalid(format!(
                "stroke_width must be in 1..={}, got {}",
                MAX_STROKE_WIDTH, self.stroke_width
            )));
        }
        Ok(())
    }

    pub fn flood_fill_options(&self) -> FloodFillOptions {
        FloodFillOptions {
            tolerance: self.tolerance,
            connectivity: self.connectivity,
        }
    }

    pub fn tool_style(&self) -> ToolStyle {
        let [r, g, b, a] = self.stroke_color;
        let stroke_paint = Paint::solid(Color32::from_rgba_unmultiplied(r, g, b, a));
        let fill_paint = self
            .fill_color
            .map(|[r, g, b, a]| Paint::solid(Color32::from_rgba_unmultiplied(r, g, b, a)));
        ToolStyle::new(StrokeStyle::new(self.stroke_width), stroke_paint, fill_paint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ToolSettings::default().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: ToolSettings = serde_json::from_str(r#"{ "tolerance": 12 }"#).unwrap();
        assert_eq!(settings.tolerance, 12);
        assert_eq!(settings.angle_increment, 15.0);
        assert_eq!(settings.connectivity, Connectivity::Four);
    }

    #[test]
    fn test_rejects_zero_angle() {
        let settings = ToolSettings {
            angle_increment: 0.0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_stroke_width_out_of_range() {
        for stroke_width in [0, MAX_STROKE_WIDTH + 1, 3000] {
            let settings = ToolSettings {
                stroke_width,
                ..Default::default()
            };
            assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
        }
        let widest = ToolSettings {
            stroke_width: MAX_STROKE_WIDTH,
            ..Default::default()
        };
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_style_from_colors() {
        let settings = ToolSettings {
            fill_color: Some([255, 0, 0, 255]),
            ..Default::default()
        };
        let style = settings.tool_style();
        assert_eq!(style.stroke().width, 2);
        assert_eq!(style.fill_paint(), Some(&Paint::solid(Color32::RED)));
    }
}
