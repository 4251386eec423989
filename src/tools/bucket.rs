use crate::canvas::Canvas;
use crate::fill::{BlendFill, FillFunction, ReplaceFill};
use crate::flood_fill::{self, Connectivity, FloodFillOptions};
use crate::input::PointerEvent;
use crate::paint::{Paint, ToolStyle};
use crate::tools::Tool;
use egui::CursorIcon;
use image::RgbaImage;
use log::debug;
use serde::{Deserialize, Serialize};

/// Which fill function the bucket applies to each pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillMode {
    #[default]
    Replace,
    Blend,
}

impl FillFunction for FillMode {
    fn fill(&self, image: &mut RgbaImage, x: u32, y: u32, paint: &Paint) {
        match self {
            Self::Replace => ReplaceFill.fill(image, x, y, paint),
            Self::Blend => BlendFill.fill(image, x, y, paint),
        }
    }
}

/// Paint bucket: floods the clicked region of the committed image
#[derive(Debug, Clone, Default)]
pub struct BucketTool {
    options: FloodFillOptions,
    mode: FillMode,
    last_fill_size: Option<usize>,
}

impl BucketTool {
    pub fn new(options: FloodFillOptions, mode: FillMode) -> Self {
        Self {
            options,
            mode,
            last_fill_size: None,
        }
    }

    pub fn options(&self) -> FloodFillOptions {
        self.options
    }

    pub fn set_tolerance(&mut self, tolerance: u8) {
        self.options.tolerance = tolerance;
    }

    pub fn set_connectivity(&mut self, connectivity: Connectivity) {
        self.options.connectivity = connectivity;
    }

    pub fn set_mode(&mut self, mode: FillMode) {
        self.mode = mode;
    }

    /// Number of pixels colored by the most recent fill
    pub fn last_fill_size(&self) -> Option<usize> {
        self.last_fill_size
    }
}

impl Tool for BucketTool {
    fn name(&self) -> &'static str {
        "Bucket"
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::PointingHand
    }

    fn deactivate(&mut self, canvas: &mut dyn Canvas) {
        canvas.clear_scratch();
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
        style: &ToolStyle,
    ) {
        let region = flood_fill::fillable_region(canvas.image(), event.position, self.options);
        let region = match region {
            Ok(region) => region,
            Err(e) => {
                debug!("Ignoring bucket click: {e}");
                return;
            }
        };

        let paint = match style.fill_paint() {
            Some(paint) => paint,
            None => style.stroke_paint(),
        };

        canvas.clear_scratch();
        flood_fill::fill_pixels(canvas.scratch_image_mut(), &region, paint, &self.mode);
        canvas.commit();

        debug!("Bucket filled {} pixels", region.len());
        self.last_fill_size = Some(region.len());
    }

    fn current_state_name(&self) -> &'static str {
        "Ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ImageCanvas;
    use crate::geometry::IntRect;
    use crate::raster;
    use egui::Color32;
    use image::Rgba;

    #[test]
    fn test_fills_enclosed_area() {
        let mut canvas = ImageCanvas::new(20, 20, Rgba([255, 255, 255, 255])).unwrap();
        let mut image = canvas.image().clone();
        raster::draw_rect(
            &mut image,
            IntRect::new(5, 5, 10, 10),
            Default::default(),
            &Paint::solid(Color32::BLACK),
        );
        canvas.set_image(image).unwrap();

        let style = ToolStyle::new(
            Default::default(),
            Paint::solid(Color32::BLACK),
            Some(Paint::solid(Color32::RED)),
        );
        let mut tool = BucketTool::default();
        tool.on_pointer_down(&PointerEvent::at(10, 10), &mut canvas, &style);

        assert_eq!(tool.last_fill_size(), Some(81));
        assert_eq!(*canvas.image().get_pixel(10, 10), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.image().get_pixel(1, 1), Rgba([255, 255, 255, 255]));
        assert!(canvas.scratch_is_clear());
    }

    #[test]
    fn test_click_outside_is_ignored() {
        let mut canvas = ImageCanvas::new(4, 4, Rgba([255, 255, 255, 255])).unwrap();
        let mut tool = BucketTool::default();
        tool.on_pointer_down(&PointerEvent::at(-1, 2), &mut canvas, &ToolStyle::default());
        assert_eq!(canvas.commit_count(), 0);
        assert!(tool.last_fill_size().is_none());
    }
}
