use crate::error::{RasterError, RasterResult};
use crate::fill::blend_over;
use image::{Rgba, RgbaImage};
use log::debug;

/// Drawing surface shared by the tools: committed pixels plus one scratch
/// layer for previews.
pub trait Canvas {
    /// Committed pixels
    fn image(&self) -> &RgbaImage;

    /// Preview layer the active tool draws into
    fn scratch_image_mut(&mut self) -> &mut RgbaImage;

    fn scratch_image(&self) -> &RgbaImage;

    /// Make the scratch layer fully transparent
    fn clear_scratch(&mut self);

    /// Request a redraw of the canvas
    fn invalidate(&mut self);

    /// Merge the scratch layer into the committed image, then clear it
    fn commit(&mut self);

    fn size(&self) -> (u32, u32) {
        self.image().dimensions()
    }
}

/// In-memory canvas backed by two RGBA buffers
#[derive(Debug, Clone)]
pub struct ImageCanvas {
    image: RgbaImage,
    scratch: RgbaImage,
    needs_redraw: bool,
    commit_count: usize,
}

impl ImageCanvas {
    /// Opaque canvas filled with `background`
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyCanvas);
        }
        Ok(Self::from_image(RgbaImage::from_pixel(width, height, background)))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image,
            scratch: RgbaImage::new(width, height),
            needs_redraw: true,
            commit_count: 0,
        }
    }

    /// Replace the committed image, e.g. after an external edit
    pub fn set_image(&mut self, image: RgbaImage) -> RasterResult<()> {
        if image.dimensions() != self.image.dimensions() {
            return Err(RasterError::SizeMismatch {
                expected: self.image.dimensions(),
                actual: image.dimensions(),
            });
        }
        self.image = image;
        self.needs_redraw = true;
        Ok(())
    }

    /// Committed image with the scratch layer composited on top
    pub fn composite(&self) -> RgbaImage {
        let mut out = self.image.clone();
        merge_into(&mut out, &self.scratch);
        out
    }

    /// Returns whether a redraw was requested since the last call, and resets the flag
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn commit_count(&self) -> usize {
        self.commit_count
    }

    pub fn scratch_is_clear(&self) -> bool {
        self.scratch.pixels().all(|p| p[3] == 0)
    }
}

fn merge_into(dst: &mut RgbaImage, src: &RgbaImage) {
    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        if s[3] != 0 {
            *d = blend_over(*s, *d);
        }
    }
}

impl Canvas for ImageCanvas {
    fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn scratch_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.scratch
    }

    fn scratch_image(&self) -> &RgbaImage {
        &self.scratch
    }

    fn clear_scratch(&mut self) {
        for p in self.scratch.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    fn commit(&mut self) {
        merge_into(&mut self.image, &self.scratch);
        self.clear_scratch();
        self.commit_count += 1;
        self.needs_redraw = true;
        debug!("Committed scratch layer (commit #{})", self.commit_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_empty_canvas_rejected() {
        assert_eq!(ImageCanvas::new(0, 10, WHITE).unwrap_err(), RasterError::EmptyCanvas);
    }

    #[test]
    fn test_commit_merges_and_clears() {
        let mut canvas = ImageCanvas::new(4, 4, WHITE).unwrap();
        canvas.scratch_image_mut().put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.image().get_pixel(1, 1), WHITE);
        assert_eq!(*canvas.composite().get_pixel(1, 1), Rgba([255, 0, 0, 255]));

        canvas.commit();
        assert_eq!(*canvas.image().get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert!(canvas.scratch_is_clear());
        assert_eq!(canvas.commit_count(), 1);
    }

    #[test]
    fn test_set_image_size_checked() {
        let mut canvas = ImageCanvas::new(4, 4, WHITE).unwrap();
        let err = canvas.set_image(RgbaImage::new(2, 2)).unwrap_err();
        assert_eq!(
            err,
            RasterError::SizeMismatch {
                expected: (4, 4),
                actual: (2, 2)
            }
        );
    }

    #[test]
    fn test_redraw_flag() {
        let mut canvas = ImageCanvas::new(2, 2, WHITE).unwrap();
        assert!(canvas.take_redraw_request());
        assert!(!canvas.take_redraw_request());
        canvas.invalidate();
        assert!(canvas.take_redraw_request());
    }
}
