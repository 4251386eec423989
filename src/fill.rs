//! Per-pixel fill strategies used by the flood-fill engine and the bucket tool.

use crate::paint::Paint;
use image::{Rgba, RgbaImage};

/// Colors a single pixel of an image with a paint.
///
/// Callers guarantee that (x, y) lies inside `image`; an out-of-bounds
/// coordinate is a logic error and panics.
pub trait FillFunction {
    fn fill(&self, image: &mut RgbaImage, x: u32, y: u32, paint: &Paint);
}

impl<F> FillFunction for F
where
    F: Fn(&mut RgbaImage, u32, u32, &Paint),
{
    fn fill(&self, image: &mut RgbaImage, x: u32, y: u32, paint: &Paint) {
        self(image, x, y, paint)
    }
}

/// Overwrites the pixel with the paint's sample at that position
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceFill;

impl FillFunction for ReplaceFill {
    fn fill(&self, image: &mut RgbaImage, x: u32, y: u32, paint: &Paint) {
        image.put_pixel(x, y, paint.sample(x, y));
    }
}

/// Composites the paint's sample over the existing pixel
#[derive(Debug, Clone, Copy, Default)]
pub struct BlendFill;

impl FillFunction for BlendFill {
    fn fill(&self, image: &mut RgbaImage, x: u32, y: u32, paint: &Paint) {
        let dst = *image.get_pixel(x, y);
        image.put_pixel(x, y, blend_over(paint.sample(x, y), dst));
    }
}

/// Source-over compositing of two unpremultiplied colors
pub fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    // Alpha scaled by 255 to stay in integer math
    let out_a = sa * 255 + da * (255 - sa);
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let value = (u32::from(src[c]) * sa * 255 + u32::from(dst[c]) * da * (255 - sa)) / out_a;
        out[c] = value.min(255) as u8;
    }
    out[3] = ((out_a + 127) / 255).min(255) as u8;
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    #[test]
    fn test_replace_fill_writes_one_pixel() {
        let mut image = RgbaImage::new(3, 3);
        ReplaceFill.fill(&mut image, 1, 2, &Paint::solid(Color32::RED));
        let painted = image.pixels().filter(|p| p[3] != 0).count();
        assert_eq!(painted, 1);
        assert_eq!(*image.get_pixel(1, 2), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_blend_fill_over_transparent() {
        let mut image = RgbaImage::new(1, 1);
        BlendFill.fill(&mut image, 0, 0, &Paint::solid(Color32::BLUE));
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_blend_half_alpha_over_white() {
        let out = blend_over(Rgba([0, 0, 0, 128]), Rgba([255, 255, 255, 255]));
        assert_eq!(out[3], 255);
        assert!(out[0] > 120 && out[0] < 135);
    }

    #[test]
    fn test_closure_is_fill_function() {
        let mut image = RgbaImage::new(2, 1);
        let invert = |img: &mut RgbaImage, x: u32, y: u32, _paint: &Paint| {
            let p = img.get_pixel_mut(x, y);
            p[0] = 255 - p[0];
        };
        invert.fill(&mut image, 1, 0, &Paint::solid(Color32::BLACK));
        assert_eq!(image.get_pixel(1, 0)[0], 255);
    }
}
