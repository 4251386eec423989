//! Stack-based region growth over an RGBA image.
//!
//! The fillable region is every pixel connected to the seed whose color lies
//! within `tolerance` of the seed's color. Each pixel in the region is handed
//! to the [`FillFunction`] exactly once.

use crate::error::{RasterError, RasterResult};
use crate::fill::FillFunction;
use crate::geometry::Point;
use crate::paint::Paint;
use image::{Rgba, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which neighbors count as connected to a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connectivity {
    /// Up, down, left and right
    #[default]
    Four,
    /// The four edge neighbors plus the diagonals
    Eight,
}

impl Connectivity {
    fn offsets(self) -> &'static [(i32, i32)] {
        const FOUR: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        const EIGHT: [(i32, i32); 8] = [
            (0, -1),
            (0, 1),
            (-1, 0),
            (1, 0),
            (-1, -1),
            (1, -1),
            (-1, 1),
            (1, 1),
        ];
        match self {
            Self::Four => &FOUR,
            Self::Eight => &EIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloodFillOptions {
    /// Largest per-channel difference still considered a match; 0 means exact
    pub tolerance: u8,
    pub connectivity: Connectivity,
}

impl FloodFillOptions {
    pub fn with_tolerance(tolerance: u8) -> Self {
        Self {
            tolerance,
            ..Default::default()
        }
    }
}

/// Largest absolute difference between any two channels of the colors
pub fn color_distance(a: Rgba<u8>, b: Rgba<u8>) -> u8 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

/// 4-connected flood fill from `seed`. Returns how many pixels were filled.
pub fn flood_fill<F: FillFunction + ?Sized>(
    image: &mut RgbaImage,
    seed: Point,
    tolerance: u8,
    paint: &Paint,
    fill: &F,
) -> RasterResult<usize> {
    flood_fill_with(image, seed, FloodFillOptions::with_tolerance(tolerance), paint, fill)
}

pub fn flood_fill_with<F: FillFunction + ?Sized>(
    image: &mut RgbaImage,
    seed: Point,
    options: FloodFillOptions,
    paint: &Paint,
    fill: &F,
) -> RasterResult<usize> {
    let region = fillable_region(image, seed, options)?;
    fill_pixels(image, &region, paint, fill);
    debug!(
        "Flood fill from ({}, {}) with tolerance {} filled {} pixels",
        seed.x,
        seed.y,
        options.tolerance,
        region.len()
    );
    Ok(region.len())
}

/// Collects the connected region around `seed` without modifying the image.
///
/// Pixels are returned in discovery order; each appears exactly once.
pub fn fillable_region(
    image: &RgbaImage,
    seed: Point,
    options: FloodFillOptions,
) -> RasterResult<Vec<(u32, u32)>> {
    let (width, height) = image.dimensions();
    let in_bounds = |x: i32, y: i32| x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height;

    if !in_bounds(seed.x, seed.y) {
        return Err(RasterError::OutOfBounds {
            x: seed.x,
            y: seed.y,
            width,
            height,
        });
    }

    let origin = (seed.x as u32, seed.y as u32);
    let reference = *image.get_pixel(origin.0, origin.1);
    let mut visited: HashSet<(u32, u32)> = HashSet::from([origin]);
    let mut frontier: Vec<(u32, u32)> = vec![origin];
    let mut region = Vec::new();

    while let Some((x, y)) = frontier.pop() {
        region.push((x, y));

        for &(dx, dy) in options.connectivity.offsets() {
            let (nx, ny) = (x as i32 + dx, y as i32 + dy);
            if !in_bounds(nx, ny) {
                continue;
            }
            let neighbor = (nx as u32, ny as u32);
            if visited.contains(&neighbor) {
                continue;
            }
            let color = *image.get_pixel(neighbor.0, neighbor.1);
            if color_distance(color, reference) <= options.tolerance {
                visited.insert(neighbor);
                frontier.push(neighbor);
            }
        }
    }

    Ok(region)
}

/// Applies `fill` once to each listed pixel of `image`
pub fn fill_pixels<F: FillFunction + ?Sized>(
    image: &mut RgbaImage,
    pixels: &[(u32, u32)],
    paint: &Paint,
    fill: &F,
) {
    for &(x, y) in pixels {
        fill.fill(image, x, y, paint);
    }
}
