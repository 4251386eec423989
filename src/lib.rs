#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod fill;
pub mod flood_fill;
pub mod geometry;
pub mod input;
pub mod paint;
pub mod raster;
pub mod tools;

pub use app::PaintApp;
pub use canvas::{Canvas, ImageCanvas};
pub use config::ToolSettings;
pub use error::{ConfigError, RasterError};
pub use fill::{BlendFill, FillFunction, ReplaceFill};
pub use flood_fill::{Connectivity, FloodFillOptions, flood_fill, flood_fill_with};
pub use geometry::{IntRect, Point, SelectionPath};
pub use input::{InputHandler, KeyEvent, PointerEvent, ToolInput};
pub use paint::{Paint, StrokeStyle, ToolStyle};
pub use tools::{Tool, ToolType};
