use thiserror::Error;

/// Errors raised by pixel-level operations on a canvas or image
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("Point ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("Image size {actual:?} does not match canvas size {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Canvas has no pixels")]
    EmptyCanvas,
}

/// Errors that can occur while loading or saving tool settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

pub type RasterResult<T> = Result<T, RasterError>;
