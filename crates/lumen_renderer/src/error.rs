use lumen_math::MathError;
use thiserror::Error;

/// Errors that can occur while rendering.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Frame buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Pixel ({x}, {y}) is outside the image")]
    PixelOutOfBounds { x: u32, y: u32 },

    #[error("Render cancelled")]
    Cancelled,

    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
