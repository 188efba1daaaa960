use lumen_math::MathError;
use thiserror::Error;

/// Errors that can occur while building scene geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Degenerate triangle (area {area})")]
    DegenerateTriangle { area: f32 },

    #[error("Invalid sphere or circle radius: {0}")]
    InvalidRadius(f32),

    #[error("Degenerate line segment (zero length)")]
    DegenerateLine,

    #[error("Primitive index {index} is out of range (scene has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Primitive {0} is not a triangle")]
    NotATriangle(usize),

    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
