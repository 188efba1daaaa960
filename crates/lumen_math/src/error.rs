use thiserror::Error;

/// Errors raised by the vector math primitives.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("Cannot normalize a zero-length vector")]
    ZeroLength,

    #[error("Component index {index} is out of range for a {len}-component vector")]
    ComponentOutOfRange { index: usize, len: usize },
}

/// Result type for math operations.
pub type MathResult<T> = Result<T, MathError>;
