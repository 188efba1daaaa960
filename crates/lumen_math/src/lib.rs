//! Lumen Math - vectors, colors and rays for the Lumen ray tracer.
//!
//! Vector and matrix types come from glam; this crate adds the ray tracer's
//! own value types and the checked operations (normalization, component
//! access) that report errors instead of producing NaN.

// Re-export glam for convenience
pub use glam::*;

mod color;
mod error;
mod interval;
mod quadratic;
mod ray;
mod transform;

pub use color::Color;
pub use error::{MathError, MathResult};
pub use interval::Interval;
pub use quadratic::solve_quadratic;
pub use ray::{Ray, Ray2};
pub use transform::{rotation_matrix, Vec2Ext, Vec3Ext};

/// Tolerance used by intersection tests and degenerate-geometry checks.
pub const EPSILON: f32 = 1e-6;
