//! Lumen Core - scene description for the Lumen ray tracer.
//!
//! This crate provides:
//!
//! - **Primitives**: `Triangle`, `Sphere` and the `Shape`/`Primitive` wrappers
//! - **Scene**: primitive arena with mesh construction helpers and lights
//! - **Materials and lights**: plain value types assigned by copy
//! - **Flat tracing**: 2D line and circle primitives
//!
//! # Example
//!
//! ```
//! use lumen_core::{Material, Scene};
//! use lumen_math::{Color, Vec3};
//!
//! let mut scene = Scene::new();
//! let cube = scene.add_cube(Vec3::ZERO, 2.0)?;
//! scene.set_material(&cube, Material::diffuse(Color::RED))?;
//! assert_eq!(cube.shape_count(), 12);
//! # Ok::<(), lumen_core::GeometryError>(())
//! ```

pub mod demo;
pub mod error;
pub mod flat;
pub mod light;
pub mod material;
pub mod primitive;
pub mod scene;

// Re-export commonly used types
pub use error::{GeometryError, GeometryResult};
pub use flat::{nearest_hit2, Circle, Line, Primitive2, Shape2};
pub use light::{Light, LightKind};
pub use material::Material;
pub use primitive::{HitTest, HitType, Primitive, Shape, Sphere, Triangle};
pub use scene::{MeshRef, Scene};
