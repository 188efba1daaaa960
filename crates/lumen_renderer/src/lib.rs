//! Lumen Renderer - CPU ray tracing
//!
//! A Whitted-style ray tracer for [`lumen_core::Scene`]s: primary rays from a
//! pinhole camera, nearest-hit search over the scene's primitives, local
//! Lambert and specular lighting, and recursive mirror and glass bounces.
//!
//! # Example
//!
//! ```
//! use lumen_core::demo;
//! use lumen_renderer::{render, RenderConfig};
//!
//! let scene = demo::create_scene()?;
//! let config = RenderConfig::default().with_resolution(32, 18);
//! let image = render(&scene, &config)?;
//! assert_eq!(image.to_rgba8().len(), 32 * 18 * 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod camera;
mod config;
mod error;
mod modes;
mod renderer;
mod shading;
mod tile;
mod tracer;

pub use camera::{pixel_to_screen, Camera};
pub use config::{CameraConfig, RenderConfig, RenderMode, MAX_DEPTH};
pub use error::{RenderError, RenderResult};
pub use modes::mode_color;
pub use renderer::{render, render_image, render_pass, ImageBuffer, RenderProgress};
pub use shading::{compute_color, local_color, SURFACE_BIAS};
pub use tile::{generate_tiles, Tile, DEFAULT_TILE_SIZE};
pub use tracer::{trace_ray, SurfaceHit, TraceContext, TraceIteration};

/// Re-export Color and common math types from lumen_math
pub use lumen_math::{Color, Ray, Vec3};
