//! Render settings.
//!
//! Everything a render invocation needs besides the scene itself. All types
//! are plain data with serde support so hosts can keep them in JSON files.

use lumen_math::{Color, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tile::DEFAULT_TILE_SIZE;
use crate::{RenderError, RenderResult};

/// Deepest ray tree a render may request. Bounces recurse on the worker's
/// stack, so the depth must stay bounded.
pub const MAX_DEPTH: u32 = 64;

/// What a sample writes into the frame buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Final shaded color
    #[default]
    Colors,
    /// Diffuse material color, unlit
    Flat,
    /// Triangle edges tinted by their barycentric weights
    Wireframe,
    UvCoords,
    /// Hit distance as `1 / (1 + 0.1·d)`
    Depths,
    SurfaceNormals,
    RayDirection,
    IncidenceAngle,
    /// Number of bounces relative to the maximum depth
    Iterations,
    /// Log-scaled time spent on the sample
    RenderTime,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::Colors => "colors",
            RenderMode::Flat => "flat",
            RenderMode::Wireframe => "wireframe",
            RenderMode::UvCoords => "uv_coords",
            RenderMode::Depths => "depths",
            RenderMode::SurfaceNormals => "surface_normals",
            RenderMode::RayDirection => "ray_direction",
            RenderMode::IncidenceAngle => "incidence_angle",
            RenderMode::Iterations => "iterations",
            RenderMode::RenderTime => "render_time",
        };
        f.write_str(name)
    }
}

/// Pinhole camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Field of view is `(π/2) / zoom`
    pub zoom: f32,
    /// Distance the ray origin is pushed along its direction
    pub focal_length: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 15.0),
            look_at: Vec3::new(0.0, 1.0, 0.0),
            zoom: 1.0,
            focal_length: 0.3,
        }
    }
}

impl CameraConfig {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self {
            position,
            look_at,
            ..Self::default()
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_focal_length(mut self, focal_length: f32) -> Self {
        self.focal_length = focal_length;
        self
    }
}

/// Render configuration.
///
/// Read-only for the duration of a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Horizontal resolution in pixels
    pub width: u32,
    /// Vertical resolution in pixels
    pub height: u32,
    /// Side of the stratified subpixel grid (`subpixels²` rays per pass)
    pub subpixels: u32,
    /// Passes accumulated per pixel
    pub samples_per_subpixel: u32,
    /// Maximum ray depth; camera rays have depth 0
    pub max_depth: u32,
    pub camera: CameraConfig,
    pub mode: RenderMode,
    /// Color of rays that escape the scene
    pub background: Color,
    /// Refractive index of the medium the camera sits in
    pub ambient_refractive_index: f32,
    /// Log render statistics at info level
    pub debug: bool,
    /// Base seed for the per-pixel random generators
    pub seed: u64,
    /// Tile edge length in pixels
    pub tile_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            subpixels: 1,
            samples_per_subpixel: 2,
            max_depth: 8,
            camera: CameraConfig::default(),
            mode: RenderMode::Colors,
            background: Color::BLACK,
            ambient_refractive_index: 1.0,
            debug: false,
            seed: 0,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the subpixel grid, passes per pixel and maximum depth.
    pub fn with_quality(mut self, subpixels: u32, samples_per_subpixel: u32, max_depth: u32) -> Self {
        self.subpixels = subpixels;
        self.samples_per_subpixel = samples_per_subpixel;
        self.max_depth = max_depth;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("subpixels", self.subpixels),
            ("samples_per_subpixel", self.samples_per_subpixel),
            ("tile_size", self.tile_size),
        ];

        for (name, value) in positive {
            if value == 0 {
                return Err(RenderError::InvalidConfig(format!("{} must be at least 1", name)));
            }
        }

        if self.max_depth > MAX_DEPTH {
            return Err(RenderError::InvalidConfig(format!(
                "max_depth must be at most {}, got {}",
                MAX_DEPTH, self.max_depth
            )));
        }

        if !(self.camera.zoom > 0.0 && self.camera.zoom.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "camera zoom must be positive, got {}",
                self.camera.zoom
            )));
        }

        if !(self.ambient_refractive_index > 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "ambient refractive index must be positive, got {}",
                self.ambient_refractive_index
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, RenderMode::Colors);
        assert_eq!(config.tile_size, 128);
        assert_eq!(config.pixel_count(), 640 * 360);
    }

    #[test]
    fn test_validate_rejects_zero_fields() {
        let config = RenderConfig::default().with_resolution(0, 10);
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));

        let config = RenderConfig::default().with_quality(0, 1, 4);
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));

        let config = RenderConfig::default().with_camera(CameraConfig::default().with_zoom(0.0));
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_bounds_max_depth() {
        let deepest = RenderConfig::default().with_quality(1, 1, MAX_DEPTH);
        assert!(deepest.validate().is_ok());

        let zero = RenderConfig::default().with_quality(1, 1, 0);
        assert!(zero.validate().is_ok());

        for depth in [MAX_DEPTH + 1, 200_000, u32::MAX] {
            let config = RenderConfig::default()
                .with_resolution(1, 1)
                .with_quality(1, 1, depth);
            assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_parse_partial_json() {
        let json = r#"{
            "width": 32,
            "height": 16,
            "mode": "surface_normals",
            "camera": { "position": [0.0, 0.0, 10.0], "look_at": [0.0, 0.0, 0.0] }
        }"#;

        let config: RenderConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.width, 32);
        assert_eq!(config.height, 16);
        assert_eq!(config.mode, RenderMode::SurfaceNormals);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(config.camera.zoom, 1.0);
        assert_eq!(config.max_depth, RenderConfig::default().max_depth);
    }

    #[test]
    fn test_mode_display_matches_serde_name() {
        let mode = RenderMode::IncidenceAngle;
        let json = serde_json::to_string(&mode).unwrap();
        assert_eq!(json, format!("\"{}\"", mode));
    }
}
