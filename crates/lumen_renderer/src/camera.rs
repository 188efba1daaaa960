//! Camera for ray generation.

use lumen_math::{MathResult, Ray, Vec3, Vec3Ext};
use std::f32::consts::FRAC_PI_2;

use crate::{CameraConfig, RenderConfig, RenderResult};

/// Pinhole camera with a precomputed screen basis.
///
/// Screen coordinates are normalized to `[-1, 1]` on both axes, `+y` up.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    gaze: Vec3,
    /// Screen x axis, scaled by `fov · width / height`
    right: Vec3,
    /// Screen y axis, scaled by `fov`
    up: Vec3,
    focal_length: f32,
}

impl Camera {
    /// Build the camera basis for an image of `width × height` pixels.
    ///
    /// Fails when the camera looks at its own position or straight along the
    /// world up axis.
    pub fn new(camera: &CameraConfig, width: u32, height: u32) -> MathResult<Self> {
        let fov = FRAC_PI_2 / camera.zoom;
        let aspect = width as f32 / height as f32;

        let gaze = (camera.look_at - camera.position).unit()?;
        let right = gaze.cross(Vec3::Y).unit()?;
        let up = right.cross(gaze).unit()?;

        Ok(Self {
            position: camera.position,
            gaze,
            right: right * (fov * aspect),
            up: up * fov,
            focal_length: camera.focal_length,
        })
    }

    /// Build the camera described by a render configuration.
    pub fn from_config(config: &RenderConfig) -> RenderResult<Self> {
        Ok(Self::new(&config.camera, config.width, config.height)?)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn gaze(&self) -> Vec3 {
        self.gaze
    }

    /// Primary ray through screen point `(x, y)`, travelling in `medium`.
    ///
    /// The origin sits `focal_length` along the ray from the camera position.
    pub fn ray(&self, x: f32, y: f32, medium: f32) -> MathResult<Ray> {
        let direction = (self.gaze + self.right * x + self.up * y).unit()?;
        let origin = self.position + direction * self.focal_length;

        Ray::with_medium(origin, direction, 0, medium, false)
    }
}

/// Map pixel `(x, y)` to the screen coordinates of its top-left corner.
pub fn pixel_to_screen(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    (
        x as f32 / width as f32 * 2.0 - 1.0,
        1.0 - y as f32 / height as f32 * 2.0,
    )
}
