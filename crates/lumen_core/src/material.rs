//! Surface material description.

use lumen_math::Color;
use serde::{Deserialize, Serialize};

/// Shading parameters of a primitive.
///
/// Materials are plain values: assigning one to a primitive copies it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse color; its alpha channel is the opacity
    pub diffuse_color: Color,

    /// Tint of specular highlights
    pub specular_color: Color,

    /// Self-emitted color
    pub emissive_color: Color,

    pub emissive_intensity: f32,

    /// Weight of specular highlights (0 = matte)
    pub specularity: f32,

    /// Share of the color taken from the mirror bounce (0-1)
    pub reflectiveness: f32,

    /// Share of the color taken from the transmitted ray (0-1)
    pub refractiveness: f32,

    /// Index of refraction of the solid (1.0 = air, 1.5 = glass)
    pub refractive_index: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::diffuse(Color::gray(0.5)) // Grey default
    }
}

impl Material {
    /// A matte surface of the given color.
    pub fn diffuse(color: Color) -> Self {
        Self {
            diffuse_color: color,
            specular_color: Color::TRANSPARENT,
            emissive_color: Color::TRANSPARENT,
            emissive_intensity: 0.0,
            specularity: 0.0,
            reflectiveness: 0.0,
            refractiveness: 0.0,
            refractive_index: 1.0,
        }
    }

    /// A mirror-like surface blending `base` with its reflection.
    pub fn reflective(base: Color, reflectiveness: f32) -> Self {
        Self {
            specular_color: Color::WHITE,
            specularity: 1.0,
            reflectiveness: reflectiveness.clamp(0.0, 1.0),
            ..Self::diffuse(base)
        }
    }

    /// A surface that emits its own color.
    pub fn emissive(base: Color, intensity: f32) -> Self {
        Self {
            emissive_color: base,
            emissive_intensity: intensity,
            ..Self::diffuse(base)
        }
    }

    /// A transparent solid (glass, water) with the given index of refraction.
    pub fn refractive(base: Color, refractiveness: f32, refractive_index: f32) -> Self {
        Self {
            specular_color: Color::WHITE,
            specularity: 1.0,
            refractiveness: refractiveness.clamp(0.0, 1.0),
            refractive_index,
            ..Self::diffuse(base)
        }
    }

    /// Opacity, stored in the diffuse alpha channel.
    pub fn opacity(&self) -> f32 {
        self.diffuse_color.a
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emissive_intensity > 0.0 && self.emissive_color != Color::TRANSPARENT
    }

    /// Weight left for local shading after reflection and refraction.
    pub fn local_weight(&self) -> f32 {
        (1.0 - self.reflectiveness - self.refractiveness).max(0.0)
    }
}
