//! Light sources.

use lumen_math::{Color, Vec3, Vec3Ext};
use serde::{Deserialize, Serialize};

use crate::GeometryResult;

/// Default opening half-angle of spot lights (20 degrees).
pub const DEFAULT_OPENING_ANGLE: f32 = 20.0 * std::f32::consts::PI / 180.0;

/// Default specular falloff exponent of spot lights.
pub const DEFAULT_FALLOFF_EXPONENT: f32 = 3.0;

/// Geometry of a light source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    /// Point light shining into a cone around `direction`.
    Spot {
        position: Vec3,
        direction: Vec3,
        opening_angle: f32,
        falloff_exponent: f32,
    },
    /// Directional light (sun-like), travelling along `direction`.
    Parallel { direction: Vec3 },
    /// Constant ambient light reaching every surface.
    Global,
}

/// A light source. Lights are immutable once added to a scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub diffuse_color: Color,
    pub specular_color: Color,
    pub diffuse_intensity: f32,
    pub specular_intensity: f32,
}

impl Light {
    /// Create a spot light. `direction` must be non-zero.
    pub fn spot(
        position: Vec3,
        direction: Vec3,
        color: Color,
        intensity: f32,
        opening_angle: f32,
        falloff_exponent: f32,
    ) -> GeometryResult<Self> {
        Ok(Self::uniform(
            LightKind::Spot {
                position,
                direction: direction.unit()?,
                opening_angle,
                falloff_exponent,
            },
            color,
            intensity,
        ))
    }

    /// Create a parallel light travelling along `direction`.
    pub fn parallel(direction: Vec3, color: Color, intensity: f32) -> GeometryResult<Self> {
        Ok(Self::uniform(
            LightKind::Parallel {
                direction: direction.unit()?,
            },
            color,
            intensity,
        ))
    }

    /// Create an ambient light.
    pub fn global(color: Color, intensity: f32) -> Self {
        Self::uniform(LightKind::Global, color, intensity)
    }

    fn uniform(kind: LightKind, color: Color, intensity: f32) -> Self {
        Self {
            kind,
            diffuse_color: color,
            specular_color: color,
            diffuse_intensity: intensity,
            specular_intensity: intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeometryError;
    use lumen_math::MathError;

    #[test]
    fn test_spot_direction_is_normalized() {
        let light = Light::spot(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, -5.0, 0.0),
            Color::WHITE,
            100.0,
            DEFAULT_OPENING_ANGLE,
            DEFAULT_FALLOFF_EXPONENT,
        )
        .unwrap();

        match light.kind {
            LightKind::Spot { direction, .. } => assert_eq!(direction, -Vec3::Y),
            other => panic!("expected spot light, got {:?}", other),
        }
        assert_eq!(light.specular_intensity, 100.0);
    }

    #[test]
    fn test_zero_direction_is_rejected() {
        let err = Light::parallel(Vec3::ZERO, Color::WHITE, 1.0).unwrap_err();
        assert_eq!(err, GeometryError::Math(MathError::ZeroLength));
    }

    #[test]
    fn test_global_light() {
        let light = Light::global(Color::gray(0.2), 0.5);
        assert_eq!(light.kind, LightKind::Global);
        assert_eq!(light.diffuse_color, Color::gray(0.2));
    }
}
