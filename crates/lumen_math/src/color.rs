//! ARGB color type used for shading and frame buffers.
//!
//! Colors are unbounded floating-point values so they can be summed and scaled
//! freely while shading; clamping happens only when encoding to 8 bits.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Interval;

/// A color with alpha, red, green and blue channels.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub a: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(1.0, 0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    pub const RED: Color = Color::new(1.0, 1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(1.0, 0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(1.0, 0.0, 0.0, 1.0);

    /// Create a color from all four channels.
    pub const fn new(a: f32, r: f32, g: f32, b: f32) -> Self {
        Self { a, r, g, b }
    }

    /// Create an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(1.0, r, g, b)
    }

    /// Create an opaque gray.
    pub const fn gray(value: f32) -> Self {
        Self::rgb(value, value, value)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Encode as 8-bit RGBA, clamping every channel to [0, 1].
    pub fn to_rgba8(self) -> [u8; 4] {
        let encode = |c: f32| (255.0 * Interval::UNIT.clamp(c)).round() as u8;
        [encode(self.r), encode(self.g), encode(self.b), encode(self.a)]
    }

    /// True if every channel is finite.
    pub fn is_finite(self) -> bool {
        self.a.is_finite() && self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Color::rgb(v.x, v.y, v.z)
    }
}

impl Neg for Color {
    type Output = Color;

    fn neg(self) -> Color {
        Color::new(-self.a, -self.r, -self.g, -self.b)
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, other: Color) -> Color {
        Color::new(
            self.a + other.a,
            self.r + other.r,
            self.g + other.g,
            self.b + other.b,
        )
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, other: Color) {
        *self = *self + other;
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Color {
        Color::new(
            self.a - other.a,
            self.r - other.r,
            self.g - other.g,
            self.b - other.b,
        )
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, factor: f32) -> Color {
        Color::new(
            self.a * factor,
            self.r * factor,
            self.g * factor,
            self.b * factor,
        )
    }
}

/// Component-wise product (used for tinting).
impl Mul for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Color {
        Color::new(
            self.a * other.a,
            self.r * other.r,
            self.g * other.g,
            self.b * other.b,
        )
    }
}

impl Div<f32> for Color {
    type Output = Color;

    fn div(self, factor: f32) -> Color {
        Color::new(
            self.a / factor,
            self.r / factor,
            self.g / factor,
            self.b / factor,
        )
    }
}

impl Div for Color {
    type Output = Color;

    fn div(self, other: Color) -> Color {
        Color::new(
            self.a / other.a,
            self.r / other.r,
            self.g / other.g,
            self.b / other.b,
        )
    }
}

impl Sum for Color {
    fn sum<I: Iterator<Item = Color>>(iter: I) -> Color {
        iter.fold(Color::TRANSPARENT, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_arithmetic() {
        let a = Color::new(1.0, 0.25, 0.5, 0.75);
        let b = Color::new(0.5, 0.125, 0.125, 0.125);

        assert_eq!(a + b, Color::new(1.5, 0.375, 0.625, 0.875));
        assert_eq!(a * 2.0, Color::new(2.0, 0.5, 1.0, 1.5));
        assert_eq!((a * 2.0) / 2.0, a);
        assert_eq!(-b + b, Color::TRANSPARENT);
        assert_eq!(Color::WHITE * Color::RED, Color::RED);
    }

    #[test]
    fn test_color_unbounded_until_encoding() {
        let bright = Color::gray(0.8) + Color::gray(0.8);
        assert!(bright.r > 1.0);

        assert_eq!(bright.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Color::new(0.0, -1.0, 0.5, 0.0).to_rgba8(), [0, 128, 0, 0]);
    }

    #[test]
    fn test_color_sum_and_vec3() {
        let total: Color = vec![Color::RED, Color::GREEN, Color::BLUE].into_iter().sum();
        assert_eq!(total, Color::new(3.0, 1.0, 1.0, 1.0));

        let c = Color::from(Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(c, Color::rgb(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_color_is_pod() {
        let pixels = [Color::RED, Color::BLUE];
        let floats: &[f32] = bytemuck::cast_slice(&pixels);
        assert_eq!(floats, &[1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }
}
