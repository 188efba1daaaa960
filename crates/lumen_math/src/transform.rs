// Vector utilities for ray tracing.
//
// Extends glam's Vec2/Vec3 with the checked and optics-specific operations the
// tracer needs. Everything here is by value; no operand is ever mutated.

use glam::{EulerRot, Mat3, Vec2, Vec3};

use crate::{MathError, MathResult};

/// Build a rotation matrix from Euler angles (radians, applied X then Y then Z).
///
/// The result is `Rz * Ry * Rx`.
pub fn rotation_matrix(euler_angles: Vec3) -> Mat3 {
    Mat3::from_euler(
        EulerRot::ZYX,
        euler_angles.z,
        euler_angles.y,
        euler_angles.x,
    )
}

/// Extension trait for Vec3 with checked normalization and optics helpers.
pub trait Vec3Ext: Sized {
    /// Normalize, failing on a zero-length (or non-finite) vector.
    fn unit(self) -> MathResult<Vec3>;

    /// Bounds-checked component access (0=X, 1=Y, 2=Z).
    fn component(self, index: usize) -> MathResult<f32>;

    /// Mirror this vector about `normal`: `2(V·N)N - V`.
    ///
    /// `V` points away from the surface, as does the result.
    fn mirror(self, normal: Vec3) -> Vec3;

    /// Refract this incident direction through a surface with relative index `eta`.
    ///
    /// `normal` must face against the incident direction. Returns the refracted
    /// direction and `false`, or the mirrored direction and `true` on total
    /// internal reflection.
    fn refract_through(self, normal: Vec3, eta: f32) -> (Vec3, bool);

    /// Apply a 3x3 matrix.
    fn transform(self, matrix: &Mat3) -> Vec3;

    /// Rotate about the world origin by Euler angles.
    fn rotate_euler(self, euler_angles: Vec3) -> Vec3;

    /// Rotate about `origin` by Euler angles.
    fn rotate_about(self, euler_angles: Vec3, origin: Vec3) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn unit(self) -> MathResult<Vec3> {
        self.try_normalize().ok_or(MathError::ZeroLength)
    }

    fn component(self, index: usize) -> MathResult<f32> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            _ => Err(MathError::ComponentOutOfRange { index, len: 3 }),
        }
    }

    #[inline]
    fn mirror(self, normal: Vec3) -> Vec3 {
        2.0 * self.dot(normal) * normal - self
    }

    fn refract_through(self, normal: Vec3, eta: f32) -> (Vec3, bool) {
        let cos_theta = self.dot(normal);
        let k = 1.0 - eta * eta * (1.0 - cos_theta * cos_theta);

        if k < 0.0 {
            // Mirror of the incident direction, leaving the surface
            return ((-self).mirror(normal), true);
        }

        (eta * self - (eta * cos_theta + k.sqrt()) * normal, false)
    }

    #[inline]
    fn transform(self, matrix: &Mat3) -> Vec3 {
        *matrix * self
    }

    fn rotate_euler(self, euler_angles: Vec3) -> Vec3 {
        self.transform(&rotation_matrix(euler_angles))
    }

    fn rotate_about(self, euler_angles: Vec3, origin: Vec3) -> Vec3 {
        (self - origin).rotate_euler(euler_angles) + origin
    }
}

/// Extension trait for Vec2, the 2D tracer's counterpart of [`Vec3Ext`].
pub trait Vec2Ext: Sized {
    /// Normalize, failing on a zero-length vector.
    fn unit(self) -> MathResult<Vec2>;

    /// Bounds-checked component access (0=X, 1=Y).
    fn component(self, index: usize) -> MathResult<f32>;

    /// Rotate counter-clockwise by `angle` radians.
    fn rotated_by(self, angle: f32) -> Vec2;

    /// Mirror this vector about `normal`: `2(V·N)N - V`.
    fn mirror(self, normal: Vec2) -> Vec2;
}

impl Vec2Ext for Vec2 {
    fn unit(self) -> MathResult<Vec2> {
        self.try_normalize().ok_or(MathError::ZeroLength)
    }

    fn component(self, index: usize) -> MathResult<f32> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            _ => Err(MathError::ComponentOutOfRange { index, len: 2 }),
        }
    }

    fn rotated_by(self, angle: f32) -> Vec2 {
        Vec2::from_angle(angle).rotate(self)
    }

    #[inline]
    fn mirror(self, normal: Vec2) -> Vec2 {
        2.0 * self.dot(normal) * normal - self
    }
}
