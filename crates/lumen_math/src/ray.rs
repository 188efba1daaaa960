use crate::{MathResult, Vec2, Vec2Ext, Vec3, Vec3Ext};

/// A ray in 3D space.
///
/// Besides origin and (unit) direction, a ray carries its bounce depth, the
/// refractive index of the medium it currently travels through, and whether
/// it is travelling inside a solid. Rays are immutable: bounces derive a new
/// child ray instead of modifying the parent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    depth: u32,
    medium: f32,
    inside: bool,
}

impl Ray {
    /// Create a primary ray in vacuum (refractive index 1).
    ///
    /// The direction is normalized; a zero direction is an error.
    pub fn new(origin: Vec3, direction: Vec3) -> MathResult<Self> {
        Self::with_medium(origin, direction, 0, 1.0, false)
    }

    /// Create a ray with explicit depth, medium and inside flag.
    pub fn with_medium(
        origin: Vec3,
        direction: Vec3,
        depth: u32,
        medium: f32,
        inside: bool,
    ) -> MathResult<Self> {
        Ok(Self {
            origin,
            direction: direction.unit()?,
            depth,
            medium,
            inside,
        })
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Number of bounces that produced this ray (0 for camera rays).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Refractive index of the medium the ray travels through.
    #[inline]
    pub fn medium(&self) -> f32 {
        self.medium
    }

    /// Whether the ray travels inside a solid.
    #[inline]
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Derive a transmitted ray starting at `at` along this ray.
    ///
    /// Depth is incremented, the inside flag flips, and the ray continues in
    /// the medium with refractive index `medium`.
    pub fn create_next(&self, at: f32, direction: Vec3, medium: f32) -> MathResult<Ray> {
        Ray::with_medium(self.at(at), direction, self.depth + 1, medium, !self.inside)
    }

    /// Derive a reflected ray starting at `at` along this ray.
    ///
    /// Depth is incremented; medium and inside flag are unchanged.
    pub fn create_bounce(&self, at: f32, direction: Vec3) -> MathResult<Ray> {
        Ray::with_medium(self.at(at), direction, self.depth + 1, self.medium, self.inside)
    }
}

/// A ray in the plane, used by the 2D tracer primitives.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray2 {
    origin: Vec2,
    direction: Vec2,
    depth: u32,
    medium: f32,
    inside: bool,
}

impl Ray2 {
    pub fn new(origin: Vec2, direction: Vec2) -> MathResult<Self> {
        Self::with_medium(origin, direction, 0, 1.0, false)
    }

    pub fn with_medium(
        origin: Vec2,
        direction: Vec2,
        depth: u32,
        medium: f32,
        inside: bool,
    ) -> MathResult<Self> {
        Ok(Self {
            origin,
            direction: direction.unit()?,
            depth,
            medium,
            inside,
        })
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn medium(&self) -> f32 {
        self.medium
    }

    #[inline]
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    pub fn create_next(&self, at: f32, direction: Vec2, medium: f32) -> MathResult<Ray2> {
        Ray2::with_medium(self.at(at), direction, self.depth + 1, medium, !self.inside)
    }
}
