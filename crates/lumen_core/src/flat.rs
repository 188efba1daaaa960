//! Primitives for the planar (2D) tracer: line segments and circles.

use lumen_math::{solve_quadratic, Interval, Ray2, Vec2, Vec2Ext, EPSILON};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::{GeometryError, GeometryResult, Material};

/// Line segment from A to B.
///
/// The outside is the right-hand side when looking from A to B; the normal
/// points there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    a: Vec2,
    b: Vec2,
    normal: Vec2,
}

impl Line {
    pub fn new(a: Vec2, b: Vec2) -> GeometryResult<Self> {
        let normal = (b - a)
            .rotated_by(-FRAC_PI_2)
            .unit()
            .map_err(|_| GeometryError::DegenerateLine)?;

        Ok(Self { a, b, normal })
    }

    pub fn endpoints(&self) -> (Vec2, Vec2) {
        (self.a, self.b)
    }

    pub fn intersect(&self, ray: &Ray2) -> Option<f32> {
        let v1 = ray.origin() - self.a;
        let v2 = self.b - self.a;
        let v3 = ray.direction().perp();
        let det = v2.dot(v3);

        if det.abs() < EPSILON {
            return None;
        }

        let t = v2.perp_dot(v1) / det;
        let s = v1.dot(v3) / det;

        (Interval::POSITIVE.surrounds(t) && Interval::UNIT.contains(s)).then_some(t)
    }
}

/// Circle with center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Vec2,
    radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> GeometryResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Nearest strictly positive root of the ray/circle quadratic.
    pub fn intersect(&self, ray: &Ray2) -> Option<f32> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let (t0, t1) = solve_quadratic(a, b, c)?;
        [t0, t1]
            .into_iter()
            .find(|&t| Interval::POSITIVE.surrounds(t))
    }
}

/// Closed set of planar shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape2 {
    Line(Line),
    Circle(Circle),
}

impl Shape2 {
    pub fn intersect(&self, ray: &Ray2) -> Option<f32> {
        match self {
            Shape2::Line(line) => line.intersect(ray),
            Shape2::Circle(circle) => circle.intersect(ray),
        }
    }

    pub fn normal_at(&self, point: Vec2) -> Vec2 {
        match self {
            Shape2::Line(line) => line.normal,
            Shape2::Circle(circle) => (point - circle.center) / circle.radius,
        }
    }

    /// Enclosed area (zero for lines).
    pub fn surface_area(&self) -> f32 {
        match self {
            Shape2::Line(_) => 0.0,
            Shape2::Circle(circle) => PI * circle.radius * circle.radius,
        }
    }
}

/// A planar shape with its material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive2 {
    pub shape: Shape2,
    pub material: Material,
}

/// Nearest hit among `primitives`: `(index, distance)`. Ties keep the first.
pub fn nearest_hit2(primitives: &[Primitive2], ray: &Ray2) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for (index, prim) in primitives.iter().enumerate() {
        if let Some(t) = prim.shape.intersect(ray) {
            if best.map_or(true, |(_, best_t)| t < best_t) {
                best = Some((index, t));
            }
        }
    }

    best
}
