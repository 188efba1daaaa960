//! Intersectable primitives: triangles and spheres.
//!
//! Triangles use the Möller-Trumbore algorithm; spheres solve the analytic
//! ray/sphere quadratic. Both are wrapped in the closed [`Shape`] enum so the
//! hot intersection loop dispatches with a `match` instead of a vtable.

use lumen_math::{solve_quadratic, Interval, Ray, Vec2, Vec3, EPSILON};
use std::f32::consts::PI;

use crate::{GeometryError, GeometryResult, Material};

/// Classification of a ray/primitive intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitType {
    NoHit,
    /// Clean front-face hit
    Hit,
    /// Backface or grazing hit
    Tangential,
}

/// Result of one intersection test. Ephemeral, never stored in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTest {
    pub kind: HitType,
    /// Distance along the ray (infinite when there is no hit)
    pub distance: f32,
    /// Local surface parametrization at the hit
    pub uv: Vec2,
}

impl HitTest {
    pub const MISS: HitTest = HitTest {
        kind: HitType::NoHit,
        distance: f32::INFINITY,
        uv: Vec2::ZERO,
    };

    /// True for both clean and tangential hits.
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.kind != HitType::NoHit
    }
}

/// A triangle with precomputed face normal and area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    a: Vec3,
    b: Vec3,
    c: Vec3,
    /// (B-A)×(C-A), not normalized
    face_normal: Vec3,
    unit_normal: Vec3,
    area: f32,
}

impl Triangle {
    /// Create a triangle from three vertices.
    ///
    /// Fails with [`GeometryError::DegenerateTriangle`] when the vertices are
    /// (nearly) collinear or coincident.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> GeometryResult<Self> {
        let edge1 = b - a;
        let edge2 = c - a;
        let face_normal = edge1.cross(edge2);
        let area = face_normal.length() / 2.0;

        // Relative to the longest edge so small but well-formed triangles pass
        let scale = edge1.length_squared().max(edge2.length_squared());
        if !(area > EPSILON * scale) {
            return Err(GeometryError::DegenerateTriangle { area });
        }

        Ok(Self {
            a,
            b,
            c,
            face_normal,
            unit_normal: face_normal / (2.0 * area),
            area,
        })
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.a, self.b, self.c]
    }

    /// Non-normalized face normal `(B-A)×(C-A)`.
    pub fn face_normal(&self) -> Vec3 {
        self.face_normal
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    /// Centroid of the three vertices.
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// `uv` holds the barycentric weights of B and C.
    pub fn intersect(&self, ray: &Ray) -> HitTest {
        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;

        let h = ray.direction().cross(edge2);
        let det = edge1.dot(h);

        // Ray is parallel to triangle
        if det.abs() < EPSILON {
            return HitTest::MISS;
        }

        let f = 1.0 / det;
        let s = ray.origin() - self.a;
        let u = f * s.dot(h);

        if !Interval::UNIT.contains(u) {
            return HitTest::MISS;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);

        if v < 0.0 || u + v > 1.0 {
            return HitTest::MISS;
        }

        let t = f * edge2.dot(q);

        // Behind the origin or self-intersection
        if !Interval::POSITIVE.surrounds(t) {
            return HitTest::MISS;
        }

        HitTest {
            kind: if det < 0.0 {
                HitType::Tangential
            } else {
                HitType::Hit
            },
            distance: t,
            uv: Vec2::new(u, v),
        }
    }

    /// Flat shading: the unit face normal everywhere.
    pub fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.unit_normal
    }

    /// Barycentric weights of B and C at `point`, from sub-triangle areas.
    pub fn uv_at(&self, point: Vec3) -> Vec2 {
        let pa = self.a - point;
        let pb = self.b - point;
        let pc = self.c - point;
        let double_area = 2.0 * self.area;

        Vec2::new(
            pc.cross(pa).length() / double_area,
            pa.cross(pb).length() / double_area,
        )
    }
}

/// A sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    radius_squared: f32,
}

impl Sphere {
    /// Create a sphere. The radius must be finite and positive.
    pub fn new(center: Vec3, radius: f32) -> GeometryResult<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(GeometryError::InvalidRadius(radius));
        }

        Ok(Self {
            center,
            radius,
            radius_squared: radius * radius,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn area(&self) -> f32 {
        4.0 * PI * self.radius_squared
    }

    /// Analytic ray-sphere intersection.
    ///
    /// Takes the nearest strictly positive root, so a ray starting inside the
    /// sphere hits the far side. Both roots non-positive means no hit.
    pub fn intersect(&self, ray: &Ray) -> HitTest {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius_squared;

        let Some((t0, t1)) = solve_quadratic(a, b, c) else {
            return HitTest::MISS;
        };

        let t = if Interval::POSITIVE.surrounds(t0) {
            t0
        } else if Interval::POSITIVE.surrounds(t1) {
            t1
        } else {
            return HitTest::MISS;
        };

        // Both roots coincide: the ray only grazes the surface
        let kind = if t1 - t0 <= EPSILON * t1.abs().max(1.0) {
            HitType::Tangential
        } else {
            HitType::Hit
        };

        HitTest {
            kind,
            distance: t,
            uv: self.uv_at(ray.at(t)),
        }
    }

    /// Outward unit normal `(P - center) / radius`.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radius
    }

    /// Spherical mapping `(atan2(Nx, Nz), acos(Ny))` (longitude, colatitude).
    pub fn uv_at(&self, point: Vec3) -> Vec2 {
        let n = self.normal_at(point);
        Vec2::new(n.x.atan2(n.z), n.y.clamp(-1.0, 1.0).acos())
    }
}

/// Closed set of primitive shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Triangle(Triangle),
    Sphere(Sphere),
}

impl Shape {
    #[inline]
    pub fn intersect(&self, ray: &Ray) -> HitTest {
        match self {
            Shape::Triangle(tri) => tri.intersect(ray),
            Shape::Sphere(sphere) => sphere.intersect(ray),
        }
    }

    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        match self {
            Shape::Triangle(tri) => tri.normal_at(point),
            Shape::Sphere(sphere) => sphere.normal_at(point),
        }
    }

    pub fn uv_at(&self, point: Vec3) -> Vec2 {
        match self {
            Shape::Triangle(tri) => tri.uv_at(point),
            Shape::Sphere(sphere) => sphere.uv_at(point),
        }
    }

    pub fn surface_area(&self) -> f32 {
        match self {
            Shape::Triangle(tri) => tri.area(),
            Shape::Sphere(sphere) => sphere.area(),
        }
    }

    pub fn as_triangle(&self) -> Option<&Triangle> {
        match self {
            Shape::Triangle(tri) => Some(tri),
            Shape::Sphere(_) => None,
        }
    }
}

impl From<Triangle> for Shape {
    fn from(tri: Triangle) -> Self {
        Shape::Triangle(tri)
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

/// A shape together with its material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub material: Material,
}

impl Primitive {
    /// Create a primitive with the default grey material.
    pub fn new(shape: impl Into<Shape>) -> Self {
        Self {
            shape: shape.into(),
            material: Material::default(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    #[inline]
    pub fn intersect(&self, ray: &Ray) -> HitTest {
        self.shape.intersect(ray)
    }

    pub fn surface_area(&self) -> f32 {
        self.shape.surface_area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y).unwrap()
    }

    #[test]
    fn test_triangle_precomputed_values() {
        let tri = unit_triangle();
        assert_eq!(tri.face_normal(), Vec3::Z);
        assert!((tri.area() - 0.5).abs() < 1e-6);
        assert_eq!(tri.normal_at(Vec3::new(0.2, 0.2, 0.0)), Vec3::Z);
    }

    #[test]
    fn test_triangle_hit() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::Z).unwrap();

        let hit = tri.intersect(&ray);
        assert!(hit.is_hit());
        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert!(hit.uv.x >= 0.0 && hit.uv.y >= 0.0);
        assert!(hit.uv.x + hit.uv.y <= 1.0);
        assert!((hit.uv - Vec2::new(0.2, 0.2)).length() < 1e-5);
    }

    #[test]
    fn test_triangle_front_and_back_faces() {
        let tri = unit_triangle();

        // Travelling along the face normal: backface
        let back = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::Z).unwrap();
        assert_eq!(tri.intersect(&back).kind, HitType::Tangential);

        // Travelling against the face normal: front face
        let front = Ray::new(Vec3::new(0.2, 0.2, 1.0), -Vec3::Z).unwrap();
        assert_eq!(tri.intersect(&front).kind, HitType::Hit);
    }

    #[test]
    fn test_triangle_parallel_ray_misses() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(-1.0, 0.2, 0.5), Vec3::X).unwrap();

        let hit = tri.intersect(&ray);
        assert_eq!(hit.kind, HitType::NoHit);
        assert!(!hit.distance.is_nan());
    }

    #[test]
    fn test_triangle_outside_and_behind() {
        let tri = unit_triangle();

        let outside = Ray::new(Vec3::new(0.8, 0.8, -1.0), Vec3::Z).unwrap();
        assert!(!tri.intersect(&outside).is_hit());

        let behind = Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::Z).unwrap();
        assert!(!tri.intersect(&behind).is_hit());
    }

    #[test]
    fn test_triangle_uv_at_matches_hit() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, -1.0, -2.0),
            Vec3::new(0.0, 3.0, -2.0),
        )
        .unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.1, 0.3, -2.0)).unwrap();

        let hit = tri.intersect(&ray);
        assert!(hit.is_hit());

        let uv = tri.uv_at(ray.at(hit.distance));
        assert!((uv - hit.uv).length() < 1e-4, "{:?} vs {:?}", uv, hit.uv);
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let collinear = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert!(matches!(
            collinear,
            Err(GeometryError::DegenerateTriangle { .. })
        ));

        let point = Triangle::new(Vec3::ONE, Vec3::ONE, Vec3::ONE);
        assert!(point.is_err());
    }

    #[test]
    fn test_sphere_front_hit() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z).unwrap();

        let hit = sphere.intersect(&ray);
        assert_eq!(hit.kind, HitType::Hit);
        assert!((hit.distance - 4.0).abs() < 1e-5);

        let normal = sphere.normal_at(ray.at(hit.distance));
        assert!((normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z).unwrap();

        let hit = sphere.intersect(&ray);
        assert!(hit.is_hit());
        assert!((hit.distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_behind_and_miss() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0).unwrap();

        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z).unwrap();
        assert_eq!(sphere.intersect(&behind), HitTest::MISS);

        let beside = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::Z).unwrap();
        assert_eq!(sphere.intersect(&beside).kind, HitType::NoHit);
    }

    #[test]
    fn test_sphere_uv_mapping() {
        let sphere = Sphere::new(Vec3::new(1.0, 1.0, 1.0), 2.0).unwrap();

        // North pole: colatitude 0
        let uv = sphere.uv_at(Vec3::new(1.0, 3.0, 1.0));
        assert!(uv.y.abs() < 1e-3);

        // On +X at the equator: longitude π/2, colatitude π/2
        let uv = sphere.uv_at(Vec3::new(3.0, 1.0, 1.0));
        assert!((uv.x - PI / 2.0).abs() < 1e-5);
        assert!((uv.y - PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        assert_eq!(
            Sphere::new(Vec3::ZERO, 0.0),
            Err(GeometryError::InvalidRadius(0.0))
        );
        assert!(Sphere::new(Vec3::ZERO, -1.0).is_err());
        assert!(Sphere::new(Vec3::ZERO, f32::NAN).is_err());
    }

    #[test]
    fn test_primitive_dispatch_and_material() {
        let mut prim = Primitive::new(Sphere::new(Vec3::ZERO, 2.0).unwrap());
        assert!((prim.surface_area() - 16.0 * PI).abs() < 1e-4);
        assert!(prim.shape.as_triangle().is_none());

        prim.set_material(Material::diffuse(lumen_math::Color::RED));
        assert_eq!(prim.material.diffuse_color, lumen_math::Color::RED);
    }
}
