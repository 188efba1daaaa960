//! Recursive ray tracing.

use lumen_core::{HitTest, Material, Scene};
use lumen_math::{Color, Ray, Vec3};

use crate::shading::compute_color;
use crate::RenderConfig;

/// Read-only state shared by every ray of a render.
#[derive(Clone, Copy)]
pub struct TraceContext<'a> {
    pub scene: &'a Scene,
    pub config: &'a RenderConfig,
}

impl<'a> TraceContext<'a> {
    pub fn new(scene: &'a Scene, config: &'a RenderConfig) -> Self {
        Self { scene, config }
    }
}

/// Where a ray met the scene.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    /// Index of the primitive in the scene
    pub index: usize,
    pub test: HitTest,
    pub point: Vec3,
    /// Unit surface normal, flipped to face the incoming ray
    pub normal: Vec3,
    pub material: Material,
    /// Whether the hit primitive is a triangle
    pub is_triangle: bool,
}

/// One traced ray and its outcome.
#[derive(Debug, Clone, Copy)]
pub struct TraceIteration {
    pub ray: Ray,
    pub hit: Option<SurfaceHit>,
    pub color: Color,
}

/// Trace `ray` through the scene and return its color.
///
/// Every traced ray, including bounces, is appended to `path` in the order
/// it was started, so `path[0]` describes the primary ray. A ray at or past
/// the maximum depth yields the background without touching the scene.
pub fn trace_ray(ctx: &TraceContext<'_>, ray: &Ray, path: &mut Vec<TraceIteration>) -> Color {
    let background = ctx.config.background;
    let slot = path.len();

    path.push(TraceIteration {
        ray: *ray,
        hit: None,
        color: background,
    });

    if ray.depth() >= ctx.config.max_depth {
        return background;
    }

    let Some((index, test)) = ctx.scene.nearest_hit(ray) else {
        return background;
    };

    let primitive = &ctx.scene.primitives()[index];
    let point = ray.at(test.distance);
    let normal = primitive.shape.normal_at(point);

    let hit = SurfaceHit {
        index,
        test,
        point,
        normal: if normal.dot(ray.direction()) > 0.0 {
            -normal
        } else {
            normal
        },
        material: primitive.material,
        is_triangle: primitive.shape.as_triangle().is_some(),
    };
    path[slot].hit = Some(hit);

    let color = compute_color(ctx, ray, &hit, path);
    path[slot].color = color;
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::Light;

    fn lit_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap();
        scene.add_light(Light::global(Color::WHITE, 1.0));
        scene
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = lit_scene();
        let config = RenderConfig::default().with_background(Color::BLUE);
        let ctx = TraceContext::new(&scene, &config);

        let ray = Ray::new(Vec3::ZERO, Vec3::Z).unwrap();
        let mut path = Vec::new();

        assert_eq!(trace_ray(&ctx, &ray, &mut path), Color::BLUE);
        assert_eq!(path.len(), 1);
        assert!(path[0].hit.is_none());
    }

    #[test]
    fn test_max_depth_zero_skips_the_scene() {
        let scene = lit_scene();
        let config = RenderConfig::default()
            .with_background(Color::GREEN)
            .with_quality(1, 1, 0);
        let ctx = TraceContext::new(&scene, &config);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z).unwrap();
        let mut path = Vec::new();

        assert_eq!(trace_ray(&ctx, &ray, &mut path), Color::GREEN);
        assert!(path[0].hit.is_none());
    }

    #[test]
    fn test_hit_records_facing_normal() {
        let scene = lit_scene();
        let config = RenderConfig::default();
        let ctx = TraceContext::new(&scene, &config);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z).unwrap();
        let mut path = Vec::new();
        let color = trace_ray(&ctx, &ray, &mut path);

        let hit = path[0].hit.unwrap();
        assert_eq!(hit.index, 0);
        assert!((hit.test.distance - 4.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
        assert!(!hit.is_triangle);

        // Default grey material under a unit white global light
        assert!((color.r - 0.5).abs() < 1e-6);
        assert_eq!(path[0].color, color);
    }

    #[test]
    fn test_normal_flipped_inside_sphere() {
        let scene = lit_scene();
        let config = RenderConfig::default();
        let ctx = TraceContext::new(&scene, &config);

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::X).unwrap();
        let mut path = Vec::new();
        trace_ray(&ctx, &ray, &mut path);

        let hit = path[0].hit.unwrap();
        assert!((hit.normal + Vec3::X).length() < 1e-5);
    }
}
