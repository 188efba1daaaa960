//! Surface shading: local lighting plus recursive mirror and glass bounces.

use lumen_core::{Light, LightKind};
use lumen_math::{Color, Ray, Vec3Ext};

use crate::tracer::{trace_ray, SurfaceHit, TraceContext, TraceIteration};

/// Distance bounce rays are pulled off the surface to avoid self-hits.
pub const SURFACE_BIAS: f32 = 1e-4;

/// Color of `ray` at `hit`.
///
/// Blends local lighting, the mirror bounce and the transmitted ray by the
/// material's weights; the alpha channel carries the material opacity.
pub fn compute_color(
    ctx: &TraceContext<'_>,
    ray: &Ray,
    hit: &SurfaceHit,
    path: &mut Vec<TraceIteration>,
) -> Color {
    let material = &hit.material;
    let mut color = local_color(ctx.scene.lights(), ray, hit) * material.local_weight();

    if material.reflectiveness > 0.0 {
        color += reflected_color(ctx, ray, hit, path) * material.reflectiveness;
    }

    if material.refractiveness > 0.0 {
        color += refracted_color(ctx, ray, hit, path) * material.refractiveness;
    }

    color.with_alpha(material.opacity())
}

/// Direct lighting: Lambert diffuse, half-vector specular and emission.
pub fn local_color(lights: &[Light], ray: &Ray, hit: &SurfaceHit) -> Color {
    let material = &hit.material;
    let normal = hit.normal;
    let view = -ray.direction();

    let mut diffuse = Color::TRANSPARENT;
    let mut specular = Color::TRANSPARENT;

    for light in lights {
        match light.kind {
            LightKind::Global => {
                diffuse += material.diffuse_color * light.diffuse_color * light.diffuse_intensity;
            }
            LightKind::Parallel { direction } => {
                let lambert = normal.dot(-direction);
                if lambert > 0.0 {
                    diffuse += material.diffuse_color
                        * light.diffuse_color
                        * (light.diffuse_intensity * lambert);
                }
            }
            LightKind::Spot {
                position,
                direction,
                opening_angle,
                falloff_exponent,
            } => {
                let to_light = position - hit.point;
                let dist_sq = to_light.length_squared();
                let Ok(l) = to_light.unit() else {
                    continue;
                };

                // Outside the cone
                if (-l).dot(direction) < opening_angle.cos() {
                    continue;
                }

                let lambert = normal.dot(l);
                if lambert <= 0.0 {
                    continue;
                }

                diffuse += material.diffuse_color
                    * light.diffuse_color
                    * (light.diffuse_intensity * lambert / dist_sq);

                if material.specularity > 0.0 {
                    if let Ok(half) = (l + view).unit() {
                        let highlight = half.dot(normal).max(0.0).powf(falloff_exponent);
                        specular += material.specular_color
                            * light.specular_color
                            * (highlight * light.specular_intensity * material.specularity / dist_sq);
                    }
                }
            }
        }
    }

    diffuse + specular + material.emissive_color * material.emissive_intensity
}

fn reflected_color(
    ctx: &TraceContext<'_>,
    ray: &Ray,
    hit: &SurfaceHit,
    path: &mut Vec<TraceIteration>,
) -> Color {
    let direction = (-ray.direction()).mirror(hit.normal);

    match ray.create_bounce(hit.test.distance - SURFACE_BIAS, direction) {
        Ok(bounce) => trace_ray(ctx, &bounce, path),
        Err(err) => {
            log::warn!("Dropping reflection off primitive {}: {}", hit.index, err);
            ctx.config.background
        }
    }
}

fn refracted_color(
    ctx: &TraceContext<'_>,
    ray: &Ray,
    hit: &SurfaceHit,
    path: &mut Vec<TraceIteration>,
) -> Color {
    let target = if ray.is_inside() {
        ctx.config.ambient_refractive_index
    } else {
        hit.material.refractive_index
    };
    let eta = ray.medium() / target;
    let distance = hit.test.distance;

    let (direction, total_internal) = ray.direction().refract_through(hit.normal, eta);
    let next = if total_internal {
        ray.create_bounce(distance - SURFACE_BIAS, direction)
    } else {
        ray.create_next(distance + SURFACE_BIAS, direction, target)
    };

    match next {
        Ok(next) => trace_ray(ctx, &next, path),
        Err(err) => {
            log::warn!("Dropping refraction through primitive {}: {}", hit.index, err);
            ctx.config.background
        }
    }
}
