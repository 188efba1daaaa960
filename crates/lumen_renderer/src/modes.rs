//! Visualization modes.

use lumen_math::{Color, Vec3};
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use crate::tracer::TraceIteration;
use crate::{RenderConfig, RenderMode};

/// Maps `log10(µs)` of a sample to gray, saturating near 2 ms.
const RENDER_TIME_SCALE: f32 = 0.302_935_75;

/// Barycentric weight below which a triangle point counts as an edge.
const WIREFRAME_EDGE: f32 = 0.01;

/// Color written for one sample under the configured render mode.
///
/// `path` is the full list of rays traced for the sample, primary ray first;
/// `elapsed` is the time the trace took. Visualization modes show black
/// where the primary ray missed.
pub fn mode_color(config: &RenderConfig, path: &[TraceIteration], elapsed: Duration) -> Color {
    let Some(first) = path.first() else {
        return config.background;
    };
    let hit = first.hit.as_ref();

    match config.mode {
        RenderMode::Colors => first.color,
        RenderMode::Flat => hit.map_or(Color::BLACK, |h| h.material.diffuse_color),
        RenderMode::Wireframe => match hit {
            Some(h) if h.is_triangle => {
                let (u, v) = (h.test.uv.x, h.test.uv.y);
                let w = 1.0 - u - v;
                if u.min(v).min(w) <= WIREFRAME_EDGE {
                    Color::rgb(u, v, w)
                } else {
                    Color::BLACK
                }
            }
            _ => Color::BLACK,
        },
        RenderMode::UvCoords => hit.map_or(Color::BLACK, |h| {
            let (u, v) = (h.test.uv.x, h.test.uv.y);
            Color::rgb(u, v, 1.0 - u - v)
        }),
        RenderMode::Depths => hit.map_or(Color::BLACK, |h| {
            Color::gray(1.0 / (1.0 + 0.1 * h.test.distance))
        }),
        RenderMode::SurfaceNormals => hit.map_or(Color::BLACK, |h| to_unit_rgb(h.normal)),
        RenderMode::RayDirection => to_unit_rgb(first.ray.direction()),
        RenderMode::IncidenceAngle => hit.map_or(Color::BLACK, |h| {
            let angle = (-first.ray.direction()).angle_between(h.normal);
            Color::gray(1.0 - angle / FRAC_PI_2)
        }),
        RenderMode::Iterations => {
            Color::gray(1.0 - path.len() as f32 / config.max_depth.max(1) as f32)
        }
        RenderMode::RenderTime => {
            let micros = (elapsed.as_secs_f32() * 1e6).max(1.0);
            Color::gray(micros.log10() * RENDER_TIME_SCALE)
        }
    }
}

/// Map a unit vector from `[-1, 1]³` to `[0, 1]³`.
fn to_unit_rgb(v: Vec3) -> Color {
    Color::from((v + Vec3::ONE) * 0.5)
}
