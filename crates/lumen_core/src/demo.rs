//! Built-in demonstration scene.

use lumen_math::{Color, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::{GeometryResult, Material, Scene};

/// Build the demonstration scene: a red cube, a mirror floor, a chrome ball,
/// a chrome icosahedron and a glass sphere lit by one warm spot light.
pub fn create_scene() -> GeometryResult<Scene> {
    let mut scene = Scene::new();

    scene.add_spot_light(
        Vec3::new(1.0, 10.0, 1.0),
        Vec3::new(0.0, -1.0, 0.0),
        Color::rgb(1.0, 1.0, 0.7),
        100.0,
    )?;
    scene.add_global_light(Color::WHITE, 0.05);

    let cube = scene.add_cube(Vec3::new(-4.0, 3.0, 4.0), 2.0)?;
    scene.set_material(&cube, Material::diffuse(Color::RED))?;

    let floor = scene.add_plane_xy(Vec3::ZERO, 20.0, 20.0, Vec3::new(FRAC_PI_2, 0.0, 0.0))?;
    scene.set_material(&floor, Material::reflective(Color::BLACK, 1.0))?;

    let chrome = Material::reflective(Color::rgb(0.5, 0.7, 0.84), 0.8);

    let ball = scene.add_sphere(Vec3::new(0.0, 2.0, 0.0), 1.7)?;
    scene.set_material(&ball, chrome)?;

    let ico = scene.add_icosahedron(Vec3::new(5.0, 3.0, -5.0), 2.0, Vec3::ZERO)?;
    scene.set_material(&ico, chrome)?;

    let glass = scene.add_triangulated_sphere(Vec3::new(4.0, 1.5, 4.0), 1.5, 2)?;
    scene.set_material(&glass, Material::refractive(Color::gray(0.9), 0.9, 1.5))?;

    log::debug!(
        "Demo scene: {} primitives, {} lights",
        scene.len(),
        scene.lights().len()
    );

    Ok(scene)
}
