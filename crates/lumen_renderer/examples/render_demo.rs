//! Renders the demonstration scene and saves it as a PNG.
//!
//! Usage: `cargo run --release --example render_demo [output.png] [mode]`

use anyhow::{Context, Result};
use log::LevelFilter;
use lumen_core::demo;
use lumen_renderer::{render_image, CameraConfig, ImageBuffer, RenderConfig, RenderMode, RenderProgress};
use lumen_renderer::Vec3;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "render.png".to_string());
    let mode: RenderMode = match args.next() {
        Some(name) => serde_json::from_str(&format!("\"{}\"", name))
            .with_context(|| format!("Unknown render mode '{}'", name))?,
        None => RenderMode::Colors,
    };

    let start = std::time::Instant::now();
    let scene = demo::create_scene().context("Failed to build demo scene")?;
    log::info!("Scene built in {:?}", start.elapsed());

    let config = RenderConfig::default()
        .with_resolution(640, 360)
        .with_quality(2, 4, 8)
        .with_camera(
            CameraConfig::new(Vec3::new(0.0, 6.0, 16.0), Vec3::new(0.0, 1.5, 0.0))
                .with_zoom(1.5),
        )
        .with_mode(mode)
        .with_debug(true);

    let mut image = ImageBuffer::new(config.width, config.height);
    let progress = RenderProgress::new();
    let elapsed = render_image(&scene, &config, &mut image.pixels, Some(&progress))?;
    log::info!(
        "Rendered {} pixel passes in {:.2?}",
        progress.completed(),
        elapsed
    );

    image::save_buffer(
        &output,
        &image.to_rgba8(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to save {}", output))?;
    log::info!("Saved to {}", output);

    Ok(())
}
