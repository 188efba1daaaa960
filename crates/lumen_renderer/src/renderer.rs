//! Frame rendering.
//!
//! Implements the per-pixel sampling loop with:
//! - Stratified, jittered subpixel grid
//! - Multiple accumulated passes per pixel
//! - Tile-ordered traversal with per-pixel parallelism
//! - Cooperative cancellation and progress reporting

use lumen_core::Scene;
use lumen_math::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::camera::{pixel_to_screen, Camera};
use crate::modes::mode_color;
use crate::tile::generate_tiles;
use crate::tracer::{trace_ray, TraceContext};
use crate::{RenderConfig, RenderError, RenderResult};

/// Row-major frame buffer of unclamped colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer with every channel zero.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) -> RenderResult<()> {
        let i = self
            .index(x, y)
            .ok_or(RenderError::PixelOutOfBounds { x, y })?;
        self.pixels[i] = color;
        Ok(())
    }

    /// Convert to 8-bit RGBA (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    /// Raw `f32` ARGB channels, four per pixel.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Progress of a running render, shareable with other threads.
#[derive(Debug, Default)]
pub struct RenderProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
    cancelled: AtomicBool,
}

impl RenderProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear a previous cancellation so the tracker can drive another render.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }

    fn start(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    fn advance(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Pixel passes finished so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Pixel passes in the whole render.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Completed share in `[0, 1]`; zero before a render starts.
    pub fn fraction(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.completed() as f32 / total as f32
    }

    /// Ask the render to stop after the current tile.
    ///
    /// The flag stays set until [`RenderProgress::reset`], so a cancel issued
    /// before a render starts is not lost.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Deterministic generator for one pixel, independent of thread scheduling.
fn pixel_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

/// One pass over the subpixel grid of pixel (x, y), averaged over the grid.
fn sample_pixel<R: Rng + ?Sized>(
    ctx: &TraceContext<'_>,
    camera: &Camera,
    x: u32,
    y: u32,
    rng: &mut R,
) -> Color {
    let config = ctx.config;
    let (screen_x, screen_y) = pixel_to_screen(x, y, config.width, config.height);
    let sub = config.subpixels as f32;
    let step_x = 2.0 / (sub * config.width as f32);
    let step_y = 2.0 / (sub * config.height as f32);
    let weight = 1.0 / (sub * sub);

    let mut path = Vec::new();
    let mut total = Color::TRANSPARENT;

    for sy in 0..config.subpixels {
        for sx in 0..config.subpixels {
            let jitter_x: f32 = rng.gen();
            let jitter_y: f32 = rng.gen();
            let px = screen_x + (sx as f32 + jitter_x) * step_x;
            let py = screen_y - (sy as f32 + jitter_y) * step_y;

            path.clear();
            let start = Instant::now();
            let color = match camera.ray(px, py, config.ambient_refractive_index) {
                Ok(ray) => {
                    trace_ray(ctx, &ray, &mut path);
                    mode_color(config, &path, start.elapsed())
                }
                Err(err) => {
                    log::warn!("No camera ray for pixel ({}, {}): {}", x, y, err);
                    config.background
                }
            };

            total += color * weight;
        }
    }

    total
}

/// Accumulate one sampling pass of pixel (x, y) into `buffer`.
///
/// The pass is divided by `samples_per_subpixel`, so running that many
/// passes (the first with `clear`) leaves the pixel's average in the buffer.
pub fn render_pass<R: Rng + ?Sized>(
    scene: &Scene,
    config: &RenderConfig,
    x: u32,
    y: u32,
    buffer: &mut [Color],
    clear: bool,
    rng: &mut R,
) -> RenderResult<()> {
    config.validate()?;
    check_buffer(config, buffer)?;
    if x >= config.width || y >= config.height {
        return Err(RenderError::PixelOutOfBounds { x, y });
    }

    let camera = Camera::from_config(config)?;
    let ctx = TraceContext::new(scene, config);
    let index = y as usize * config.width as usize + x as usize;

    if clear {
        buffer[index] = Color::TRANSPARENT;
    }
    buffer[index] += sample_pixel(&ctx, &camera, x, y, rng) / config.samples_per_subpixel as f32;

    Ok(())
}

fn check_buffer(config: &RenderConfig, buffer: &[Color]) -> RenderResult<()> {
    let expected = config.pixel_count();
    if buffer.len() != expected {
        return Err(RenderError::BufferSize {
            expected,
            actual: buffer.len(),
        });
    }
    Ok(())
}

fn log_statistics(config: &RenderConfig, scene: &Scene) {
    let level = if config.debug {
        log::Level::Info
    } else {
        log::Level::Debug
    };
    let rays = (config.pixel_count() as u64)
        .saturating_mul(u64::from(config.subpixels).saturating_pow(2))
        .saturating_mul(u64::from(config.samples_per_subpixel));

    log::log!(level, "Resolution: {}x{}", config.width, config.height);
    log::log!(level, "Subpixels per pixel: {0}x{0}", config.subpixels);
    log::log!(level, "Samples per subpixel: {}", config.samples_per_subpixel);
    log::log!(level, "Maximum ray depth: {}", config.max_depth);
    log::log!(level, "Minimum ray count: {}", rays);
    log::log!(
        level,
        "Maximum ray count: {}",
        rays.saturating_mul(u64::from(config.max_depth).max(1))
    );
    log::log!(level, "Primitives: {}, lights: {}", scene.len(), scene.lights().len());
    log::log!(level, "Render mode: {}", config.mode);
}

/// Render the whole image into `buffer` and return the elapsed time.
///
/// Tiles are processed in spiral order, the pixels of each tile in parallel.
/// Each pixel runs `samples_per_subpixel` passes from its own seeded
/// generator, so the result depends only on the scene and configuration.
/// Cancellation through `progress` is honored between tiles and leaves the
/// buffer partially rendered.
pub fn render_image(
    scene: &Scene,
    config: &RenderConfig,
    buffer: &mut [Color],
    progress: Option<&RenderProgress>,
) -> RenderResult<Duration> {
    config.validate()?;
    check_buffer(config, buffer)?;

    let camera = Camera::from_config(config)?;
    let ctx = TraceContext::new(scene, config);
    let samples = config.samples_per_subpixel;
    let width = config.width as usize;

    log_statistics(config, scene);

    if let Some(progress) = progress {
        progress.start(config.pixel_count().saturating_mul(samples as usize));
    }

    let start = Instant::now();

    for tile in generate_tiles(config.width, config.height, config.tile_size) {
        if progress.is_some_and(RenderProgress::is_cancelled) {
            log::info!("Render cancelled after {} tiles", tile.index);
            return Err(RenderError::Cancelled);
        }

        let colors: Vec<Color> = (0..tile.pixel_count())
            .into_par_iter()
            .map(|i| {
                let (x, y) = tile.pixel(i);
                let mut rng = pixel_rng(config.seed, y as usize * width + x as usize);
                let mut color = Color::TRANSPARENT;

                for _ in 0..samples {
                    color += sample_pixel(&ctx, &camera, x, y, &mut rng) / samples as f32;
                    if let Some(progress) = progress {
                        progress.advance();
                    }
                }

                color
            })
            .collect();

        for (i, color) in colors.into_iter().enumerate() {
            let (x, y) = tile.pixel(i);
            buffer[y as usize * width + x as usize] = color;
        }
    }

    let elapsed = start.elapsed();
    let level = if config.debug {
        log::Level::Info
    } else {
        log::Level::Debug
    };
    log::log!(level, "Rendered {}x{} in {:.2?}", config.width, config.height, elapsed);

    Ok(elapsed)
}

/// Render the scene into a new image buffer.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::new(config.width, config.height);
    render_image(scene, config, &mut image.pixels, None)?;
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraConfig, RenderMode, MAX_DEPTH};
    use lumen_core::{demo, Light, Material};
    use lumen_math::Vec3;

    fn small_config() -> RenderConfig {
        RenderConfig::default()
            .with_resolution(16, 12)
            .with_quality(2, 2, 4)
            .with_tile_size(8)
            .with_camera(CameraConfig::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO))
    }

    fn sphere_scene() -> Scene {
        let mut scene = Scene::new();
        let ball = scene.add_sphere(Vec3::ZERO, 2.0).unwrap();
        scene
            .set_material(&ball, Material::diffuse(Color::RED))
            .unwrap();
        scene.add_light(Light::global(Color::WHITE, 1.0));
        scene
    }

    fn assert_all_close(image: &ImageBuffer, expected: Color) {
        for (i, c) in image.pixels.iter().enumerate() {
            let d = (c.r - expected.r).abs()
                + (c.g - expected.g).abs()
                + (c.b - expected.b).abs()
                + (c.a - expected.a).abs();
            assert!(d < 1e-5, "pixel {} = {:?}, expected {:?}", i, c, expected);
        }
    }

    #[test]
    fn test_empty_scene_renders_background() {
        let background = Color::rgb(0.25, 0.5, 0.75);
        let config = small_config().with_background(background);

        let image = render(&Scene::new(), &config).unwrap();
        assert_eq!(image.pixels.len(), 16 * 12);
        assert_all_close(&image, background);
    }

    #[test]
    fn test_max_depth_zero_renders_background() {
        let background = Color::rgb(0.0, 0.5, 0.0);
        let config = small_config()
            .with_quality(2, 2, 0)
            .with_background(background);

        let image = render(&sphere_scene(), &config).unwrap();
        assert_all_close(&image, background);
    }

    #[test]
    fn test_render_is_reproducible() {
        let scene = demo::create_scene().unwrap();
        let config = small_config()
            .with_camera(CameraConfig::new(Vec3::new(0.0, 5.0, 15.0), Vec3::new(0.0, 1.0, 0.0)))
            .with_seed(7);

        let first = render(&scene, &config).unwrap();
        let second = render(&scene, &config).unwrap();
        assert_eq!(first, second);

        // Tile size changes traversal order only
        let retiled = render(&scene, &config.clone().with_tile_size(5)).unwrap();
        assert_eq!(first, retiled);
    }

    #[test]
    fn test_center_pixel_sees_sphere() {
        let config = small_config();
        let image = render(&sphere_scene(), &config).unwrap();

        let center = image.get(8, 6).unwrap();
        assert!((center.r - 1.0).abs() < 1e-5);
        assert_eq!(center.g, 0.0);

        let corner = image.get(0, 0).unwrap();
        assert_eq!(corner.r, 0.0);
    }

    #[test]
    fn test_render_pass_matches_render_image() {
        let scene = sphere_scene();
        let config = small_config().with_seed(3);
        let image = render(&scene, &config).unwrap();

        let mut buffer = vec![Color::WHITE; config.pixel_count()];
        let (x, y) = (9, 5);
        let mut rng = pixel_rng(config.seed, y as usize * 16 + x as usize);
        for pass in 0..config.samples_per_subpixel {
            render_pass(&scene, &config, x, y, &mut buffer, pass == 0, &mut rng).unwrap();
        }

        assert_eq!(buffer[y as usize * 16 + x as usize], image.get(x, y).unwrap());
        assert_eq!(buffer[0], Color::WHITE);
    }

    #[test]
    fn test_render_pass_without_clear_accumulates() {
        let scene = Scene::new();
        let config = small_config().with_background(Color::gray(0.5));
        let mut buffer = vec![Color::TRANSPARENT; config.pixel_count()];
        let mut rng = StdRng::seed_from_u64(1);

        render_pass(&scene, &config, 0, 0, &mut buffer, false, &mut rng).unwrap();
        render_pass(&scene, &config, 0, 0, &mut buffer, false, &mut rng).unwrap();
        render_pass(&scene, &config, 0, 0, &mut buffer, false, &mut rng).unwrap();

        // Three half-weight passes of 0.5
        assert!((buffer[0].r - 0.75).abs() < 1e-6);

        render_pass(&scene, &config, 0, 0, &mut buffer, true, &mut rng).unwrap();
        assert!((buffer[0].r - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_buffer_and_bounds_errors() {
        let scene = Scene::new();
        let config = small_config();
        let mut short = vec![Color::TRANSPARENT; 10];

        assert_eq!(
            render_image(&scene, &config, &mut short, None),
            Err(RenderError::BufferSize {
                expected: 16 * 12,
                actual: 10
            })
        );

        let mut buffer = vec![Color::TRANSPARENT; config.pixel_count()];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            render_pass(&scene, &config, 16, 0, &mut buffer, true, &mut rng),
            Err(RenderError::PixelOutOfBounds { x: 16, y: 0 })
        );

        let invalid = config.clone().with_quality(2, 0, 4);
        assert!(matches!(
            render(&scene, &invalid),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_progress_and_cancel() {
        let scene = sphere_scene();
        let config = small_config();
        let mut buffer = vec![Color::TRANSPARENT; config.pixel_count()];

        let progress = RenderProgress::new();
        assert_eq!(progress.fraction(), 0.0);

        render_image(&scene, &config, &mut buffer, Some(&progress)).unwrap();
        assert_eq!(progress.total(), 16 * 12 * 2);
        assert_eq!(progress.completed(), progress.total());
        assert_eq!(progress.fraction(), 1.0);

        progress.cancel();
        assert!(progress.is_cancelled());
        let mut untouched = vec![Color::WHITE; config.pixel_count()];
        assert_eq!(
            render_image(&scene, &config, &mut untouched, Some(&progress)),
            Err(RenderError::Cancelled)
        );
        assert!(untouched.iter().all(|c| *c == Color::WHITE));

        progress.reset();
        assert!(!progress.is_cancelled());
        render_image(&scene, &config, &mut untouched, Some(&progress)).unwrap();
        assert_eq!(untouched, buffer);
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn test_statistics_for_huge_images_do_not_overflow() {
        let config = RenderConfig::default()
            .with_resolution(u32::MAX, u32::MAX)
            .with_quality(u32::MAX, u32::MAX, MAX_DEPTH)
            .with_debug(true);
        log_statistics(&config, &Scene::new());
    }

    #[test]
    fn test_excessive_depth_is_rejected_before_tracing() {
        let config = RenderConfig::default()
            .with_resolution(1, 1)
            .with_quality(1, 1, u32::MAX);
        assert!(matches!(
            render(&Scene::new(), &config),
            Err(RenderError::InvalidConfig(_))
        ));

        let mut buffer = vec![Color::TRANSPARENT; 1];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            render_pass(&Scene::new(), &config, 0, 0, &mut buffer, true, &mut rng),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_visualization_mode_render() {
        let config = small_config().with_mode(RenderMode::SurfaceNormals);
        let image = render(&sphere_scene(), &config).unwrap();

        // Front of the sphere faces +Z
        let center = image.get(8, 6).unwrap();
        assert!(center.b > 0.9);
    }

    #[test]
    fn test_image_buffer_access() {
        let mut image = ImageBuffer::new(4, 2);
        image.set(3, 1, Color::rgb(1.0, 0.5, 0.0)).unwrap();

        assert_eq!(image.get(3, 1), Some(Color::rgb(1.0, 0.5, 0.0)));
        assert_eq!(image.get(4, 0), None);
        assert_eq!(
            image.set(0, 2, Color::WHITE),
            Err(RenderError::PixelOutOfBounds { x: 0, y: 2 })
        );

        let rgba = image.to_rgba8();
        assert_eq!(rgba.len(), 4 * 8);
        assert_eq!(&rgba[28..32], &[255, 128, 0, 255]);
        assert_eq!(image.as_bytes().len(), 8 * 16);
    }
}
