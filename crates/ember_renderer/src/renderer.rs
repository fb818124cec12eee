//! Render orchestration.
//!
//! Implements tiled Monte Carlo rendering with:
//! - A fixed pool of scoped threads pulling tiles from a [`TileQueue`]
//! - Per-tile seeded random numbers, so output depends only on the seed
//! - Anti-aliasing via jittered multi-sampling

use std::num::NonZeroUsize;
use std::thread;
use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;

use crate::framebuffer::pack_color;
use crate::integrator::ray_cast;
use crate::intersect::DEFAULT_MIN_HIT_DISTANCE;
use crate::tile::{generate_tiles, tile_size_for_threads, Tile, TileOrder, TileQueue};
use crate::{Camera, Color, FrameBuffer};
use ember_core::Scene;
use ember_math::{Vec3, NORMALIZE_EPSILON};

/// Errors caught before any render thread starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Image must be at least 1x1, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("samples_per_pixel must be at least 1")]
    NoSamples,

    #[error("max_bounces must be at least 1")]
    NoBounces,

    #[error("thread_count must be at least 1")]
    NoThreads,

    #[error("tile_size must be at least 1")]
    ZeroTileSize,

    #[error("min_hit_distance must be finite and >= 0, got {0}")]
    InvalidHitDistance(f32),

    #[error("Camera at {position} has no view direction toward {look_at}")]
    DegenerateCamera { position: Vec3, look_at: Vec3 },

    #[error("film_distance must be finite and > 0, got {0}")]
    InvalidFilmDistance(f32),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum surface interactions per path
    pub max_bounces: u32,
    /// Tile edge in pixels; derived from `thread_count` when `None`
    pub tile_size: Option<u32>,
    /// Worker threads spawned; the calling thread joins them as one more
    pub thread_count: usize,
    /// Order in which tiles are handed out
    pub tile_order: TileOrder,
    /// Base seed; each tile derives its own generator from it
    pub seed: u64,
    /// Hits closer than this along a ray are ignored
    pub min_hit_distance: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 64,
            max_bounces: 32,
            tile_size: None,
            thread_count: thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            tile_order: TileOrder::Scanline,
            seed: 0,
            min_hit_distance: DEFAULT_MIN_HIT_DISTANCE,
        }
    }
}

impl RenderConfig {
    /// Check the configuration against the camera.
    pub fn validate(&self, camera: &Camera) -> Result<(), RenderError> {
        if camera.image_width == 0 || camera.image_height == 0 {
            return Err(RenderError::EmptyImage {
                width: camera.image_width,
                height: camera.image_height,
            });
        }
        let view = camera.position() - camera.look_at();
        if !view.is_finite() || view.length_squared() < NORMALIZE_EPSILON {
            return Err(RenderError::DegenerateCamera {
                position: camera.position(),
                look_at: camera.look_at(),
            });
        }
        let film_distance = camera.film_distance();
        if !(film_distance.is_finite() && film_distance > 0.0) {
            return Err(RenderError::InvalidFilmDistance(film_distance));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }
        if self.max_bounces == 0 {
            return Err(RenderError::NoBounces);
        }
        if self.thread_count == 0 {
            return Err(RenderError::NoThreads);
        }
        if self.tile_size == Some(0) {
            return Err(RenderError::ZeroTileSize);
        }
        if !(self.min_hit_distance.is_finite() && self.min_hit_distance >= 0.0) {
            return Err(RenderError::InvalidHitDistance(self.min_hit_distance));
        }
        Ok(())
    }

    /// Tile edge actually used for an image of the given size.
    pub fn effective_tile_size(&self, width: u32, height: u32) -> u32 {
        self.tile_size
            .unwrap_or_else(|| tile_size_for_threads(width, height, self.thread_count))
    }
}

/// Seed for a tile's generator.
fn tile_seed(seed: u64, tile_index: usize) -> u64 {
    seed ^ (tile_index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render a single pixel with multi-sampling.
///
/// Returns the mean of `samples_per_pixel` path-traced samples.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_cast(&ray, scene, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Render every pixel of `tile` into `buffer`.
pub fn render_tile(
    tile: &Tile,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    buffer: &FrameBuffer,
) {
    let mut rng = StdRng::seed_from_u64(tile_seed(config.seed, tile.index));

    for (x, y) in tile.pixels() {
        // Tiles are clipped on creation; this only guards a hand-made tile
        if x >= buffer.width() || y >= buffer.height() {
            continue;
        }
        let color = render_pixel(camera, scene, x, y, config, &mut rng);
        buffer.write(x, y, pack_color(color));
    }
}

/// Claim and render tiles until the queue runs dry.
///
/// Returns the number of tiles this worker rendered.
fn run_worker(
    queue: &TileQueue,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    buffer: &FrameBuffer,
    mut after_tile: impl FnMut(&TileQueue),
) -> usize {
    let mut rendered = 0;
    while let Some(tile) = queue.claim_next() {
        render_tile(tile, camera, scene, config, buffer);
        rendered += 1;
        after_tile(queue);
    }
    rendered
}

/// Drain `queue` with `config.thread_count` spawned workers plus the calling
/// thread.
///
/// Returns the number of tiles each worker rendered, the calling thread
/// first. Only the calling thread invokes `on_progress`.
fn render_tiles(
    queue: &TileQueue,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    buffer: &FrameBuffer,
    mut on_progress: impl FnMut(f32),
) -> Vec<usize> {
    thread::scope(|s| {
        let workers: Vec<_> = (0..config.thread_count)
            .map(|_| s.spawn(move || run_worker(queue, camera, scene, config, buffer, |_| {})))
            .collect();

        let own = run_worker(queue, camera, scene, config, buffer, |q| {
            on_progress(q.progress())
        });

        let mut rendered = Vec::with_capacity(workers.len() + 1);
        rendered.push(own);
        for worker in workers {
            rendered.push(worker.join().unwrap_or_else(|e| std::panic::resume_unwind(e)));
        }
        rendered
    })
}

/// Render the scene to a frame buffer.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> Result<FrameBuffer, RenderError> {
    render_with_progress(scene, camera, config, |_| {})
}

/// Render the scene, reporting progress as a percentage in [0, 100].
///
/// `thread_count` workers are spawned and the calling thread works as one
/// more. Only the calling thread invokes `on_progress`: after each tile it
/// renders, and once with 100 when every worker has finished.
pub fn render_with_progress(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    mut on_progress: impl FnMut(f32),
) -> Result<FrameBuffer, RenderError> {
    config.validate(camera)?;

    let (width, height) = (camera.image_width, camera.image_height);
    let tile_size = config.effective_tile_size(width, height);
    let queue = TileQueue::new(generate_tiles(width, height, tile_size, config.tile_order));
    let buffer = FrameBuffer::new(width, height);

    info!(
        "Rendering {}x{} @ {} spp, {} bounces: {} tiles of {}px on {} workers + caller",
        width,
        height,
        config.samples_per_pixel,
        config.max_bounces,
        queue.len(),
        tile_size,
        config.thread_count
    );
    let start = Instant::now();

    let rendered = render_tiles(&queue, camera, scene, config, &buffer, &mut on_progress);
    for (worker, tiles) in rendered.iter().enumerate() {
        debug!("Worker {worker} rendered {tiles} tiles");
    }

    on_progress(100.0);
    info!("Rendered in {:?}", start.elapsed());

    Ok(buffer)
}
