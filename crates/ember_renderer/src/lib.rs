//! Ember Renderer - Tiled CPU Path Tracing
//!
//! A Monte Carlo path tracer for scenes made of planes and spheres.
//! The image is split into tiles that a fixed pool of threads claims one at
//! a time through a single atomic counter, writing straight into a shared
//! frame buffer.

mod camera;
mod framebuffer;
mod integrator;
mod intersect;
mod output;
mod renderer;
mod tile;

pub use camera::Camera;
pub use framebuffer::{pack_color, unpack_pixel, FrameBuffer};
pub use integrator::{bounce_direction, ray_cast};
pub use intersect::{
    intersect, HitRecord, Hittable, DEFAULT_MIN_HIT_DISTANCE, DEGENERATE_DIRECTION_EPSILON,
};
pub use output::{save_image, write_image, OutputError};
pub use renderer::{
    render, render_pixel, render_tile, render_with_progress, RenderConfig, RenderError,
};
pub use tile::{
    generate_tiles, tile_size_for_threads, Tile, TileOrder, TileQueue, DEFAULT_TILE_SIZE,
};

/// Re-export math and scene types so callers only need this crate
pub use ember_core::{Material, MaterialId, Plane, Scene, Sphere};
pub use ember_math::{Interval, Ray, Vec3};

/// Linear RGB color, unclamped until the final pixel write.
pub type Color = Vec3;

use rand::{Rng, RngCore};

/// Uniform f32 in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform f32 in [-1, 1).
#[inline]
pub(crate) fn gen_bilateral(rng: &mut dyn RngCore) -> f32 {
    gen_f32(rng) * 2.0 - 1.0
}
