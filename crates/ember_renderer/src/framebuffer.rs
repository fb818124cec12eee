//! Shared pixel storage for a render.
//!
//! Pixels are packed `0xAARRGGBB` words stored row-major, top row first.
//! Every render thread holds `&FrameBuffer` and writes only the pixels of
//! the tile it claimed. Each pixel is an `AtomicU32`, so those writes need
//! neither a lock nor `unsafe`; the thread join at the end of the render
//! makes them visible to whoever reads the buffer next.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::Color;
use ember_math::Interval;

/// Pack a color into `0xAARRGGBB` with alpha 255.
///
/// Each channel is clamped to [0, 1] and scaled by 255, truncating.
pub fn pack_color(color: Color) -> u32 {
    let channel = |c: f32| (255.0 * Interval::UNIT.clamp(c)) as u32;
    0xFF00_0000 | channel(color.x) << 16 | channel(color.y) << 8 | channel(color.z)
}

/// Split a packed pixel into `[r, g, b, a]` bytes.
pub fn unpack_pixel(pixel: u32) -> [u8; 4] {
    let [a, r, g, b] = pixel.to_be_bytes();
    [r, g, b, a]
}

/// Width x height packed pixels shared between render threads.
#[derive(Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Box<[AtomicU32]>,
}

impl FrameBuffer {
    /// Create a new buffer with every pixel zeroed.
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = (0..width as usize * height as usize)
            .map(|_| AtomicU32::new(0))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} buffer",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Get the packed pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)].load(Ordering::Relaxed)
    }

    /// Set the packed pixel at (x, y).
    pub fn write(&self, x: u32, y: u32, pixel: u32) {
        self.pixels[self.index(x, y)].store(pixel, Ordering::Relaxed);
    }

    /// Consume the buffer into plain packed pixels.
    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
            .into_vec()
            .into_iter()
            .map(AtomicU32::into_inner)
            .collect()
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in self.pixels.iter() {
            bytes.extend_from_slice(&unpack_pixel(pixel.load(Ordering::Relaxed)));
        }
        bytes
    }
}
