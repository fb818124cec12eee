//! Tile-based work distribution.
//!
//! Divides the image into tiles (buckets) and hands them to render threads
//! one at a time. A tile is claimed by a single atomic fetch-and-increment,
//! so no tile is rendered twice and none is skipped no matter how many
//! threads race for the next one.

use std::sync::atomic::{AtomicUsize, Ordering};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of tile's top-left corner
    pub x: u32,
    /// Y coordinate of tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Index of this tile in the render order
    pub index: usize,
}

impl Tile {
    /// Create a new tile.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Iterate over the image coordinates covered by this tile, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, y0, w, h) = (self.x, self.y, self.width, self.height);
        (y0..y0 + h).flat_map(move |y| (x0..x0 + w).map(move |x| (x, y)))
    }
}

/// Order in which tiles are handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TileOrder {
    /// Left to right, top to bottom
    #[default]
    Scanline,
    /// Center of the image first, working outward
    Spiral,
}

/// Default tile size in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// Generate tiles covering a `width` x `height` image.
///
/// Tiles on the right and bottom edges are clipped to the image, so the
/// tiles cover every pixel exactly once and never reach outside the image.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32, order: TileOrder) -> Vec<Tile> {
    assert!(tile_size > 0, "tile size must be non-zero");

    let mut tiles = Vec::new();
    let mut index = 0;

    // Generate grid of tiles
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tw = tile_size.min(width - x);
            let th = tile_size.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, index));
            index += 1;
            x += tile_size;
        }
        y += tile_size;
    }

    if order == TileOrder::Spiral {
        sort_spiral(&mut tiles, width, height);

        // Update indices after sorting
        for (i, tile) in tiles.iter_mut().enumerate() {
            tile.index = i;
        }
    }

    tiles
}

/// Sort tiles by distance from image center.
fn sort_spiral(tiles: &mut [Tile], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |t: &Tile| {
        let tx = t.x as f32 + t.width as f32 / 2.0;
        let ty = t.y as f32 + t.height as f32 / 2.0;
        (tx - center_x).powi(2) + (ty - center_y).powi(2)
    };

    tiles.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Tile edge length used when none is configured.
///
/// Each axis is split into `ceil(dimension / thread_count)` tiles; the edge
/// is the larger of the two resulting tile extents.
pub fn tile_size_for_threads(width: u32, height: u32, thread_count: usize) -> u32 {
    let threads = thread_count.max(1) as u32;
    let edge = |dimension: u32| {
        let count = dimension.div_ceil(threads).max(1);
        dimension.div_ceil(count)
    };
    edge(width).max(edge(height)).max(1)
}

/// Tiles plus the shared claim counter.
///
/// The tile list is fixed when the queue is built; only the counter changes
/// afterwards. Any tile at a position below the counter has been claimed.
#[derive(Debug)]
pub struct TileQueue {
    tiles: Vec<Tile>,
    next: AtomicUsize,
}

impl TileQueue {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self {
            tiles,
            next: AtomicUsize::new(0),
        }
    }

    /// Claim the next unrendered tile.
    ///
    /// Returns `None` once every tile has been claimed; that is the normal
    /// signal for a worker to stop.
    pub fn claim_next(&self) -> Option<&Tile> {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        self.tiles.get(index)
    }

    /// Number of tiles claimed so far.
    pub fn claimed(&self) -> usize {
        self.next.load(Ordering::SeqCst).min(self.tiles.len())
    }

    /// Claimed tiles as a percentage in [0, 100].
    pub fn progress(&self) -> f32 {
        if self.tiles.is_empty() {
            return 100.0;
        }
        self.claimed() as f32 / self.tiles.len() as f32 * 100.0
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
