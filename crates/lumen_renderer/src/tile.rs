//! Tile-based image traversal.
//!
//! Divides the image into tiles that are rendered one after another, with
//! the pixels of each tile fanned out over rayon's thread pool.

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position of this tile in the render order
    pub index: usize,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Image coordinates of the `i`-th pixel of the tile, row-major.
    pub fn pixel(&self, i: usize) -> (u32, u32) {
        let width = self.width as usize;
        (self.x + (i % width) as u32, self.y + (i / width) as u32)
    }
}

/// Default tile size in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 128;

/// Generate tiles for an image, sorted in spiral order from the center.
///
/// Edge tiles are clipped to the image; together the tiles cover every
/// pixel exactly once.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let mut tiles = Vec::new();
    let step = tile_size.max(1);

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tw = step.min(width - x);
            let th = step.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, tiles.len()));
            x += step;
        }
        y += step;
    }

    sort_spiral(&mut tiles, width, height);

    for (i, tile) in tiles.iter_mut().enumerate() {
        tile.index = i;
    }

    tiles
}

/// Sort tiles by distance from the image center.
fn sort_spiral(tiles: &mut [Tile], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |t: &Tile| {
        let dx = t.x as f32 + t.width as f32 / 2.0 - center_x;
        let dy = t.y as f32 + t.height as f32 / 2.0 - center_y;
        dx * dx + dy * dy
    };

    // Stable sort keeps row-major order among equidistant tiles
    tiles.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}
