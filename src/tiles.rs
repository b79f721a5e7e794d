use crate::config::{
    SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_HEIGHT, SPRITE_WIDTH, TILES_PER_COLUMN, TILES_PER_ROW,
    TILE_COUNT, TILE_HEIGHT, TILE_WIDTH,
};
use crate::sprite::Sprite;

/// Which screen tiles are stale and have to be composited and uploaded
/// again. Tiles are numbered row-major.
#[derive(Clone, Debug)]
pub struct DirtyTiles {
    dirty: [bool; TILE_COUNT],
}

impl DirtyTiles {
    /// All tiles start dirty so the first frame redraws the whole screen.
    pub const fn new() -> Self {
        Self {
            dirty: [true; TILE_COUNT],
        }
    }

    /// The tile containing the pixel `(px, py)`. Pixels outside the screen
    /// are clamped onto the nearest edge tile.
    ///
    /// Column and row are clamped separately. For on-screen pixels this is
    /// the same as clamping `row * TILES_PER_ROW + column`, but a pixel left
    /// of the screen lands in its own row instead of the previous row's
    /// last tile.
    pub fn tile_index(px: i32, py: i32) -> usize {
        let column = px
            .div_euclid(TILE_WIDTH as i32)
            .clamp(0, TILES_PER_ROW as i32 - 1);
        let row = py
            .div_euclid(TILE_HEIGHT as i32)
            .clamp(0, TILES_PER_COLUMN as i32 - 1);
        row as usize * TILES_PER_ROW + column as usize
    }

    /// Top-left screen pixel of a tile.
    pub const fn tile_origin(index: usize) -> (u16, u16) {
        let column = (index % TILES_PER_ROW) as u16;
        let row = (index / TILES_PER_ROW) as u16;
        (column * TILE_WIDTH, row * TILE_HEIGHT)
    }

    pub fn is_dirty(&self, index: usize) -> bool {
        self.dirty.get(index).copied().unwrap_or(false)
    }

    pub fn mark(&mut self, index: usize) {
        if let Some(tile) = self.dirty.get_mut(index) {
            *tile = true;
        }
    }

    pub fn mark_all(&mut self) {
        self.dirty.fill(true);
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(tile) = self.dirty.get_mut(index) {
            *tile = false;
        }
    }

    /// Marks the tiles under the four corners of an active sprite. A sprite
    /// is never larger than a tile, so the corners reach every tile it
    /// overlaps.
    pub fn mark_footprint(&mut self, sprite: &Sprite) {
        if !sprite.active {
            return;
        }

        let left = sprite.x as i32;
        let top = sprite.y as i32;
        let right = left + SPRITE_WIDTH as i32 - 1;
        let bottom = top + SPRITE_HEIGHT as i32 - 1;

        self.mark(Self::tile_index(left, top));
        self.mark(Self::tile_index(right, top));
        self.mark(Self::tile_index(left, bottom));
        self.mark(Self::tile_index(right, bottom));
    }

    /// Marks every tile overlapping the given screen rectangle. Parts
    /// outside the screen are ignored.
    pub fn mark_region(&mut self, x: i32, y: i32, width: u16, height: u16) {
        if width == 0 || height == 0 {
            return;
        }

        let left = x.max(0);
        let top = y.max(0);
        let right = (x + width as i32 - 1).min(SCREEN_WIDTH as i32 - 1);
        let bottom = (y + height as i32 - 1).min(SCREEN_HEIGHT as i32 - 1);
        if left > right || top > bottom {
            return;
        }

        let first_column = left as usize / TILE_WIDTH as usize;
        let last_column = right as usize / TILE_WIDTH as usize;
        let first_row = top as usize / TILE_HEIGHT as usize;
        let last_row = bottom as usize / TILE_HEIGHT as usize;
        for row in first_row..=last_row {
            for column in first_column..=last_column {
                self.dirty[row * TILES_PER_ROW + column] = true;
            }
        }
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.iter().filter(|&&dirty| dirty).count()
    }

    /// Indices of the dirty tiles in row-major order.
    pub fn iter_dirty(&self) -> impl Iterator<Item = usize> + '_ {
        self.dirty
            .iter()
            .enumerate()
            .filter_map(|(index, &dirty)| dirty.then_some(index))
    }
}

impl Default for DirtyTiles {
    fn default() -> Self {
        Self::new()
    }
}
