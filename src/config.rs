//! Compile-time geometry of the screen, the redraw tiles and the sprites.
//!
//! A sprite must fit inside one tile so that it can touch at most four tiles
//! at once, and the screen must split into whole tiles. Both are checked when
//! the crate is built.

use core::fmt;

pub const SCREEN_WIDTH: u16 = 160;
pub const SCREEN_HEIGHT: u16 = 128;

pub const TILE_WIDTH: u16 = 16;
pub const TILE_HEIGHT: u16 = 16;

pub const SPRITE_WIDTH: u16 = 8;
pub const SPRITE_HEIGHT: u16 = 8;

/// The maximum number of concurrently managed sprites.
pub const MAX_SPRITES: usize = 8;

pub const TILES_PER_ROW: usize = (SCREEN_WIDTH / TILE_WIDTH) as usize;
pub const TILES_PER_COLUMN: usize = (SCREEN_HEIGHT / TILE_HEIGHT) as usize;
pub const TILE_COUNT: usize = TILES_PER_ROW * TILES_PER_COLUMN;
pub const TILE_PIXELS: usize = TILE_WIDTH as usize * TILE_HEIGHT as usize;
pub const SPRITE_PIXELS: usize = SPRITE_WIDTH as usize * SPRITE_HEIGHT as usize;

// Text cells of the fast glyph path
pub const GLYPH_PITCH_X: u16 = 6;
pub const GLYPH_PITCH_Y: u16 = 11;
pub const GLYPH_ORIGIN_X: u16 = 8;
pub const GLYPH_ORIGIN_Y: u16 = 8;

pub const GEOMETRY: Geometry = Geometry {
    screen_width: SCREEN_WIDTH,
    screen_height: SCREEN_HEIGHT,
    tile_width: TILE_WIDTH,
    tile_height: TILE_HEIGHT,
    sprite_width: SPRITE_WIDTH,
    sprite_height: SPRITE_HEIGHT,
};

const _: () = match GEOMETRY.validate() {
    Ok(()) => (),
    Err(GeometryError::ZeroSize) => panic!("screen, tile and sprite sizes must be non-zero"),
    Err(GeometryError::SpriteWiderThanTile) | Err(GeometryError::SpriteTallerThanTile) => {
        panic!("sprites must not be larger than tiles")
    }
    Err(GeometryError::ScreenWidthNotDivisible) | Err(GeometryError::ScreenHeightNotDivisible) => {
        panic!("tile dimensions must divide the screen size")
    }
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub screen_width: u16,
    pub screen_height: u16,
    pub tile_width: u16,
    pub tile_height: u16,
    pub sprite_width: u16,
    pub sprite_height: u16,
}

impl Geometry {
    pub const fn validate(&self) -> Result<(), GeometryError> {
        if self.screen_width == 0
            || self.screen_height == 0
            || self.tile_width == 0
            || self.tile_height == 0
            || self.sprite_width == 0
            || self.sprite_height == 0
        {
            return Err(GeometryError::ZeroSize);
        }
        if self.sprite_width > self.tile_width {
            return Err(GeometryError::SpriteWiderThanTile);
        }
        if self.sprite_height > self.tile_height {
            return Err(GeometryError::SpriteTallerThanTile);
        }
        if self.screen_width % self.tile_width != 0 {
            return Err(GeometryError::ScreenWidthNotDivisible);
        }
        if self.screen_height % self.tile_height != 0 {
            return Err(GeometryError::ScreenHeightNotDivisible);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryError {
    ZeroSize,
    SpriteWiderThanTile,
    SpriteTallerThanTile,
    ScreenWidthNotDivisible,
    ScreenHeightNotDivisible,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::ZeroSize => f.write_str("screen, tile and sprite sizes must be non-zero"),
            GeometryError::SpriteWiderThanTile => f.write_str("sprite is wider than a tile"),
            GeometryError::SpriteTallerThanTile => f.write_str("sprite is taller than a tile"),
            GeometryError::ScreenWidthNotDivisible => {
                f.write_str("screen width is not a multiple of the tile width")
            }
            GeometryError::ScreenHeightNotDivisible => {
                f.write_str("screen height is not a multiple of the tile height")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_geometry_is_valid() {
        assert_eq!(GEOMETRY.validate(), Ok(()));
        assert_eq!(TILES_PER_ROW, 10);
        assert_eq!(TILES_PER_COLUMN, 8);
        assert_eq!(TILE_COUNT, 80);
    }

    #[test]
    fn rejects_sprites_larger_than_tiles() {
        let wide = Geometry { sprite_width: 17, ..GEOMETRY };
        assert_eq!(wide.validate(), Err(GeometryError::SpriteWiderThanTile));

        let tall = Geometry { sprite_height: 32, ..GEOMETRY };
        assert_eq!(tall.validate(), Err(GeometryError::SpriteTallerThanTile));
    }

    #[test]
    fn rejects_partial_tiles() {
        let g = Geometry { screen_width: 150, ..GEOMETRY };
        assert_eq!(g.validate(), Err(GeometryError::ScreenWidthNotDivisible));

        let g = Geometry { tile_height: 12, ..GEOMETRY };
        assert_eq!(g.validate(), Err(GeometryError::ScreenHeightNotDivisible));

        let g = Geometry { tile_width: 0, ..GEOMETRY };
        assert_eq!(g.validate(), Err(GeometryError::ZeroSize));
    }
}
