//! Rasterizes one screen tile: background first, then every active sprite
//! overlapping it, in slot order.

use log::warn;

use crate::color::Color;
use crate::config::{SPRITE_HEIGHT, SPRITE_WIDTH, TILE_HEIGHT, TILE_PIXELS, TILE_WIDTH};
use crate::sprite::{Sprite, SpriteSheet};

/// Off-screen pixels of one tile, row-major.
pub type TileBuffer = [Color; TILE_PIXELS];

/// An active sprite refers to an index missing from the sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownSprite(pub u8);

/// Overlap of a sprite with a tile, in sprite and tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Overlap {
    src_x: usize,
    src_y: usize,
    dst_x: usize,
    dst_y: usize,
    width: usize,
    height: usize,
}

fn overlap(sprite: &Sprite, origin_x: i32, origin_y: i32) -> Option<Overlap> {
    let dx = sprite.x as i32 - origin_x;
    let dy = sprite.y as i32 - origin_y;
    let (tw, th) = (TILE_WIDTH as i32, TILE_HEIGHT as i32);
    let (sw, sh) = (SPRITE_WIDTH as i32, SPRITE_HEIGHT as i32);

    if dx <= -sw || dx >= tw || dy <= -sh || dy >= th {
        return None;
    }

    let dst_x = dx.max(0);
    let dst_y = dy.max(0);
    Some(Overlap {
        src_x: (-dx).max(0) as usize,
        src_y: (-dy).max(0) as usize,
        dst_x: dst_x as usize,
        dst_y: dst_y as usize,
        width: ((dx + sw).min(tw) - dst_x) as usize,
        height: ((dy + sh).min(th) - dst_y) as usize,
    })
}

/// Composites the tile whose top-left screen pixel is `(origin_x, origin_y)`
/// into `buffer`. Sprites are clipped to the tile; later slots overwrite
/// earlier ones.
pub fn render_tile<'s>(
    buffer: &mut TileBuffer,
    origin_x: i32,
    origin_y: i32,
    background: Color,
    sprites: impl IntoIterator<Item = &'s Sprite>,
    sheet: &SpriteSheet<'_>,
) -> Result<(), UnknownSprite> {
    buffer.fill(background);

    for sprite in sprites {
        if !sprite.active {
            continue;
        }
        let Some(o) = overlap(sprite, origin_x, origin_y) else {
            continue;
        };
        let Some(pixels) = sheet.get(sprite.index) else {
            warn!(target: "compositor", "sprite index {} is not in the sheet", sprite.index);
            return Err(UnknownSprite(sprite.index));
        };

        for row in 0..o.height {
            let src = (o.src_y + row) * SPRITE_WIDTH as usize + o.src_x;
            let dst = (o.dst_y + row) * TILE_WIDTH as usize + o.dst_x;
            buffer[dst..dst + o.width].copy_from_slice(&pixels[src..src + o.width]);
        }
    }

    Ok(())
}
