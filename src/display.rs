use log::{debug, warn};

use crate::bus::{self, DisplayBus};
use crate::color::Color;
use crate::compositor::{self, TileBuffer};
use crate::config::{
    GLYPH_ORIGIN_X, GLYPH_ORIGIN_Y, GLYPH_PITCH_X, GLYPH_PITCH_Y, SCREEN_HEIGHT, SCREEN_WIDTH,
    TILE_COUNT, TILE_PIXELS,
};
use crate::error::Error;
use crate::font::{self, Font, GlyphBuffer, GlyphStyle, GLYPH_HEIGHT, GLYPH_PIXELS, GLYPH_WIDTH};
use crate::sprite::{Sprite, SpriteSheet, SpriteStore};
use crate::tiles::DirtyTiles;

/// Sprites over a solid background on a display that is only ever updated
/// tile by tile.
///
/// Mutate the sprites, then call [`render_frame`](Self::render_frame) to
/// upload every tile whose visible content changed. Calls must not overlap;
/// wrap the display in a single render task if several parts of the
/// application need it.
pub struct RealtimeDisplay<'a, B> {
    bus: B,
    sprites: SpriteStore,
    tiles: DirtyTiles,
    sheet: SpriteSheet<'a>,
    font: Font<'a>,
    style: GlyphStyle,
    background: Color,
    buffer: TileBuffer,
}

impl<'a, B: DisplayBus> RealtimeDisplay<'a, B> {
    /// All sprites start hidden and every tile dirty, so the first frame
    /// paints the whole screen.
    pub fn new(bus: B, sheet: SpriteSheet<'a>, font: Font<'a>) -> Self {
        Self {
            bus,
            sprites: SpriteStore::new(),
            tiles: DirtyTiles::new(),
            sheet,
            font,
            style: GlyphStyle::default(),
            background: Color::BLACK,
            buffer: [Color::BLACK; TILE_PIXELS],
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Direct bus access. Anything drawn this way is overwritten whenever
    /// the tiles beneath it are redrawn.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn release(self) -> B {
        self.bus
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Changes the background color and schedules a full redraw.
    pub fn set_background(&mut self, color: Color) {
        if color != self.background {
            self.background = color;
            self.tiles.mark_all();
        }
    }

    pub fn sprite(&self, slot: usize) -> Result<&Sprite, Error<B::Error>> {
        self.sprites.get(slot).ok_or(Error::SlotOutOfRange(slot))
    }

    pub fn sprite_mut(&mut self, slot: usize) -> Result<&mut Sprite, Error<B::Error>> {
        self.sprites.get_mut(slot).ok_or(Error::SlotOutOfRange(slot))
    }

    pub fn sprites(&self) -> &SpriteStore {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteStore {
        &mut self.sprites
    }

    pub fn dirty_tiles(&self) -> &DirtyTiles {
        &self.tiles
    }

    pub fn invalidate_all(&mut self) {
        self.tiles.mark_all();
    }

    /// Schedules a redraw of every tile overlapping the rectangle, e.g. to
    /// erase text drawn with [`draw_glyph`](Self::draw_glyph).
    pub fn invalidate_region(&mut self, x: i32, y: i32, width: u16, height: u16) {
        self.tiles.mark_region(x, y, width, height);
    }

    /// Draws all tiles that changed since the last frame and returns how
    /// many were uploaded.
    ///
    /// A tile is marked clean only once it has been uploaded. A bus error
    /// stops the frame and the remaining tiles are retried by the next
    /// call. A tile holding a sprite with an unknown index stays dirty while
    /// the other tiles are still drawn, and the first such error is
    /// returned at the end.
    pub fn render_frame(&mut self) -> Result<usize, Error<B::Error>> {
        let tiles = &mut self.tiles;
        let changed = self.sprites.sync(|previous, current| {
            // erase the old footprint, draw the new one
            tiles.mark_footprint(previous);
            tiles.mark_footprint(current);
        });

        let mut uploaded = 0;
        let mut unknown = None;
        for index in 0..TILE_COUNT {
            if !self.tiles.is_dirty(index) {
                continue;
            }
            let (x, y) = DirtyTiles::tile_origin(index);
            if let Err(err) = compositor::render_tile(
                &mut self.buffer,
                x as i32,
                y as i32,
                self.background,
                self.sprites.iter(),
                &self.sheet,
            ) {
                unknown.get_or_insert(err);
                continue;
            }
            bus::upload_tile(&mut self.bus, &self.buffer, x, y).map_err(Error::Bus)?;
            self.tiles.clear(index);
            uploaded += 1;
        }

        debug!(target: "compositor", "frame: {} sprites changed, {} tiles uploaded", changed, uploaded);
        match unknown {
            Some(err) => Err(err.into()),
            None => Ok(uploaded),
        }
    }

    /// Paints a tile in a solid color, bypassing the compositor. The tile
    /// is redrawn normally once it gets dirty again. Indices past the last
    /// tile are ignored.
    pub fn fill_tile(&mut self, index: usize, color: Color) -> Result<(), Error<B::Error>> {
        if index >= TILE_COUNT {
            return Ok(());
        }
        let (x, y) = DirtyTiles::tile_origin(index);
        bus::fill_tile(&mut self.bus, color, x, y).map_err(Error::Bus)
    }

    pub fn glyph_style(&self) -> GlyphStyle {
        self.style
    }

    pub fn set_glyph_style(&mut self, foreground: Color, background: Color) {
        self.style = GlyphStyle {
            foreground,
            background,
        };
    }

    /// Screen position of the text cell at `(row, col)`, if it is fully
    /// on screen.
    pub fn glyph_position(row: u8, col: u8) -> Option<(u16, u16)> {
        let x = GLYPH_ORIGIN_X as u32 + col as u32 * GLYPH_PITCH_X as u32;
        let y = GLYPH_ORIGIN_Y as u32 + row as u32 * GLYPH_PITCH_Y as u32;
        if x + GLYPH_WIDTH as u32 > SCREEN_WIDTH as u32 || y + GLYPH_HEIGHT as u32 > SCREEN_HEIGHT as u32 {
            return None;
        }
        Some((x as u16, y as u16))
    }

    /// Writes one character straight to the screen.
    ///
    /// Glyphs are overlays: the tile pipeline does not know about them, so
    /// they disappear when a sprite or background change redraws the tiles
    /// beneath. Redraw them after [`render_frame`](Self::render_frame), or
    /// erase them with [`invalidate_region`](Self::invalidate_region).
    pub fn draw_glyph(&mut self, row: u8, col: u8, ch: u8) -> Result<(), Error<B::Error>> {
        let (x, y) = Self::glyph_position(row, col).ok_or(Error::GlyphOffScreen { row, col })?;
        let Some(columns) = self.font.glyph(ch) else {
            warn!(target: "compositor", "no glyph for 0x{:02X}", ch);
            return Err(Error::UnknownGlyph(ch));
        };

        let mut pixels: GlyphBuffer = [self.style.background; GLYPH_PIXELS];
        font::rasterize(columns, self.style, &mut pixels);
        bus::upload_rect(&mut self.bus, x, y, GLYPH_WIDTH, GLYPH_HEIGHT, &pixels).map_err(Error::Bus)
    }

    /// Draws `text` into consecutive cells of one row. Stops at the first
    /// error.
    pub fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), Error<B::Error>> {
        for (i, ch) in text.bytes().enumerate() {
            let col = u8::try_from(col as usize + i).map_err(|_| Error::GlyphOffScreen { row, col })?;
            self.draw_glyph(row, col, ch)?;
        }
        Ok(())
    }
}
