use core::ops::{Index, IndexMut};

use crate::color::Color;
use crate::config::{MAX_SPRITES, SPRITE_PIXELS};

/// One movable sprite slot.
///
/// Positions are the top-left pixel and may lie partly or fully off-screen;
/// such sprites are clipped, never rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sprite {
    /// Should this sprite be drawn in the next frame?
    pub active: bool,
    pub x: i16,
    pub y: i16,
    /// Index into the sprite sheet
    pub index: u8,
}

impl Sprite {
    /// An active sprite at the given position.
    pub const fn new(x: i16, y: i16, index: u8) -> Self {
        Self {
            active: true,
            x,
            y,
            index,
        }
    }

    pub const fn hidden() -> Self {
        Self {
            active: false,
            x: 0,
            y: 0,
            index: 0,
        }
    }

    pub fn move_to(&mut self, x: i16, y: i16) {
        self.x = x;
        self.y = y;
    }

    pub fn move_by(&mut self, dx: i16, dy: i16) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }
}

/// The live sprite slots together with their state at the end of the last
/// rendered frame.
#[derive(Debug)]
pub struct SpriteStore {
    current: [Sprite; MAX_SPRITES],
    previous: [Sprite; MAX_SPRITES],
}

impl SpriteStore {
    pub const fn new() -> Self {
        Self {
            current: [Sprite::hidden(); MAX_SPRITES],
            previous: [Sprite::hidden(); MAX_SPRITES],
        }
    }

    pub const fn len(&self) -> usize {
        MAX_SPRITES
    }

    pub const fn is_empty(&self) -> bool {
        MAX_SPRITES == 0
    }

    pub fn get(&self, slot: usize) -> Option<&Sprite> {
        self.current.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Sprite> {
        self.current.get_mut(slot)
    }

    /// The slot as it was when the last frame was rendered.
    pub fn previous(&self, slot: usize) -> Option<&Sprite> {
        self.previous.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.current.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.current.iter_mut()
    }

    pub fn is_changed(&self, slot: usize) -> bool {
        match (self.current.get(slot), self.previous.get(slot)) {
            (Some(current), Some(previous)) => current != previous,
            _ => false,
        }
    }

    /// Calls `f(previous, current)` for every slot that differs from its
    /// snapshot, then takes a new snapshot of it. Returns the number of
    /// changed slots.
    pub fn sync<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&Sprite, &Sprite),
    {
        let mut changed = 0;
        for (current, previous) in self.current.iter().zip(self.previous.iter_mut()) {
            if current == previous {
                continue;
            }
            f(previous, current);
            *previous = *current;
            changed += 1;
        }
        changed
    }
}

impl Default for SpriteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for SpriteStore {
    type Output = Sprite;

    fn index(&self, slot: usize) -> &Sprite {
        &self.current[slot]
    }
}

impl IndexMut<usize> for SpriteStore {
    fn index_mut(&mut self, slot: usize) -> &mut Sprite {
        &mut self.current[slot]
    }
}

/// Read-only pixel data of all sprites, `SPRITE_PIXELS` row-major pixels
/// per entry.
#[derive(Clone, Copy, Debug)]
pub struct SpriteSheet<'a> {
    pixels: &'a [Color],
}

impl<'a> SpriteSheet<'a> {
    pub const fn new(pixels: &'a [Color]) -> Self {
        assert!(
            pixels.len() % SPRITE_PIXELS == 0,
            "sprite sheet length must be a multiple of the sprite size"
        );
        Self { pixels }
    }

    /// Number of sprites in the sheet.
    pub const fn len(&self) -> usize {
        self.pixels.len() / SPRITE_PIXELS
    }

    pub const fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<&'a [Color]> {
        let start = index as usize * SPRITE_PIXELS;
        self.pixels.get(start..start + SPRITE_PIXELS)
    }
}
