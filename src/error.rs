use core::fmt;

use crate::compositor::UnknownSprite;

/// Errors of the frame driver, generic over the error type of the bus.
#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus failed; passed through untouched.
    Bus(E),
    SlotOutOfRange(usize),
    /// An active sprite uses an index the sprite sheet does not have.
    UnknownSprite(u8),
    /// The font has no glyph for this character.
    UnknownGlyph(u8),
    GlyphOffScreen { row: u8, col: u8 },
}

impl<E> From<UnknownSprite> for Error<E> {
    fn from(e: UnknownSprite) -> Self {
        Self::UnknownSprite(e.0)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "display bus error: {:?}", e),
            Error::SlotOutOfRange(slot) => write!(f, "sprite slot {} is out of range", slot),
            Error::UnknownSprite(index) => write!(f, "sprite index {} is not in the sprite sheet", index),
            Error::UnknownGlyph(ch) => write!(f, "no glyph for character 0x{:02X}", ch),
            Error::GlyphOffScreen { row, col } => {
                write!(f, "glyph cell at row {}, column {} is off-screen", row, col)
            }
        }
    }
}
