//! Moving sprites on an ST7735 TFT without redrawing the whole screen.
//!
//! The screen is split into tiles. Each frame, only the tiles whose content
//! changed (because a sprite moved, appeared or disappeared there) are
//! composited into a small buffer and streamed to the display.
//!
//! ```ignore
//! let mut display = RealtimeDisplay::new(St7735::new(spi, dc, cs), SpriteSheet::new(&SPRITES), Font::ascii());
//! *display.sprite_mut(0)? = Sprite::new(20, 30, 0);
//! display.render_frame()?;
//! ```
#![cfg_attr(not(test), no_std)]

pub mod animation;
pub mod animation_bounce;
pub mod animation_leaves;
pub mod bus;
pub mod color;
pub mod compositor;
pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod sprite;
pub mod st7735;
pub mod tiles;

pub use animation::Animation;
pub use bus::DisplayBus;
pub use color::Color;
pub use display::RealtimeDisplay;
pub use error::Error;
pub use font::{Font, GlyphStyle};
pub use sprite::{Sprite, SpriteSheet, SpriteStore};
pub use st7735::{St7735, St7735Error};
pub use tiles::DirtyTiles;
