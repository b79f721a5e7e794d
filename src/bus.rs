//! The display capabilities the compositor needs, and the uploads built on
//! top of them.

use log::trace;

use crate::color::Color;
use crate::compositor::TileBuffer;
use crate::config::{TILE_HEIGHT, TILE_PIXELS, TILE_WIDTH};

/// A display controller with an addressable write window.
///
/// After `set_window`, the pixels written inside one `begin`/`end` pair fill
/// the window row by row. Nothing else may be sent on the bus in between,
/// since the controller advances its write pointer with every pixel.
pub trait DisplayBus {
    type Error;

    /// Selects the inclusive rectangle `(x0, y0)..=(x1, y1)` for the next
    /// pixel stream.
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error>;

    fn begin(&mut self) -> Result<(), Self::Error>;

    fn write_pixels(&mut self, pixels: &[Color]) -> Result<(), Self::Error>;

    fn write_repeated(&mut self, color: Color, count: usize) -> Result<(), Self::Error> {
        let chunk = [color; 32];
        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(chunk.len());
            self.write_pixels(&chunk[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), Self::Error>;

    /// Runs `f` between `begin` and `end`. `end` is called even when `f`
    /// fails; the first error wins.
    fn transaction<F>(&mut self, f: F) -> Result<(), Self::Error>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<(), Self::Error>,
    {
        self.begin()?;
        let result = f(self);
        let end = self.end();
        result.and(end)
    }
}

impl<B: DisplayBus> DisplayBus for &mut B {
    type Error = B::Error;

    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error> {
        (**self).set_window(x0, y0, x1, y1)
    }

    fn begin(&mut self) -> Result<(), Self::Error> {
        (**self).begin()
    }

    fn write_pixels(&mut self, pixels: &[Color]) -> Result<(), Self::Error> {
        (**self).write_pixels(pixels)
    }

    fn write_repeated(&mut self, color: Color, count: usize) -> Result<(), Self::Error> {
        (**self).write_repeated(color, count)
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        (**self).end()
    }
}

/// Streams `pixels` into the `width` x `height` rectangle at `(x, y)`.
pub fn upload_rect<B: DisplayBus>(
    bus: &mut B,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    pixels: &[Color],
) -> Result<(), B::Error> {
    debug_assert_eq!(pixels.len(), width as usize * height as usize);
    bus.set_window(x, y, x + width - 1, y + height - 1)?;
    bus.transaction(|bus| bus.write_pixels(pixels))
}

pub fn upload_tile<B: DisplayBus>(
    bus: &mut B,
    buffer: &TileBuffer,
    x: u16,
    y: u16,
) -> Result<(), B::Error> {
    trace!(target: "compositor", "uploading tile at ({}, {})", x, y);
    upload_rect(bus, x, y, TILE_WIDTH, TILE_HEIGHT, buffer)
}

/// Fills a tile-sized rectangle with one color. Only used for diagnostics.
pub fn fill_tile<B: DisplayBus>(bus: &mut B, color: Color, x: u16, y: u16) -> Result<(), B::Error> {
    bus.set_window(x, y, x + TILE_WIDTH - 1, y + TILE_HEIGHT - 1)?;
    bus.transaction(|bus| bus.write_repeated(color, TILE_PIXELS))
}
