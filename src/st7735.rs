//! [`DisplayBus`] for a Sitronix ST7735 on a 4-wire SPI bus, with manual
//! data/command and chip select lines.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::bus::DisplayBus;
use crate::color::Color;

const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVOFF: u8 = 0x20;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

/// Row/column exchange plus column mirror: 160x128 landscape.
pub const MADCTL_LANDSCAPE: u8 = 0x60;
const COLMOD_16BIT: u8 = 0x05;

// Pixels converted to bytes per SPI write
const CHUNK_PIXELS: usize = 32;

#[derive(Debug, PartialEq, Eq)]
pub enum St7735Error<SpiE, PinE> {
    Spi(SpiE),
    Pin(PinE),
}

pub struct St7735<SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
    x_offset: u16,
    y_offset: u16,
}

impl<SPI, DC, CS> St7735<SPI, DC, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin<Error = DC::Error>,
{
    pub fn new(spi: SPI, dc: DC, cs: CS) -> Self {
        Self {
            spi,
            dc,
            cs,
            x_offset: 0,
            y_offset: 0,
        }
    }

    /// Shifts all windows by the panel's RAM offset. Some panels do not
    /// start at controller column/row 0.
    pub fn with_offset(mut self, x_offset: u16, y_offset: u16) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    /// Wakes the controller up and configures 16-bit landscape mode.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), St7735Error<SPI::Error, DC::Error>> {
        self.cs.set_high().map_err(St7735Error::Pin)?;

        self.command(SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(SLPOUT, &[])?;
        delay.delay_ms(255);
        self.command(COLMOD, &[COLMOD_16BIT])?;
        delay.delay_ms(10);
        self.command(MADCTL, &[MADCTL_LANDSCAPE])?;
        self.command(INVOFF, &[])?;
        self.command(NORON, &[])?;
        delay.delay_ms(10);
        self.command(DISPON, &[])?;
        delay.delay_ms(100);
        Ok(())
    }

    pub fn release(self) -> (SPI, DC, CS) {
        (self.spi, self.dc, self.cs)
    }

    /// Sends one command byte followed by its parameters as a transaction.
    pub fn command(&mut self, cmd: u8, params: &[u8]) -> Result<(), St7735Error<SPI::Error, DC::Error>> {
        self.cs.set_low().map_err(St7735Error::Pin)?;
        let result = self.command_selected(cmd, params);
        self.cs.set_high().map_err(St7735Error::Pin)?;
        result
    }

    fn command_selected(&mut self, cmd: u8, params: &[u8]) -> Result<(), St7735Error<SPI::Error, DC::Error>> {
        self.dc.set_low().map_err(St7735Error::Pin)?;
        self.spi.write(&[cmd]).map_err(St7735Error::Spi)?;
        self.spi.flush().map_err(St7735Error::Spi)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(St7735Error::Pin)?;
            self.spi.write(params).map_err(St7735Error::Spi)?;
            self.spi.flush().map_err(St7735Error::Spi)?;
        }
        Ok(())
    }
}

fn address_range(start: u16, end: u16) -> [u8; 4] {
    let [s0, s1] = start.to_be_bytes();
    let [e0, e1] = end.to_be_bytes();
    [s0, s1, e0, e1]
}

impl<SPI, DC, CS> DisplayBus for St7735<SPI, DC, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin<Error = DC::Error>,
{
    type Error = St7735Error<SPI::Error, DC::Error>;

    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error> {
        self.command(CASET, &address_range(x0 + self.x_offset, x1 + self.x_offset))?;
        self.command(RASET, &address_range(y0 + self.y_offset, y1 + self.y_offset))?;
        self.command(RAMWR, &[])
    }

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(St7735Error::Pin)?;
        self.cs.set_low().map_err(St7735Error::Pin)
    }

    fn write_pixels(&mut self, pixels: &[Color]) -> Result<(), Self::Error> {
        let mut bytes = [0u8; CHUNK_PIXELS * 2];
        for chunk in pixels.chunks(CHUNK_PIXELS) {
            for (pixel, out) in chunk.iter().zip(bytes.chunks_exact_mut(2)) {
                out.copy_from_slice(&pixel.to_be_bytes());
            }
            self.spi.write(&bytes[..chunk.len() * 2]).map_err(St7735Error::Spi)?;
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), Self::Error> {
        let flushed = self.spi.flush().map_err(St7735Error::Spi);
        self.cs.set_high().map_err(St7735Error::Pin)?;
        flushed
    }
}
