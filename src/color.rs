/// A packed 5/6/5-bit RGB pixel as the ST7735 stores it.
///
/// The value is kept in host order; the bus transmits it most significant
/// byte first, see [`Color::to_be_bytes`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Color(u16);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    /// Packs 8-bit channels, dropping the low bits the display cannot show.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self((((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b >> 3) as u16))
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Loads a table entry that was byte-swapped ahead of time so that a
    /// little-endian memory dump goes out on the wire in display order.
    pub const fn from_swapped(swapped: u16) -> Self {
        Self(swapped.swap_bytes())
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Expands back to 8-bit channels. The truncated low bits read as zero.
    pub const fn unpack(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 11) & 0x1F) as u8;
        let g = ((self.0 >> 5) & 0x3F) as u8;
        let b = (self.0 & 0x1F) as u8;
        (r << 3, g << 2, b << 3)
    }

    /// The two bytes in the order they are shifted out to the display.
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

/// Converts an interleaved 24-bit RGB raw image into sprite pixels.
///
/// Returns the number of pixels written, which is limited by whichever of
/// `src` and `dst` runs out first. Trailing bytes that do not form a whole
/// pixel are ignored.
pub fn convert_rgb888(src: &[u8], dst: &mut [Color]) -> usize {
    let mut written = 0;
    for (rgb, pixel) in src.chunks_exact(3).zip(dst.iter_mut()) {
        *pixel = Color::rgb(rgb[0], rgb[1], rgb[2]);
        written += 1;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use rand_xoshiro::Xoshiro128StarStar;

    #[test]
    fn packs_channels_into_565() {
        assert_eq!(Color::BLACK.raw(), 0x0000);
        assert_eq!(Color::WHITE.raw(), 0xFFFF);
        assert_eq!(Color::RED.raw(), 0xF800);
        assert_eq!(Color::GREEN.raw(), 0x07E0);
        assert_eq!(Color::BLUE.raw(), 0x001F);
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).raw(), 0x11AA);
    }

    #[test]
    fn wire_order_is_big_endian() {
        assert_eq!(Color::RED.to_be_bytes(), [0xF8, 0x00]);
        assert_eq!(Color::BLUE.to_be_bytes(), [0x00, 0x1F]);
    }

    #[test]
    fn swapped_tables_load_unchanged() {
        // 0x00F8 is red as emitted by the byte-swapping image converter
        assert_eq!(Color::from_swapped(0x00F8), Color::RED);
        assert_eq!(Color::from_swapped(0x1F00), Color::BLUE);
    }

    #[test]
    fn unpack_recovers_each_truncated_channel() {
        for v in 0..=255u8 {
            assert_eq!(Color::rgb(v, 0, 0).unpack(), (v & 0xF8, 0, 0));
            assert_eq!(Color::rgb(0, v, 0).unpack(), (0, v & 0xFC, 0));
            assert_eq!(Color::rgb(0, 0, v).unpack(), (0, 0, v & 0xF8));
        }
    }

    #[test]
    fn unpack_round_trips_random_colors() {
        let mut rng = Xoshiro128StarStar::seed_from_u64(0x5EED_C0DE_0565_0565);
        for _ in 0..4096 {
            let [r, g, b, _] = rng.next_u32().to_le_bytes();
            assert_eq!(Color::rgb(r, g, b).unpack(), (r & 0xF8, g & 0xFC, b & 0xF8));
        }
    }

    #[test]
    fn converts_raw_images() {
        let raw = [255, 0, 0, 0, 255, 0, 0, 0, 255, 7];
        let mut pixels = [Color::BLACK; 4];
        assert_eq!(convert_rgb888(&raw, &mut pixels), 3);
        assert_eq!(pixels, [Color::RED, Color::GREEN, Color::BLUE, Color::BLACK]);

        let mut short = [Color::BLACK; 1];
        assert_eq!(convert_rgb888(&raw, &mut short), 1);
    }
}
