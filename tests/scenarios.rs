use std::collections::BTreeSet;

use realtime_st7735::compositor::{render_tile, TileBuffer};
use realtime_st7735::config::{
    SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_HEIGHT, SPRITE_PIXELS, SPRITE_WIDTH, TILES_PER_ROW,
    TILE_COUNT, TILE_HEIGHT, TILE_PIXELS, TILE_WIDTH,
};
use realtime_st7735::{Color, DirtyTiles, DisplayBus, Font, RealtimeDisplay, Sprite, SpriteSheet};

const BACKGROUND: Color = Color::rgb(0x20, 0x40, 0x60);

/// Remembers which tiles were uploaded and what landed on screen.
struct TileLog {
    uploads: Vec<usize>,
    screen: Vec<Color>,
    window: (u16, u16, u16, u16),
    cursor: (u16, u16),
}

impl TileLog {
    fn new() -> Self {
        Self {
            uploads: Vec::new(),
            screen: vec![Color::BLACK; SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize],
            window: (0, 0, 0, 0),
            cursor: (0, 0),
        }
    }

    fn uploaded(&mut self) -> BTreeSet<usize> {
        self.uploads.drain(..).collect()
    }

    fn pixel(&self, x: u16, y: u16) -> Color {
        self.screen[y as usize * SCREEN_WIDTH as usize + x as usize]
    }
}

impl DisplayBus for TileLog {
    type Error = ();

    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), ()> {
        assert_eq!((x1 - x0 + 1, y1 - y0 + 1), (TILE_WIDTH, TILE_HEIGHT));
        self.uploads.push(DirtyTiles::tile_index(x0 as i32, y0 as i32));
        self.window = (x0, y0, x1, y1);
        self.cursor = (x0, y0);
        Ok(())
    }

    fn begin(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn write_pixels(&mut self, pixels: &[Color]) -> Result<(), ()> {
        for &pixel in pixels {
            let (x, y) = self.cursor;
            self.screen[y as usize * SCREEN_WIDTH as usize + x as usize] = pixel;
            self.cursor = if x == self.window.2 { (self.window.0, y + 1) } else { (x + 1, y) };
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// Sprite 0 is a gradient so misplaced rows or columns show up, sprite 1
/// is solid white.
static SHEET: [Color; 2 * SPRITE_PIXELS] = {
    let mut pixels = [Color::WHITE; 2 * SPRITE_PIXELS];
    let mut i = 0;
    while i < SPRITE_PIXELS {
        pixels[i] = Color::rgb((i * 4) as u8, 255 - (i * 4) as u8, 0x80);
        i += 1;
    }
    pixels
};

fn gradient(x: usize, y: usize) -> Color {
    SHEET[y * SPRITE_WIDTH as usize + x]
}

/// A display that has already drawn its first full frame.
fn settled() -> RealtimeDisplay<'static, TileLog> {
    let mut display = RealtimeDisplay::new(TileLog::new(), SpriteSheet::new(&SHEET), Font::ascii());
    display.set_background(BACKGROUND);
    assert_eq!(display.render_frame(), Ok(TILE_COUNT));
    display.bus_mut().uploads.clear();
    display
}

fn set(tiles: &[usize]) -> BTreeSet<usize> {
    tiles.iter().copied().collect()
}

#[test]
fn unchanged_frames_upload_nothing() {
    let mut display = settled();
    *display.sprite_mut(0).unwrap() = Sprite::new(50, 60, 0);
    display.render_frame().unwrap();
    display.bus_mut().uploads.clear();

    assert_eq!(display.render_frame(), Ok(0));
    assert_eq!(display.render_frame(), Ok(0));
    assert!(display.bus().uploads.is_empty());
}

#[test]
fn scenario_a_activating_a_sprite_redraws_one_tile() {
    let mut display = settled();
    *display.sprite_mut(0).unwrap() = Sprite::new(0, 0, 0);
    assert_eq!(display.render_frame(), Ok(1));
    assert_eq!(display.bus_mut().uploaded(), set(&[0]));

    let log = display.bus();
    for y in 0..TILE_HEIGHT {
        for x in 0..TILE_WIDTH {
            let expected = if x < SPRITE_WIDTH && y < SPRITE_HEIGHT {
                gradient(x as usize, y as usize)
            } else {
                BACKGROUND
            };
            assert_eq!(log.pixel(x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn scenario_b_moving_across_a_tile_corner() {
    let mut display = settled();
    *display.sprite_mut(0).unwrap() = Sprite::new(0, 0, 0);
    display.render_frame().unwrap();
    display.bus_mut().uploads.clear();

    display.sprite_mut(0).unwrap().move_to(15, 15);
    assert_eq!(display.render_frame(), Ok(4));
    assert_eq!(display.bus_mut().uploaded(), set(&[0, 1, 10, 11]));

    let log = display.bus();
    assert_eq!(log.pixel(0, 0), BACKGROUND);
    assert_eq!(log.pixel(14, 14), BACKGROUND);
    assert_eq!(log.pixel(15, 15), gradient(0, 0));
    assert_eq!(log.pixel(16, 15), gradient(1, 0));
    assert_eq!(log.pixel(15, 16), gradient(0, 1));
    assert_eq!(log.pixel(22, 22), gradient(7, 7));
    assert_eq!(log.pixel(23, 23), BACKGROUND);
}

#[test]
fn scenario_c_deactivating_erases_the_footprint() {
    let mut display = settled();
    *display.sprite_mut(0).unwrap() = Sprite::new(15, 15, 0);
    display.render_frame().unwrap();
    display.bus_mut().uploads.clear();

    display.sprite_mut(0).unwrap().active = false;
    assert_eq!(display.render_frame(), Ok(4));
    assert_eq!(display.bus_mut().uploaded(), set(&[0, 1, 10, 11]));

    let log = display.bus();
    for y in 0..2 * TILE_HEIGHT {
        for x in 0..2 * TILE_WIDTH {
            assert_eq!(log.pixel(x, y), BACKGROUND, "pixel ({x}, {y})");
        }
    }

    // an inactive sprite can move around without costing anything
    display.sprite_mut(0).unwrap().move_to(100, 100);
    assert_eq!(display.render_frame(), Ok(0));
}

#[test]
fn scenario_d_higher_slots_are_drawn_on_top() {
    let mut display = settled();
    *display.sprite_mut(2).unwrap() = Sprite::new(20, 20, 0);
    *display.sprite_mut(5).unwrap() = Sprite::new(24, 24, 1);
    assert_eq!(display.render_frame(), Ok(1));

    let log = display.bus();
    assert_eq!(log.pixel(23, 23), gradient(3, 3));
    assert_eq!(log.pixel(24, 24), Color::WHITE);
    assert_eq!(log.pixel(27, 27), Color::WHITE);
    assert_eq!(log.pixel(27, 20), gradient(7, 0));
    assert_eq!(log.pixel(31, 31), Color::WHITE);
}

#[test]
fn footprint_matches_the_overlapped_tiles() {
    let positions = [
        (0, 0),
        (8, 8),
        (12, 3),
        (3, 12),
        (9, 9),
        (40, 17),
        (151, 119),
        (152, 120),
        (-4, -4),
        (156, -4),
        (-4, 124),
        (156, 124),
        (-7, 60),
        (80, 127),
    ];
    for (x, y) in positions {
        let mut display = settled();
        *display.sprite_mut(1).unwrap() = Sprite::new(x, y, 0);
        display.render_frame().unwrap();

        // every tile with at least one on-screen sprite pixel
        let mut expected = BTreeSet::new();
        for py in y..y + SPRITE_HEIGHT as i16 {
            for px in x..x + SPRITE_WIDTH as i16 {
                if (0..SCREEN_WIDTH as i16).contains(&px) && (0..SCREEN_HEIGHT as i16).contains(&py) {
                    expected.insert(
                        py as usize / TILE_HEIGHT as usize * TILES_PER_ROW + px as usize / TILE_WIDTH as usize,
                    );
                }
            }
        }
        assert!(expected.len() <= 4);
        assert_eq!(display.bus_mut().uploaded(), expected, "sprite at ({x}, {y})");
    }
}

#[test]
fn clipped_sprites_show_exactly_their_visible_part() {
    for (x, y) in [(-3, -5), (155, -2), (-6, 123), (157, 126), (-8, -8), (160, 128)] {
        let mut display = settled();
        *display.sprite_mut(0).unwrap() = Sprite::new(x, y, 0);
        display.render_frame().unwrap();

        let log = display.bus();
        for sy in 0..SCREEN_HEIGHT {
            for sx in 0..SCREEN_WIDTH {
                let (dx, dy) = (sx as i32 - x as i32, sy as i32 - y as i32);
                let inside = (0..SPRITE_WIDTH as i32).contains(&dx) && (0..SPRITE_HEIGHT as i32).contains(&dy);
                let expected = if inside {
                    gradient(dx as usize, dy as usize)
                } else {
                    BACKGROUND
                };
                assert_eq!(log.pixel(sx, sy), expected, "sprite at ({x}, {y}), pixel ({sx}, {sy})");
            }
        }
    }
}

#[test]
fn tile_buffer_can_be_reused_between_tiles() {
    let sheet = SpriteSheet::new(&SHEET);
    let sprites = [Sprite::new(12, 4, 1)];
    let mut buffer: TileBuffer = [Color::BLACK; TILE_PIXELS];

    render_tile(&mut buffer, 0, 0, BACKGROUND, &sprites, &sheet).unwrap();
    assert_eq!(buffer.iter().filter(|&&p| p == Color::WHITE).count(), 4 * 8);

    render_tile(&mut buffer, 16, 0, BACKGROUND, &sprites, &sheet).unwrap();
    assert_eq!(buffer.iter().filter(|&&p| p == Color::WHITE).count(), 4 * 8);

    render_tile(&mut buffer, 32, 0, BACKGROUND, &sprites, &sheet).unwrap();
    assert!(buffer.iter().all(|&p| p == BACKGROUND));
}
