use crate::animation::Animation;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_HEIGHT, SPRITE_WIDTH};
use crate::sprite::{Sprite, SpriteStore};

use fugit::MicrosDurationU32;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;

/// Sprites drifting down from the top edge, one new leaf in every other frame.
pub struct FallingLeaves {
    rng: Xoshiro128StarStar,
    /// Number of sprites in the sheet to pick leaves from
    kinds: u8,
}

impl FallingLeaves {
    pub fn new(kinds: u8) -> Self {
        Self {
            rng: Xoshiro128StarStar::seed_from_u64(0x9C63_EA21_046B_F751),
            kinds: kinds.max(1),
        }
    }

    fn fall(leaf: &mut Sprite, r: u32) {
        let t = (r & 0b111) as u8;
        let dx = match t {
            0..=4 => 1, // 5/8 chance to go right
            5 => -1,    // 1/8 chance to go left
            _ => 0,     // 2/8 chance to not move horizontally
        };
        leaf.move_by(dx, 2);
        // wrap around horizontally
        if leaf.x >= SCREEN_WIDTH as i16 {
            leaf.x = -(SPRITE_WIDTH as i16) + 1;
        } else if leaf.x <= -(SPRITE_WIDTH as i16) {
            leaf.x = SCREEN_WIDTH as i16 - 1;
        }
        if leaf.y >= SCREEN_HEIGHT as i16 {
            leaf.active = false;
        }
    }
}

impl Animation for FallingLeaves {
    fn step(&mut self, sprites: &mut SpriteStore) -> MicrosDurationU32 {
        // Move all existing leaves
        for leaf in sprites.iter_mut() {
            if leaf.active {
                Self::fall(leaf, self.rng.next_u32());
            }
        }

        // Spawn new leaf in 1/2 of cases
        if (self.rng.next_u32() & 0b1) == 0 {
            if let Some(leaf) = sprites.iter_mut().find(|leaf| !leaf.active) {
                let r = self.rng.next_u32();
                let x = (r % (SCREEN_WIDTH - SPRITE_WIDTH) as u32) as i16;
                let kind = ((r >> 16) % self.kinds as u32) as u8;
                *leaf = Sprite::new(x, -(SPRITE_HEIGHT as i16), kind);
            }
        }

        MicrosDurationU32::millis(40)
    }
}
