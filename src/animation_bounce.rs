use crate::animation::Animation;
use crate::config::{MAX_SPRITES, SCREEN_HEIGHT, SCREEN_WIDTH, SPRITE_HEIGHT, SPRITE_WIDTH};
use crate::sprite::{Sprite, SpriteStore};

use fugit::MicrosDurationU32;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoroshiro128StarStar;

const MAX_X: i16 = (SCREEN_WIDTH - SPRITE_WIDTH) as i16;
const MAX_Y: i16 = (SCREEN_HEIGHT - SPRITE_HEIGHT) as i16;

#[derive(Clone, Copy)]
struct Velocity {
    dx: i16,
    dy: i16,
}

impl Velocity {
    const fn new() -> Self {
        Self { dx: 0, dy: 0 }
    }

    fn init(&mut self, r: u32) {
        // 1..=3 pixels per frame in a random direction
        self.dx = (r & 0b11) as i16 % 3 + 1;
        self.dy = ((r >> 2) & 0b11) as i16 % 3 + 1;
        if r & 0x10 != 0 {
            self.dx = -self.dx;
        }
        if r & 0x20 != 0 {
            self.dy = -self.dy;
        }
    }
}

/// Every sprite slot in use, each bouncing off the screen edges.
pub struct BouncingSprites {
    rng: Xoroshiro128StarStar,
    velocities: [Velocity; MAX_SPRITES],
    kinds: u8,
    started: bool,
}

impl BouncingSprites {
    pub fn new(kinds: u8) -> Self {
        Self {
            rng: Xoroshiro128StarStar::seed_from_u64(0xC063_7BB4_8326_CD62),
            velocities: [Velocity::new(); MAX_SPRITES],
            kinds: kinds.max(1),
            started: false,
        }
    }

    fn start(&mut self, sprites: &mut SpriteStore) {
        for (slot, (sprite, velocity)) in sprites.iter_mut().zip(self.velocities.iter_mut()).enumerate() {
            let r = self.rng.next_u32();
            let x = (r % (MAX_X as u32 + 1)) as i16;
            let y = ((r >> 16) % (MAX_Y as u32 + 1)) as i16;
            *sprite = Sprite::new(x, y, slot as u8 % self.kinds);
            velocity.init(self.rng.next_u32());
        }
        self.started = true;
    }
}

fn bounce(position: i16, speed: &mut i16, max: i16) -> i16 {
    let next = position + *speed;
    if next < 0 {
        *speed = -*speed;
        -next
    } else if next > max {
        *speed = -*speed;
        2 * max - next
    } else {
        next
    }
}

impl Animation for BouncingSprites {
    fn step(&mut self, sprites: &mut SpriteStore) -> MicrosDurationU32 {
        if !self.started {
            self.start(sprites);
            return MicrosDurationU32::millis(20);
        }

        for (sprite, velocity) in sprites.iter_mut().zip(self.velocities.iter_mut()) {
            if !sprite.active {
                continue;
            }
            let x = bounce(sprite.x, &mut velocity.dx, MAX_X);
            let y = bounce(sprite.y, &mut velocity.dy, MAX_Y);
            sprite.move_to(x, y);
        }

        MicrosDurationU32::millis(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_activates_every_slot() {
        let mut sprites = SpriteStore::new();
        let mut bouncing = BouncingSprites::new(2);
        bouncing.step(&mut sprites);
        assert!(sprites.iter().all(|s| s.active && s.index < 2));
        assert!(bouncing.velocities.iter().all(|v| v.dx != 0 && v.dy != 0));
    }

    #[test]
    fn sprites_stay_on_screen() {
        let mut sprites = SpriteStore::new();
        let mut bouncing = BouncingSprites::new(1);
        for _ in 0..2000 {
            bouncing.step(&mut sprites);
            for sprite in sprites.iter() {
                assert!((0..=MAX_X).contains(&sprite.x), "x = {}", sprite.x);
                assert!((0..=MAX_Y).contains(&sprite.y), "y = {}", sprite.y);
            }
        }
    }

    #[test]
    fn bounce_reflects_at_the_edges() {
        let mut speed = -3;
        assert_eq!(bounce(1, &mut speed, 10), 2);
        assert_eq!(speed, 3);
        assert_eq!(bounce(9, &mut speed, 10), 8);
        assert_eq!(speed, -3);
        assert_eq!(bounce(5, &mut speed, 10), 2);
    }

    #[test]
    fn hidden_sprites_stay_put() {
        let mut sprites = SpriteStore::new();
        let mut bouncing = BouncingSprites::new(1);
        bouncing.step(&mut sprites);
        sprites[4].active = false;
        let parked = sprites[4];
        bouncing.step(&mut sprites);
        assert_eq!(sprites[4], parked);
    }
}
