use crate::sprite::SpriteStore;

use fugit::MicrosDurationU32;

pub trait Animation {
    /// Moves the sprites to their next position and returns the duration this frame should be displayed for.
    ///
    /// Only touch the sprites that actually move: slots left unchanged cost nothing in the next `render_frame()`.
    fn step(&mut self, sprites: &mut SpriteStore) -> MicrosDurationU32;
}
