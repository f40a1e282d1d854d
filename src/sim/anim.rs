//! Walk animation state for the overworld player sprite.
//!
//! Pure data transform driven by the overworld update: a facing direction,
//! a cyclic frame index, and a timer. The renderer turns (facing, frame)
//! into a sprite lookup; nothing here touches textures.

use crate::consts::{WALK_FRAME_COUNT, WALK_FRAME_TIME};

/// Sprite facing for the 4-direction walk cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Facing derived from a movement vector. Horizontal wins when
    /// |dx| > |dy|, otherwise vertical (ties go vertical).
    pub fn from_move(dx: f32, dy: f32) -> Self {
        if dx.abs() > dy.abs() {
            if dx > 0.0 { Facing::Right } else { Facing::Left }
        } else if dy > 0.0 {
            Facing::Down
        } else {
            Facing::Up
        }
    }
}

/// Direction + frame index + timer driving sprite selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkAnim {
    pub facing: Facing,
    pub frame: u8,
    pub timer: f32,
    pub moving: bool,
}

impl WalkAnim {
    /// Advance the cycle. While moving the frame ticks over every
    /// [`WALK_FRAME_TIME`] seconds; idle snaps back to frame 0.
    pub fn advance(&mut self, dt: f32, moving: bool) {
        self.moving = moving;
        if moving {
            self.timer += dt;
            if self.timer >= WALK_FRAME_TIME {
                self.timer = 0.0;
                self.frame = (self.frame + 1) % WALK_FRAME_COUNT;
            }
        } else {
            self.frame = 0;
            self.timer = 0.0;
        }
    }

    /// Point the sprite along the current movement vector.
    pub fn face(&mut self, dx: f32, dy: f32) {
        self.facing = Facing::from_move(dx, dy);
    }
}
