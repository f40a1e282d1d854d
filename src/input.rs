//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! The simulation never sees raw key codes. The shell samples its key states
//! once per frame into an [`InputSample`] keyed by logical action, and
//! [`ActionState`] derives edge information by comparing the current sample
//! against the previous frame's sample:
//!
//! - **Level-triggered (held):** true every frame the action's key is down.
//!   Used for continuous movement and the game-over restart key.
//! - **Edge-triggered (just_pressed):** true only on the first frame of a
//!   press. Used for menu navigation, confirm/cancel, and interaction.

/// Logical game actions, independent of physical key bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Interact,
    Confirm,
    Cancel,
    Restart,
}

impl Action {
    pub const COUNT: usize = 8;

    #[inline]
    fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
            Action::Interact => 4,
            Action::Confirm => 5,
            Action::Cancel => 6,
            Action::Restart => 7,
        }
    }
}

/// One frame's worth of sampled key-down states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSample {
    down: [bool; Action::COUNT],
}

impl InputSample {
    pub fn set(&mut self, action: Action, down: bool) {
        self.down[action.index()] = down;
    }

    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    #[inline]
    pub fn is_down(&self, action: Action) -> bool {
        self.down[action.index()]
    }
}

/// Current-vs-previous action state, rebuilt once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionState {
    now: InputSample,
    prev: InputSample,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install this frame's sample; the old current sample becomes `prev`.
    pub fn begin_frame(&mut self, sample: InputSample) {
        self.prev = self.now;
        self.now = sample;
    }

    #[inline]
    pub fn held(&self, action: Action) -> bool {
        self.now.is_down(action)
    }

    /// True only on the frame the action's key went down.
    #[inline]
    pub fn just_pressed(&self, action: Action) -> bool {
        self.now.is_down(action) && !self.prev.is_down(action)
    }

    /// Raw directional input as (x, y), one unit per held axis direction.
    /// Not normalized; callers that move entities normalize it themselves.
    pub fn move_axes(&self) -> (f32, f32) {
        let mut x = 0.0;
        let mut y = 0.0;
        if self.held(Action::Left) {
            x -= 1.0;
        }
        if self.held(Action::Right) {
            x += 1.0;
        }
        if self.held(Action::Up) {
            y -= 1.0;
        }
        if self.held(Action::Down) {
            y += 1.0;
        }
        (x, y)
    }
}
