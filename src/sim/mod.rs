//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Input sampled once per tick, delta time capped by the caller
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod anim;
pub mod battle;
pub mod rect;
pub mod state;
pub mod tick;

pub use anim::{Facing, WalkAnim};
pub use battle::HpAnim;
pub use rect::Rect;
pub use state::{Bullet, Encounter, Enemy, GameEvent, GameMode, GameState, Player, Soul};
pub use tick::tick;
