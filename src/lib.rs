//! Soulbox - a top-down overworld with turn-based bullet-hell encounters
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state machine, battle physics, entities)
//! - `input`: Logical-action input state with edge detection
//! - `render`: Semantic draw-command generation per mode
//! - `audio`: Background-track director and one-shot cues
//! - `settings`: Persisted preferences

pub mod audio;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Room / window dimensions in pixels
    pub const ROOM_W: f32 = 900.0;
    pub const ROOM_H: f32 = 520.0;
    /// Thickness of the boundary walls
    pub const WALL_THICKNESS: f32 = 30.0;

    /// Largest frame delta the simulation will accept (avoids large-step
    /// artifacts on frame hitches)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Player defaults (overworld)
    pub const PLAYER_SIZE: f32 = 28.0;
    pub const PLAYER_SPEED: f32 = 220.0;
    pub const PLAYER_START_X: f32 = 120.0;
    pub const PLAYER_START_Y: f32 = 260.0;
    /// Walk cycle: seconds per frame
    pub const WALK_FRAME_TIME: f32 = 0.10;
    pub const WALK_FRAME_COUNT: u8 = 4;

    /// Encounter trigger zone
    pub const TRIGGER_X: f32 = 640.0;
    pub const TRIGGER_Y: f32 = 250.0;
    pub const TRIGGER_W: f32 = 80.0;
    pub const TRIGGER_H: f32 = 80.0;

    /// Battle box (the soul's arena)
    pub const BOX_X: f32 = 260.0;
    pub const BOX_Y: f32 = 140.0;
    pub const BOX_W: f32 = 380.0;
    pub const BOX_H: f32 = 240.0;

    /// Soul defaults (battle avatar)
    pub const SOUL_SIZE: f32 = 14.0;
    pub const SOUL_SPEED: f32 = 260.0;
    pub const SOUL_MAX_HP: i32 = 20;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 6.0;
    pub const BULLET_DAMAGE: i32 = 5;
    /// How far below the box a bullet may fall before it is culled
    pub const BULLET_CULL_MARGIN: f32 = 40.0;
    /// Horizontal margin kept clear at both ends of the spawn span
    pub const SPAWN_MARGIN: f32 = 12.0;
    /// Bullets spawn this far above the box top edge
    pub const SPAWN_HEIGHT: f32 = 10.0;

    /// Stage 1: one bullet per interval, slower fall
    pub const STAGE1_SPAWN_INTERVAL: f32 = 0.25;
    pub const STAGE1_SPEED_MIN: f32 = 260.0;
    pub const STAGE1_SPEED_MAX: f32 = 400.0;
    /// Stage 2: two bullets per interval, faster fall
    pub const STAGE2_SPAWN_INTERVAL: f32 = 0.18;
    pub const STAGE2_SPEED_MIN: f32 = 320.0;
    pub const STAGE2_SPEED_MAX: f32 = 500.0;

    /// Seconds of bullet-dodging before the attack turn
    pub const BATTLE_PHASE_LEN: f32 = 12.0;
    /// Invulnerability window after taking a hit
    pub const INVULN_TIME: f32 = 0.6;

    /// Enemy stats
    pub const ENEMY_MAX_HP: i32 = 100;
    pub const ATTACK_DAMAGE: i32 = 70;

    /// Soul fly-in transition duration
    pub const FLY_IN_DUR: f32 = 1.5;
    /// Displayed-HP easing duration on the damage screen
    pub const HP_ANIM_DUR: f32 = 1.7;
    /// Auto-advance delay on the defeat screen
    pub const DEFEAT_DELAY: f32 = 1.5;
}

/// Smoothstep easing over a normalized parameter, clamped to [0, 1]
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
