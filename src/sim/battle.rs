//! Battle subsystem: bullet spawning, integration, soul damage, and the
//! animated enemy-HP readout.
//!
//! Owns the lifecycle of the live bullet collection and the soul's
//! damage/invulnerability policy. The collision pass is single-hit-per-tick:
//! the scan stops at the first overlapping bullet, so simultaneous overlaps
//! never stack damage.

use glam::Vec2;
use rand::Rng;

use super::state::{Bullet, GameEvent, GameState};
use crate::consts::*;
use crate::smoothstep;

/// Displayed enemy HP for the damage screen. Interpolated only; the
/// authoritative counter on [`super::state::Enemy`] is updated immediately
/// when the attack lands.
#[derive(Debug, Clone, Copy)]
pub struct HpAnim {
    pub shown: f32,
    pub from: f32,
    pub to: f32,
    pub elapsed: f32,
}

impl HpAnim {
    /// A non-animating readout pinned at `value`.
    pub fn steady(value: f32) -> Self {
        Self {
            shown: value,
            from: value,
            to: value,
            elapsed: 0.0,
        }
    }

    /// Start easing from the currently shown value toward `to`.
    pub fn retarget(&mut self, to: f32) {
        self.from = self.shown;
        self.to = to;
        self.elapsed = 0.0;
    }

    /// Advance the easing; returns true once the animation has finished.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        let t = (self.elapsed / HP_ANIM_DUR).clamp(0.0, 1.0);
        self.shown = self.from + (self.to - self.from) * smoothstep(t);
        t >= 1.0
    }

    /// Snap the readout to its target (on early confirm).
    pub fn finish(&mut self) {
        self.shown = self.to;
    }
}

/// Emit new bullets along the top edge of the battle box at the current
/// stage's cadence. Spawn x is uniform across the box span minus a fixed
/// margin; fall speed is uniform within the stage's range.
pub fn spawn_bullets(state: &mut GameState, dt: f32) {
    state.spawn_timer += dt;

    let (interval, count, speed_min, speed_max) = if state.battle_stage == 1 {
        (STAGE1_SPAWN_INTERVAL, 1, STAGE1_SPEED_MIN, STAGE1_SPEED_MAX)
    } else {
        (STAGE2_SPAWN_INTERVAL, 2, STAGE2_SPEED_MIN, STAGE2_SPEED_MAX)
    };

    if state.spawn_timer < interval {
        return;
    }
    state.spawn_timer = 0.0;

    let min_x = state.battle_box.left() + SPAWN_MARGIN;
    let max_x = state.battle_box.right() - SPAWN_MARGIN;
    let spawn_y = state.battle_box.top() - SPAWN_HEIGHT;

    for _ in 0..count {
        let x = state.rng.random_range(min_x..max_x);
        let vy = state.rng.random_range(speed_min..speed_max);
        state.bullets.push(Bullet {
            pos: Vec2::new(x, spawn_y),
            vel: Vec2::new(0.0, vy),
            radius: BULLET_RADIUS,
            alive: true,
        });
    }
}

/// Integrate every live bullet and compact away the ones that have fallen
/// past the bottom of the battle box.
pub fn integrate_bullets(state: &mut GameState, dt: f32) {
    let cull_y = state.battle_box.bottom() + BULLET_CULL_MARGIN;
    for bullet in &mut state.bullets {
        bullet.update(dt);
        if bullet.pos.y > cull_y {
            bullet.alive = false;
        }
    }
    state.bullets.retain(|b| b.alive);
}

/// Count down the invulnerability window.
pub fn update_invuln(state: &mut GameState, dt: f32) {
    if state.soul.invuln {
        state.soul.invuln_timer -= dt;
        if state.soul.invuln_timer <= 0.0 {
            state.soul.clear_invuln();
        }
    }
}

/// Scan live bullets against the soul hitbox. At most one hit is applied
/// per tick; a hit deals fixed damage and opens the invulnerability window.
pub fn resolve_soul_hits(state: &mut GameState) {
    if state.soul.invuln {
        return;
    }
    let soul_box = state.soul.hitbox();
    for bullet in &state.bullets {
        if soul_box.intersects(&bullet.hitbox()) {
            state.soul.hp = (state.soul.hp - BULLET_DAMAGE).max(0);
            state.soul.invuln = true;
            state.soul.invuln_timer = INVULN_TIME;
            state.events.push(GameEvent::SoulHurt { hp: state.soul.hp });
            break;
        }
    }
}
