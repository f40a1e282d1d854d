//! Game state and core simulation types
//!
//! The complete mutable state bundle lives here. Mode handlers in `tick`
//! receive it by `&mut`, so tests can construct fixtures directly instead of
//! reaching for globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::anim::WalkAnim;
use super::battle::HpAnim;
use super::rect::Rect;
use crate::consts::*;

/// The system's primary control state. Exactly one value is active at a
/// time, and only the state machine reads and writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Free top-down movement between walls
    Overworld,
    /// "Walk away / Attack" choice after interacting with the enemy
    EncounterMenu,
    /// Soul flies from the player's position to the battle box center
    SoulFlyIn,
    /// Real-time bullet dodging inside the battle box
    Battle,
    /// Turn-based attack resolution (confirm to strike, cancel to flee)
    AttackTurn,
    /// Damage readout with the animated enemy HP bar
    DamageMsg,
    /// Enemy HP hit zero; brief pause before the victory screen
    EnemyDefeated,
    Victory,
    GameOver,
}

/// Semantic events drained by the shell each frame for logging and cues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ModeChanged(GameMode),
    /// Soul took bullet damage; carries remaining hp
    SoulHurt { hp: i32 },
    /// The player's attack landed; carries damage dealt and remaining hp
    EnemyHit { damage: i32, hp: i32 },
    /// Entered the damage screen; the shell plays the hp-down cue once
    DamageCue,
    /// Enemy defeated; the encounter trigger is now permanently inactive
    EncounterCleared,
}

/// Overworld avatar.
#[derive(Debug, Clone, Copy)]
pub struct Player {
    /// Top-left of the collision hitbox
    pub pos: Vec2,
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            speed: PLAYER_SPEED,
        }
    }
}

impl Player {
    pub fn hitbox(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(PLAYER_SIZE))
    }

    pub fn hitbox_at(pos: Vec2) -> Rect {
        Rect::from_pos_size(pos, Vec2::splat(PLAYER_SIZE))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(PLAYER_SIZE * 0.5)
    }
}

/// Battle avatar.
#[derive(Debug, Clone, Copy)]
pub struct Soul {
    /// Top-left of the soul hitbox
    pub pos: Vec2,
    pub speed: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub invuln: bool,
    pub invuln_timer: f32,
}

impl Default for Soul {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            speed: SOUL_SPEED,
            hp: SOUL_MAX_HP,
            max_hp: SOUL_MAX_HP,
            invuln: false,
            invuln_timer: 0.0,
        }
    }
}

impl Soul {
    pub fn hitbox(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(SOUL_SIZE))
    }

    pub fn clear_invuln(&mut self) {
        self.invuln = false;
        self.invuln_timer = 0.0;
    }
}

/// A falling projectile, owned by the battle subsystem's live collection.
#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

impl Bullet {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Axis-aligned bounding box used for soul collision.
    pub fn hitbox(&self) -> Rect {
        Rect::from_pos_size(self.pos - Vec2::splat(self.radius), Vec2::splat(self.radius * 2.0))
    }
}

/// The single hard-coded encounter: a trigger zone that stays inactive for
/// the rest of the session once the enemy is defeated.
#[derive(Debug, Clone, Copy)]
pub struct Encounter {
    pub trigger: Rect,
    pub active: bool,
}

impl Default for Encounter {
    fn default() -> Self {
        Self {
            trigger: Rect::new(TRIGGER_X, TRIGGER_Y, TRIGGER_W, TRIGGER_H),
            active: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    pub hp: i32,
    pub max_hp: i32,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            hp: ENEMY_MAX_HP,
            max_hp: ENEMY_MAX_HP,
        }
    }
}

/// Interpolation state for the soul's fly-in transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlyIn {
    pub start: Vec2,
    pub target: Vec2,
    /// Elapsed seconds; normalized against `FLY_IN_DUR`
    pub elapsed: f32,
}

/// Complete game state bundle, owned exclusively by the main loop.
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: GameMode,
    pub player: Player,
    pub walk: WalkAnim,
    pub walls: Vec<Rect>,
    pub encounter: Encounter,
    pub battle_box: Rect,
    pub soul: Soul,
    pub bullets: Vec<Bullet>,
    pub enemy: Enemy,
    /// 1 = first defense, 2 = escalated defense after the first hit
    pub battle_stage: u8,
    /// Elapsed seconds in the current battle phase
    pub battle_time: f32,
    pub spawn_timer: f32,
    pub fly_in: FlyIn,
    pub hp_anim: HpAnim,
    /// 0 = walk away, 1 = attack
    pub menu_index: usize,
    pub defeat_timer: f32,
    pub last_damage: i32,
    /// One-shot gate for the hp-down cue on the damage screen
    pub hp_cue_played: bool,
    /// Events accumulated this tick, drained by the shell
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    pub seed: u64,
}

impl GameState {
    /// Create a fresh game in the overworld with the given RNG seed.
    pub fn new(seed: u64) -> Self {
        Self {
            mode: GameMode::Overworld,
            player: Player::default(),
            walk: WalkAnim::default(),
            walls: room_walls(),
            encounter: Encounter::default(),
            battle_box: Rect::new(BOX_X, BOX_Y, BOX_W, BOX_H),
            soul: Soul::default(),
            bullets: Vec::new(),
            enemy: Enemy::default(),
            battle_stage: 1,
            battle_time: 0.0,
            spawn_timer: 0.0,
            fly_in: FlyIn::default(),
            hp_anim: HpAnim::steady(ENEMY_MAX_HP as f32),
            menu_index: 0,
            defeat_timer: 0.0,
            last_damage: 0,
            hp_cue_played: false,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Switch modes, recording the transition for the shell.
    pub fn set_mode(&mut self, mode: GameMode) {
        if self.mode != mode {
            log::debug!("mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
            self.events.push(GameEvent::ModeChanged(mode));
        }
    }

    /// Soul top-left that centers its hitbox in the battle box.
    pub fn soul_center_pos(&self) -> Vec2 {
        self.battle_box.center() - Vec2::splat(SOUL_SIZE * 0.5)
    }

    /// Reset enemy and soul stats for a brand-new encounter.
    pub fn reset_encounter_stats(&mut self) {
        self.enemy = Enemy::default();
        self.battle_stage = 1;
        self.hp_anim = HpAnim::steady(self.enemy.hp as f32);
        self.soul.hp = self.soul.max_hp;
        self.soul.clear_invuln();
    }

    /// Begin the soul fly-in from the player's overworld position toward the
    /// battle box center.
    pub fn start_fly_in(&mut self) {
        let start = self.player.center() - Vec2::splat(SOUL_SIZE * 0.5);
        self.fly_in = FlyIn {
            start,
            target: self.soul_center_pos(),
            elapsed: 0.0,
        };
        self.soul.pos = start;
        self.soul.clear_invuln();
        self.bullets.clear();
        self.spawn_timer = 0.0;
        self.battle_time = 0.0;
        self.set_mode(GameMode::SoulFlyIn);
    }

    /// Begin a bullet-dodging phase. The soul keeps its current position
    /// (end of fly-in, or re-centered by the caller on a stage restart).
    pub fn start_battle_phase(&mut self) {
        self.bullets.clear();
        self.spawn_timer = 0.0;
        self.battle_time = 0.0;
        self.soul.clear_invuln();
        self.set_mode(GameMode::Battle);
    }

    /// Hand the tick's accumulated events to the shell.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Static overworld geometry: four boundary walls plus one interior block.
pub fn room_walls() -> Vec<Rect> {
    let t = WALL_THICKNESS;
    vec![
        Rect::new(0.0, 0.0, ROOM_W, t),
        Rect::new(0.0, ROOM_H - t, ROOM_W, t),
        Rect::new(0.0, 0.0, t, ROOM_H),
        Rect::new(ROOM_W - t, 0.0, t, ROOM_H),
        Rect::new(360.0, 180.0, 160.0, 40.0),
    ]
}
