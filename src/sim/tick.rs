//! The game mode state machine.
//!
//! One tick runs exactly one mode handler to completion. Handlers mutate the
//! state bundle from sampled input plus elapsed time and perform transitions
//! through [`GameState::set_mode`]; there is no other writer of `mode`.

use glam::Vec2;

use super::battle;
use super::state::{GameEvent, GameMode, GameState, Player};
use crate::consts::*;
use crate::input::{Action, ActionState};
use crate::smoothstep;

/// Number of options in the encounter menu (walk away / attack).
pub const MENU_LEN: usize = 2;
/// Menu index committed by "attack".
pub const MENU_ATTACK: usize = 1;

/// Advance the simulation by one frame. `dt` is the frame delta in seconds,
/// already capped by the caller (see [`crate::consts::MAX_FRAME_DT`]).
pub fn tick(state: &mut GameState, input: &ActionState, dt: f32) {
    match state.mode {
        GameMode::Overworld => update_overworld(state, input, dt),
        GameMode::EncounterMenu => update_encounter_menu(state, input),
        GameMode::SoulFlyIn => update_soul_fly_in(state, dt),
        GameMode::Battle => update_battle(state, input, dt),
        GameMode::AttackTurn => update_attack_turn(state, input),
        GameMode::DamageMsg => update_damage_msg(state, input, dt),
        GameMode::EnemyDefeated => update_enemy_defeated(state, input, dt),
        GameMode::Victory => update_victory(state, input),
        GameMode::GameOver => update_game_over(state, input),
    }
}

/// Normalized movement vector from held directional input. Normalization
/// keeps diagonal movement at the same speed as cardinal movement.
fn move_vector(input: &ActionState) -> Vec2 {
    let (x, y) = input.move_axes();
    let v = Vec2::new(x, y);
    if v == Vec2::ZERO { v } else { v.normalize() }
}

fn update_overworld(state: &mut GameState, input: &ActionState, dt: f32) {
    let mv = move_vector(input);
    let moving = mv != Vec2::ZERO;

    if moving {
        state.walk.face(mv.x, mv.y);
    }

    // Reject-and-hold wall policy: the combined 2D move either lands whole
    // or not at all. No per-axis sliding.
    let next = state.player.pos + mv * state.player.speed * dt;
    let candidate = Player::hitbox_at(next);
    let blocked = state.walls.iter().any(|w| candidate.intersects(w));
    if !blocked {
        state.player.pos = next;
    }

    state.walk.advance(dt, moving);

    if state.encounter.active
        && state.player.hitbox().intersects(&state.encounter.trigger)
        && input.just_pressed(Action::Interact)
    {
        state.menu_index = 0;
        state.set_mode(GameMode::EncounterMenu);
    }
}

fn update_encounter_menu(state: &mut GameState, input: &ActionState) {
    if input.just_pressed(Action::Up) {
        state.menu_index = (state.menu_index + MENU_LEN - 1) % MENU_LEN;
    }
    if input.just_pressed(Action::Down) {
        state.menu_index = (state.menu_index + 1) % MENU_LEN;
    }

    if input.just_pressed(Action::Cancel) {
        state.set_mode(GameMode::Overworld);
        return;
    }

    if input.just_pressed(Action::Confirm) {
        if state.menu_index == MENU_ATTACK {
            state.reset_encounter_stats();
            state.start_fly_in();
        } else {
            state.set_mode(GameMode::Overworld);
        }
    }
}

fn update_soul_fly_in(state: &mut GameState, dt: f32) {
    state.fly_in.elapsed += dt;
    let t = (state.fly_in.elapsed / FLY_IN_DUR).clamp(0.0, 1.0);

    let fly = state.fly_in;
    state.soul.pos = fly.start + (fly.target - fly.start) * smoothstep(t);

    if t >= 1.0 {
        state.soul.pos = fly.target;
        state.start_battle_phase();
    }
}

fn update_battle(state: &mut GameState, input: &ActionState, dt: f32) {
    state.battle_time += dt;

    // Soul movement, clamped to stay fully inside the battle box
    let mv = move_vector(input);
    state.soul.pos += mv * state.soul.speed * dt;
    let bbox = state.battle_box;
    state.soul.pos.x = state.soul.pos.x.clamp(bbox.left(), bbox.right() - SOUL_SIZE);
    state.soul.pos.y = state.soul.pos.y.clamp(bbox.top(), bbox.bottom() - SOUL_SIZE);

    battle::spawn_bullets(state, dt);
    battle::integrate_bullets(state, dt);
    battle::update_invuln(state, dt);
    battle::resolve_soul_hits(state);

    if state.battle_time >= BATTLE_PHASE_LEN {
        state.bullets.clear();
        state.set_mode(GameMode::AttackTurn);
    }

    // Checked after the timeout so a simultaneous expiry + death still ends
    // in game over.
    if state.soul.hp <= 0 {
        state.set_mode(GameMode::GameOver);
    }
}

fn update_attack_turn(state: &mut GameState, input: &ActionState) {
    if input.just_pressed(Action::Confirm) {
        let damage = ATTACK_DAMAGE;
        state.last_damage = damage;
        state.enemy.hp = (state.enemy.hp - damage).max(0);
        state.hp_anim.retarget(state.enemy.hp as f32);
        state.events.push(GameEvent::EnemyHit {
            damage,
            hp: state.enemy.hp,
        });
        log::info!("attack landed: {} damage, enemy hp {}", damage, state.enemy.hp);

        if state.enemy.hp <= 0 {
            state.defeat_timer = 0.0;
            state.encounter.active = false;
            state.events.push(GameEvent::EncounterCleared);
            state.set_mode(GameMode::EnemyDefeated);
        } else {
            state.hp_cue_played = false;
            state.set_mode(GameMode::DamageMsg);
        }
        return;
    }

    if input.just_pressed(Action::Cancel) {
        // Flee: back to the overworld without defeating the enemy
        state.set_mode(GameMode::Overworld);
    }
}

fn update_damage_msg(state: &mut GameState, input: &ActionState, dt: f32) {
    if !state.hp_cue_played {
        state.hp_cue_played = true;
        state.events.push(GameEvent::DamageCue);
    }

    let finished = state.hp_anim.advance(dt);

    if finished || input.just_pressed(Action::Confirm) {
        state.hp_anim.finish();
        state.battle_stage = 2;
        // The second defense starts from the box center
        state.soul.pos = state.soul_center_pos();
        state.start_battle_phase();
    }
}

fn update_enemy_defeated(state: &mut GameState, input: &ActionState, dt: f32) {
    state.defeat_timer += dt;
    if state.defeat_timer >= DEFEAT_DELAY || input.just_pressed(Action::Confirm) {
        state.set_mode(GameMode::Victory);
    }
}

fn update_victory(state: &mut GameState, input: &ActionState) {
    if input.just_pressed(Action::Confirm) {
        state.set_mode(GameMode::Overworld);
    }
}

fn update_game_over(state: &mut GameState, input: &ActionState) {
    // Level-triggered on purpose: holding the restart key restarts
    if input.held(Action::Restart) {
        state.player.pos = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        state.encounter.active = true;
        state.set_mode(GameMode::Overworld);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputSample;
    use crate::sim::state::Bullet;
    use crate::sim::Facing;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn sample(actions: &[Action]) -> InputSample {
        let mut s = InputSample::default();
        for &a in actions {
            s.set(a, true);
        }
        s
    }

    /// Input where the given actions were pressed this very frame.
    fn pressed(actions: &[Action]) -> ActionState {
        let mut input = ActionState::new();
        input.begin_frame(sample(actions));
        input
    }

    /// Input where the given actions have been held since before this frame.
    fn held(actions: &[Action]) -> ActionState {
        let mut input = ActionState::new();
        input.begin_frame(sample(actions));
        input.begin_frame(sample(actions));
        input
    }

    fn idle() -> ActionState {
        ActionState::new()
    }

    /// Drive the state into battle mode via the full menu + fly-in path.
    fn enter_battle(state: &mut GameState) {
        state.player.pos = state.encounter.trigger.center();
        tick(state, &pressed(&[Action::Interact]), DT);
        assert_eq!(state.mode, GameMode::EncounterMenu);
        tick(state, &pressed(&[Action::Down]), DT);
        tick(state, &pressed(&[Action::Confirm]), DT);
        assert_eq!(state.mode, GameMode::SoulFlyIn);
        run_until(state, GameMode::Battle, 2.0);
    }

    /// Tick with idle input until the target mode is reached (bounded).
    fn run_until(state: &mut GameState, target: GameMode, max_secs: f32) {
        let mut elapsed = 0.0;
        while state.mode != target {
            tick(state, &idle(), DT);
            elapsed += DT;
            assert!(elapsed <= max_secs, "never reached {:?}", target);
        }
    }

    #[test]
    fn diagonal_movement_is_not_faster() {
        let mut state = GameState::new(1);
        state.walls.clear();
        let start = state.player.pos;
        tick(&mut state, &held(&[Action::Right, Action::Down]), DT);
        let moved = (state.player.pos - start).length();
        assert!((moved - PLAYER_SPEED * DT).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn movement_magnitude_equals_speed_times_dt(
            dx in prop::sample::select(vec![-1.0f32, 1.0]),
            dy in prop::sample::select(vec![-1.0f32, 1.0]),
            dt in 0.001f32..0.05,
        ) {
            let mut state = GameState::new(1);
            state.walls.clear();
            let start = state.player.pos;
            let mut actions = vec![];
            actions.push(if dx > 0.0 { Action::Right } else { Action::Left });
            actions.push(if dy > 0.0 { Action::Down } else { Action::Up });
            tick(&mut state, &held(&actions), dt);
            let moved = (state.player.pos - start).length();
            prop_assert!((moved - PLAYER_SPEED * dt).abs() < 1e-3);
        }
    }

    #[test]
    fn wall_collision_rejects_the_move() {
        let mut state = GameState::new(1);
        state.player.pos = Vec2::new(WALL_THICKNESS + 1.0, 260.0);
        let before = state.player.pos;
        tick(&mut state, &held(&[Action::Left]), 0.05);
        assert_eq!(state.player.pos, before);
    }

    #[test]
    fn blocked_diagonal_rejects_both_axes() {
        let mut state = GameState::new(1);
        // One pixel clear of the left wall; up alone would be fine
        state.player.pos = Vec2::new(WALL_THICKNESS + 1.0, 260.0);
        let before = state.player.pos;
        tick(&mut state, &held(&[Action::Left, Action::Up]), 0.05);
        assert_eq!(state.player.pos, before);
    }

    #[test]
    fn walk_anim_tracks_movement() {
        let mut state = GameState::new(1);
        state.walls.clear();
        tick(&mut state, &held(&[Action::Left]), DT);
        assert_eq!(state.walk.facing, Facing::Left);
        assert!(state.walk.moving);
        tick(&mut state, &idle(), DT);
        assert!(!state.walk.moving);
        assert_eq!(state.walk.frame, 0);
    }

    #[test]
    fn interact_inside_trigger_opens_menu_on_edge_only() {
        let mut state = GameState::new(1);
        state.player.pos = state.encounter.trigger.center();

        // Held from a previous frame: no edge, no menu
        tick(&mut state, &held(&[Action::Interact]), DT);
        assert_eq!(state.mode, GameMode::Overworld);

        state.menu_index = 1;
        tick(&mut state, &pressed(&[Action::Interact]), DT);
        assert_eq!(state.mode, GameMode::EncounterMenu);
        // Selector resets to the first option on entry
        assert_eq!(state.menu_index, 0);
    }

    #[test]
    fn interact_outside_trigger_does_nothing() {
        let mut state = GameState::new(1);
        tick(&mut state, &pressed(&[Action::Interact]), DT);
        assert_eq!(state.mode, GameMode::Overworld);
    }

    #[test]
    fn inactive_encounter_cannot_be_started() {
        let mut state = GameState::new(1);
        state.encounter.active = false;
        state.player.pos = state.encounter.trigger.center();
        tick(&mut state, &pressed(&[Action::Interact]), DT);
        assert_eq!(state.mode, GameMode::Overworld);
    }

    #[test]
    fn menu_selector_wraps_both_directions() {
        let mut state = GameState::new(1);
        state.set_mode(GameMode::EncounterMenu);

        tick(&mut state, &pressed(&[Action::Down]), DT);
        assert_eq!(state.menu_index, 1);
        tick(&mut state, &pressed(&[Action::Down]), DT);
        assert_eq!(state.menu_index, 0);
        tick(&mut state, &pressed(&[Action::Up]), DT);
        assert_eq!(state.menu_index, 1);
        tick(&mut state, &pressed(&[Action::Up]), DT);
        assert_eq!(state.menu_index, 0);
    }

    #[test]
    fn menu_walk_away_and_cancel_return_to_overworld() {
        let mut state = GameState::new(1);
        state.set_mode(GameMode::EncounterMenu);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        assert_eq!(state.mode, GameMode::Overworld);

        state.set_mode(GameMode::EncounterMenu);
        tick(&mut state, &pressed(&[Action::Cancel]), DT);
        assert_eq!(state.mode, GameMode::Overworld);
    }

    #[test]
    fn menu_attack_resets_stats_and_starts_fly_in() {
        let mut state = GameState::new(1);
        state.enemy.hp = 30;
        state.soul.hp = 5;
        state.set_mode(GameMode::EncounterMenu);
        state.menu_index = MENU_ATTACK;
        tick(&mut state, &pressed(&[Action::Confirm]), DT);

        assert_eq!(state.mode, GameMode::SoulFlyIn);
        assert_eq!(state.enemy.hp, ENEMY_MAX_HP);
        assert_eq!(state.soul.hp, SOUL_MAX_HP);
        assert_eq!(state.battle_stage, 1);
        assert_eq!(state.soul.pos, state.fly_in.start);
    }

    #[test]
    fn fly_in_interpolates_monotonically_and_snaps() {
        let mut state = GameState::new(1);
        state.set_mode(GameMode::EncounterMenu);
        state.menu_index = MENU_ATTACK;
        tick(&mut state, &pressed(&[Action::Confirm]), DT);

        let start = state.fly_in.start;
        let target = state.fly_in.target;
        assert_eq!(state.soul.pos, start);

        let path = target - start;
        let mut last_progress = 0.0;
        while state.mode == GameMode::SoulFlyIn {
            tick(&mut state, &idle(), DT);
            let progress = (state.soul.pos - start).dot(path) / path.length_squared();
            assert!(progress >= last_progress - 1e-6, "fly-in went backwards");
            last_progress = progress;
        }

        assert_eq!(state.mode, GameMode::Battle);
        assert_eq!(state.soul.pos, target);
        assert_eq!(state.soul.pos, state.soul_center_pos());
    }

    #[test]
    fn soul_stays_inside_battle_box() {
        let mut state = GameState::new(1);
        enter_battle(&mut state);
        // Push into the corner for a full second
        for _ in 0..60 {
            tick(&mut state, &held(&[Action::Left, Action::Up]), DT);
            state.bullets.clear();
        }
        assert_eq!(state.soul.pos.x, state.battle_box.left());
        assert_eq!(state.soul.pos.y, state.battle_box.top());
    }

    #[test]
    fn battle_times_out_into_attack_turn_with_bullets_cleared() {
        let mut state = GameState::new(1);
        enter_battle(&mut state);
        let mut elapsed = 0.0;
        while state.mode == GameMode::Battle {
            tick(&mut state, &idle(), DT);
            // Perfect dodging: nothing ever reaches the soul
            state.bullets.clear();
            elapsed += DT;
            assert!(elapsed < BATTLE_PHASE_LEN + 1.0);
        }
        assert_eq!(state.mode, GameMode::AttackTurn);
        assert!(state.bullets.is_empty());
        assert_eq!(state.soul.hp, SOUL_MAX_HP);
        assert!(state.battle_time >= BATTLE_PHASE_LEN);
    }

    #[test]
    fn soul_death_ends_in_game_over() {
        let mut state = GameState::new(1);
        enter_battle(&mut state);
        state.soul.hp = BULLET_DAMAGE;
        state.bullets.push(Bullet {
            pos: state.soul.hitbox().center(),
            vel: Vec2::ZERO,
            radius: BULLET_RADIUS,
            alive: true,
        });
        tick(&mut state, &idle(), DT);
        assert_eq!(state.soul.hp, 0);
        assert_eq!(state.mode, GameMode::GameOver);
    }

    #[test]
    fn simultaneous_timeout_and_death_is_game_over() {
        let mut state = GameState::new(1);
        enter_battle(&mut state);
        state.battle_time = BATTLE_PHASE_LEN;
        state.soul.hp = BULLET_DAMAGE;
        state.bullets.push(Bullet {
            pos: state.soul.hitbox().center(),
            vel: Vec2::ZERO,
            radius: BULLET_RADIUS,
            alive: true,
        });
        tick(&mut state, &idle(), DT);
        assert_eq!(state.mode, GameMode::GameOver);
    }

    #[test]
    fn attack_commits_fixed_damage() {
        let mut state = GameState::new(1);
        state.set_mode(GameMode::AttackTurn);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);

        assert_eq!(state.enemy.hp, ENEMY_MAX_HP - ATTACK_DAMAGE);
        assert_eq!(state.last_damage, ATTACK_DAMAGE);
        assert_eq!(state.mode, GameMode::DamageMsg);
        assert_eq!(state.hp_anim.to, (ENEMY_MAX_HP - ATTACK_DAMAGE) as f32);
        assert!(state.events.contains(&GameEvent::EnemyHit {
            damage: ATTACK_DAMAGE,
            hp: ENEMY_MAX_HP - ATTACK_DAMAGE
        }));
    }

    #[test]
    fn attack_clamps_enemy_hp_at_zero_and_clears_encounter() {
        let mut state = GameState::new(1);
        state.enemy.hp = 30;
        state.set_mode(GameMode::AttackTurn);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);

        assert_eq!(state.enemy.hp, 0);
        assert_eq!(state.mode, GameMode::EnemyDefeated);
        assert!(!state.encounter.active);
        assert!(state.events.contains(&GameEvent::EncounterCleared));
    }

    #[test]
    fn attack_turn_cancel_flees_to_overworld() {
        let mut state = GameState::new(1);
        state.enemy.hp = 30;
        state.set_mode(GameMode::AttackTurn);
        tick(&mut state, &pressed(&[Action::Cancel]), DT);
        assert_eq!(state.mode, GameMode::Overworld);
        // Fleeing does not defeat the enemy
        assert!(state.encounter.active);
        assert_eq!(state.enemy.hp, 30);
    }

    #[test]
    fn damage_msg_emits_cue_once_and_advances_to_stage_two() {
        let mut state = GameState::new(1);
        state.set_mode(GameMode::AttackTurn);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        state.drain_events();

        let mut cues = 0;
        while state.mode == GameMode::DamageMsg {
            tick(&mut state, &idle(), DT);
            cues += state
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::DamageCue)
                .count();
        }

        assert_eq!(cues, 1);
        assert_eq!(state.mode, GameMode::Battle);
        assert_eq!(state.battle_stage, 2);
        assert_eq!(state.soul.pos, state.soul_center_pos());
        assert_eq!(state.hp_anim.shown, state.enemy.hp as f32);
    }

    #[test]
    fn damage_msg_confirm_skips_the_animation() {
        let mut state = GameState::new(1);
        state.set_mode(GameMode::AttackTurn);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        assert_eq!(state.mode, GameMode::Battle);
        assert_eq!(state.hp_anim.shown, state.enemy.hp as f32);
    }

    #[test]
    fn defeat_screen_times_out_into_victory() {
        let mut state = GameState::new(1);
        state.defeat_timer = 0.0;
        state.set_mode(GameMode::EnemyDefeated);
        run_until(&mut state, GameMode::Victory, DEFEAT_DELAY + 0.5);
    }

    #[test]
    fn defeat_screen_confirm_skips_the_wait() {
        let mut state = GameState::new(1);
        state.set_mode(GameMode::EnemyDefeated);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        assert_eq!(state.mode, GameMode::Victory);
    }

    #[test]
    fn victory_confirm_returns_to_overworld() {
        let mut state = GameState::new(1);
        state.encounter.active = false;
        state.set_mode(GameMode::Victory);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        assert_eq!(state.mode, GameMode::Overworld);
        // No re-fight after victory
        assert!(!state.encounter.active);
    }

    #[test]
    fn game_over_restart_resets_player_and_encounter() {
        let mut state = GameState::new(1);
        state.player.pos = Vec2::new(500.0, 100.0);
        state.encounter.active = false;
        state.set_mode(GameMode::GameOver);

        // Idle input: stays on the game over screen indefinitely
        for _ in 0..120 {
            tick(&mut state, &idle(), DT);
        }
        assert_eq!(state.mode, GameMode::GameOver);

        // Restart is level-triggered; a held key works
        tick(&mut state, &held(&[Action::Restart]), DT);
        assert_eq!(state.mode, GameMode::Overworld);
        assert_eq!(state.player.pos, Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        assert!(state.encounter.active);
    }

    /// The full encounter script: menu, fly-in, two defense phases, two
    /// attacks, victory, and no re-fight afterwards.
    #[test]
    fn full_encounter_scenario() {
        let mut state = GameState::new(99);

        // Start the encounter and confirm "attack"
        state.player.pos = state.encounter.trigger.center();
        tick(&mut state, &pressed(&[Action::Interact]), DT);
        tick(&mut state, &pressed(&[Action::Down]), DT);
        assert_eq!(state.menu_index, MENU_ATTACK);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        assert_eq!(state.mode, GameMode::SoulFlyIn);

        // Fly-in completes after 1.5 s simulated
        run_until(&mut state, GameMode::Battle, 2.0);
        assert_eq!(state.soul.pos, state.soul_center_pos());
        assert_eq!(state.enemy.hp, 100);

        // Survive 12 s without ever touching a bullet
        while state.mode == GameMode::Battle {
            tick(&mut state, &idle(), DT);
            state.bullets.clear();
        }
        assert_eq!(state.mode, GameMode::AttackTurn);
        assert_eq!(state.soul.hp, SOUL_MAX_HP);

        // First attack: 100 -> 30
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        assert_eq!(state.enemy.hp, 30);
        assert_eq!(state.mode, GameMode::DamageMsg);

        // Let the damage screen elapse
        run_until(&mut state, GameMode::Battle, HP_ANIM_DUR + 0.5);
        assert_eq!(state.battle_stage, 2);
        assert_eq!(state.hp_anim.shown, 30.0);

        // Survive the second defense
        while state.mode == GameMode::Battle {
            tick(&mut state, &idle(), DT);
            state.bullets.clear();
        }
        assert_eq!(state.mode, GameMode::AttackTurn);

        // Second attack: 30 -> 0, clamped
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        assert_eq!(state.enemy.hp, 0);
        assert_eq!(state.mode, GameMode::EnemyDefeated);
        assert!(!state.encounter.active);

        run_until(&mut state, GameMode::Victory, DEFEAT_DELAY + 0.5);
        tick(&mut state, &pressed(&[Action::Confirm]), DT);
        assert_eq!(state.mode, GameMode::Overworld);

        // The defeated enemy cannot be fought again
        state.player.pos = state.encounter.trigger.center();
        tick(&mut state, &pressed(&[Action::Interact]), DT);
        assert_eq!(state.mode, GameMode::Overworld);
    }
}
