//! Soulbox entry point
//!
//! Runs a headless scripted session: a fixed-step frame loop that walks the
//! player into the encounter, fights through both battle stages, and logs
//! every event and playback request. Useful as a smoke run and as a worked
//! example of driving the simulation from a shell.

use std::path::Path;

use soulbox::audio::AudioDirector;
use soulbox::consts::MAX_FRAME_DT;
use soulbox::input::{Action, ActionState, InputSample};
use soulbox::render::build_frame_with;
use soulbox::sim::{GameMode, GameState, tick};
use soulbox::Settings;

const FRAME_DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 120;

fn main() {
    env_logger::init();
    log::info!("Soulbox (headless) starting...");

    let settings = Settings::load_or_default(Path::new("soulbox_settings.json"));
    log::info!(
        "settings: music {:.2}, sfx {:.2}",
        settings.effective_music_volume(),
        settings.effective_sfx_volume()
    );

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed);
    let mut input = ActionState::default();
    let mut director = AudioDirector::new(
        settings.effective_music_volume(),
        settings.effective_sfx_volume(),
    );
    log::info!("game initialized with seed {}", seed);

    let dt = FRAME_DT.min(MAX_FRAME_DT);
    for frame in 0..MAX_FRAMES {
        input.begin_frame(scripted_input(&state, frame));
        tick(&mut state, &input, dt);

        let events = state.drain_events();
        for event in &events {
            log::info!("frame {}: {:?}", frame, event);
        }
        for cmd in director.frame_cmds(state.mode, &events) {
            log::info!("frame {}: audio {:?}", frame, cmd);
        }

        if state.mode == GameMode::Victory || state.mode == GameMode::GameOver {
            let draw_cmds = build_frame_with(&state, settings.show_hitboxes);
            log::info!(
                "finished in mode {:?} after {} frames ({} draw commands on the last frame)",
                state.mode,
                frame + 1,
                draw_cmds.len()
            );
            return;
        }
    }

    log::warn!("script did not reach an end screen within {} frames", MAX_FRAMES);
}

/// Canned input for the demo run, derived from the current mode.
fn scripted_input(state: &GameState, frame: u32) -> InputSample {
    match state.mode {
        // Walk right into the trigger zone, then interact
        GameMode::Overworld => {
            if state.encounter.trigger.intersects(&state.player.hitbox()) {
                InputSample::default().with(Action::Interact)
            } else {
                InputSample::default().with(Action::Right)
            }
        }
        // Move the selector to "Attack" and confirm
        GameMode::EncounterMenu => {
            if state.menu_index == 0 {
                InputSample::default().with(Action::Down)
            } else {
                InputSample::default().with(Action::Confirm)
            }
        }
        // Sweep left and right so the run shows some dodging
        GameMode::Battle => {
            let action = if (frame / 30) % 2 == 0 {
                Action::Left
            } else {
                Action::Right
            };
            InputSample::default().with(action)
        }
        GameMode::AttackTurn | GameMode::DamageMsg | GameMode::EnemyDefeated => {
            // Mash confirm every other frame so edge detection fires
            if frame % 2 == 0 {
                InputSample::default().with(Action::Confirm)
            } else {
                InputSample::default()
            }
        }
        GameMode::Victory | GameMode::GameOver | GameMode::SoulFlyIn => InputSample::default(),
    }
}
