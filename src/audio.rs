//! Audio direction: background-track selection and one-shot cues.
//!
//! The core never touches an audio device. Each frame the shell asks the
//! director what playback requests follow from the current state; the
//! director keeps just enough bookkeeping to make track switches idempotent
//! (re-requesting the already-playing track is a no-op).

use crate::sim::{GameEvent, GameMode};

/// Background music tracks, one per mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Overworld,
    EncounterMenu,
    Battle,
    Victory,
    GameOver,
}

/// One-shot sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    HpDown,
}

/// Playback request handed to the shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCmd {
    /// Start the track, replacing whatever is playing
    SwitchTrack { track: Track, looping: bool, volume: f32 },
    /// Fire-and-forget cue
    PlayCue { cue: Cue, volume: f32 },
}

/// The track a mode wants, with loop flag and volume.
fn track_for_mode(mode: GameMode) -> (Track, bool, f32) {
    match mode {
        GameMode::Overworld => (Track::Overworld, true, 0.55),
        GameMode::EncounterMenu => (Track::EncounterMenu, true, 0.55),
        GameMode::SoulFlyIn
        | GameMode::Battle
        | GameMode::AttackTurn
        | GameMode::DamageMsg
        | GameMode::EnemyDefeated => (Track::Battle, true, 0.60),
        GameMode::Victory => (Track::Victory, false, 0.70),
        GameMode::GameOver => (Track::GameOver, true, 0.55),
    }
}

/// Tracks the current background track and converts state + events into
/// playback requests.
#[derive(Debug)]
pub struct AudioDirector {
    current: Option<Track>,
    music_volume: f32,
    sfx_volume: f32,
}

impl AudioDirector {
    pub fn new(music_volume: f32, sfx_volume: f32) -> Self {
        Self {
            current: None,
            music_volume: music_volume.clamp(0.0, 1.0),
            sfx_volume: sfx_volume.clamp(0.0, 1.0),
        }
    }

    /// Requests for this frame: a track switch if the mode's track differs
    /// from what is playing, plus cues for the drained events.
    pub fn frame_cmds(&mut self, mode: GameMode, events: &[GameEvent]) -> Vec<AudioCmd> {
        let mut cmds = Vec::new();

        let (track, looping, volume) = track_for_mode(mode);
        if self.current != Some(track) {
            self.current = Some(track);
            log::debug!("switching track to {:?}", track);
            cmds.push(AudioCmd::SwitchTrack {
                track,
                looping,
                volume: volume * self.music_volume,
            });
        }

        for event in events {
            if let GameEvent::DamageCue = event {
                cmds.push(AudioCmd::PlayCue {
                    cue: Cue::HpDown,
                    volume: 0.70 * self.sfx_volume,
                });
            }
        }

        cmds
    }
}
