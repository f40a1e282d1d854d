//! Presentation adapter: turns the current [`GameState`] into an ordered
//! list of semantic draw commands.
//!
//! The shell executes the list front to back, so order is z-order:
//! background, walls, dynamic entities, overlays, text. Nothing here touches
//! a rendering surface; commands carry only positions, sizes, and colors.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{Facing, GameMode, GameState, Rect};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GRAY: Color = Color::rgb(200, 200, 200);
}

const ROOM_BG: Color = Color::rgb(20, 22, 26);
const WALL_COLOR: Color = Color::rgb(70, 70, 80);
const TRIGGER_COLOR: Color = Color::rgb(220, 160, 30);
const BAR_BACK: Color = Color::rgb(60, 60, 60);
const SOUL_BAR_FILL: Color = Color::rgb(60, 220, 80);
const ENEMY_BAR_FILL: Color = Color::rgb(220, 80, 80);
const HITBOX_COLOR: Color = Color::rgba(0, 255, 120, 180);

/// Sprite selector for the shell's texture lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    /// One of the 4 facings x 4 frames of the walk cycle
    Player { facing: Facing, frame: u8 },
    Enemy,
}

/// One semantic draw request. Issued once per visible element per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect { rect: Rect, color: Color },
    OutlineRect { rect: Rect, thickness: f32, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    /// Sprite drawn centered on `center`
    Sprite { kind: SpriteKind, center: Vec2 },
    /// Heart-shaped soul marker drawn centered on `center`
    Soul { center: Vec2 },
    Text { text: String, pos: Vec2, size: u32, color: Color },
}

/// Build the complete ordered command list for one frame.
pub fn build_frame(state: &GameState) -> Vec<DrawCmd> {
    build_frame_with(state, false)
}

/// Like [`build_frame`], optionally topped with hitbox outlines for
/// debugging (driven by `Settings::show_hitboxes`).
pub fn build_frame_with(state: &GameState, show_hitboxes: bool) -> Vec<DrawCmd> {
    let mut out = Vec::with_capacity(32);

    out.push(DrawCmd::FillRect {
        rect: Rect::new(0.0, 0.0, ROOM_W, ROOM_H),
        color: ROOM_BG,
    });

    match state.mode {
        GameMode::Overworld => {
            push_room(&mut out, state);
            push_player(&mut out, state);
        }
        GameMode::EncounterMenu => {
            push_room(&mut out, state);
            push_player(&mut out, state);
            push_menu(&mut out, state);
        }
        GameMode::SoulFlyIn => {
            // Overworld stays visible while the heart flies to the box
            push_room(&mut out, state);
            push_battle_box(&mut out, state);
            push_soul(&mut out, state);
        }
        GameMode::Battle => {
            push_battle_box(&mut out, state);
            for bullet in &state.bullets {
                out.push(DrawCmd::Circle {
                    center: bullet.pos,
                    radius: bullet.radius,
                    color: Color::WHITE,
                });
            }
            if soul_visible(state) {
                push_soul(&mut out, state);
            }
            push_soul_hp_bar(&mut out, state);
            push_enemy_over_box(&mut out, state);
        }
        GameMode::AttackTurn => {
            push_overlay(&mut out, 160);
            push_centered_text(
                &mut out,
                "YOUR TURN!\nPress Enter to attack\nEsc to run",
                ROOM_H / 2.0 - 70.0,
                28,
                Color::WHITE,
            );
            push_centered_text(
                &mut out,
                &format!("Enemy HP: {}/{}", state.enemy.hp, state.enemy.max_hp),
                ROOM_H / 2.0 + 40.0,
                18,
                Color::GRAY,
            );
        }
        GameMode::DamageMsg => {
            push_overlay(&mut out, 200);
            push_enemy_hp_bar(
                &mut out,
                Vec2::new(ROOM_W / 2.0 - 130.0, ROOM_H / 2.0 - 10.0),
                state.hp_anim.shown.max(0.0) / state.enemy.max_hp as f32,
            );
            push_centered_text(
                &mut out,
                &format!("YOU DID {} DAMAGE!\nHE IS ANGRY NOW", state.last_damage),
                ROOM_H / 2.0 - 80.0,
                28,
                Color::WHITE,
            );
            push_centered_text(
                &mut out,
                "Press Enter to continue",
                ROOM_H / 2.0 + 40.0,
                16,
                Color::GRAY,
            );
        }
        GameMode::EnemyDefeated => {
            push_overlay(&mut out, 210);
            push_centered_text(
                &mut out,
                "ENEMY DEFEATED!",
                ROOM_H / 2.0 - 40.0,
                42,
                Color::WHITE,
            );
            push_centered_text(
                &mut out,
                "Press Enter to continue",
                ROOM_H / 2.0 + 30.0,
                18,
                Color::GRAY,
            );
        }
        GameMode::Victory => {
            push_overlay(&mut out, 200);
            push_centered_text(&mut out, "YOU WON!", ROOM_H / 2.0 - 70.0, 48, Color::YELLOW);
            push_centered_text(
                &mut out,
                "Press Enter to continue",
                ROOM_H / 2.0 + 10.0,
                20,
                Color::GRAY,
            );
        }
        GameMode::GameOver => {
            push_overlay(&mut out, 180);
            push_centered_text(
                &mut out,
                "GAME OVER\nPress R to restart",
                ROOM_H / 2.0 - 60.0,
                32,
                Color::RED,
            );
        }
    }

    if show_hitboxes {
        push_hitboxes(&mut out, state);
    }

    out
}

/// Hitbox outlines on top of everything, matching what the collision pass
/// actually tests in the current mode.
fn push_hitboxes(out: &mut Vec<DrawCmd>, state: &GameState) {
    let outline = |rect: Rect| DrawCmd::OutlineRect {
        rect,
        thickness: 1.0,
        color: HITBOX_COLOR,
    };
    match state.mode {
        GameMode::Overworld | GameMode::EncounterMenu => {
            out.push(outline(state.player.hitbox()));
            if state.encounter.active {
                out.push(outline(state.encounter.trigger));
            }
        }
        GameMode::SoulFlyIn | GameMode::Battle => {
            out.push(outline(state.soul.hitbox()));
            for bullet in &state.bullets {
                out.push(outline(bullet.hitbox()));
            }
        }
        _ => {}
    }
}

/// Soul blinks while invulnerable: visible on alternating tenths of the
/// battle clock.
fn soul_visible(state: &GameState) -> bool {
    !state.soul.invuln || (state.battle_time * 10.0).rem_euclid(2.0) < 1.0
}

fn push_room(out: &mut Vec<DrawCmd>, state: &GameState) {
    for wall in &state.walls {
        out.push(DrawCmd::FillRect {
            rect: *wall,
            color: WALL_COLOR,
        });
    }
    if state.encounter.active {
        out.push(DrawCmd::OutlineRect {
            rect: state.encounter.trigger,
            thickness: 2.0,
            color: TRIGGER_COLOR,
        });
        out.push(DrawCmd::Sprite {
            kind: SpriteKind::Enemy,
            center: state.encounter.trigger.center(),
        });
    }
}

fn push_player(out: &mut Vec<DrawCmd>, state: &GameState) {
    out.push(DrawCmd::Sprite {
        kind: SpriteKind::Player {
            facing: state.walk.facing,
            frame: state.walk.frame,
        },
        center: state.player.center(),
    });
}

fn push_soul(out: &mut Vec<DrawCmd>, state: &GameState) {
    out.push(DrawCmd::Soul {
        center: state.soul.hitbox().center(),
    });
}

fn push_battle_box(out: &mut Vec<DrawCmd>, state: &GameState) {
    out.push(DrawCmd::OutlineRect {
        rect: state.battle_box,
        thickness: 4.0,
        color: Color::WHITE,
    });
}

fn push_soul_hp_bar(out: &mut Vec<DrawCmd>, state: &GameState) {
    let pos = Vec2::new(state.battle_box.left(), state.battle_box.bottom() + 18.0);
    let ratio = state.soul.hp.max(0) as f32 / state.soul.max_hp as f32;
    out.push(DrawCmd::FillRect {
        rect: Rect::new(pos.x, pos.y, 240.0, 16.0),
        color: BAR_BACK,
    });
    out.push(DrawCmd::FillRect {
        rect: Rect::new(pos.x, pos.y, 240.0 * ratio, 16.0),
        color: SOUL_BAR_FILL,
    });
}

/// Enemy sprite floating above the box plus its authoritative HP bar.
fn push_enemy_over_box(out: &mut Vec<DrawCmd>, state: &GameState) {
    let cx = state.battle_box.center().x;
    out.push(DrawCmd::Sprite {
        kind: SpriteKind::Enemy,
        center: Vec2::new(cx, state.battle_box.top() - 90.0),
    });
    push_enemy_hp_bar(
        out,
        Vec2::new(cx - 130.0, state.battle_box.top() - 25.0),
        state.enemy.hp.max(0) as f32 / state.enemy.max_hp as f32,
    );
}

fn push_enemy_hp_bar(out: &mut Vec<DrawCmd>, pos: Vec2, ratio: f32) {
    out.push(DrawCmd::FillRect {
        rect: Rect::new(pos.x, pos.y, 260.0, 12.0),
        color: BAR_BACK,
    });
    out.push(DrawCmd::FillRect {
        rect: Rect::new(pos.x, pos.y, 260.0 * ratio, 12.0),
        color: ENEMY_BAR_FILL,
    });
}

fn push_menu(out: &mut Vec<DrawCmd>, state: &GameState) {
    let panel = Rect::new(240.0, 150.0, 420.0, 220.0);
    let base = panel.pos;

    out.push(DrawCmd::FillRect {
        rect: panel,
        color: Color::rgba(0, 0, 0, 190),
    });
    out.push(DrawCmd::OutlineRect {
        rect: panel,
        thickness: 3.0,
        color: Color::WHITE,
    });

    let selector_y = if state.menu_index == 0 { 98.0 } else { 143.0 };
    out.push(DrawCmd::FillRect {
        rect: Rect::new(base.x + 35.0, base.y + selector_y, 12.0, 12.0),
        color: Color::YELLOW,
    });

    out.push(DrawCmd::Text {
        text: "Enemy Encounter".into(),
        pos: base + Vec2::new(40.0, 30.0),
        size: 22,
        color: Color::WHITE,
    });
    let option_color = |idx: usize| {
        if state.menu_index == idx { Color::YELLOW } else { Color::WHITE }
    };
    out.push(DrawCmd::Text {
        text: "Walk away".into(),
        pos: base + Vec2::new(60.0, 90.0),
        size: 18,
        color: option_color(0),
    });
    out.push(DrawCmd::Text {
        text: "Attack".into(),
        pos: base + Vec2::new(60.0, 135.0),
        size: 18,
        color: option_color(1),
    });
    out.push(DrawCmd::Text {
        text: "Use W/S to choose,\nEnter to confirm, Esc to cancel".into(),
        pos: base + Vec2::new(40.0, 175.0),
        size: 10,
        color: Color::GRAY,
    });
}

fn push_overlay(out: &mut Vec<DrawCmd>, alpha: u8) {
    out.push(DrawCmd::FillRect {
        rect: Rect::new(0.0, 0.0, ROOM_W, ROOM_H),
        color: Color::rgba(0, 0, 0, alpha),
    });
}

/// Text horizontally centered by the shell; `pos.x` carries the screen
/// center, and the shell offsets by half the measured width.
fn push_centered_text(out: &mut Vec<DrawCmd>, text: &str, y: f32, size: u32, color: Color) {
    out.push(DrawCmd::Text {
        text: text.into(),
        pos: Vec2::new(ROOM_W / 2.0, y),
        size,
        color,
    });
}
