/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Keyboard input handling.
//!
//! Mouse interaction (drag, pan, zoom) lives in the graph view; keyboard
//! shortcuts are collected here into a `KeyboardActions` struct, which
//! decouples input detection (requires `egui::Context`) from action
//! application (pure state mutation), making actions testable.

use egui::Key;

use crate::app::{AppIntent, NotegraphApp, ViewMode};

/// Keyboard actions collected from egui input events.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct KeyboardActions {
    pub view_graph: bool,
    pub view_notes: bool,
    pub view_list: bool,
    pub add_note: bool,
    pub toggle_physics: bool,
    pub reheat_physics: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub zoom_reset: bool,
    pub dismiss: bool,
}

/// Collect keyboard actions from the egui context (input detection only).
pub fn collect_actions(ctx: &egui::Context) -> KeyboardActions {
    // Don't swallow shortcuts typed into text fields.
    let keyboard_captured_by_egui = ctx.wants_keyboard_input();
    let mut actions = KeyboardActions::default();

    ctx.input(|i| {
        // Escape always works: unfocus text field or dismiss modal/editor.
        if i.key_pressed(Key::Escape) {
            if keyboard_captured_by_egui {
                return;
            }
            actions.dismiss = true;
        }

        if keyboard_captured_by_egui {
            return;
        }

        // 1 / 2 / 3: view modes
        if i.key_pressed(Key::Num1) {
            actions.view_graph = true;
        }
        if i.key_pressed(Key::Num2) {
            actions.view_notes = true;
        }
        if i.key_pressed(Key::Num3) {
            actions.view_list = true;
        }

        // N: new note
        if i.key_pressed(Key::N) {
            actions.add_note = true;
        }

        // T: toggle physics
        if i.key_pressed(Key::T) {
            actions.toggle_physics = true;
        }

        // R: manual physics reheat
        if i.key_pressed(Key::R) {
            actions.reheat_physics = true;
        }

        // + / - / 0: keyboard zoom controls
        if i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals) {
            actions.zoom_in = true;
        }
        if i.key_pressed(Key::Minus) {
            actions.zoom_out = true;
        }
        if i.key_pressed(Key::Num0) {
            actions.zoom_reset = true;
        }
    });

    actions
}

/// Convert collected actions to intents without applying them.
pub fn intents_from_actions(actions: &KeyboardActions, app: &NotegraphApp) -> Vec<AppIntent> {
    let mut intents = Vec::new();

    if actions.dismiss {
        if app.login_modal_open {
            intents.push(AppIntent::CloseLoginModal);
        } else if app.editing_note.is_some() {
            intents.push(AppIntent::CancelEdit);
        }
    }

    if actions.view_graph {
        intents.push(AppIntent::SetView(ViewMode::Graph));
    }
    if actions.view_notes {
        intents.push(AppIntent::SetView(ViewMode::Notes));
    }
    if actions.view_list {
        intents.push(AppIntent::SetView(ViewMode::List));
    }

    // Adding a note only makes sense in the editor views.
    if actions.add_note && app.active_view != ViewMode::Graph {
        intents.push(AppIntent::AddNote);
    }

    if actions.toggle_physics {
        intents.push(AppIntent::TogglePhysics);
    }
    if actions.reheat_physics {
        intents.push(AppIntent::ReheatPhysics);
    }
    if actions.zoom_in {
        intents.push(AppIntent::RequestZoomIn);
    }
    if actions.zoom_out {
        intents.push(AppIntent::RequestZoomOut);
    }
    if actions.zoom_reset {
        intents.push(AppIntent::RequestZoomReset);
    }

    intents
}
