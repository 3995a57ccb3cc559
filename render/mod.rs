/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Window chrome and view routing.
//!
//! Renders the sidebar (view selector), the header (title + login/logout),
//! and dispatches the central area to the active view. Views communicate
//! state changes back as `AppIntent`s; nothing here mutates app state
//! directly except the text fields bound to egui widgets.

use crate::app::{AppIntent, NotegraphApp, ViewMode};
use crate::input;

pub mod editor;
pub mod graph_view;
pub mod login;

/// Render one frame.
pub fn show(ctx: &egui::Context, app: &mut NotegraphApp) {
    let actions = input::collect_actions(ctx);
    let intents = input::intents_from_actions(&actions, app);
    app.apply_intents(intents);

    sidebar(ctx, app);
    header(ctx, app);

    egui::CentralPanel::default().show(ctx, |ui| match app.active_view {
        ViewMode::Graph => graph_view::show(ui, app),
        // Notes and List both present the editor component.
        ViewMode::Notes | ViewMode::List => editor::show(ui, app),
    });

    login::show(ctx, app);
}

fn sidebar(ctx: &egui::Context, app: &mut NotegraphApp) {
    let mut intents = Vec::new();

    egui::SidePanel::left("sidebar")
        .resizable(false)
        .exact_width(72.0)
        .show(ctx, |ui| {
            ui.add_space(12.0);
            ui.vertical_centered_justified(|ui| {
                for (label, view) in [
                    ("Graph", ViewMode::Graph),
                    ("Notes", ViewMode::Notes),
                    ("List", ViewMode::List),
                ] {
                    let selected = app.active_view == view;
                    if ui.selectable_label(selected, label).clicked() {
                        intents.push(AppIntent::SetView(view));
                    }
                    ui.add_space(4.0);
                }
            });
        });

    app.apply_intents(intents);
}

fn header(ctx: &egui::Context, app: &mut NotegraphApp) {
    let mut intents = Vec::new();

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Note");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if app.logged_in {
                    if ui.button("Logout").clicked() {
                        intents.push(AppIntent::Logout);
                    }
                } else if ui.button("Login").clicked() {
                    intents.push(AppIntent::OpenLoginModal);
                }
            });
        });
    });

    app.apply_intents(intents);
}
