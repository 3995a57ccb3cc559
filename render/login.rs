/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Login modal. A simulated flow: any credentials flip the logged-in flag.

use egui::Align2;

use crate::app::{AppIntent, NotegraphApp};

pub fn show(ctx: &egui::Context, app: &mut NotegraphApp) {
    if !app.login_modal_open {
        return;
    }

    let mut intents = Vec::new();
    let mut open = true;

    egui::Window::new("Login")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label("Username");
            ui.text_edit_singleline(&mut app.login_username);
            ui.label("Password");
            ui.add(egui::TextEdit::singleline(&mut app.login_password).password(true));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Login").clicked() {
                    intents.push(AppIntent::SubmitLogin);
                }
                if ui.button("Cancel").clicked() {
                    intents.push(AppIntent::CloseLoginModal);
                }
            });
        });

    if !open {
        intents.push(AppIntent::CloseLoginModal);
    }
    app.apply_intents(intents);
}
