/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editor view: parent/topic navigation plus the note card grid with an
//! inline edit form. Serves both the Notes and List view modes.

use crate::app::{AppIntent, NotegraphApp};
use crate::store::Note;

const CONTENT_PREVIEW_CHARS: usize = 100;

pub fn show(ui: &mut egui::Ui, app: &mut NotegraphApp) {
    let mut intents = Vec::new();

    egui::SidePanel::left("editor_nav")
        .resizable(false)
        .default_width(220.0)
        .show_inside(ui, |ui| {
            navigation(ui, app, &mut intents);
        });

    egui::CentralPanel::default().show_inside(ui, |ui| {
        if app.editing_note.is_some() {
            edit_form(ui, app, &mut intents);
        } else {
            card_grid(ui, app, &mut intents);
        }
    });

    app.apply_intents(intents);
}

fn navigation(ui: &mut egui::Ui, app: &mut NotegraphApp, intents: &mut Vec<AppIntent>) {
    ui.heading("Parent Nodes");
    for parent in app.store.parent_nodes() {
        let selected = app.selected_parent == parent.id;
        if ui.selectable_label(selected, &parent.id).clicked() {
            intents.push(AppIntent::SelectParent(parent.id.clone()));
        }
    }

    ui.add_space(8.0);
    ui.add(
        egui::TextEdit::singleline(&mut app.new_parent_name).hint_text("New parent node name"),
    );
    if ui.button("Add Parent Node").clicked() {
        intents.push(AppIntent::SubmitParentName);
    }

    ui.add_space(12.0);
    ui.heading("Topics");
    for topic in app.store.topics() {
        let selected = app.selected_topic.as_deref() == Some(topic.name.as_str());
        if ui.selectable_label(selected, &topic.name).clicked() {
            intents.push(AppIntent::SelectTopic(topic.name.clone()));
        }
    }

    ui.add_space(12.0);
    if ui.button("Add Note").clicked() {
        intents.push(AppIntent::AddNote);
    }
}

fn edit_form(ui: &mut egui::Ui, app: &mut NotegraphApp, intents: &mut Vec<AppIntent>) {
    let Some(draft) = app.editing_note.as_mut() else {
        return;
    };

    ui.text_edit_singleline(&mut draft.title);
    ui.add(
        egui::TextEdit::multiline(&mut draft.content)
            .desired_rows(10)
            .desired_width(f32::INFINITY),
    );
    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            intents.push(AppIntent::SaveEdit);
        }
        if ui.button("Cancel").clicked() {
            intents.push(AppIntent::CancelEdit);
        }
    });
}

fn card_grid(ui: &mut egui::Ui, app: &NotegraphApp, intents: &mut Vec<AppIntent>) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        let notes = app.filtered_notes();
        for row in notes.chunks(2) {
            ui.columns(2, |columns| {
                for (i, note) in row.iter().enumerate() {
                    note_card(&mut columns[i], note, intents);
                }
            });
        }
    });
}

fn note_card(ui: &mut egui::Ui, note: &Note, intents: &mut Vec<AppIntent>) {
    ui.group(|ui| {
        ui.strong(&note.title);
        ui.label(content_preview(&note.content));
        ui.horizontal(|ui| {
            if ui.button("Edit").clicked() {
                intents.push(AppIntent::EditNote(note.id.clone()));
            }
            if ui.button("Delete").clicked() {
                intents.push(AppIntent::DeleteNote(note.id.clone()));
            }
        });
    });
}

fn content_preview(content: &str) -> String {
    let preview: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();
    format!("{preview}...")
}
