/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! notegraph: a note-taking app with a force-directed graph view.
//!
//! Module map:
//! - [`store`]: in-memory note collections behind a command-based state owner
//! - [`graph`]: node-link graph construction and the force layout solver
//! - [`app`]: application state, view router, and the intent machinery
//! - [`render`]: egui views (graph canvas, editor grid, login modal)
//! - [`input`]: keyboard shortcut collection

pub mod app;
pub mod graph;
pub mod input;
pub mod render;
pub mod store;

pub use app::NotegraphApp;
