/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph view: canvas painting and pointer interaction.
//!
//! The view is the scheduler for the layout solver — it advances the
//! simulation one step per frame while unsettled and keeps the frame loop
//! alive with repaint requests, so settling naturally stops the ticking.
//! Painting reprojects every link endpoint and node through the camera each
//! frame (continuous re-render tied to simulation steps, not a one-shot
//! layout).

use std::collections::HashMap;
use std::time::Duration;

use egui::{Align2, Color32, FontId, Pos2, Sense, Stroke, Vec2};
use euclid::default::{Point2D, Vector2D};

use crate::app::{AppIntent, NotegraphApp, ZoomRequest};
use crate::graph::{resolve_color, NodeKey};

/// Zoom factor per keyboard zoom step.
const KEYBOARD_ZOOM_STEP: f32 = 1.2;

/// Zoom factor per scroll notch.
const SCROLL_ZOOM_STEP: f32 = 1.1;

/// Extra hit-test slack around a node, in screen pixels.
const HIT_SLACK: f32 = 4.0;

const LINK_STROKE_COLOR: Color32 = Color32::from_rgba_premultiplied(95, 95, 95, 153);
const LABEL_FONT_SIZE: f32 = 12.0;
const LABEL_OFFSET_X: f32 = 15.0;

/// Render the graph view into the available space.
pub fn show(ui: &mut egui::Ui, app: &mut NotegraphApp) {
    app.rebuild_graph_if_needed();

    let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

    let viewport_center = to_point(rect.center());

    if let Some(request) = app.take_zoom_request() {
        match request {
            ZoomRequest::In => {
                app.camera
                    .zoom_about(viewport_center, KEYBOARD_ZOOM_STEP, viewport_center)
            }
            ZoomRequest::Out => {
                app.camera
                    .zoom_about(viewport_center, 1.0 / KEYBOARD_ZOOM_STEP, viewport_center)
            }
            ZoomRequest::Reset => app.camera.reset(),
        }
    }

    if response.hovered() {
        let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
        if scroll.abs() > f32::EPSILON {
            let factor = if scroll > 0.0 {
                SCROLL_ZOOM_STEP
            } else {
                1.0 / SCROLL_ZOOM_STEP
            };
            let pointer = ui
                .ctx()
                .input(|i| i.pointer.hover_pos())
                .unwrap_or(rect.center());
            app.camera
                .zoom_about(to_point(pointer), factor, viewport_center);
        }
    }

    let running = app.advance_layout();

    let screen_nodes: Vec<(NodeKey, Pos2, f32)> = app
        .graph
        .nodes()
        .map(|(key, node)| {
            let screen = app.camera.world_to_screen(node.position, viewport_center);
            (
                key,
                Pos2::new(screen.x, screen.y),
                node.radius() * app.camera.zoom,
            )
        })
        .collect();

    handle_pointer(app, &response, &screen_nodes, viewport_center);

    paint_graph(app, &painter, &screen_nodes);

    if let Some(hover) = response.hover_pos()
        && app.dragged_node.is_none()
        && let Some(key) = hit_test(hover, &screen_nodes)
        && let Some(node) = app.graph.node(key)
    {
        egui::show_tooltip_at_pointer(ui.ctx(), egui::Id::new("graph_node_tooltip"), |ui| {
            ui.label(&node.label);
        });
    }

    draw_graph_info(&painter, rect, app);

    if running || app.dragged_node.is_some() {
        ui.ctx().request_repaint_after(Duration::from_millis(16));
    }
}

/// Resolve drag gestures: picking up a node pins it for the gesture (the
/// pointer authors its position) and reheats the simulation; dragging empty
/// space pans the camera.
fn handle_pointer(
    app: &mut NotegraphApp,
    response: &egui::Response,
    screen_nodes: &[(NodeKey, Pos2, f32)],
    viewport_center: Point2D<f32>,
) {
    if response.drag_started()
        && let Some(pointer) = response.interact_pointer_pos()
        && let Some(key) = hit_test(pointer, screen_nodes)
    {
        app.apply_intents([AppIntent::DragStart { key }]);
    }

    if response.dragged() {
        if let Some(key) = app.dragged_node {
            if let Some(pointer) = response.interact_pointer_pos() {
                let position = app.camera.screen_to_world(to_point(pointer), viewport_center);
                app.apply_intents([AppIntent::DragMove { key, position }]);
            }
        } else {
            let delta = response.drag_delta();
            app.camera.pan += Vector2D::new(delta.x, delta.y);
        }
    }

    if response.drag_stopped()
        && let Some(key) = app.dragged_node
    {
        app.apply_intents([AppIntent::DragEnd { key }]);
    }
}

fn paint_graph(app: &NotegraphApp, painter: &egui::Painter, screen_nodes: &[(NodeKey, Pos2, f32)]) {
    let by_key: HashMap<NodeKey, Pos2> = screen_nodes
        .iter()
        .map(|(key, pos, _)| (*key, *pos))
        .collect();

    for link in app.graph.links() {
        let (Some(from), Some(to)) = (by_key.get(&link.from), by_key.get(&link.to)) else {
            continue;
        };
        painter.line_segment(
            [*from, *to],
            Stroke::new(2.0 * app.camera.zoom, LINK_STROKE_COLOR),
        );
    }

    let topics = app.store.topics();
    for (key, pos, radius) in screen_nodes {
        let Some(node) = app.graph.node(*key) else {
            continue;
        };
        let [r, g, b] = resolve_color(topics, node);
        painter.circle_filled(*pos, *radius, Color32::from_rgb(r, g, b));

        painter.text(
            *pos + Vec2::new(LABEL_OFFSET_X * app.camera.zoom, 0.0),
            Align2::LEFT_CENTER,
            &node.label,
            FontId::proportional(LABEL_FONT_SIZE * app.camera.zoom),
            Color32::GRAY,
        );
    }
}

/// Closest node whose circle (plus slack) contains the pointer.
fn hit_test(pointer: Pos2, screen_nodes: &[(NodeKey, Pos2, f32)]) -> Option<NodeKey> {
    let mut best: Option<(NodeKey, f32)> = None;
    for (key, pos, radius) in screen_nodes {
        let distance = pointer.distance(*pos);
        if distance <= radius + HIT_SLACK {
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((*key, distance)),
            }
        }
    }
    best.map(|(key, _)| key)
}

/// Draw graph information overlay
fn draw_graph_info(painter: &egui::Painter, rect: egui::Rect, app: &NotegraphApp) {
    let info_text = format!(
        "Nodes: {} | Links: {} | Physics: {} | Zoom: {:.1}x",
        app.graph.node_count(),
        app.graph.link_count(),
        if app.physics_paused {
            "Paused"
        } else if app.simulation.is_settled() {
            "Settled"
        } else {
            "Running"
        },
        app.camera.zoom
    );
    painter.text(
        rect.left_top() + Vec2::new(10.0, 10.0),
        Align2::LEFT_TOP,
        info_text,
        FontId::monospace(12.0),
        Color32::from_rgb(200, 200, 200),
    );
}

fn to_point(pos: Pos2) -> Point2D<f32> {
    Point2D::new(pos.x, pos.y)
}
