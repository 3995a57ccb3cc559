/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Application state management for the note graph app.
//!
//! All mutation flows through `AppIntent` values applied by `apply_intents`,
//! keeping event handling (which needs an egui context) separate from state
//! transitions (which don't). The app owns the note store, the view router,
//! the login shim, the camera, and the graph engine; the render layer reads
//! this state and emits intents.

use euclid::default::{Point2D, Vector2D};
use log::{debug, info};

use crate::graph::layout::{ForceSimulation, LayoutConfig, DRAG_ALPHA_TARGET};
use crate::graph::{NodeKey, NoteGraph};
use crate::store::{Note, NoteStore, DEFAULT_ROOT_ID};

/// Which of the three presentation modes is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Graph,
    Notes,
    List,
}

/// Keyboard zoom request, consumed by the graph view (which knows the
/// viewport geometry needed to apply it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomRequest {
    In,
    Out,
    Reset,
}

/// Camera state for the graph view: a pan/zoom transform applied uniformly
/// to the rendered layer, with the scale clamped to the documented bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan: Vector2D<f32>,
    pub zoom: f32,
}

impl Camera {
    pub const ZOOM_MIN: f32 = 0.1;
    pub const ZOOM_MAX: f32 = 4.0;

    pub fn new() -> Self {
        Self {
            pan: Vector2D::zero(),
            zoom: 1.0,
        }
    }

    /// Clamp a zoom value to the allowed range
    pub fn clamp(zoom: f32) -> f32 {
        zoom.clamp(Self::ZOOM_MIN, Self::ZOOM_MAX)
    }

    pub fn world_to_screen(
        &self,
        world: Point2D<f32>,
        viewport_center: Point2D<f32>,
    ) -> Point2D<f32> {
        viewport_center + world.to_vector() * self.zoom + self.pan
    }

    pub fn screen_to_world(
        &self,
        screen: Point2D<f32>,
        viewport_center: Point2D<f32>,
    ) -> Point2D<f32> {
        (((screen - viewport_center) - self.pan) / self.zoom).to_point()
    }

    /// Rescale around a pointer position so the world point under the
    /// pointer stays put.
    pub fn zoom_about(
        &mut self,
        pointer: Point2D<f32>,
        factor: f32,
        viewport_center: Point2D<f32>,
    ) {
        let anchor = self.screen_to_world(pointer, viewport_center);
        self.zoom = Self::clamp(self.zoom * factor);
        let moved = self.world_to_screen(anchor, viewport_center);
        self.pan += pointer - moved;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// State transition requested by a view or the keyboard layer.
#[derive(Debug, Clone, PartialEq)]
pub enum AppIntent {
    SetView(ViewMode),

    /// Create a note under the selected topic/parent and enter edit mode.
    AddNote,
    EditNote(String),
    SaveEdit,
    CancelEdit,
    DeleteNote(String),

    SelectTopic(String),
    SelectParent(String),
    /// Commit the pending new-parent name field.
    SubmitParentName,

    OpenLoginModal,
    CloseLoginModal,
    SubmitLogin,
    Logout,

    DragStart { key: NodeKey },
    DragMove { key: NodeKey, position: Point2D<f32> },
    DragEnd { key: NodeKey },

    RequestZoomIn,
    RequestZoomOut,
    RequestZoomReset,
    TogglePhysics,
    ReheatPhysics,
}

/// Top-level application state.
pub struct NotegraphApp {
    pub store: NoteStore,
    pub active_view: ViewMode,
    pub camera: Camera,

    pub graph: NoteGraph,
    pub simulation: ForceSimulation,
    pub layout_config: LayoutConfig,
    /// Store revision the graph was built from; `None` forces a rebuild.
    graph_revision: Option<u64>,
    pub physics_paused: bool,
    pub dragged_node: Option<NodeKey>,
    pending_zoom_request: Option<ZoomRequest>,

    /// Topic name filter for the editor views (`None` = all topics).
    pub selected_topic: Option<String>,
    pub selected_parent: String,
    /// Draft of the note currently being edited inline.
    pub editing_note: Option<Note>,
    pub new_parent_name: String,

    pub logged_in: bool,
    pub login_modal_open: bool,
    pub login_username: String,
    pub login_password: String,
}

impl NotegraphApp {
    /// Create the app with the demo collections.
    pub fn new() -> Self {
        Self::with_store(NoteStore::with_seed_data())
    }

    pub fn with_store(store: NoteStore) -> Self {
        Self {
            store,
            active_view: ViewMode::Graph,
            camera: Camera::new(),
            graph: NoteGraph::new(),
            simulation: ForceSimulation::default(),
            layout_config: LayoutConfig::default(),
            graph_revision: None,
            physics_paused: false,
            dragged_node: None,
            pending_zoom_request: None,
            selected_topic: None,
            selected_parent: DEFAULT_ROOT_ID.to_string(),
            editing_note: None,
            new_parent_name: String::new(),
            logged_in: false,
            login_modal_open: false,
            login_username: String::new(),
            login_password: String::new(),
        }
    }

    /// Rebuild the graph engine when the collections changed since the last
    /// build. The replaced simulation is dropped, which halts its ticking.
    /// Returns whether a rebuild happened.
    pub fn rebuild_graph_if_needed(&mut self) -> bool {
        if self.graph_revision == Some(self.store.revision()) {
            return false;
        }
        debug!("rebuilding graph at store revision {}", self.store.revision());
        self.graph = NoteGraph::build(&self.store.snapshot());
        self.simulation = ForceSimulation::new(self.layout_config);
        self.dragged_node = None;
        self.graph_revision = Some(self.store.revision());
        true
    }

    /// Advance the layout solver by one step, unless paused or settled.
    /// Returns true while further steps should be scheduled.
    pub fn advance_layout(&mut self) -> bool {
        if self.physics_paused || self.simulation.is_settled() {
            return false;
        }
        self.simulation.step(&mut self.graph);
        !self.simulation.is_settled()
    }

    /// Take the pending keyboard zoom request, if any.
    pub fn take_zoom_request(&mut self) -> Option<ZoomRequest> {
        self.pending_zoom_request.take()
    }

    /// Notes visible in the editor views: filtered by the selected parent
    /// and, when set, the selected topic.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        self.store
            .notes()
            .iter()
            .filter(|note| note.parent_id == self.selected_parent)
            .filter(|note| {
                self.selected_topic
                    .as_deref()
                    .is_none_or(|topic| note.topic == topic)
            })
            .collect()
    }

    pub fn apply_intents<I>(&mut self, intents: I)
    where
        I: IntoIterator<Item = AppIntent>,
    {
        for intent in intents {
            self.apply_intent(intent);
        }
    }

    fn apply_intent(&mut self, intent: AppIntent) {
        match intent {
            AppIntent::SetView(view) => self.set_view(view),
            AppIntent::AddNote => {
                let topic = self
                    .selected_topic
                    .clone()
                    .or_else(|| self.store.topics().first().map(|t| t.name.clone()))
                    .unwrap_or_default();
                let parent = self.selected_parent.clone();
                let note = self.store.create_note(&topic, &parent);
                self.editing_note = Some(note);
            }
            AppIntent::EditNote(id) => {
                self.editing_note = self.store.notes().iter().find(|n| n.id == id).cloned();
            }
            AppIntent::SaveEdit => {
                if let Some(draft) = self.editing_note.take() {
                    self.store.update_note(draft);
                }
            }
            AppIntent::CancelEdit => {
                self.editing_note = None;
            }
            AppIntent::DeleteNote(id) => {
                self.store.delete_note(&id);
                if self.editing_note.as_ref().is_some_and(|n| n.id == id) {
                    self.editing_note = None;
                }
            }
            AppIntent::SelectTopic(name) => {
                self.selected_topic = Some(name);
            }
            AppIntent::SelectParent(id) => {
                self.selected_parent = id;
            }
            AppIntent::SubmitParentName => {
                match self.store.add_parent_node(&self.new_parent_name) {
                    Ok(_) => {
                        self.selected_parent = self.new_parent_name.trim().to_string();
                        self.new_parent_name.clear();
                    }
                    // Empty names are silently ignored, matching the form's
                    // no-op behavior.
                    Err(err) => debug!("parent node rejected: {err}"),
                }
            }
            AppIntent::OpenLoginModal => {
                self.login_modal_open = true;
            }
            AppIntent::CloseLoginModal => {
                self.login_modal_open = false;
                self.login_password.clear();
            }
            AppIntent::SubmitLogin => {
                // Simulated login: any credentials are accepted.
                info!("login attempt: user={}", self.login_username);
                self.logged_in = true;
                self.login_modal_open = false;
                self.login_password.clear();
            }
            AppIntent::Logout => {
                self.logged_in = false;
            }
            AppIntent::DragStart { key } => {
                if let Some(node) = self.graph.node_mut(key) {
                    node.is_pinned = true;
                    node.velocity = Vector2D::zero();
                    self.dragged_node = Some(key);
                    self.simulation.set_alpha_target(DRAG_ALPHA_TARGET);
                }
            }
            AppIntent::DragMove { key, position } => {
                if let Some(node) = self.graph.node_mut(key) {
                    node.position = position;
                    node.velocity = Vector2D::zero();
                }
            }
            AppIntent::DragEnd { key } => {
                if let Some(node) = self.graph.node_mut(key) {
                    node.is_pinned = false;
                }
                self.dragged_node = None;
                self.simulation.set_alpha_target(0.0);
            }
            AppIntent::RequestZoomIn => {
                self.pending_zoom_request = Some(ZoomRequest::In);
            }
            AppIntent::RequestZoomOut => {
                self.pending_zoom_request = Some(ZoomRequest::Out);
            }
            AppIntent::RequestZoomReset => {
                self.pending_zoom_request = Some(ZoomRequest::Reset);
            }
            AppIntent::TogglePhysics => {
                self.physics_paused = !self.physics_paused;
            }
            AppIntent::ReheatPhysics => {
                self.simulation.reheat();
            }
        }
    }

    /// Switch views. Leaving the graph view is the teardown signal for the
    /// running simulation; entering it rebuilds the engine from scratch,
    /// matching the rebuild-on-mount lifecycle.
    fn set_view(&mut self, view: ViewMode) {
        if self.active_view == ViewMode::Graph && view != ViewMode::Graph {
            self.simulation.stop();
        }
        if view == ViewMode::Graph && self.active_view != ViewMode::Graph {
            self.graph_revision = None;
        }
        self.active_view = view;
    }
}

impl Default for NotegraphApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for NotegraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        crate::render::show(ctx, self);
    }
}
