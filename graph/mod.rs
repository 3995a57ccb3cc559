/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph data structures for the note graph view.
//!
//! Core structures:
//! - `NoteGraph`: node-link graph backed by petgraph::StableGraph, built
//!   from a store snapshot (one node per parent, one node per note, one
//!   link per note to its resolved parent)
//! - `GraphNode`: positioned node with velocity and pin state for the
//!   force simulation
//!
//! Construction masks dangling parent references: a note whose `parent_id`
//! matches no parent node is attached to the synthetic default root instead
//! of being dropped. The mask is logged but never surfaced.

use std::collections::HashMap;
use std::f32::consts::PI;

use euclid::default::{Point2D, Vector2D};
use log::warn;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Directed;

use crate::store::{StoreSnapshot, Topic, DEFAULT_ROOT_ID};

pub mod layout;

/// Stable node handle (petgraph NodeIndex — survives other deletions)
pub type NodeKey = NodeIndex;

/// Stable edge handle (petgraph EdgeIndex)
pub type EdgeKey = EdgeIndex;

/// Radius of a parent (grouping root) node.
pub const PARENT_NODE_RADIUS: f32 = 15.0;

/// Radius of a note node.
pub const NOTE_NODE_RADIUS: f32 = 10.0;

/// Fill color of parent nodes (`#666`).
pub const PARENT_COLOR: [u8; 3] = [0x66, 0x66, 0x66];

/// Fallback fill color for notes without a matching topic (`#ccc`).
pub const FALLBACK_COLOR: [u8; 3] = [0xcc, 0xcc, 0xcc];

// Phyllotaxis seeding constants (golden-angle spiral).
const INITIAL_RADIUS: f32 = 10.0;
const INITIAL_ANGLE: f32 = PI * (3.0 - 2.236_068);

/// A positioned node in the note graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Entity id this node was built from (note id or parent id).
    pub id: String,

    /// Label rendered next to the node (note title, or the parent id).
    pub label: String,

    /// Topic name used for color lookup. Empty for parents.
    pub group: String,

    /// Parent nodes render larger and in a fixed color.
    pub is_parent: bool,

    /// Position in graph space
    pub position: Point2D<f32>,

    /// Velocity for the force simulation
    pub velocity: Vector2D<f32>,

    /// Whether this node's position is pinned (doesn't move with physics)
    pub is_pinned: bool,
}

impl GraphNode {
    pub fn radius(&self) -> f32 {
        if self.is_parent {
            PARENT_NODE_RADIUS
        } else {
            NOTE_NODE_RADIUS
        }
    }
}

/// Read-only view of a link (built from petgraph edge references)
#[derive(Debug, Clone, Copy)]
pub struct LinkView {
    pub from: NodeKey,
    pub to: NodeKey,
}

/// Node-link graph over the note collections.
#[derive(Debug, Clone, Default)]
pub struct NoteGraph {
    inner: StableGraph<GraphNode, (), Directed>,
    id_to_node: HashMap<String, NodeKey>,
}

impl NoteGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a store snapshot.
    ///
    /// Node set: one node per parent (flagged, larger radius) plus one node
    /// per note (grouped by topic name). Link set: one edge per note from
    /// its resolved parent to the note. Empty collections produce an empty
    /// graph. Initial positions follow the deterministic phyllotaxis spiral
    /// so layout runs are reproducible.
    pub fn build(snapshot: &StoreSnapshot) -> Self {
        let mut graph = Self::new();

        for parent in &snapshot.parent_nodes {
            graph.insert_node(parent.id.clone(), parent.id.clone(), String::new(), true);
        }
        for note in &snapshot.notes {
            graph.insert_node(
                note.id.clone(),
                note.title.clone(),
                note.topic.clone(),
                false,
            );
        }

        for note in &snapshot.notes {
            let parent_key = match graph.id_to_node.get(note.parent_id.as_str()).copied() {
                Some(key) => key,
                None => {
                    warn!(
                        "note {} references missing parent {:?}; attaching to {DEFAULT_ROOT_ID}",
                        note.id, note.parent_id
                    );
                    graph.ensure_default_root()
                }
            };
            let Some(note_key) = graph.id_to_node.get(note.id.as_str()).copied() else {
                continue;
            };
            graph.inner.add_edge(parent_key, note_key, ());
        }

        graph
    }

    /// Get a node by key
    pub fn node(&self, key: NodeKey) -> Option<&GraphNode> {
        self.inner.node_weight(key)
    }

    /// Get a mutable node by key
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut GraphNode> {
        self.inner.node_weight_mut(key)
    }

    /// Get a node and its key by entity id.
    pub fn node_by_id(&self, id: &str) -> Option<(NodeKey, &GraphNode)> {
        let key = *self.id_to_node.get(id)?;
        Some((key, self.inner.node_weight(key)?))
    }

    /// Iterate over all nodes as (key, node) pairs
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &GraphNode)> {
        self.inner
            .node_indices()
            .map(move |idx| (idx, &self.inner[idx]))
    }

    /// Iterate over all node keys.
    pub fn node_keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.inner.node_indices()
    }

    /// Iterate over all links as LinkView
    pub fn links(&self) -> impl Iterator<Item = LinkView> + '_ {
        self.inner.edge_references().map(|e| LinkView {
            from: e.source(),
            to: e.target(),
        })
    }

    /// Count of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Count of links in the graph
    pub fn link_count(&self) -> usize {
        self.inner.edge_count()
    }

    fn insert_node(&mut self, id: String, label: String, group: String, is_parent: bool) -> NodeKey {
        let position = phyllotaxis_position(self.inner.node_count());
        let key = self.inner.add_node(GraphNode {
            id: id.clone(),
            label,
            group,
            is_parent,
            position,
            velocity: Vector2D::zero(),
            is_pinned: false,
        });
        self.id_to_node.insert(id, key);
        key
    }

    /// Key of the default root, creating the synthetic node on first use.
    fn ensure_default_root(&mut self) -> NodeKey {
        if let Some(key) = self.id_to_node.get(DEFAULT_ROOT_ID) {
            return *key;
        }
        self.insert_node(
            DEFAULT_ROOT_ID.to_string(),
            DEFAULT_ROOT_ID.to_string(),
            String::new(),
            true,
        )
    }
}

/// Deterministic initial placement on a golden-angle phyllotaxis spiral:
/// every node gets a distinct position, densest near the center.
fn phyllotaxis_position(index: usize) -> Point2D<f32> {
    let i = index as f32;
    let radius = INITIAL_RADIUS * (0.5 + i).sqrt();
    let angle = i * INITIAL_ANGLE;
    Point2D::new(radius * angle.cos(), radius * angle.sin())
}

/// Resolve a node's fill color against the topic list.
///
/// Parents use a fixed color; notes join on the topic *name* and fall back
/// to a neutral gray when no topic matches or the color string is invalid.
pub fn resolve_color(topics: &[Topic], node: &GraphNode) -> [u8; 3] {
    if node.is_parent {
        return PARENT_COLOR;
    }
    topics
        .iter()
        .find(|topic| topic.name == node.group)
        .and_then(|topic| parse_hex_color(&topic.color))
        .unwrap_or(FALLBACK_COLOR)
}

/// Parse a `#rrggbb` color string.
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Note, NoteStore, ParentNode};

    fn note(id: &str, topic: &str, parent: &str) -> Note {
        Note {
            id: id.to_string(),
            title: format!("Note {id}"),
            content: String::new(),
            topic: topic.to_string(),
            parent_id: parent.to_string(),
        }
    }

    fn snapshot(notes: Vec<Note>, parents: Vec<&str>) -> StoreSnapshot {
        StoreSnapshot {
            notes,
            topics: Vec::new(),
            parent_nodes: parents
                .into_iter()
                .map(|id| ParentNode { id: id.to_string() })
                .collect(),
            revision: 0,
        }
    }

    #[test]
    fn test_empty_snapshot_builds_empty_graph() {
        let graph = NoteGraph::build(&StoreSnapshot::default());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn test_single_note_single_parent_scenario() {
        let graph = NoteGraph::build(&snapshot(vec![note("1", "ML", "root")], vec!["root"]));

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.link_count(), 1);

        let (root_key, root) = graph.node_by_id("root").unwrap();
        let (note_key, _) = graph.node_by_id("1").unwrap();
        assert!(root.is_parent);

        let link = graph.links().next().unwrap();
        assert_eq!(link.from, root_key);
        assert_eq!(link.to, note_key);
    }

    #[test]
    fn test_dangling_parent_attaches_to_synthetic_root() {
        let graph = NoteGraph::build(&snapshot(vec![note("1", "ML", "missing")], vec![]));

        // The note plus the synthesized default root.
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.link_count(), 1);

        let (root_key, root) = graph.node_by_id(DEFAULT_ROOT_ID).unwrap();
        assert!(root.is_parent);
        let link = graph.links().next().unwrap();
        assert_eq!(link.from, root_key);
    }

    #[test]
    fn test_dangling_parent_prefers_existing_default_root() {
        let graph = NoteGraph::build(&snapshot(
            vec![note("1", "ML", "missing")],
            vec![DEFAULT_ROOT_ID],
        ));

        assert_eq!(graph.node_count(), 2);
        let (root_key, _) = graph.node_by_id(DEFAULT_ROOT_ID).unwrap();
        assert_eq!(graph.links().next().unwrap().from, root_key);
    }

    #[test]
    fn test_one_link_per_note() {
        let graph = NoteGraph::build(&snapshot(
            vec![
                note("1", "ML", "root"),
                note("2", "SQL", "root"),
                note("3", "DP", "other"),
            ],
            vec!["root", "other"],
        ));

        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.link_count(), 3);
    }

    #[test]
    fn test_seed_data_builds_expected_shape() {
        let graph = NoteGraph::build(&NoteStore::with_seed_data().snapshot());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.link_count(), 3);
    }

    #[test]
    fn test_node_radii_by_kind() {
        let graph = NoteGraph::build(&snapshot(vec![note("1", "ML", "root")], vec!["root"]));
        let (_, root) = graph.node_by_id("root").unwrap();
        let (_, leaf) = graph.node_by_id("1").unwrap();
        assert_eq!(root.radius(), PARENT_NODE_RADIUS);
        assert_eq!(leaf.radius(), NOTE_NODE_RADIUS);
    }

    #[test]
    fn test_initial_positions_are_deterministic_and_distinct() {
        let build = || {
            NoteGraph::build(&snapshot(
                vec![note("1", "ML", "root"), note("2", "SQL", "root")],
                vec!["root"],
            ))
        };
        let a = build();
        let b = build();

        for (key, node) in a.nodes() {
            let other = b.node(key).unwrap();
            assert_eq!(node.position, other.position);
        }

        let positions: Vec<Point2D<f32>> = a.nodes().map(|(_, n)| n.position).collect();
        assert_ne!(positions[0], positions[1]);
    }

    #[test]
    fn test_resolve_color_joins_on_topic_name() {
        let topics = vec![Topic {
            id: "7".to_string(),
            name: "ML".to_string(),
            color: "#ff9999".to_string(),
        }];
        let graph = NoteGraph::build(&snapshot(vec![note("1", "ML", "root")], vec!["root"]));

        let (_, leaf) = graph.node_by_id("1").unwrap();
        assert_eq!(resolve_color(&topics, leaf), [0xff, 0x99, 0x99]);

        let (_, root) = graph.node_by_id("root").unwrap();
        assert_eq!(resolve_color(&topics, root), PARENT_COLOR);
    }

    #[test]
    fn test_resolve_color_falls_back_for_unknown_topic() {
        let topics = vec![Topic {
            id: "7".to_string(),
            name: "ML".to_string(),
            color: "#ff9999".to_string(),
        }];
        let graph = NoteGraph::build(&snapshot(vec![note("1", "Rust", "root")], vec!["root"]));
        let (_, leaf) = graph.node_by_id("1").unwrap();
        assert_eq!(resolve_color(&topics, leaf), FALLBACK_COLOR);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff9999"), Some([0xff, 0x99, 0x99]));
        assert_eq!(parse_hex_color("#000000"), Some([0, 0, 0]));
        assert_eq!(parse_hex_color("ff9999"), None);
        assert_eq!(parse_hex_color("#ccc"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }
}
