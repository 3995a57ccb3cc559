/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Force-directed layout solver for the note graph.
//!
//! Core structures:
//! - `ForceSimulation`: discrete-step relaxation with three composed forces
//!   (link spring, pairwise charge repulsion, centering) and exponential
//!   alpha decay
//! - `LayoutConfig`: tunable force parameters
//!
//! The solver is renderer-agnostic: it only mutates `GraphNode` positions
//! and velocities, one `step` at a time, and the host decides when to stop
//! scheduling steps (`is_settled`). Dragging pins a node (the gesture owns
//! its position) and raises `alpha_target` so the rest of the layout reacts;
//! releasing returns the target to zero and the simulation cools back down.

use euclid::default::{Point2D, Vector2D};

use super::{NodeKey, NoteGraph};

/// Force parameters for the layout solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Target length of a link between a parent and a note.
    pub link_distance: f32,

    /// Pairwise repulsion strength (negative repels).
    pub charge_strength: f32,

    /// How strongly the layout centroid is pulled onto `center`.
    pub center_strength: f32,

    /// Centering target in graph space.
    pub center: Point2D<f32>,

    /// Simulation is settled once alpha falls below this.
    pub alpha_min: f32,

    /// Per-step interpolation factor toward `alpha_target`.
    pub alpha_decay: f32,

    /// Fraction of velocity lost per step.
    pub velocity_decay: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min: f32 = 0.001;
        Self {
            link_distance: 100.0,
            charge_strength: -300.0,
            center_strength: 1.0,
            center: Point2D::origin(),
            alpha_min,
            // Reaches alpha_min from 1.0 in ~300 steps.
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
        }
    }
}

/// Alpha target applied while a drag gesture is active.
pub const DRAG_ALPHA_TARGET: f32 = 0.3;

/// Discrete-step force relaxation over a `NoteGraph`.
///
/// Kinetic energy is modelled by `alpha`, which interpolates toward
/// `alpha_target` each step; with the default target of zero the simulation
/// decays exponentially and settles below `alpha_min` in a bounded number
/// of steps.
#[derive(Debug, Clone)]
pub struct ForceSimulation {
    config: LayoutConfig,
    alpha: f32,
    alpha_target: f32,
}

impl ForceSimulation {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            alpha: 1.0,
            alpha_target: 0.0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// True once the simulation has cooled below `alpha_min` with no heat
    /// source; the host stops scheduling steps then.
    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
    }

    /// Restart the decay from full energy (manual reheat).
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    /// Hold the simulation at a minimum energy level (used by drag: a
    /// non-zero target keeps the layout reacting for the gesture duration).
    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target;
    }

    /// Drop all remaining energy; `is_settled` is true afterwards.
    pub fn stop(&mut self) {
        self.alpha = 0.0;
        self.alpha_target = 0.0;
    }

    /// Advance the relaxation by one step.
    ///
    /// No-op when settled or when the graph is empty. Pinned nodes hold
    /// their position with zero velocity (the centering translation is
    /// undone for them after the force pass); forces still act on
    /// everything else around them.
    pub fn step(&mut self, graph: &mut NoteGraph) {
        if self.is_settled() || graph.node_count() == 0 {
            return;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        let pinned: Vec<(NodeKey, Point2D<f32>)> = graph
            .nodes()
            .filter(|(_, node)| node.is_pinned)
            .map(|(key, node)| (key, node.position))
            .collect();

        self.apply_link_force(graph);
        self.apply_charge_force(graph);
        self.apply_center_force(graph);

        let velocity_keep = 1.0 - self.config.velocity_decay;
        let keys: Vec<NodeKey> = graph.node_keys().collect();
        for key in keys {
            if let Some(node) = graph.node_mut(key) {
                if node.is_pinned {
                    node.velocity = Vector2D::zero();
                    continue;
                }
                node.velocity *= velocity_keep;
                node.position += node.velocity;
            }
        }
        for (key, position) in pinned {
            if let Some(node) = graph.node_mut(key) {
                node.position = position;
            }
        }
    }

    /// Spring each link toward `link_distance`. Spring strength is the
    /// inverse of the smaller endpoint degree, and the correction is split
    /// between the endpoints in proportion to their degrees, so high-degree
    /// hubs move less than their leaves.
    fn apply_link_force(&self, graph: &mut NoteGraph) {
        let degrees = node_degrees(graph);
        let links: Vec<(NodeKey, NodeKey)> = graph.links().map(|l| (l.from, l.to)).collect();

        for (from, to) in links {
            let (Some(source), Some(target)) = (graph.node(from), graph.node(to)) else {
                continue;
            };
            let mut delta =
                (target.position + target.velocity) - (source.position + source.velocity);
            if delta.square_length() == 0.0 {
                delta = COINCIDENT_EPSILON;
            }

            let deg_source = degrees.get(&from).copied().unwrap_or(1) as f32;
            let deg_target = degrees.get(&to).copied().unwrap_or(1) as f32;
            let strength = 1.0 / deg_source.min(deg_target);
            let bias = deg_source / (deg_source + deg_target);

            let length = delta.length();
            let correction =
                delta * ((length - self.config.link_distance) / length * self.alpha * strength);

            if let Some(target) = graph.node_mut(to) {
                target.velocity -= correction * bias;
            }
            if let Some(source) = graph.node_mut(from) {
                source.velocity += correction * (1.0 - bias);
            }
        }
    }

    /// Pairwise repulsion scaled by alpha over squared distance. Node counts
    /// here stay small enough that the quadratic pass beats the bookkeeping
    /// of an approximation tree.
    fn apply_charge_force(&self, graph: &mut NoteGraph) {
        let snapshot: Vec<(NodeKey, Point2D<f32>)> = graph
            .nodes()
            .map(|(key, node)| (key, node.position))
            .collect();

        for i in 0..snapshot.len() {
            for j in (i + 1)..snapshot.len() {
                let (key_i, pos_i) = snapshot[i];
                let (key_j, pos_j) = snapshot[j];
                let mut delta = pos_j - pos_i;
                if delta.square_length() == 0.0 {
                    delta = COINCIDENT_EPSILON;
                }
                let distance_sq = delta.square_length().max(1.0);
                let weight = self.config.charge_strength * self.alpha / distance_sq;

                if let Some(node) = graph.node_mut(key_i) {
                    node.velocity += delta * weight;
                }
                if let Some(node) = graph.node_mut(key_j) {
                    node.velocity -= delta * weight;
                }
            }
        }
    }

    /// Translate all positions so the centroid moves onto the configured
    /// center. Acts on positions directly, not velocities, so it adds no
    /// kinetic energy of its own.
    fn apply_center_force(&self, graph: &mut NoteGraph) {
        let count = graph.node_count();
        if count == 0 {
            return;
        }
        let mut sum = Vector2D::zero();
        for (_, node) in graph.nodes() {
            sum += node.position.to_vector();
        }
        let centroid = sum / count as f32;
        let shift = (centroid - self.config.center.to_vector()) * self.config.center_strength;

        let keys: Vec<NodeKey> = graph.node_keys().collect();
        for key in keys {
            if let Some(node) = graph.node_mut(key) {
                node.position -= shift;
            }
        }
    }
}

impl Default for ForceSimulation {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

// Separates exactly coincident nodes; any fixed non-zero offset breaks the
// symmetry without needing a RNG.
const COINCIDENT_EPSILON: Vector2D<f32> = Vector2D::new(1e-6, 1e-6);

fn node_degrees(graph: &NoteGraph) -> std::collections::HashMap<NodeKey, usize> {
    let mut degrees = std::collections::HashMap::new();
    for link in graph.links() {
        *degrees.entry(link.from).or_insert(0) += 1;
        *degrees.entry(link.to).or_insert(0) += 1;
    }
    degrees
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Note, ParentNode, StoreSnapshot};

    fn note(id: &str, parent: &str) -> Note {
        Note {
            id: id.to_string(),
            title: format!("Note {id}"),
            content: String::new(),
            topic: "ML".to_string(),
            parent_id: parent.to_string(),
        }
    }

    fn two_node_graph() -> NoteGraph {
        NoteGraph::build(&StoreSnapshot {
            notes: vec![note("1", "root")],
            topics: Vec::new(),
            parent_nodes: vec![ParentNode {
                id: "root".to_string(),
            }],
            revision: 0,
        })
    }

    fn run_to_settled(sim: &mut ForceSimulation, graph: &mut NoteGraph, max_steps: usize) -> usize {
        for step in 0..max_steps {
            if sim.is_settled() {
                return step;
            }
            sim.step(graph);
        }
        max_steps
    }

    #[test]
    fn test_alpha_decays_below_min_within_bounded_steps() {
        let mut graph = two_node_graph();
        let mut sim = ForceSimulation::default();
        let steps = run_to_settled(&mut sim, &mut graph, 400);
        assert!(steps <= 310, "took {steps} steps to settle");
        assert!(sim.is_settled());
    }

    #[test]
    fn test_step_on_empty_graph_does_not_panic() {
        let mut graph = NoteGraph::new();
        let mut sim = ForceSimulation::default();
        sim.step(&mut graph);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_linked_nodes_settle_near_link_distance() {
        let mut graph = two_node_graph();
        let mut sim = ForceSimulation::default();
        run_to_settled(&mut sim, &mut graph, 400);

        let positions: Vec<_> = graph.nodes().map(|(_, n)| n.position).collect();
        let distance = (positions[0] - positions[1]).length();
        assert!(
            (80.0..200.0).contains(&distance),
            "settled distance {distance}"
        );
    }

    #[test]
    fn test_centroid_settles_on_center() {
        let mut graph = two_node_graph();
        let mut sim = ForceSimulation::default();
        run_to_settled(&mut sim, &mut graph, 400);

        let mut sum = Vector2D::<f32>::zero();
        for (_, node) in graph.nodes() {
            sum += node.position.to_vector();
        }
        let centroid = sum / graph.node_count() as f32;
        assert!(centroid.length() < 1.0, "centroid drifted to {centroid:?}");
    }

    #[test]
    fn test_pinned_node_holds_position() {
        let mut graph = two_node_graph();
        let (key, _) = graph.node_by_id("root").unwrap();
        let pinned_at = Point2D::new(40.0, -25.0);
        {
            let node = graph.node_mut(key).unwrap();
            node.position = pinned_at;
            node.is_pinned = true;
        }

        let mut sim = ForceSimulation::default();
        for _ in 0..50 {
            sim.step(&mut graph);
        }

        let node = graph.node(key).unwrap();
        assert_eq!(node.position, pinned_at);
        assert_eq!(node.velocity, Vector2D::zero());
    }

    #[test]
    fn test_unpinned_neighbors_still_move_around_pinned_node() {
        let mut graph = two_node_graph();
        let (root_key, _) = graph.node_by_id("root").unwrap();
        graph.node_mut(root_key).unwrap().is_pinned = true;
        let (note_key, _) = graph.node_by_id("1").unwrap();
        let before = graph.node(note_key).unwrap().position;

        let mut sim = ForceSimulation::default();
        for _ in 0..10 {
            sim.step(&mut graph);
        }

        let after = graph.node(note_key).unwrap().position;
        assert_ne!(before, after);
    }

    #[test]
    fn test_alpha_target_keeps_simulation_hot() {
        let mut graph = two_node_graph();
        let mut sim = ForceSimulation::default();
        run_to_settled(&mut sim, &mut graph, 400);
        assert!(sim.is_settled());

        sim.set_alpha_target(DRAG_ALPHA_TARGET);
        assert!(!sim.is_settled());
        for _ in 0..100 {
            sim.step(&mut graph);
        }
        // Alpha converges on the target, not on zero.
        assert!(sim.alpha() > sim.config().alpha_min);

        sim.set_alpha_target(0.0);
        run_to_settled(&mut sim, &mut graph, 400);
        assert!(sim.is_settled());
    }

    #[test]
    fn test_reheat_restarts_decay() {
        let mut graph = two_node_graph();
        let mut sim = ForceSimulation::default();
        run_to_settled(&mut sim, &mut graph, 400);

        sim.reheat();
        assert!(!sim.is_settled());
        assert_eq!(sim.alpha(), 1.0);
    }

    #[test]
    fn test_stop_settles_immediately() {
        let mut graph = two_node_graph();
        let mut sim = ForceSimulation::default();
        sim.step(&mut graph);
        sim.stop();
        assert!(sim.is_settled());

        let before: Vec<_> = graph.nodes().map(|(_, n)| n.position).collect();
        sim.step(&mut graph);
        let after: Vec<_> = graph.nodes().map(|(_, n)| n.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_coincident_nodes_separate() {
        let mut graph = two_node_graph();
        let origin = Point2D::new(0.0, 0.0);
        let keys: Vec<_> = graph.node_keys().collect();
        for key in &keys {
            graph.node_mut(*key).unwrap().position = origin;
        }

        let mut sim = ForceSimulation::default();
        for _ in 0..20 {
            sim.step(&mut graph);
        }

        let positions: Vec<_> = graph.nodes().map(|(_, n)| n.position).collect();
        assert!((positions[0] - positions[1]).length() > 1.0);
    }
}
