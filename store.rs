/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! In-memory note store.
//!
//! Core structures:
//! - `NoteStore`: state owner for the three collections (notes, topics,
//!   parent nodes); all mutation goes through its command methods
//! - `StoreSnapshot`: immutable copy of the collections handed to views
//! - `Note` / `Topic` / `ParentNode`: the entity types
//!
//! Every command bumps a monotonic revision so consumers (the graph engine
//! in particular) can rebuild exactly when the collections changed and never
//! otherwise. Nothing here is persisted; the store lives and dies with the
//! process.

use log::debug;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of the synthetic grouping root that notes fall back to when
/// their `parent_id` resolves to nothing.
pub const DEFAULT_ROOT_ID: &str = "MY_notes";

/// A single note.
///
/// `topic` joins `Topic::name` rather than `Topic::id`; the color lookup in
/// the graph view relies on topic names being unique, which is not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Unique note identity (UUID v4 at creation; uniqueness not re-checked).
    pub id: String,

    pub title: String,

    pub content: String,

    /// Topic *name* this note belongs to (may match no topic).
    pub topic: String,

    /// Parent node this note hangs off (may dangle).
    pub parent_id: String,
}

/// A topic used to group and color notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: String,

    /// Display name; used as the join key from `Note::topic`.
    pub name: String,

    /// CSS-style `#rrggbb` color.
    pub color: String,
}

/// A grouping root that notes attach to in the graph view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentNode {
    pub id: String,
}

/// Validation failures for store commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("parent node name must not be empty")]
    EmptyParentName,
}

/// Immutable view of the collections at a given revision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub notes: Vec<Note>,
    pub topics: Vec<Topic>,
    pub parent_nodes: Vec<ParentNode>,
    pub revision: u64,
}

/// Owner of all note state.
///
/// Commands follow last-write-wins semantics with no optimistic concurrency:
/// `update_note` replaces by id (no-op when the id is unknown), `delete_note`
/// removes exactly the matching note. The only validation anywhere is the
/// non-empty name required by `add_parent_node`.
#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    topics: Vec<Topic>,
    parent_nodes: Vec<ParentNode>,
    revision: u64,
}

impl NoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the demo collections.
    pub fn with_seed_data() -> Self {
        let mut store = Self::new();
        store.notes = vec![
            Note {
                id: "1".to_string(),
                title: "Introduction to ML".to_string(),
                content: "Machine Learning is...".to_string(),
                topic: "ML".to_string(),
                parent_id: DEFAULT_ROOT_ID.to_string(),
            },
            Note {
                id: "2".to_string(),
                title: "SQL Basics".to_string(),
                content: "SQL stands for...".to_string(),
                topic: "SQL".to_string(),
                parent_id: DEFAULT_ROOT_ID.to_string(),
            },
            Note {
                id: "3".to_string(),
                title: "DP Concepts".to_string(),
                content: "Dynamic Programming is...".to_string(),
                topic: "DP".to_string(),
                parent_id: DEFAULT_ROOT_ID.to_string(),
            },
        ];
        store.topics = vec![
            Topic {
                id: "1".to_string(),
                name: "ML".to_string(),
                color: "#ff9999".to_string(),
            },
            Topic {
                id: "2".to_string(),
                name: "SQL".to_string(),
                color: "#99ff99".to_string(),
            },
            Topic {
                id: "3".to_string(),
                name: "DP".to_string(),
                color: "#9999ff".to_string(),
            },
        ];
        store.parent_nodes = vec![ParentNode {
            id: DEFAULT_ROOT_ID.to_string(),
        }];
        store
    }

    /// Revision of the current collections. Bumped by every command.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn parent_nodes(&self) -> &[ParentNode] {
        &self.parent_nodes
    }

    /// Copy out the collections for consumers that outlive a borrow.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            notes: self.notes.clone(),
            topics: self.topics.clone(),
            parent_nodes: self.parent_nodes.clone(),
            revision: self.revision,
        }
    }

    /// Create a fresh note under the given topic and parent and append it.
    ///
    /// The note starts titled "New Note" with empty content, mirroring the
    /// editor's add flow. Returns the created note so the caller can enter
    /// edit mode on it.
    pub fn create_note(&mut self, topic: &str, parent_id: &str) -> Note {
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: "New Note".to_string(),
            content: String::new(),
            topic: topic.to_string(),
            parent_id: parent_id.to_string(),
        };
        self.add_note(note.clone());
        note
    }

    /// Append a note. No identity or referential checks.
    pub fn add_note(&mut self, note: Note) -> StoreSnapshot {
        debug!("store: add note id={} topic={}", note.id, note.topic);
        self.notes.push(note);
        self.bump();
        self.snapshot()
    }

    /// Replace the note with the same id. Unknown ids are a silent no-op
    /// (last write wins, nothing to reconcile).
    pub fn update_note(&mut self, updated: Note) -> StoreSnapshot {
        debug!("store: update note id={}", updated.id);
        for note in &mut self.notes {
            if note.id == updated.id {
                *note = updated;
                break;
            }
        }
        self.bump();
        self.snapshot()
    }

    /// Remove exactly the note with the given id, if present.
    pub fn delete_note(&mut self, id: &str) -> StoreSnapshot {
        debug!("store: delete note id={id}");
        self.notes.retain(|note| note.id != id);
        self.bump();
        self.snapshot()
    }

    /// Add a grouping root. The trimmed name doubles as its identifier and
    /// must be non-empty; this is the store's only validation rule.
    pub fn add_parent_node(&mut self, name: &str) -> Result<StoreSnapshot, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyParentName);
        }
        debug!("store: add parent node id={name}");
        self.parent_nodes.push(ParentNode {
            id: name.to_string(),
        });
        self.bump();
        Ok(self.snapshot())
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
