//! Mutation journal records.
//!
//! Every write a [`crate::Document`] applies is recorded here, in order, when
//! journaling is enabled. Tests use the journal to assert how many writes a
//! reconciliation pass performed and of which kind.
//!
//! Invariants:
//! - Records are appended in the exact order the backend applied them.
//! - `InsertBefore`/`AppendChild` are recorded for both fresh insertions and
//!   moves of an already attached node; `moved` tells them apart.
//! - `Remove` frees the subtree; `Detach` only unlinks the node.
//! - `ClearChildren` is a single record regardless of how many children it drops.

use core_types::NodeId;
use std::sync::Arc;

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    CreateElement {
        node: NodeId,
        name: Arc<str>,
    },
    CreateText {
        node: NodeId,
        text: String,
    },
    CreateComment {
        node: NodeId,
        text: String,
    },
    InsertBefore {
        node: NodeId,
        before: NodeId,
        moved: bool,
    },
    AppendChild {
        parent: NodeId,
        node: NodeId,
        moved: bool,
    },
    Detach {
        node: NodeId,
    },
    Remove {
        node: NodeId,
    },
    ClearChildren {
        parent: NodeId,
    },
    SetText {
        node: NodeId,
        text: String,
    },
    SetAttribute {
        node: NodeId,
        name: Arc<str>,
        value: String,
    },
    RemoveAttribute {
        node: NodeId,
        name: Arc<str>,
    },
    AddClass {
        node: NodeId,
        token: String,
    },
    RemoveClass {
        node: NodeId,
        token: String,
    },
    AddListener {
        node: NodeId,
        event: Arc<str>,
    },
}

impl Mutation {
    /// True for records that create a node.
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Mutation::CreateElement { .. }
                | Mutation::CreateText { .. }
                | Mutation::CreateComment { .. }
        )
    }

    /// True for records that relocate an already attached node.
    pub fn is_move(&self) -> bool {
        matches!(
            self,
            Mutation::InsertBefore { moved: true, .. } | Mutation::AppendChild { moved: true, .. }
        )
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Mutation::Remove { .. })
    }
}

/// Aggregate view over a journal slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationCounts {
    pub creates: usize,
    pub inserts: usize,
    pub moves: usize,
    pub removes: usize,
    pub clears: usize,
    pub text_writes: usize,
    pub attribute_writes: usize,
    pub class_writes: usize,
    pub listeners: usize,
}

impl MutationCounts {
    pub fn from_journal(journal: &[Mutation]) -> Self {
        let mut counts = MutationCounts::default();
        for record in journal {
            match record {
                Mutation::CreateElement { .. }
                | Mutation::CreateText { .. }
                | Mutation::CreateComment { .. } => counts.creates += 1,
                Mutation::InsertBefore { moved, .. } | Mutation::AppendChild { moved, .. } => {
                    if *moved {
                        counts.moves += 1;
                    } else {
                        counts.inserts += 1;
                    }
                }
                Mutation::Detach { .. } => {}
                Mutation::Remove { .. } => counts.removes += 1,
                Mutation::ClearChildren { .. } => counts.clears += 1,
                Mutation::SetText { .. } => counts.text_writes += 1,
                Mutation::SetAttribute { .. } | Mutation::RemoveAttribute { .. } => {
                    counts.attribute_writes += 1
                }
                Mutation::AddClass { .. } | Mutation::RemoveClass { .. } => counts.class_writes += 1,
                Mutation::AddListener { .. } => counts.listeners += 1,
            }
        }
        counts
    }

    /// Total number of records that changed the tree or a node's payload.
    pub fn writes(&self) -> usize {
        self.creates
            + self.inserts
            + self.moves
            + self.removes
            + self.clears
            + self.text_writes
            + self.attribute_writes
            + self.class_writes
    }
}
