//! Tree backend for the block reconciliation engine.
//!
//! [`Dom`] is the minimal ordered-insertion interface the engine needs.
//! [`Document`] is an arena implementation that also keeps an optional
//! journal of every applied [`Mutation`], which is what the engine's tests
//! assert against.

mod backend;
mod document;
mod event;
mod mutation;
pub mod serialize;

use core_types::NodeId;
use std::fmt;

pub use crate::backend::Dom;
pub use crate::document::{Document, DocumentConfig, NodeView};
pub use crate::event::{Event, Listener};
pub use crate::mutation::{Mutation, MutationCounts};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    MissingNode(NodeId),
    WrongNodeKind(NodeId),
    InvalidParent(NodeId),
    CycleDetected {
        parent: NodeId,
        child: NodeId,
    },
    /// `node` was expected to be a child of `parent` (or of any parent).
    NotAChild {
        parent: Option<NodeId>,
        node: NodeId,
    },
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::MissingNode(node) => write!(f, "node {node} is not alive"),
            DomError::WrongNodeKind(node) => write!(f, "node {node} has the wrong kind"),
            DomError::InvalidParent(node) => write!(f, "node {node} cannot hold children"),
            DomError::CycleDetected { parent, child } => {
                write!(f, "inserting {child} under {parent} would create a cycle")
            }
            DomError::NotAChild {
                parent: Some(parent),
                node,
            } => write!(f, "node {node} is not a child of {parent}"),
            DomError::NotAChild { parent: None, node } => {
                write!(f, "node {node} has no parent")
            }
        }
    }
}

impl std::error::Error for DomError {}
