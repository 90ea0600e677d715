//! Block-based DOM reconciliation.
//!
//! A render produces a tree of [`Block`]s. The first tree is mounted into a
//! container with [`mount`]; every later render is applied with [`patch`],
//! which updates the mounted tree in place and keeps node identity for
//! everything that survived. Six block kinds exist:
//! - text: one text node;
//! - element: one element built from a shared [`Template`] plus positional
//!   [`Value`] data and optional child blocks;
//! - multi: a fixed number of optional slots;
//! - list: keyed items reconciled with a two-ended diff;
//! - toggler: one child, replaced whenever its toggle key changes;
//! - comment: one static comment node.
//!
//! The engine writes through [`dom::Dom`], so it runs against any backend
//! that offers ordered insertion. Blocks are single-threaded (`!Send`).
//!
//! Contract violations (mismatched shapes, duplicate keys) panic in debug
//! builds and are logged and worked around in release builds, see
//! [`ReconcileError::is_contract_violation`].

mod attributes;
mod block;
mod element;
mod error;
mod list;
mod markup;
mod multi;
mod root;
#[cfg(feature = "debug-stats")]
pub mod stats;
mod template;
mod text;
mod toggler;
mod value;

pub use crate::block::Block;
pub use crate::error::ReconcileError;
pub use crate::root::{mount, patch, remove};
pub use crate::template::{
    Binding, BindingKind, ElementNode, Template, TemplateError, TemplateNode, UpdateProgram,
    MAX_BINDING_INDEX,
};
pub use crate::value::{Handler, NodeRef, Value};
pub use core_types::{Key, NodeId};
