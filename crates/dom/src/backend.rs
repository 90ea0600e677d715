//! The ordered-insertion interface the reconciliation engine is written against.
//!
//! Semantics follow the browser DOM where it matters to the engine:
//! - `insert_before`/`append_child` on a node that is already attached moves it;
//!   the node keeps its identity.
//! - `remove` unlinks and frees the node together with its subtree.
//! - `detach` only unlinks; the node may be inserted again later.
//! - `clear_children` drops every child of a parent in one step.

use crate::DomError;
use crate::event::Listener;
use core_types::NodeId;

pub trait Dom {
    fn create_element(&mut self, name: &str) -> NodeId;
    fn create_text(&mut self, text: &str) -> NodeId;
    fn create_comment(&mut self, text: &str) -> NodeId;

    /// Empty text node used as a positional marker.
    fn create_anchor(&mut self) -> NodeId {
        self.create_text("")
    }

    /// Insert `node` into `before`'s parent, immediately before `before`.
    fn insert_before(&mut self, node: NodeId, before: NodeId) -> Result<(), DomError>;
    fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError>;
    fn detach(&mut self, node: NodeId) -> Result<(), DomError>;
    fn remove(&mut self, node: NodeId) -> Result<(), DomError>;
    fn clear_children(&mut self, parent: NodeId) -> Result<(), DomError>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn first_child(&self, node: NodeId) -> Option<NodeId>;
    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError>;
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError>;
    fn add_class(&mut self, node: NodeId, token: &str) -> Result<(), DomError>;
    fn remove_class(&mut self, node: NodeId, token: &str) -> Result<(), DomError>;
    fn add_listener(
        &mut self,
        node: NodeId,
        event: &str,
        listener: Listener,
    ) -> Result<(), DomError>;
}
