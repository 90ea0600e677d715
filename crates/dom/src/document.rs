use crate::backend::Dom;
use crate::event::{Event, Listener};
use crate::mutation::Mutation;
use crate::DomError;
use core_types::NodeId;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentConfig {
    /// Record every applied write in the mutation journal.
    pub journal: bool,
}

/// Arena-backed document tree.
///
/// Node handles are indices into the arena and are never reused, so a stale
/// handle is always detected as a missing node rather than aliasing a new one.
pub struct Document {
    config: DocumentConfig,
    nodes: Vec<NodeRecord>,
    root: NodeId,
    live: usize,
    journal: Vec<Mutation>,
}

/// Read-only view of a node's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeView<'a> {
    Root,
    Element {
        name: &'a str,
        attributes: &'a [(Arc<str>, String)],
    },
    Text(&'a str),
    Comment(&'a str),
}

impl Document {
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Document with the mutation journal enabled.
    pub fn journaled() -> Self {
        Self::with_config(DocumentConfig { journal: true })
    }

    pub fn with_config(config: DocumentConfig) -> Self {
        let mut doc = Self {
            config,
            nodes: Vec::new(),
            root: NodeId(0),
            live: 0,
            journal: Vec::new(),
        };
        doc.root = doc.alloc(NodeKind::Root);
        doc
    }

    pub fn config(&self) -> DocumentConfig {
        self.config
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_live(&self, node: NodeId) -> bool {
        self.nodes.get(node.index()).is_some_and(|record| record.live)
    }

    /// Number of nodes currently alive, the root included.
    pub fn live_nodes(&self) -> usize {
        self.live
    }

    pub fn view(&self, node: NodeId) -> Option<NodeView<'_>> {
        let record = self.record(node)?;
        Some(match &record.kind {
            NodeKind::Root => NodeView::Root,
            NodeKind::Element { name, attributes } => NodeView::Element {
                name: &**name,
                attributes: attributes.as_slice(),
            },
            NodeKind::Text { text } => NodeView::Text(text.as_str()),
            NodeKind::Comment { text } => NodeView::Comment(text.as_str()),
        })
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.record(node)
            .map(|record| record.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.record(node)?.kind {
            NodeKind::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.record(node)?.kind {
            NodeKind::Element { name, .. } => Some(&**name),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.record(node)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(attr, _)| &**attr == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.attribute(node, "class")
            .map(|value| value.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.record(node).map_or(0, |record| record.listeners.len())
    }

    pub fn journal(&self) -> &[Mutation] {
        &self.journal
    }

    pub fn take_journal(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Deliver `name` to `target`, then bubble through its ancestors.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, target: NodeId, name: &str) -> usize {
        let mut pending = Vec::new();
        let mut current = Some(target);
        while let Some(node) = current {
            let Some(record) = self.record(node) else {
                break;
            };
            for (event, listener) in &record.listeners {
                if &**event == name {
                    pending.push((node, listener.clone()));
                }
            }
            current = record.parent;
        }
        let event_name: Arc<str> = Arc::from(name);
        for (node, listener) in &pending {
            listener.call(&Event {
                name: Arc::clone(&event_name),
                target,
                current_target: *node,
            });
        }
        pending.len()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
            live: true,
        });
        self.live += 1;
        id
    }

    fn record(&self, node: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(node.index()).filter(|record| record.live)
    }

    fn push_record(&mut self, make: impl FnOnce() -> Mutation) {
        if self.config.journal {
            self.journal.push(make());
        }
    }

    fn ensure_live(&self, node: NodeId) -> Result<(), DomError> {
        if !self.is_live(node) {
            debug_assert!(false, "missing node {node}");
            return Err(DomError::MissingNode(node));
        }
        Ok(())
    }

    fn is_descendant(&self, ancestor: NodeId, maybe_descendant: NodeId) -> bool {
        let mut current = self.nodes[maybe_descendant.index()].parent;
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes[node.index()].parent;
        }
        false
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if parent == child || self.is_descendant(child, parent) {
            debug_assert!(false, "cannot create cycle");
            return Err(DomError::CycleDetected { parent, child });
        }
        if !self.nodes[parent.index()].allows_children() {
            debug_assert!(false, "parent node cannot have children");
            return Err(DomError::InvalidParent(parent));
        }
        Ok(())
    }

    /// Unlink `node` from its parent. Returns whether it had one.
    fn unlink(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes[node.index()].parent.take() else {
            return false;
        };
        self.nodes[parent.index()].children.retain(|child| *child != node);
        true
    }

    fn free_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let record = &mut self.nodes[current.index()];
            if !record.live {
                continue;
            }
            record.live = false;
            record.parent = None;
            record.listeners.clear();
            if let NodeKind::Text { text } | NodeKind::Comment { text } = &mut record.kind {
                text.clear();
                text.shrink_to_fit();
            }
            stack.append(&mut record.children);
            self.live -= 1;
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Vec<(Arc<str>, String)>, DomError> {
        self.ensure_live(node)?;
        match &mut self.nodes[node.index()].kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            _ => Err(DomError::WrongNodeKind(node)),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for Document {
    fn create_element(&mut self, name: &str) -> NodeId {
        let name: Arc<str> = Arc::from(name);
        let node = self.alloc(NodeKind::Element {
            name: Arc::clone(&name),
            attributes: Vec::new(),
        });
        self.push_record(|| Mutation::CreateElement { node, name });
        node
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        let node = self.alloc(NodeKind::Text {
            text: text.to_string(),
        });
        self.push_record(|| Mutation::CreateText {
            node,
            text: text.to_string(),
        });
        node
    }

    fn create_comment(&mut self, text: &str) -> NodeId {
        let node = self.alloc(NodeKind::Comment {
            text: text.to_string(),
        });
        self.push_record(|| Mutation::CreateComment {
            node,
            text: text.to_string(),
        });
        node
    }

    fn insert_before(&mut self, node: NodeId, before: NodeId) -> Result<(), DomError> {
        self.ensure_live(node)?;
        self.ensure_live(before)?;
        if node == before {
            return Ok(());
        }
        let Some(parent) = self.nodes[before.index()].parent else {
            debug_assert!(false, "reference node {before} is detached");
            return Err(DomError::NotAChild {
                parent: None,
                node: before,
            });
        };
        self.check_insertable(parent, node)?;
        let moved = self.unlink(node);
        let siblings = &mut self.nodes[parent.index()].children;
        let pos = siblings
            .iter()
            .position(|child| *child == before)
            .ok_or(DomError::NotAChild {
                parent: Some(parent),
                node: before,
            })?;
        siblings.insert(pos, node);
        self.nodes[node.index()].parent = Some(parent);
        self.push_record(|| Mutation::InsertBefore {
            node,
            before,
            moved,
        });
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        self.ensure_live(parent)?;
        self.ensure_live(node)?;
        self.check_insertable(parent, node)?;
        let moved = self.unlink(node);
        self.nodes[parent.index()].children.push(node);
        self.nodes[node.index()].parent = Some(parent);
        self.push_record(|| Mutation::AppendChild {
            parent,
            node,
            moved,
        });
        Ok(())
    }

    fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        self.ensure_live(node)?;
        if self.unlink(node) {
            self.push_record(|| Mutation::Detach { node });
        }
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        self.ensure_live(node)?;
        if node == self.root {
            return Err(DomError::InvalidParent(node));
        }
        self.unlink(node);
        let before = self.live;
        self.free_subtree(node);
        log::trace!(target: "dom", "remove {node}: freed {} nodes", before - self.live);
        self.push_record(|| Mutation::Remove { node });
        Ok(())
    }

    fn clear_children(&mut self, parent: NodeId) -> Result<(), DomError> {
        self.ensure_live(parent)?;
        let children = std::mem::take(&mut self.nodes[parent.index()].children);
        log::trace!(target: "dom", "clear {parent}: {} children", children.len());
        for child in children {
            self.nodes[child.index()].parent = None;
            self.free_subtree(child);
        }
        self.push_record(|| Mutation::ClearChildren { parent });
        Ok(())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.record(node)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.record(node)?.children.first().copied()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.record(node)?.parent?;
        let siblings = &self.nodes[parent.index()].children;
        let pos = siblings.iter().position(|child| *child == node)?;
        siblings.get(pos + 1).copied()
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        self.ensure_live(node)?;
        match &mut self.nodes[node.index()].kind {
            NodeKind::Text { text: existing } => {
                existing.clear();
                existing.push_str(text);
            }
            _ => return Err(DomError::WrongNodeKind(node)),
        }
        self.push_record(|| Mutation::SetText {
            node,
            text: text.to_string(),
        });
        Ok(())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let attributes = self.element_mut(node)?;
        match attributes.iter_mut().find(|(attr, _)| &**attr == name) {
            Some((_, existing)) => {
                existing.clear();
                existing.push_str(value);
            }
            None => attributes.push((Arc::from(name), value.to_string())),
        }
        self.push_record(|| Mutation::SetAttribute {
            node,
            name: Arc::from(name),
            value: value.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        let attributes = self.element_mut(node)?;
        attributes.retain(|(attr, _)| &**attr != name);
        self.push_record(|| Mutation::RemoveAttribute {
            node,
            name: Arc::from(name),
        });
        Ok(())
    }

    fn add_class(&mut self, node: NodeId, token: &str) -> Result<(), DomError> {
        let attributes = self.element_mut(node)?;
        let pos = match attributes.iter().position(|(attr, _)| &**attr == "class") {
            Some(pos) => pos,
            None => {
                attributes.push((Arc::from("class"), String::new()));
                attributes.len() - 1
            }
        };
        let class = &mut attributes[pos].1;
        if !class.split_ascii_whitespace().any(|existing| existing == token) {
            if !class.is_empty() {
                class.push(' ');
            }
            class.push_str(token);
        }
        self.push_record(|| Mutation::AddClass {
            node,
            token: token.to_string(),
        });
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, token: &str) -> Result<(), DomError> {
        let attributes = self.element_mut(node)?;
        if let Some((_, class)) = attributes.iter_mut().find(|(attr, _)| &**attr == "class") {
            let kept: Vec<&str> = class
                .split_ascii_whitespace()
                .filter(|existing| *existing != token)
                .collect();
            *class = kept.join(" ");
        }
        self.push_record(|| Mutation::RemoveClass {
            node,
            token: token.to_string(),
        });
        Ok(())
    }

    fn add_listener(
        &mut self,
        node: NodeId,
        event: &str,
        listener: Listener,
    ) -> Result<(), DomError> {
        self.ensure_live(node)?;
        let event: Arc<str> = Arc::from(event);
        self.nodes[node.index()]
            .listeners
            .push((Arc::clone(&event), listener));
        self.push_record(|| Mutation::AddListener { node, event });
        Ok(())
    }
}

struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<(Arc<str>, Listener)>,
    live: bool,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Root | NodeKind::Element { .. })
    }
}

enum NodeKind {
    Root,
    Element {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, String)>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}
