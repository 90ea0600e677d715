//! A journaled document with a container element, plus keyed-list builders.

use blockdom::{Block, Key, NodeId, ReconcileError};
use dom::serialize::{DomSnapshot, SnapshotOptions};
use dom::{Dom, Document, MutationCounts};

pub struct Fixture {
    pub doc: Document,
    /// `<div>` under the document root that blocks are mounted into.
    pub container: NodeId,
}

impl Fixture {
    pub fn new() -> Self {
        let mut doc = Document::journaled();
        let container = doc.create_element("div");
        let root = doc.root();
        doc.append_child(root, container)
            .unwrap_or_else(|err| panic!("failed to attach fixture container: {err}"));
        doc.clear_journal();
        Self { doc, container }
    }

    pub fn mount(&mut self, block: &mut Block) -> Result<(), ReconcileError> {
        blockdom::mount(block, &mut self.doc, self.container)
    }

    /// Patch with a fresh journal and return what the patch wrote.
    pub fn patch(&mut self, current: &mut Block, next: Block) -> Result<MutationCounts, ReconcileError> {
        self.doc.clear_journal();
        blockdom::patch(current, next, &mut self.doc)?;
        Ok(self.counts())
    }

    pub fn remove(&mut self, block: Block) -> Result<MutationCounts, ReconcileError> {
        self.doc.clear_journal();
        blockdom::remove(block, &mut self.doc)?;
        Ok(self.counts())
    }

    pub fn counts(&self) -> MutationCounts {
        MutationCounts::from_journal(self.doc.journal())
    }

    /// Children of the container that are not anchors, in tree order.
    pub fn content_nodes(&self) -> Vec<NodeId> {
        self.doc
            .children(self.container)
            .iter()
            .copied()
            .filter(|&node| self.doc.text(node) != Some(""))
            .collect()
    }

    /// Text of every text child of the container, anchors skipped.
    pub fn texts(&self) -> Vec<String> {
        self.content_nodes()
            .into_iter()
            .filter_map(|node| self.doc.text(node).map(str::to_string))
            .collect()
    }

    /// Direct text child of the container whose content is `text`.
    pub fn node_with_text(&self, text: &str) -> Option<NodeId> {
        self.content_nodes()
            .into_iter()
            .find(|&node| self.doc.text(node) == Some(text))
    }

    /// Number of anchors directly under the container.
    pub fn anchor_count(&self) -> usize {
        self.doc
            .children(self.container)
            .iter()
            .filter(|&&node| self.doc.text(node) == Some(""))
            .count()
    }

    pub fn snapshot(&self) -> Vec<String> {
        DomSnapshot::new(&self.doc, self.container, SnapshotOptions::default())
            .as_lines()
            .to_vec()
    }

    pub fn html(&self) -> String {
        dom::serialize::inner_html(&self.doc, self.container)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Text block keyed by its own content.
pub fn keyed_text(text: &str) -> Block {
    Block::text(text).with_key(text)
}

pub fn keyed_text_list<S: AsRef<str>>(items: &[S], is_only_child: bool) -> Block {
    Block::list(
        items.iter().map(|item| keyed_text(item.as_ref())).collect(),
        is_only_child,
        true,
    )
}

/// Text items keyed by integer id, rendered as the id.
pub fn id_list(ids: &[i64], is_only_child: bool) -> Block {
    Block::list(
        ids.iter()
            .map(|&id| Block::text(id.to_string()).with_key(Key::Int(id)))
            .collect(),
        is_only_child,
        true,
    )
}
