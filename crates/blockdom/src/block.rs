//! Block descriptors and per-kind dispatch.
//!
//! Invariants:
//! - A mounted block exclusively owns the nodes it created; nothing else
//!   inserts, moves or removes them.
//! - Blocks patched against each other have the same shape: same kind, same
//!   template for elements, same arity for multis.
//! - Anchors belong to the block that created them and never count as content.

use crate::element::ElementBlock;
use crate::error::{ReconcileError, report_violation};
use crate::list::ListBlock;
use crate::multi::MultiBlock;
use crate::template::Template;
use crate::text::{CommentBlock, TextBlock};
use crate::toggler::TogglerBlock;
use crate::value::Value;
use core_types::{Key, NodeId};
use dom::{Dom, DomError};
use std::rc::Rc;

/// Where a block being mounted places its nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InsertAt {
    /// Immediately before a node that is already attached.
    Before(NodeId),
    /// As the last children of a parent.
    Append(NodeId),
}

impl InsertAt {
    pub(crate) fn insert(self, dom: &mut dyn Dom, node: NodeId) -> Result<(), DomError> {
        match self {
            InsertAt::Before(anchor) => dom.insert_before(node, anchor),
            InsertAt::Append(parent) => dom.append_child(parent, node),
        }
    }
}

/// The five operations every block kind implements.
pub(crate) trait BlockOps: Sized {
    /// Create this block's nodes and insert them at `at`, in tree order.
    fn mount(&mut self, dom: &mut dyn Dom, at: InsertAt) -> Result<(), ReconcileError>;
    /// Create this block's nodes and insert them immediately before `anchor`.
    fn mount_before(&mut self, dom: &mut dyn Dom, anchor: NodeId) -> Result<(), ReconcileError> {
        self.mount(dom, InsertAt::Before(anchor))
    }
    /// Bring the mounted `self` in line with `next`, which is consumed.
    fn patch(&mut self, dom: &mut dyn Dom, next: Self) -> Result<(), ReconcileError>;
    /// Relocate every node this block occupies to just before `anchor`.
    fn move_before(&self, dom: &mut dyn Dom, anchor: NodeId) -> Result<(), ReconcileError>;
    fn remove(self, dom: &mut dyn Dom) -> Result<(), ReconcileError>;
    fn first_child_node(&self) -> Option<NodeId>;
}

#[derive(Debug)]
pub(crate) enum BlockContent {
    Text(TextBlock),
    Element(ElementBlock),
    Multi(MultiBlock),
    List(ListBlock),
    Comment(CommentBlock),
    Toggler(TogglerBlock),
}

impl BlockContent {
    fn kind(&self) -> &'static str {
        match self {
            BlockContent::Text(_) => "text",
            BlockContent::Element(_) => "element",
            BlockContent::Multi(_) => "multi",
            BlockContent::List(_) => "list",
            BlockContent::Comment(_) => "comment",
            BlockContent::Toggler(_) => "toggler",
        }
    }
}

/// A node descriptor for the reconciliation engine.
///
/// Blocks are built detached, mounted once, then kept up to date by patching
/// them with freshly built blocks of the same shape.
#[derive(Debug)]
pub struct Block {
    key: Option<Key>,
    pub(crate) content: BlockContent,
}

impl Block {
    fn from_content(content: BlockContent) -> Self {
        Self { key: None, content }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::from_content(BlockContent::Text(TextBlock::new(text.into())))
    }

    /// Element rendered from `template`. `data` is read positionally by the
    /// template's bindings; missing entries count as [`Value::Empty`].
    /// `children` fills the child slots, `None` leaving a slot empty.
    pub fn element(
        template: Rc<Template>,
        data: Vec<Value>,
        children: Vec<Option<Block>>,
    ) -> Self {
        Self::from_content(BlockContent::Element(ElementBlock::new(
            template, data, children,
        )))
    }

    pub fn multi(children: Vec<Option<Block>>) -> Self {
        Self::from_content(BlockContent::Multi(MultiBlock::new(children)))
    }

    /// Keyed list. `is_only_child` must only be set when the list is the sole
    /// content of its parent node.
    pub fn list(children: Vec<Block>, is_only_child: bool, has_no_component: bool) -> Self {
        Self::from_content(BlockContent::List(ListBlock::new(
            children,
            is_only_child,
            has_no_component,
        )))
    }

    /// Comment node. Its content is fixed at mount; patches never rewrite it.
    pub fn comment(text: impl Into<String>) -> Self {
        Self::from_content(BlockContent::Comment(CommentBlock::new(text.into())))
    }

    /// Wrapper that patches `child` while `key` stays the same and replaces
    /// it wholesale when the key changes.
    pub fn toggler(key: impl Into<Key>, child: Block) -> Self {
        Self::from_content(BlockContent::Toggler(TogglerBlock::new(key.into(), child)))
    }

    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn kind(&self) -> &'static str {
        self.content.kind()
    }

    /// The node a leaf block owns. `None` for composites and unmounted blocks.
    pub fn el(&self) -> Option<NodeId> {
        match &self.content {
            BlockContent::Text(text) => text.el,
            BlockContent::Element(element) => element.el,
            BlockContent::Comment(comment) => comment.el,
            BlockContent::Multi(_) | BlockContent::List(_) | BlockContent::Toggler(_) => None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        match &self.content {
            BlockContent::Text(text) => text.el.is_some(),
            BlockContent::Element(element) => element.el.is_some(),
            BlockContent::Multi(multi) => multi.anchors.len() == multi.arity(),
            BlockContent::List(list) => list.anchor.is_some(),
            BlockContent::Comment(comment) => comment.el.is_some(),
            BlockContent::Toggler(toggler) => toggler.child.is_mounted(),
        }
    }

    /// Text content of a text block.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Text(text) => Some(text.text()),
            _ => None,
        }
    }

    /// Items of a list block, slots of a multi/element block, or the child of
    /// a toggler, in order.
    pub fn children(&self) -> Vec<Option<&Block>> {
        match &self.content {
            BlockContent::Text(_) | BlockContent::Comment(_) => Vec::new(),
            BlockContent::Toggler(toggler) => vec![Some(&*toggler.child)],
            BlockContent::Element(element) => {
                element.children().iter().map(Option::as_ref).collect()
            }
            BlockContent::Multi(multi) => multi.children.iter().map(Option::as_ref).collect(),
            BlockContent::List(list) => list.children.iter().map(Some).collect(),
        }
    }

    /// `el`, else the first node of the first child.
    pub fn first_node(&self) -> Option<NodeId> {
        self.el().or_else(|| self.first_child_node())
    }

    /// First node this block occupies in the tree, anchors included.
    ///
    /// Used as the reference when something must go right before this block.
    /// Unlike [`Block::first_node`] it is defined for empty composites too:
    /// an empty list leads with its anchor, a multi with an empty first slot
    /// with that slot's anchor.
    pub fn leading_node(&self) -> Option<NodeId> {
        match &self.content {
            BlockContent::Text(text) => text.el,
            BlockContent::Element(element) => element.el,
            BlockContent::Comment(comment) => comment.el,
            BlockContent::Toggler(toggler) => toggler.child.leading_node(),
            BlockContent::Multi(multi) => match multi.children.first() {
                Some(Some(first)) => first.leading_node(),
                _ => multi.anchors.first().copied(),
            },
            BlockContent::List(list) => list
                .children
                .first()
                .and_then(Block::leading_node)
                .or(list.anchor),
        }
    }

    fn shape_mismatch(&self, next: &Block) -> Option<ReconcileError> {
        match (&self.content, &next.content) {
            (BlockContent::Text(_), BlockContent::Text(_))
            | (BlockContent::Comment(_), BlockContent::Comment(_))
            | (BlockContent::Toggler(_), BlockContent::Toggler(_))
            | (BlockContent::List(_), BlockContent::List(_)) => None,
            (BlockContent::Element(a), BlockContent::Element(b)) => {
                (!Rc::ptr_eq(&a.template, &b.template)).then_some(ReconcileError::TemplateMismatch)
            }
            (BlockContent::Multi(a), BlockContent::Multi(b)) => {
                (a.arity() != b.arity()).then(|| ReconcileError::ArityMismatch {
                    expected: a.arity(),
                    found: b.arity(),
                })
            }
            (current, next) => Some(ReconcileError::ShapeMismatch {
                expected: current.kind(),
                found: next.kind(),
            }),
        }
    }

    /// Mount `next` where `self` starts, then remove `self`.
    fn replace_with(&mut self, dom: &mut dyn Dom, mut next: Block) -> Result<(), ReconcileError> {
        #[cfg(feature = "debug-stats")]
        crate::stats::record_replacement();
        let reference = self
            .leading_node()
            .ok_or(ReconcileError::NotMounted(self.kind()))?;
        next.mount_before(dom, reference)?;
        let old = std::mem::replace(self, next);
        old.remove_replaced(dom)
    }

    /// Remove a block whose replacement is already mounted next to it.
    pub(crate) fn remove_replaced(mut self, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
        // Clearing the parent would take the replacement with it.
        self.set_only_child(false);
        self.remove(dom)
    }

    /// Set the sole-content flag of a list, looking through togglers. Other
    /// kinds ignore it.
    pub(crate) fn set_only_child(&mut self, is_only_child: bool) {
        match &mut self.content {
            BlockContent::List(list) => list.is_only_child = is_only_child,
            BlockContent::Toggler(toggler) => toggler.child.set_only_child(is_only_child),
            _ => {}
        }
    }
}

impl BlockOps for Block {
    fn mount(&mut self, dom: &mut dyn Dom, at: InsertAt) -> Result<(), ReconcileError> {
        #[cfg(feature = "debug-stats")]
        crate::stats::record_mount();
        match &mut self.content {
            BlockContent::Text(block) => block.mount(dom, at),
            BlockContent::Element(block) => block.mount(dom, at),
            BlockContent::Multi(block) => block.mount(dom, at),
            BlockContent::List(block) => block.mount(dom, at),
            BlockContent::Comment(block) => block.mount(dom, at),
            BlockContent::Toggler(block) => block.mount(dom, at),
        }
    }

    fn patch(&mut self, dom: &mut dyn Dom, next: Self) -> Result<(), ReconcileError> {
        #[cfg(feature = "debug-stats")]
        crate::stats::record_patch();
        if let Some(err) = self.shape_mismatch(&next) {
            report_violation(&err);
            return self.replace_with(dom, next);
        }
        match (&mut self.content, next.content) {
            (BlockContent::Text(block), BlockContent::Text(next)) => block.patch(dom, next),
            (BlockContent::Element(block), BlockContent::Element(next)) => block.patch(dom, next),
            (BlockContent::Multi(block), BlockContent::Multi(next)) => block.patch(dom, next),
            (BlockContent::List(block), BlockContent::List(next)) => block.patch(dom, next),
            (BlockContent::Comment(block), BlockContent::Comment(next)) => block.patch(dom, next),
            (BlockContent::Toggler(block), BlockContent::Toggler(next)) => block.patch(dom, next),
            (current, next) => unreachable!(
                "{} block patched with {} block after the shape check",
                current.kind(),
                next.kind()
            ),
        }
    }

    fn move_before(&self, dom: &mut dyn Dom, anchor: NodeId) -> Result<(), ReconcileError> {
        match &self.content {
            BlockContent::Text(block) => block.move_before(dom, anchor),
            BlockContent::Element(block) => block.move_before(dom, anchor),
            BlockContent::Multi(block) => block.move_before(dom, anchor),
            BlockContent::List(block) => block.move_before(dom, anchor),
            BlockContent::Comment(block) => block.move_before(dom, anchor),
            BlockContent::Toggler(block) => block.move_before(dom, anchor),
        }
    }

    fn remove(self, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
        #[cfg(feature = "debug-stats")]
        crate::stats::record_removal();
        match self.content {
            BlockContent::Text(block) => block.remove(dom),
            BlockContent::Element(block) => block.remove(dom),
            BlockContent::Multi(block) => block.remove(dom),
            BlockContent::List(block) => block.remove(dom),
            BlockContent::Comment(block) => block.remove(dom),
            BlockContent::Toggler(block) => block.remove(dom),
        }
    }

    fn first_child_node(&self) -> Option<NodeId> {
        match &self.content {
            BlockContent::Text(block) => block.first_child_node(),
            BlockContent::Element(block) => block.first_child_node(),
            BlockContent::Multi(block) => block.first_child_node(),
            BlockContent::List(block) => block.first_child_node(),
            BlockContent::Comment(block) => block.first_child_node(),
            BlockContent::Toggler(block) => block.first_child_node(),
        }
    }
}
