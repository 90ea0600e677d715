use crate::block::{Block, BlockOps, InsertAt};
use crate::error::ReconcileError;
use core_types::{Key, NodeId};
use dom::Dom;

/// Single child whose identity is tied to a key.
///
/// The key is independent of the list key a block may carry: it decides
/// whether the wrapped child is patched or swapped out, not where it sits.
#[derive(Debug)]
pub(crate) struct TogglerBlock {
    key: Key,
    pub(crate) child: Box<Block>,
}

impl TogglerBlock {
    pub(crate) fn new(key: Key, child: Block) -> Self {
        Self {
            key,
            child: Box::new(child),
        }
    }
}

impl BlockOps for TogglerBlock {
    fn mount(&mut self, dom: &mut dyn Dom, at: InsertAt) -> Result<(), ReconcileError> {
        self.child.mount(dom, at)
    }

    fn patch(&mut self, dom: &mut dyn Dom, next: Self) -> Result<(), ReconcileError> {
        if self.key == next.key {
            return self.child.patch(dom, *next.child);
        }
        log::trace!(target: "blockdom.toggler", "key {} -> {}: replacing child", self.key, next.key);
        let reference = self
            .child
            .leading_node()
            .ok_or(ReconcileError::NotMounted("toggler"))?;
        let mut incoming = next.child;
        incoming.mount_before(dom, reference)?;
        let old = std::mem::replace(&mut self.child, incoming);
        old.remove_replaced(dom)?;
        self.key = next.key;
        Ok(())
    }

    fn move_before(&self, dom: &mut dyn Dom, anchor: NodeId) -> Result<(), ReconcileError> {
        self.child.move_before(dom, anchor)
    }

    fn remove(self, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
        self.child.remove(dom)
    }

    fn first_child_node(&self) -> Option<NodeId> {
        self.child.first_node()
    }
}
