use crate::block::{Block, BlockOps, InsertAt};
use crate::error::ReconcileError;
use core_types::NodeId;
use dom::Dom;

/// Fixed-arity group of optional blocks.
///
/// Every slot owns an anchor, present or not, so a slot that is filled later
/// still mounts at its own position. Tree layout for slots `0..n`:
/// `[child0] anchor0 [child1] anchor1 ...`.
#[derive(Debug)]
pub(crate) struct MultiBlock {
    pub(crate) children: Vec<Option<Block>>,
    pub(crate) anchors: Vec<NodeId>,
}

impl MultiBlock {
    pub(crate) fn new(children: Vec<Option<Block>>) -> Self {
        Self {
            children,
            anchors: Vec::new(),
        }
    }

    pub(crate) fn arity(&self) -> usize {
        self.children.len()
    }

    fn anchor(&self, slot: usize) -> Result<NodeId, ReconcileError> {
        self.anchors
            .get(slot)
            .copied()
            .ok_or(ReconcileError::MissingAnchor("multi slot anchor"))
    }
}

impl BlockOps for MultiBlock {
    fn mount(&mut self, dom: &mut dyn Dom, at: InsertAt) -> Result<(), ReconcileError> {
        let mut anchors = Vec::with_capacity(self.children.len());
        for child in &mut self.children {
            let slot_anchor = dom.create_anchor();
            at.insert(dom, slot_anchor)?;
            anchors.push(slot_anchor);
            if let Some(child) = child {
                child.mount_before(dom, slot_anchor)?;
            }
        }
        self.anchors = anchors;
        Ok(())
    }

    fn patch(&mut self, dom: &mut dyn Dom, next: Self) -> Result<(), ReconcileError> {
        for (slot, incoming) in next.children.into_iter().enumerate() {
            let anchor = self.anchor(slot)?;
            let Some(current) = self.children.get_mut(slot) else {
                break;
            };
            match (current.take(), incoming) {
                (Some(mut child), Some(incoming)) => {
                    child.patch(dom, incoming)?;
                    *current = Some(child);
                }
                (Some(child), None) => child.remove(dom)?,
                (None, Some(mut incoming)) => {
                    incoming.mount_before(dom, anchor)?;
                    *current = Some(incoming);
                }
                (None, None) => {}
            }
        }
        Ok(())
    }

    fn move_before(&self, dom: &mut dyn Dom, anchor: NodeId) -> Result<(), ReconcileError> {
        for (child, &slot_anchor) in self.children.iter().zip(&self.anchors) {
            dom.insert_before(slot_anchor, anchor)?;
            if let Some(child) = child {
                child.move_before(dom, slot_anchor)?;
            }
        }
        Ok(())
    }

    fn remove(self, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
        for (child, slot_anchor) in self.children.into_iter().zip(self.anchors) {
            if let Some(child) = child {
                child.remove(dom)?;
            }
            dom.remove(slot_anchor)?;
        }
        Ok(())
    }

    fn first_child_node(&self) -> Option<NodeId> {
        self.children.iter().flatten().next().and_then(Block::leading_node)
    }
}
