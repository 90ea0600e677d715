//! Entry points for mounting a block tree into a container node.

use crate::block::{Block, BlockOps, InsertAt};
use crate::error::ReconcileError;
use core_types::NodeId;
use dom::Dom;

/// Mount `block` as the last content of `container`.
pub fn mount(block: &mut Block, dom: &mut dyn Dom, container: NodeId) -> Result<(), ReconcileError> {
    block.mount(dom, InsertAt::Append(container))?;
    log::trace!(target: "blockdom", "mounted {} block into {container}", block.kind());
    Ok(())
}

/// Patch the mounted `current` with `next`. `current` keeps its nodes;
/// `next` is consumed.
pub fn patch(current: &mut Block, next: Block, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
    current.patch(dom, next)
}

/// Remove every node `block` created.
pub fn remove(block: Block, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
    block.remove(dom)
}
