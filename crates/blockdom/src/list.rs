//! Keyed list reconciliation.
//!
//! Contract:
//! - Items are matched by key only. Unkeyed items (`None`) match each other
//!   positionally through the start/start and end/end rules.
//! - A matched item keeps its nodes; it is patched in place and moved only
//!   when its relative position changed.
//! - The list owns one anchor that marks the end of its region. Every item
//!   lives between the previous sibling region and that anchor.
//! - `is_only_child` promises the list is the sole content of its parent,
//!   which allows clearing the parent in one write.
//!
//! Complexity: O(n) for prefix/suffix/swap patterns; the lazily built key map
//! makes arbitrary permutations O(n) expected as well.

use crate::block::{Block, BlockOps, InsertAt};
use crate::error::{ReconcileError, checks_enabled, report_violation};
use core_types::{Key, NodeId};
use dom::Dom;
use std::collections::{HashMap, HashSet};

#[derive(Debug)]
pub(crate) struct ListBlock {
    pub(crate) children: Vec<Block>,
    pub(crate) anchor: Option<NodeId>,
    pub(crate) is_only_child: bool,
    /// Hint that items own nothing beyond their nodes. Carried for callers;
    /// the diff does not depend on it.
    pub(crate) has_no_component: bool,
}

impl ListBlock {
    pub(crate) fn new(children: Vec<Block>, is_only_child: bool, has_no_component: bool) -> Self {
        Self {
            children,
            anchor: None,
            is_only_child,
            has_no_component,
        }
    }

    fn anchor(&self) -> Result<NodeId, ReconcileError> {
        self.anchor.ok_or(ReconcileError::MissingAnchor("list anchor"))
    }

    fn parent(&self, dom: &dyn Dom) -> Result<NodeId, ReconcileError> {
        let anchor = self.anchor()?;
        dom.parent(anchor)
            .ok_or(ReconcileError::MissingAnchor("list anchor parent"))
    }
}

/// Report the first repeated key, if checks are on. Reconciliation goes on
/// either way; the key map then resolves the key to its last occurrence.
fn verify_unique_keys(children: &[Block]) {
    if !checks_enabled() {
        return;
    }
    let mut seen = HashSet::with_capacity(children.len());
    if let Some(key) = children
        .iter()
        .filter_map(Block::key)
        .find(|key| !seen.insert(*key))
    {
        report_violation(&ReconcileError::DuplicateKey(key.clone()));
    }
}

fn same_key(old: &Option<Block>, new: &Option<Block>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => old.key() == new.key(),
        _ => false,
    }
}

fn take(slots: &mut [Option<Block>], index: usize) -> Result<Block, ReconcileError> {
    slots
        .get_mut(index)
        .and_then(Option::take)
        .ok_or(ReconcileError::MissingAnchor("list item"))
}

/// Leading node of the item at `index`, or `fallback` past the end.
fn node_at(slots: &[Option<Block>], index: usize, fallback: NodeId) -> NodeId {
    slots
        .get(index)
        .and_then(Option::as_ref)
        .and_then(Block::leading_node)
        .unwrap_or(fallback)
}

fn build_key_map(old: &[Option<Block>], start: usize, end: usize) -> HashMap<Key, usize> {
    #[cfg(feature = "debug-stats")]
    crate::stats::record_key_map_build();
    let mut map = HashMap::with_capacity(end - start);
    for (index, slot) in old.iter().enumerate().take(end).skip(start) {
        if let Some(key) = slot.as_ref().and_then(Block::key) {
            map.insert(key.clone(), index);
        }
    }
    map
}

fn record_move() {
    #[cfg(feature = "debug-stats")]
    crate::stats::record_move();
}

impl BlockOps for ListBlock {
    fn mount(&mut self, dom: &mut dyn Dom, at: InsertAt) -> Result<(), ReconcileError> {
        verify_unique_keys(&self.children);
        let list_anchor = dom.create_anchor();
        at.insert(dom, list_anchor)?;
        self.anchor = Some(list_anchor);
        for child in &mut self.children {
            child.mount_before(dom, list_anchor)?;
        }
        Ok(())
    }

    fn patch(&mut self, dom: &mut dyn Dom, next: Self) -> Result<(), ReconcileError> {
        let anchor = self.anchor()?;
        let new_children = next.children;
        if self.children.is_empty() && new_children.is_empty() {
            return Ok(());
        }
        verify_unique_keys(&new_children);
        log::trace!(
            target: "blockdom.list",
            "patch {} -> {} items (only_child={}, no_component={})",
            self.children.len(),
            new_children.len(),
            self.is_only_child,
            self.has_no_component
        );

        if new_children.is_empty() && self.is_only_child {
            let parent = self.parent(&*dom)?;
            dom.detach(anchor)?;
            dom.clear_children(parent)?;
            dom.append_child(parent, anchor)?;
            // The cleared nodes are gone; only the bookkeeping is left to drop.
            self.children.clear();
            #[cfg(feature = "debug-stats")]
            crate::stats::record_fast_clear();
            return Ok(());
        }

        let mut old: Vec<Option<Block>> =
            std::mem::take(&mut self.children).into_iter().map(Some).collect();
        let mut pending: Vec<Option<Block>> = new_children.into_iter().map(Some).collect();
        let mut out: Vec<Option<Block>> = std::iter::repeat_with(|| None)
            .take(pending.len())
            .collect();

        // Half-open windows: old[old_start..old_end], pending[new_start..new_end].
        let (mut old_start, mut old_end) = (0, old.len());
        let (mut new_start, mut new_end) = (0, pending.len());
        let mut key_map: Option<HashMap<Key, usize>> = None;

        while old_start < old_end && new_start < new_end {
            if old[old_start].is_none() {
                old_start += 1;
            } else if old[old_end - 1].is_none() {
                old_end -= 1;
            } else if same_key(&old[old_start], &pending[new_start]) {
                let mut block = take(&mut old, old_start)?;
                block.patch(dom, take(&mut pending, new_start)?)?;
                out[new_start] = Some(block);
                old_start += 1;
                new_start += 1;
            } else if same_key(&old[old_end - 1], &pending[new_end - 1]) {
                let mut block = take(&mut old, old_end - 1)?;
                block.patch(dom, take(&mut pending, new_end - 1)?)?;
                out[new_end - 1] = Some(block);
                old_end -= 1;
                new_end -= 1;
            } else if same_key(&old[old_start], &pending[new_end - 1]) {
                // Moved right: goes before whatever already follows the window.
                let mut block = take(&mut old, old_start)?;
                block.patch(dom, take(&mut pending, new_end - 1)?)?;
                block.move_before(dom, node_at(&out, new_end, anchor))?;
                record_move();
                out[new_end - 1] = Some(block);
                old_start += 1;
                new_end -= 1;
            } else if same_key(&old[old_end - 1], &pending[new_start]) {
                // Moved left: goes before the first unprocessed old item.
                let reference = node_at(&old, old_start, anchor);
                let mut block = take(&mut old, old_end - 1)?;
                block.patch(dom, take(&mut pending, new_start)?)?;
                block.move_before(dom, reference)?;
                record_move();
                out[new_start] = Some(block);
                old_end -= 1;
                new_start += 1;
            } else {
                let map = key_map.get_or_insert_with(|| build_key_map(&old, old_start, old_end));
                let found = pending[new_start]
                    .as_ref()
                    .and_then(Block::key)
                    .and_then(|key| map.get(key).copied())
                    .filter(|&index| old[index].is_some());
                let reference = node_at(&old, old_start, anchor);
                let incoming = take(&mut pending, new_start)?;
                match found {
                    None => {
                        let mut block = incoming;
                        block.mount_before(dom, reference)?;
                        out[new_start] = Some(block);
                    }
                    Some(index) => {
                        let mut block = take(&mut old, index)?;
                        block.move_before(dom, reference)?;
                        record_move();
                        block.patch(dom, incoming)?;
                        out[new_start] = Some(block);
                    }
                }
                new_start += 1;
            }
        }

        if old_start >= old_end {
            let reference = node_at(&out, new_end, anchor);
            for index in new_start..new_end {
                let mut block = take(&mut pending, index)?;
                block.mount_before(dom, reference)?;
                out[index] = Some(block);
            }
        } else {
            for slot in &mut old[old_start..old_end] {
                if let Some(block) = slot.take() {
                    block.remove(dom)?;
                }
            }
        }

        self.children = out.into_iter().flatten().collect();
        Ok(())
    }

    /// Relocate every item in order, then the anchor, so the region stays
    /// contiguous.
    fn move_before(&self, dom: &mut dyn Dom, anchor: NodeId) -> Result<(), ReconcileError> {
        let list_anchor = self.anchor()?;
        for child in &self.children {
            child.move_before(dom, anchor)?;
        }
        dom.insert_before(list_anchor, anchor)?;
        Ok(())
    }

    fn remove(self, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
        if self.is_only_child {
            // Drops the anchor along with the items.
            let parent = self.parent(&*dom)?;
            dom.clear_children(parent)?;
            return Ok(());
        }
        let anchor = self.anchor()?;
        for child in self.children {
            child.remove(dom)?;
        }
        dom.remove(anchor)?;
        Ok(())
    }

    fn first_child_node(&self) -> Option<NodeId> {
        self.children.first().and_then(Block::first_node)
    }
}
