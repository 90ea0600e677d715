use crate::attributes::{update_attribute, update_attribute_map, update_class};
use crate::block::{Block, BlockOps, InsertAt};
use crate::error::ReconcileError;
use crate::template::{BindingKind, Template};
use crate::value::Value;
use core_types::NodeId;
use dom::{Dom, Listener};
use std::cell::RefCell;
use std::rc::Rc;

/// Data cell shared between a mounted element block and its listeners.
type SharedData = Rc<RefCell<Vec<Value>>>;

#[derive(Debug)]
pub(crate) struct ElementBlock {
    pub(crate) template: Rc<Template>,
    pub(crate) el: Option<NodeId>,
    /// Bound node per program binding, resolved at mount.
    refs: Vec<NodeId>,
    data: SharedData,
    children: Vec<Option<Block>>,
}

impl ElementBlock {
    pub(crate) fn new(
        template: Rc<Template>,
        data: Vec<Value>,
        mut children: Vec<Option<Block>>,
    ) -> Self {
        let child_len = template.program().child_len();
        if children.len() < child_len {
            children.resize_with(child_len, || None);
        }
        Self {
            template,
            el: None,
            refs: Vec::new(),
            data: Rc::new(RefCell::new(data)),
            children,
        }
    }

    pub(crate) fn children(&self) -> &[Option<Block>] {
        &self.children
    }

    fn node(&self) -> Result<NodeId, ReconcileError> {
        self.el.ok_or(ReconcileError::NotMounted("element"))
    }
}

/// Listeners look the handler up on every event, so patching the data array
/// swaps handlers without touching the listener.
fn dispatch_listener(data: &SharedData, index: usize) -> Listener {
    let data = Rc::clone(data);
    Listener::new(move |event| {
        let handler = data.borrow().get(index).and_then(Value::as_handler).cloned();
        if let Some(handler) = handler {
            handler.call(event);
        }
    })
}

fn value_at<'a>(values: &'a [Value], index: usize, empty: &'a Value) -> &'a Value {
    values.get(index).unwrap_or(empty)
}

/// Mount a slot's sub-block. A list learns whether it is the whole content of
/// its parent from the slot kind, whatever its constructor was told.
fn mount_slot(
    child: &mut Block,
    dom: &mut dyn Dom,
    node: NodeId,
    only_child: bool,
) -> Result<(), ReconcileError> {
    child.set_only_child(only_child);
    if only_child {
        child.mount(dom, InsertAt::Append(node))
    } else {
        child.mount_before(dom, node)
    }
}

/// Reconcile one child slot against its incoming sub-block.
fn patch_slot(
    slot: &mut Option<Block>,
    incoming: Option<Block>,
    dom: &mut dyn Dom,
    node: NodeId,
    only_child: bool,
) -> Result<(), ReconcileError> {
    match (slot.take(), incoming) {
        (Some(mut child), Some(mut incoming)) => {
            // Covers a replacement on shape mismatch, which mounts `incoming`.
            incoming.set_only_child(only_child);
            child.patch(dom, incoming)?;
            *slot = Some(child);
        }
        (Some(child), None) => child.remove(dom)?,
        (None, Some(mut incoming)) => {
            mount_slot(&mut incoming, dom, node, only_child)?;
            *slot = Some(incoming);
        }
        (None, None) => {}
    }
    Ok(())
}

impl BlockOps for ElementBlock {
    fn mount(&mut self, dom: &mut dyn Dom, at: InsertAt) -> Result<(), ReconcileError> {
        let template = Rc::clone(&self.template);
        let el = template.instantiate(dom)?;
        let refs = template.resolve_refs(&*dom, el)?;
        let empty = Value::Empty;
        let mut bound_refs = Vec::new();
        {
            let data = self.data.borrow();
            for (binding, &node) in template.program().bindings().iter().zip(&refs) {
                match &binding.kind {
                    BindingKind::Text { index } => {
                        let value = value_at(&data, *index, &empty);
                        if *value != empty {
                            dom.set_text(node, &value.to_text())?;
                        }
                    }
                    BindingKind::Attribute { index, name } => {
                        update_attribute(dom, node, name, &empty, value_at(&data, *index, &empty))?;
                    }
                    BindingKind::Class { index } => {
                        update_class(dom, node, &empty, value_at(&data, *index, &empty))?;
                    }
                    BindingKind::Attributes { index } => {
                        update_attribute_map(dom, node, &empty, value_at(&data, *index, &empty))?;
                    }
                    BindingKind::Handler { index, event } => {
                        dom.add_listener(node, event, dispatch_listener(&self.data, *index))?;
                    }
                    BindingKind::Ref { index } => bound_refs.push((*index, node)),
                    BindingKind::Child { index } => {
                        if let Some(Some(child)) = self.children.get_mut(*index) {
                            mount_slot(child, dom, node, false)?;
                        }
                    }
                    BindingKind::OnlyChild { index } => {
                        if let Some(Some(child)) = self.children.get_mut(*index) {
                            mount_slot(child, dom, node, true)?;
                        }
                    }
                }
            }
        }
        at.insert(dom, el)?;
        self.el = Some(el);
        self.refs = refs;
        // Refs are published once the whole subtree is in place.
        let data = self.data.borrow();
        for (index, node) in bound_refs {
            if let Some(node_ref) = data.get(index).and_then(Value::as_node_ref) {
                node_ref.set(Some(node));
            }
        }
        Ok(())
    }

    fn patch(&mut self, dom: &mut dyn Dom, next: Self) -> Result<(), ReconcileError> {
        self.node()?;
        let template = Rc::clone(&self.template);
        let next_data = std::mem::take(&mut *next.data.borrow_mut());
        let mut next_children = next.children;
        let empty = Value::Empty;
        {
            let prev_data = self.data.borrow();
            for (binding, &node) in template.program().bindings().iter().zip(&self.refs) {
                match &binding.kind {
                    BindingKind::Text { index } => {
                        let prev = value_at(&prev_data, *index, &empty);
                        let next = value_at(&next_data, *index, &empty);
                        if prev != next {
                            dom.set_text(node, &next.to_text())?;
                        }
                    }
                    BindingKind::Attribute { index, name } => {
                        let prev = value_at(&prev_data, *index, &empty);
                        let next = value_at(&next_data, *index, &empty);
                        if prev != next {
                            update_attribute(dom, node, name, prev, next)?;
                        }
                    }
                    BindingKind::Class { index } => {
                        let prev = value_at(&prev_data, *index, &empty);
                        let next = value_at(&next_data, *index, &empty);
                        if prev != next {
                            update_class(dom, node, prev, next)?;
                        }
                    }
                    BindingKind::Attributes { index } => {
                        let prev = value_at(&prev_data, *index, &empty);
                        let next = value_at(&next_data, *index, &empty);
                        if prev != next {
                            update_attribute_map(dom, node, prev, next)?;
                        }
                    }
                    // Listeners read the data cell; nothing to re-bind.
                    BindingKind::Handler { .. } => {}
                    BindingKind::Ref { index } => {
                        let prev = value_at(&prev_data, *index, &empty).as_node_ref();
                        let next = value_at(&next_data, *index, &empty).as_node_ref();
                        if prev != next {
                            if let Some(prev) = prev {
                                prev.set(None);
                            }
                            if let Some(next) = next {
                                next.set(Some(node));
                            }
                        }
                    }
                    BindingKind::Child { index } | BindingKind::OnlyChild { index } => {
                        let only_child = matches!(binding.kind, BindingKind::OnlyChild { .. });
                        let incoming = next_children.get_mut(*index).and_then(Option::take);
                        if let Some(slot) = self.children.get_mut(*index) {
                            patch_slot(slot, incoming, dom, node, only_child)?;
                        }
                    }
                }
            }
        }
        *self.data.borrow_mut() = next_data;
        Ok(())
    }

    fn move_before(&self, dom: &mut dyn Dom, anchor: NodeId) -> Result<(), ReconcileError> {
        dom.insert_before(self.node()?, anchor)?;
        Ok(())
    }

    /// Removing the root frees the whole subtree, child blocks included.
    /// Refs bound by this element's own template are cleared.
    fn remove(self, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
        dom.remove(self.node()?)?;
        let data = self.data.borrow();
        for binding in self.template.program().bindings() {
            if let BindingKind::Ref { index } = binding.kind {
                if let Some(node_ref) = data.get(index).and_then(Value::as_node_ref) {
                    node_ref.set(None);
                }
            }
        }
        Ok(())
    }

    fn first_child_node(&self) -> Option<NodeId> {
        self.el
    }
}
