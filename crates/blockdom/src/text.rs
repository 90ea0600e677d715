use crate::block::{BlockOps, InsertAt};
use crate::error::ReconcileError;
use core_types::NodeId;
use dom::Dom;

#[derive(Debug)]
pub(crate) struct TextBlock {
    pub(crate) el: Option<NodeId>,
    text: String,
}

impl TextBlock {
    pub(crate) fn new(text: String) -> Self {
        Self { el: None, text }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    fn node(&self) -> Result<NodeId, ReconcileError> {
        self.el.ok_or(ReconcileError::NotMounted("text"))
    }
}

impl BlockOps for TextBlock {
    fn mount(&mut self, dom: &mut dyn Dom, at: InsertAt) -> Result<(), ReconcileError> {
        let node = dom.create_text(&self.text);
        at.insert(dom, node)?;
        self.el = Some(node);
        Ok(())
    }

    fn patch(&mut self, dom: &mut dyn Dom, next: Self) -> Result<(), ReconcileError> {
        // Hot path: equal strings never reach the backend.
        if self.text != next.text {
            dom.set_text(self.node()?, &next.text)?;
            self.text = next.text;
        }
        Ok(())
    }

    fn move_before(&self, dom: &mut dyn Dom, anchor: NodeId) -> Result<(), ReconcileError> {
        dom.insert_before(self.node()?, anchor)?;
        Ok(())
    }

    fn remove(self, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
        dom.remove(self.node()?)?;
        Ok(())
    }

    fn first_child_node(&self) -> Option<NodeId> {
        self.el
    }
}

#[derive(Debug)]
pub(crate) struct CommentBlock {
    pub(crate) el: Option<NodeId>,
    text: String,
}

impl CommentBlock {
    pub(crate) fn new(text: String) -> Self {
        Self { el: None, text }
    }

    fn node(&self) -> Result<NodeId, ReconcileError> {
        self.el.ok_or(ReconcileError::NotMounted("comment"))
    }
}

impl BlockOps for CommentBlock {
    fn mount(&mut self, dom: &mut dyn Dom, at: InsertAt) -> Result<(), ReconcileError> {
        let node = dom.create_comment(&self.text);
        at.insert(dom, node)?;
        self.el = Some(node);
        Ok(())
    }

    fn patch(&mut self, _dom: &mut dyn Dom, _next: Self) -> Result<(), ReconcileError> {
        Ok(())
    }

    fn move_before(&self, dom: &mut dyn Dom, anchor: NodeId) -> Result<(), ReconcileError> {
        dom.insert_before(self.node()?, anchor)?;
        Ok(())
    }

    fn remove(self, dom: &mut dyn Dom) -> Result<(), ReconcileError> {
        dom.remove(self.node()?)?;
        Ok(())
    }

    fn first_child_node(&self) -> Option<NodeId> {
        self.el
    }
}
