use core_types::NodeId;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// An event delivered to listeners during [`crate::Document::dispatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub name: Arc<str>,
    pub target: NodeId,
    /// Node whose listener is currently running (changes while bubbling).
    pub current_target: NodeId,
}

/// A callback bound to a node for one event name.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event)>);

impl Listener {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Listener(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Listener(..)")
    }
}
