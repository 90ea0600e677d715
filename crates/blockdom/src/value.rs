//! Positional data values consumed by element blocks.
//!
//! What a value *means* is decided by the binding that reads it: the same
//! `Value::Str` is text content for a text binding, an attribute value for an
//! attribute binding and a class list for a class binding.

use core_types::NodeId;
use dom::Event;
use std::borrow::Cow;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Event callback stored in an element's data array.
///
/// Two handlers are equal only when they are the same allocation.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event)>);

impl Handler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Handler(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// Cell that holds the node bound by a ref binding while it is mounted.
///
/// Two refs are equal only when they are the same cell.
#[derive(Clone, Default)]
pub struct NodeRef(Rc<Cell<Option<NodeId>>>);

impl NodeRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<NodeId> {
        self.0.get()
    }

    pub(crate) fn set(&self, node: Option<NodeId>) {
        self.0.set(node);
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.get()).finish()
    }
}

#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// Class object: entries may hold several space-separated tokens; only
    /// enabled entries contribute.
    Classes(Vec<(Arc<str>, bool)>),
    Handler(Handler),
    /// Attribute map for a `block-attributes` binding. A `class` entry is
    /// diffed by tokens like a class binding.
    Attributes(Vec<(Arc<str>, Value)>),
    Ref(NodeRef),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // Bitwise, so an unchanged NaN compares equal and is not rewritten.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Classes(a), Value::Classes(b)) => a == b,
            (Value::Handler(a), Value::Handler(b)) => a == b,
            (Value::Attributes(a), Value::Attributes(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn classes<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<Arc<str>>,
    {
        Value::Classes(
            entries
                .into_iter()
                .map(|(name, enabled)| (name.into(), enabled))
                .collect(),
        )
    }

    pub fn attributes<I, S, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<Arc<str>>,
        V: Into<Value>,
    {
        Value::Attributes(
            entries
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Rendering used by text bindings.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Empty | Value::Handler(_) | Value::Attributes(_) | Value::Ref(_) => {
                Cow::Borrowed("")
            }
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Int(n) => Cow::Owned(n.to_string()),
            Value::Float(n) => Cow::Owned(n.to_string()),
            Value::Str(s) => Cow::Borrowed(&**s),
            Value::Classes(entries) => Cow::Owned(
                entries
                    .iter()
                    .filter(|(_, enabled)| *enabled)
                    .map(|(name, _)| &**name)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        }
    }

    /// Rendering used by attribute bindings; `None` means the attribute is absent.
    pub fn attribute_value(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Empty
            | Value::Bool(false)
            | Value::Handler(_)
            | Value::Attributes(_)
            | Value::Ref(_) => None,
            Value::Bool(true) => Some(Cow::Borrowed("")),
            other => Some(other.to_text()),
        }
    }

    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            Value::Handler(handler) => Some(handler),
            _ => None,
        }
    }

    pub fn as_node_ref(&self) -> Option<&NodeRef> {
        match self {
            Value::Ref(node_ref) => Some(node_ref),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Arc::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Handler> for Value {
    fn from(value: Handler) -> Self {
        Value::Handler(value)
    }
}

impl From<NodeRef> for Value {
    fn from(value: NodeRef) -> Self {
        Value::Ref(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Empty, Into::into)
    }
}
