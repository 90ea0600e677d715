//! Compiled element templates.
//!
//! A [`Template`] is the static shape of an element block plus its
//! [`UpdateProgram`]: one [`Binding`] per dynamic spot, each addressed by a
//! child-index path from the template root. Templates are built once and
//! shared (`Rc`) by every block rendered from the same template position;
//! two element blocks have the same shape exactly when they share a template.

use crate::error::ReconcileError;
use core_types::NodeId;
use dom::Dom;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateNode {
    Element(ElementNode),
    Text(String),
    /// Text node whose content comes from the data array.
    TextSlot(usize),
    /// Bind point for a sub-block from the children array.
    ChildSlot(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementNode {
    name: Arc<str>,
    attributes: Vec<(Arc<str>, String)>,
    dynamic: Vec<DynamicAttr>,
    children: Vec<TemplateNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum DynamicAttr {
    Attribute { index: usize, name: Arc<str> },
    Attributes { index: usize },
    Handler { index: usize, event: Arc<str> },
    Ref { index: usize },
}

impl ElementNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            attributes: Vec::new(),
            dynamic: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static attribute, written once at mount.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((Arc::from(name), value.to_string()));
        self
    }

    /// Attribute fed from data entry `index`. `class` diffs tokens instead of
    /// replacing the whole value.
    pub fn bind_attr(mut self, index: usize, name: &str) -> Self {
        self.dynamic.push(DynamicAttr::Attribute {
            index,
            name: Arc::from(name),
        });
        self
    }

    /// Attribute map fed from data entry `index`, see [`crate::Value::Attributes`].
    pub fn bind_attrs(mut self, index: usize) -> Self {
        self.dynamic.push(DynamicAttr::Attributes { index });
        self
    }

    /// Publish this element's node through the [`crate::NodeRef`] at data
    /// entry `index` while the block is mounted.
    pub fn node_ref(mut self, index: usize) -> Self {
        self.dynamic.push(DynamicAttr::Ref { index });
        self
    }

    /// Listener for `event` that runs the handler found at data entry `index`.
    pub fn on(mut self, index: usize, event: &str) -> Self {
        self.dynamic.push(DynamicAttr::Handler {
            index,
            event: Arc::from(event),
        });
        self
    }

    pub fn child(mut self, node: impl Into<TemplateNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.child(TemplateNode::Text(text.to_string()))
    }

    pub fn text_slot(self, index: usize) -> Self {
        self.child(TemplateNode::TextSlot(index))
    }

    pub fn child_slot(self, index: usize) -> Self {
        self.child(TemplateNode::ChildSlot(index))
    }

    /// Index of a child slot that is this element's only content.
    fn sole_child_slot(&self) -> Option<usize> {
        match self.children.as_slice() {
            [TemplateNode::ChildSlot(index)] => Some(*index),
            _ => None,
        }
    }
}

impl From<ElementNode> for TemplateNode {
    fn from(node: ElementNode) -> Self {
        TemplateNode::Element(node)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Text { index: usize },
    Attribute { index: usize, name: Arc<str> },
    Class { index: usize },
    Attributes { index: usize },
    Handler { index: usize, event: Arc<str> },
    Ref { index: usize },
    /// Sub-block mounted before a placeholder anchor.
    Child { index: usize },
    /// Sub-block that is the whole content of the bound element. It has no
    /// placeholder and is appended into the element.
    OnlyChild { index: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    /// Child indices from the template root to the bound node.
    pub path: Vec<usize>,
    pub kind: BindingKind,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateProgram {
    bindings: Vec<Binding>,
    data_len: usize,
    child_len: usize,
}

impl UpdateProgram {
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Minimum length of the data array the program reads.
    pub fn data_len(&self) -> usize {
        self.data_len
    }

    /// Number of child bind points.
    pub fn child_len(&self) -> usize {
        self.child_len
    }

    pub fn has_children(&self) -> bool {
        self.child_len > 0
    }
}

/// Largest data or child index a template may bind.
pub const MAX_BINDING_INDEX: usize = 1 << 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// A child slot index is used twice.
    DuplicateChildSlot(usize),
    /// A binding index exceeds [`MAX_BINDING_INDEX`].
    IndexTooLarge(usize),
    /// Markup could not be parsed; `position` is a byte offset.
    Syntax {
        position: usize,
        message: &'static str,
    },
    /// A placeholder or bound attribute name carries no usable index.
    BadIndex { position: usize },
    /// Markup must contain exactly one root element.
    RootNotElement,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::DuplicateChildSlot(index) => {
                write!(f, "child slot {index} is bound twice")
            }
            TemplateError::IndexTooLarge(index) => {
                write!(f, "binding index {index} exceeds {MAX_BINDING_INDEX}")
            }
            TemplateError::Syntax { position, message } => {
                write!(f, "template syntax error at byte {position}: {message}")
            }
            TemplateError::BadIndex { position } => {
                write!(f, "template placeholder without index at byte {position}")
            }
            TemplateError::RootNotElement => f.write_str("template root must be one element"),
        }
    }
}

impl std::error::Error for TemplateError {}

#[derive(Debug, PartialEq, Eq)]
pub struct Template {
    root: ElementNode,
    program: UpdateProgram,
}

impl Template {
    /// Compile an element tree into a shareable template.
    pub fn compile(root: ElementNode) -> Result<Rc<Template>, TemplateError> {
        let mut program = UpdateProgram::default();
        let mut child_slots = HashSet::new();
        let mut path = Vec::new();
        collect_bindings(&root, &mut path, &mut program, &mut child_slots)?;
        log::trace!(
            target: "blockdom.template",
            "compiled <{}>: {} bindings, {} data entries, {} child slots",
            root.name,
            program.bindings.len(),
            program.data_len,
            program.child_len
        );
        Ok(Rc::new(Template { root, program }))
    }

    /// Compile from markup with `block-*` placeholders, see [`crate::markup`].
    pub fn parse(markup: &str) -> Result<Rc<Template>, TemplateError> {
        let root = crate::markup::parse_template(markup)?;
        Template::compile(root)
    }

    pub fn root(&self) -> &ElementNode {
        &self.root
    }

    pub fn program(&self) -> &UpdateProgram {
        &self.program
    }

    /// Create the static structure in `dom`, detached. Placeholders become
    /// empty text nodes.
    pub(crate) fn instantiate(&self, dom: &mut dyn Dom) -> Result<NodeId, ReconcileError> {
        instantiate_element(&self.root, dom)
    }

    /// Resolve every binding's path against an instantiated root.
    pub(crate) fn resolve_refs(
        &self,
        dom: &dyn Dom,
        root: NodeId,
    ) -> Result<Vec<NodeId>, ReconcileError> {
        self.program
            .bindings
            .iter()
            .map(|binding| resolve_path(dom, root, &binding.path))
            .collect()
    }
}

fn collect_bindings(
    element: &ElementNode,
    path: &mut Vec<usize>,
    program: &mut UpdateProgram,
    child_slots: &mut HashSet<usize>,
) -> Result<(), TemplateError> {
    for attr in &element.dynamic {
        let (index, kind) = match attr {
            DynamicAttr::Attribute { index, name } if &**name == "class" => {
                (*index, BindingKind::Class { index: *index })
            }
            DynamicAttr::Attribute { index, name } => (
                *index,
                BindingKind::Attribute {
                    index: *index,
                    name: Arc::clone(name),
                },
            ),
            DynamicAttr::Attributes { index } => (*index, BindingKind::Attributes { index: *index }),
            DynamicAttr::Handler { index, event } => (
                *index,
                BindingKind::Handler {
                    index: *index,
                    event: Arc::clone(event),
                },
            ),
            DynamicAttr::Ref { index } => (*index, BindingKind::Ref { index: *index }),
        };
        check_index(index)?;
        program.data_len = program.data_len.max(index + 1);
        program.bindings.push(Binding {
            path: path.clone(),
            kind,
        });
    }
    if let Some(index) = element.sole_child_slot() {
        check_index(index)?;
        if !child_slots.insert(index) {
            return Err(TemplateError::DuplicateChildSlot(index));
        }
        program.child_len = program.child_len.max(index + 1);
        program.bindings.push(Binding {
            path: path.clone(),
            kind: BindingKind::OnlyChild { index },
        });
        return Ok(());
    }
    for (i, child) in element.children.iter().enumerate() {
        path.push(i);
        match child {
            TemplateNode::Element(inner) => {
                collect_bindings(inner, path, program, child_slots)?;
            }
            TemplateNode::Text(_) => {}
            TemplateNode::TextSlot(index) => {
                check_index(*index)?;
                program.data_len = program.data_len.max(index + 1);
                program.bindings.push(Binding {
                    path: path.clone(),
                    kind: BindingKind::Text { index: *index },
                });
            }
            TemplateNode::ChildSlot(index) => {
                check_index(*index)?;
                if !child_slots.insert(*index) {
                    return Err(TemplateError::DuplicateChildSlot(*index));
                }
                program.child_len = program.child_len.max(index + 1);
                program.bindings.push(Binding {
                    path: path.clone(),
                    kind: BindingKind::Child { index: *index },
                });
            }
        }
        path.pop();
    }
    Ok(())
}

fn check_index(index: usize) -> Result<(), TemplateError> {
    if index > MAX_BINDING_INDEX {
        return Err(TemplateError::IndexTooLarge(index));
    }
    Ok(())
}

fn instantiate_element(element: &ElementNode, dom: &mut dyn Dom) -> Result<NodeId, ReconcileError> {
    let node = dom.create_element(&element.name);
    for (name, value) in &element.attributes {
        dom.set_attribute(node, name, value)?;
    }
    if element.sole_child_slot().is_some() {
        return Ok(node);
    }
    for child in &element.children {
        let child_node = match child {
            TemplateNode::Element(inner) => instantiate_element(inner, dom)?,
            TemplateNode::Text(text) => dom.create_text(text),
            TemplateNode::TextSlot(_) | TemplateNode::ChildSlot(_) => dom.create_anchor(),
        };
        dom.append_child(node, child_node)?;
    }
    Ok(node)
}

fn resolve_path(dom: &dyn Dom, root: NodeId, path: &[usize]) -> Result<NodeId, ReconcileError> {
    let mut node = root;
    for &step in path {
        let mut child = dom.first_child(node);
        for _ in 0..step {
            child = child.and_then(|c| dom.next_sibling(c));
        }
        node = child.ok_or(ReconcileError::MissingAnchor("template binding path"))?;
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_follow_document_order() {
        let template = Template::compile(
            ElementNode::new("div")
                .bind_attr(2, "class")
                .child(ElementNode::new("p").text_slot(0))
                .child_slot(0)
                .child(ElementNode::new("button").on(1, "click").bind_attr(3, "title")),
        )
        .unwrap();
        let program = template.program();
        let kinds: Vec<_> = program.bindings().iter().map(|b| b.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                BindingKind::Class { index: 2 },
                BindingKind::Text { index: 0 },
                BindingKind::Child { index: 0 },
                BindingKind::Handler {
                    index: 1,
                    event: Arc::from("click")
                },
                BindingKind::Attribute {
                    index: 3,
                    name: Arc::from("title")
                },
            ]
        );
        assert_eq!(program.bindings()[1].path, vec![0, 0]);
        assert_eq!(program.bindings()[3].path, vec![2]);
        assert_eq!(program.data_len(), 4);
        assert_eq!(program.child_len(), 1);
    }

    #[test]
    fn sole_child_slot_binds_its_parent_without_placeholder() {
        let template = Template::compile(
            ElementNode::new("div")
                .child(ElementNode::new("ul").node_ref(0).child_slot(1))
                .child_slot(0),
        )
        .unwrap();
        let kinds: Vec<_> = template
            .program()
            .bindings()
            .iter()
            .map(|b| (b.path.clone(), b.kind.clone()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (vec![0], BindingKind::Ref { index: 0 }),
                (vec![0], BindingKind::OnlyChild { index: 1 }),
                (vec![1], BindingKind::Child { index: 0 }),
            ]
        );
        assert_eq!(template.program().child_len(), 2);

        let mut doc = dom::Document::new();
        let root = template.instantiate(&mut doc).unwrap();
        let ul = doc.children(root)[0];
        assert!(doc.children(ul).is_empty());
        assert_eq!(doc.children(root).len(), 2);
    }

    #[test]
    fn child_slots_must_be_unique() {
        let err = Template::compile(ElementNode::new("div").child_slot(0).child_slot(0));
        assert_eq!(err, Err(TemplateError::DuplicateChildSlot(0)));
    }

    #[test]
    fn oversized_indices_are_rejected() {
        let err = Template::compile(ElementNode::new("div").text_slot(MAX_BINDING_INDEX + 1));
        assert_eq!(err, Err(TemplateError::IndexTooLarge(MAX_BINDING_INDEX + 1)));
        assert!(Template::compile(ElementNode::new("div").child_slot(MAX_BINDING_INDEX)).is_ok());
    }
}
