//! Deterministic serialization of a document subtree.
//!
//! Two formats:
//! - markup (`outer_html`/`inner_html`): anchors serialize to nothing, so a
//!   mounted block tree reads exactly like the markup it stands for;
//! - snapshot lines (`DomSnapshot`): one node per line, indented by depth,
//!   optionally showing anchors and node ids. Intended for test diffs, not a
//!   stable format.

use crate::document::{Document, NodeView};
use core_types::NodeId;
use std::fmt::{self, Write};

const INDENT_STEP: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct SnapshotOptions {
    pub show_ids: bool,
    pub show_anchors: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            show_ids: false,
            show_anchors: true,
        }
    }
}

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(doc: &Document, root: NodeId, options: SnapshotOptions) -> Self {
        let mut lines = Vec::new();
        let mut indent = String::new();
        walk_snapshot(doc, root, &options, &mut indent, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

fn walk_snapshot(
    doc: &Document,
    node: NodeId,
    options: &SnapshotOptions,
    indent: &mut String,
    out: &mut Vec<String>,
) {
    let Some(view) = doc.view(node) else {
        return;
    };
    let mut line = String::with_capacity(indent.len() + 32);
    line.push_str(indent);
    match view {
        NodeView::Root => line.push_str("#document"),
        NodeView::Element { name, attributes } => {
            line.push('<');
            line.push_str(name);
            for (attr, value) in attributes {
                let _ = write!(&mut line, " {attr}=\"{}\"", escape_attr(value));
            }
            line.push('>');
        }
        NodeView::Text(text) if text.is_empty() => {
            if !options.show_anchors {
                return;
            }
            line.push_str("#anchor");
        }
        NodeView::Text(text) => {
            let _ = write!(&mut line, "\"{}\"", text.escape_debug());
        }
        NodeView::Comment(text) => {
            let _ = write!(&mut line, "<!--{}-->", text.escape_debug());
        }
    }
    if options.show_ids {
        let _ = write!(&mut line, " {node}");
    }
    out.push(line);
    indent.push_str(INDENT_STEP);
    for child in doc.children(node) {
        walk_snapshot(doc, *child, options, indent, out);
    }
    indent.truncate(indent.len() - INDENT_STEP.len());
}

pub fn outer_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

pub fn inner_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for child in doc.children(node) {
        write_node(doc, *child, &mut out);
    }
    out
}

/// Concatenated text of every descendant text node.
pub fn text_content(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if let Some(text) = doc.text(current) {
            out.push_str(text);
        }
        stack.extend(doc.children(current).iter().rev().copied());
    }
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.view(node) {
        Some(NodeView::Root) => {
            for child in doc.children(node) {
                write_node(doc, *child, out);
            }
        }
        Some(NodeView::Element { name, attributes }) => {
            out.push('<');
            out.push_str(name);
            for (attr, value) in attributes {
                let _ = write!(out, " {attr}=\"{}\"", escape_attr(value));
            }
            out.push('>');
            for child in doc.children(node) {
                write_node(doc, *child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Some(NodeView::Text(text)) => out.push_str(&escape_text(text)),
        Some(NodeView::Comment(text)) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        None => {}
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
