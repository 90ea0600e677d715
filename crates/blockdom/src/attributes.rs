//! Attribute and class writes for element bindings.

use crate::error::ReconcileError;
use crate::value::Value;
use core_types::NodeId;
use dom::Dom;
use std::sync::Arc;

/// Class tokens a value enables, in first-seen order without duplicates.
///
/// Strings and numbers are split on whitespace. Class objects contribute the
/// tokens of their enabled entries only.
pub(crate) fn class_tokens(value: &Value) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut push = |word: &str| {
        if !tokens.iter().any(|existing| existing == word) {
            tokens.push(word.to_string());
        }
    };
    match value {
        Value::Empty
        | Value::Handler(_)
        | Value::Bool(false)
        | Value::Attributes(_)
        | Value::Ref(_) => {}
        Value::Classes(entries) => {
            for (name, _) in entries.iter().filter(|(_, enabled)| *enabled) {
                name.split_whitespace().for_each(&mut push);
            }
        }
        other => other.to_text().split_whitespace().for_each(&mut push),
    }
    tokens
}

/// Remove tokens only `prev` enables, then add tokens only `next` enables.
pub(crate) fn update_class(
    dom: &mut dyn Dom,
    node: NodeId,
    prev: &Value,
    next: &Value,
) -> Result<(), ReconcileError> {
    let before = class_tokens(prev);
    let after = class_tokens(next);
    for token in before.iter().filter(|token| !after.contains(token)) {
        dom.remove_class(node, token)?;
    }
    for token in after.iter().filter(|token| !before.contains(token)) {
        dom.add_class(node, token)?;
    }
    Ok(())
}

/// Write one attribute binding. Absent values remove the attribute, but only
/// if the previous value had set it.
pub(crate) fn update_attribute(
    dom: &mut dyn Dom,
    node: NodeId,
    name: &str,
    prev: &Value,
    next: &Value,
) -> Result<(), ReconcileError> {
    match next.attribute_value() {
        Some(value) => dom.set_attribute(node, name, &value)?,
        None if prev.attribute_value().is_some() => dom.remove_attribute(node, name)?,
        None => {}
    }
    Ok(())
}

fn map_entries(value: &Value) -> &[(Arc<str>, Value)] {
    match value {
        Value::Attributes(entries) => entries,
        _ => &[],
    }
}

fn map_entry<'a>(entries: &'a [(Arc<str>, Value)], name: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find(|(entry, _)| &**entry == name)
        .map(|(_, value)| value)
}

fn write_map_entry(
    dom: &mut dyn Dom,
    node: NodeId,
    name: &str,
    prev: &Value,
    next: &Value,
) -> Result<(), ReconcileError> {
    if name == "class" {
        update_class(dom, node, prev, next)
    } else {
        update_attribute(dom, node, name, prev, next)
    }
}

/// Diff two attribute maps. Names missing from `next` are cleared, changed
/// entries are rewritten. Anything but [`Value::Attributes`] is an empty map.
pub(crate) fn update_attribute_map(
    dom: &mut dyn Dom,
    node: NodeId,
    prev: &Value,
    next: &Value,
) -> Result<(), ReconcileError> {
    let before = map_entries(prev);
    let after = map_entries(next);
    let empty = Value::Empty;
    for (name, old) in before {
        if map_entry(after, name).is_none() {
            write_map_entry(dom, node, name, old, &empty)?;
        }
    }
    for (name, new) in after {
        let old = map_entry(before, name).unwrap_or(&empty);
        if old != new {
            write_map_entry(dom, node, name, old, new)?;
        }
    }
    Ok(())
}
