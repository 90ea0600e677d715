#![no_main]

use blockdom::{Block, Key, NodeId};
use dom::{Dom, Document};
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

const MAX_ITEMS: usize = 64;

/// Split the input into key sequences at 0xff bytes. Keys repeat only as
/// their first occurrence, so every sequence is a valid keyed list.
fn sequences(data: &[u8]) -> Vec<Vec<i64>> {
    data.split(|&b| b == 0xff)
        .map(|chunk| {
            let mut keys = Vec::new();
            for &b in chunk.iter().take(MAX_ITEMS) {
                let key = i64::from(b % 48);
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            keys
        })
        .collect()
}

fn list_of(keys: &[i64], is_only_child: bool) -> Block {
    Block::list(
        keys.iter()
            .map(|&key| Block::text(key.to_string()).with_key(Key::Int(key)))
            .collect(),
        is_only_child,
        true,
    )
}

fn rendered(doc: &Document, container: NodeId) -> Vec<(String, NodeId)> {
    doc.children(container)
        .iter()
        .filter_map(|&node| {
            doc.text(node)
                .filter(|text| !text.is_empty())
                .map(|text| (text.to_string(), node))
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let is_only_child = flags & 1 == 1;
    let mut steps = sequences(rest).into_iter();
    let Some(first) = steps.next() else {
        return;
    };

    let mut doc = Document::new();
    let container = doc.create_element("div");
    let root = doc.root();
    doc.append_child(root, container).unwrap();
    let mut block = list_of(&first, is_only_child);
    blockdom::mount(&mut block, &mut doc, container).unwrap();
    let mut current = first;

    for next in steps {
        let before: HashMap<String, NodeId> = rendered(&doc, container).into_iter().collect();
        blockdom::patch(&mut block, list_of(&next, is_only_child), &mut doc).unwrap();

        let after = rendered(&doc, container);
        let texts: Vec<String> = after.iter().map(|(text, _)| text.clone()).collect();
        let expected: Vec<String> = next.iter().map(i64::to_string).collect();
        assert_eq!(texts, expected, "{current:?} -> {next:?}");
        for (text, node) in &after {
            if let Some(old) = before.get(text) {
                assert_eq!(old, node, "key {text} recreated: {current:?} -> {next:?}");
            }
        }
        current = next;
    }

    blockdom::remove(block, &mut doc).unwrap();
    assert!(doc.children(container).is_empty());
});
