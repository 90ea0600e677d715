use blockdom::{Block, Template};
use blockdom_test_support::fixture::{Fixture, id_list, keyed_text, keyed_text_list};
use dom::serialize::text_content;
use std::rc::Rc;

fn nodes_by_text(fx: &Fixture, texts: &[&str]) -> Vec<Option<blockdom::NodeId>> {
    texts.iter().map(|text| fx.node_with_text(text)).collect()
}

#[test]
fn identical_list_patch_performs_no_writes() {
    let mut fx = Fixture::new();
    let mut list = keyed_text_list(&["A", "B", "C"], false);
    fx.mount(&mut list).unwrap();

    let counts = fx
        .patch(&mut list, keyed_text_list(&["A", "B", "C"], false))
        .unwrap();
    assert_eq!(counts.writes(), 0);
    assert!(fx.doc.journal().is_empty(), "{:?}", fx.doc.journal());
}

#[test]
fn reverse_keeps_every_node() {
    let mut fx = Fixture::new();
    let mut list = id_list(&[1, 2, 3], false);
    fx.mount(&mut list).unwrap();
    let before = nodes_by_text(&fx, &["1", "2", "3"]);

    let counts = fx.patch(&mut list, id_list(&[3, 2, 1], false)).unwrap();
    assert_eq!(fx.texts(), vec!["3", "2", "1"]);
    assert_eq!(nodes_by_text(&fx, &["1", "2", "3"]), before);
    assert_eq!(counts.creates, 0);
    assert_eq!(counts.removes, 0);
}

#[test]
fn shifted_window_reuses_the_overlap() {
    let mut fx = Fixture::new();
    let mut list = id_list(&[1, 2, 3], false);
    fx.mount(&mut list).unwrap();
    let one = fx.node_with_text("1").unwrap();
    let overlap = nodes_by_text(&fx, &["2", "3"]);

    let counts = fx.patch(&mut list, id_list(&[2, 3, 4], false)).unwrap();
    assert_eq!(fx.texts(), vec!["2", "3", "4"]);
    assert_eq!(nodes_by_text(&fx, &["2", "3"]), overlap);
    assert!(!fx.doc.is_live(one));
    assert_eq!(counts.creates, 1);
    assert_eq!(counts.removes, 1);
}

#[test]
fn fast_clear_wipes_the_parent_in_one_write() {
    let mut fx = Fixture::new();
    let mut list = id_list(&[1, 2, 3], true);
    fx.mount(&mut list).unwrap();
    assert_eq!(fx.doc.children(fx.container).len(), 4);

    let counts = fx.patch(&mut list, id_list(&[], true)).unwrap();
    assert_eq!(counts.clears, 1);
    assert_eq!(counts.removes, 0, "no per-item removal expected");
    assert_eq!(text_content(&fx.doc, fx.container), "");
    assert_eq!(fx.doc.children(fx.container).len(), 1);
    assert_eq!(fx.anchor_count(), 1, "only the list anchor survives");

    // The retained anchor still positions new items.
    fx.patch(&mut list, id_list(&[4, 5], true)).unwrap();
    assert_eq!(fx.texts(), vec!["4", "5"]);
}

#[test]
fn patch_to_empty_without_only_child_removes_items() {
    let mut fx = Fixture::new();
    let mut list = id_list(&[1, 2, 3], false);
    fx.mount(&mut list).unwrap();

    let counts = fx.patch(&mut list, id_list(&[], false)).unwrap();
    assert_eq!(counts.clears, 0);
    assert_eq!(counts.removes, 3);
    assert_eq!(fx.anchor_count(), 1);
}

#[test]
fn empty_to_empty_is_a_no_op() {
    let mut fx = Fixture::new();
    let mut list = id_list(&[], true);
    fx.mount(&mut list).unwrap();
    let counts = fx.patch(&mut list, id_list(&[], true)).unwrap();
    assert_eq!(counts.writes(), 0);
}

#[test]
fn append_prepend_and_middle_insertions() {
    let mut fx = Fixture::new();
    let mut list = keyed_text_list(&["c", "d"], false);
    fx.mount(&mut list).unwrap();

    let counts = fx
        .patch(&mut list, keyed_text_list(&["a", "b", "c", "d"], false))
        .unwrap();
    assert_eq!((counts.creates, counts.moves), (2, 0));

    let counts = fx
        .patch(&mut list, keyed_text_list(&["a", "b", "c", "d", "e", "f"], false))
        .unwrap();
    assert_eq!((counts.creates, counts.moves), (2, 0));

    let counts = fx
        .patch(
            &mut list,
            keyed_text_list(&["a", "b", "x", "c", "d", "e", "f"], false),
        )
        .unwrap();
    assert_eq!((counts.creates, counts.moves), (1, 0));
    assert_eq!(fx.texts(), vec!["a", "b", "x", "c", "d", "e", "f"]);
}

#[test]
fn middle_removal_touches_only_the_removed_item() {
    let mut fx = Fixture::new();
    let mut list = keyed_text_list(&["a", "b", "c"], false);
    fx.mount(&mut list).unwrap();

    let counts = fx.patch(&mut list, keyed_text_list(&["a", "c"], false)).unwrap();
    assert_eq!(counts.removes, 1);
    assert_eq!(counts.writes(), 1);
    assert_eq!(fx.texts(), vec!["a", "c"]);
}

#[test]
fn unkeyed_items_patch_positionally() {
    let mut fx = Fixture::new();
    let mut list = Block::list(vec![Block::text("x"), Block::text("y")], false, false);
    fx.mount(&mut list).unwrap();

    let counts = fx
        .patch(
            &mut list,
            Block::list(vec![Block::text("x"), Block::text("z")], false, false),
        )
        .unwrap();
    assert_eq!(counts.text_writes, 1);
    assert_eq!(counts.creates, 0);
    assert_eq!(fx.texts(), vec!["x", "z"]);
}

#[test]
fn list_stays_between_its_template_siblings() {
    let mut fx = Fixture::new();
    let template = Template::parse("<p>[<block-child-0/>]</p>").unwrap();
    let render = |keys: &[&str]| {
        Block::element(
            Rc::clone(&template),
            Vec::new(),
            vec![Some(keyed_text_list(keys, false))],
        )
    };
    let mut block = render(&["a", "b", "c"]);
    fx.mount(&mut block).unwrap();
    let p = block.el().unwrap();
    assert_eq!(text_content(&fx.doc, p), "[abc]");

    fx.patch(&mut block, render(&["c", "a", "d"])).unwrap();
    assert_eq!(text_content(&fx.doc, p), "[cad]");
    fx.patch(&mut block, render(&[])).unwrap();
    assert_eq!(text_content(&fx.doc, p), "[]");
    fx.patch(&mut block, render(&["e"])).unwrap();
    assert_eq!(fx.html(), "<p>[e]</p>");
}

#[test]
fn empty_composite_items_still_anchor_insertions() {
    let mut fx = Fixture::new();
    let empty = || Block::multi(vec![None]).with_key("empty");
    let mut list = Block::list(vec![empty()], false, true);
    fx.mount(&mut list).unwrap();
    let before = fx.doc.children(fx.container).to_vec();

    fx.patch(&mut list, Block::list(vec![keyed_text("x"), empty()], false, true))
        .unwrap();
    let x = fx.node_with_text("x").unwrap();
    let after = fx.doc.children(fx.container).to_vec();
    assert_eq!(after, vec![x, before[0], before[1]]);
}

#[test]
fn remove_with_only_child_clears_the_parent() {
    let mut fx = Fixture::new();
    let mut list = id_list(&[1, 2, 3], true);
    fx.mount(&mut list).unwrap();

    let counts = fx.remove(list).unwrap();
    assert_eq!(counts.clears, 1);
    assert_eq!(counts.removes, 0);
    assert!(fx.doc.children(fx.container).is_empty());
}

#[test]
fn remove_without_only_child_removes_items_then_anchor() {
    let mut fx = Fixture::new();
    let mut before = Block::text("keep");
    fx.mount(&mut before).unwrap();
    let mut list = id_list(&[1, 2, 3], false);
    fx.mount(&mut list).unwrap();

    let counts = fx.remove(list).unwrap();
    assert_eq!(counts.removes, 4);
    assert_eq!(fx.doc.children(fx.container).len(), 1);
    assert_eq!(fx.texts(), vec!["keep"]);
}

#[test]
fn first_child_node_follows_the_first_item() {
    let mut fx = Fixture::new();
    let mut list = keyed_text_list(&["a", "b"], false);
    fx.mount(&mut list).unwrap();
    assert_eq!(list.first_node(), fx.node_with_text("a"));

    fx.patch(&mut list, keyed_text_list(&["b", "a"], false)).unwrap();
    assert_eq!(list.first_node(), fx.node_with_text("b"));

    fx.patch(&mut list, keyed_text_list::<&str>(&[], false)).unwrap();
    assert_eq!(list.first_node(), None);
    assert_eq!(list.leading_node(), fx.doc.children(fx.container).first().copied());
}
