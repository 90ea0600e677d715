use blockdom::{Block, Key, Template, Value};
use blockdom_test_support::fixture::{Fixture, id_list, keyed_text_list};
use std::rc::Rc;

#[test]
fn same_toggle_key_patches_the_child_in_place() {
    let mut fx = Fixture::new();
    let mut block = Block::toggler("a", Block::text("x"));
    fx.mount(&mut block).unwrap();
    let node = fx.node_with_text("x").unwrap();
    assert_eq!(block.kind(), "toggler");
    assert_eq!(block.first_node(), Some(node));

    let counts = fx.patch(&mut block, Block::toggler("a", Block::text("y"))).unwrap();
    assert_eq!(counts.text_writes, 1);
    assert_eq!(counts.creates, 0);
    assert_eq!(fx.node_with_text("y"), Some(node));
}

#[test]
fn new_toggle_key_replaces_the_child_even_when_equal() {
    let mut fx = Fixture::new();
    let mut block = Block::toggler("a", Block::text("x"));
    fx.mount(&mut block).unwrap();
    let old = fx.node_with_text("x").unwrap();

    let counts = fx.patch(&mut block, Block::toggler("b", Block::text("x"))).unwrap();
    assert_eq!(counts.creates, 1);
    assert_eq!(counts.removes, 1);
    assert!(!fx.doc.is_live(old));
    assert_eq!(fx.texts(), vec!["x"]);
    assert_ne!(block.first_node(), Some(old));
}

#[test]
fn toggled_child_may_change_kind_without_a_violation() {
    let mut fx = Fixture::new();
    let template = Template::parse("<b><block-text-0/></b>").unwrap();
    let mut block = Block::toggler("text", Block::text("plain"));
    fx.mount(&mut block).unwrap();

    fx.patch(
        &mut block,
        Block::toggler("bold", Block::element(Rc::clone(&template), vec![Value::from("loud")], Vec::new())),
    )
    .unwrap();
    assert_eq!(fx.html(), "<b>loud</b>");

    fx.patch(&mut block, Block::toggler("text", Block::text("plain"))).unwrap();
    assert_eq!(fx.html(), "plain");
}

#[test]
fn togglers_move_as_list_items() {
    let mut fx = Fixture::new();
    let item = |id: i64| Block::toggler("t", Block::text(id.to_string())).with_key(Key::Int(id));
    let mut list = Block::list(vec![item(1), item(2), item(3)], false, true);
    fx.mount(&mut list).unwrap();
    let before = fx.content_nodes();

    let counts = fx
        .patch(&mut list, Block::list(vec![item(3), item(1), item(2)], false, true))
        .unwrap();
    assert_eq!(counts.moves, 1);
    assert_eq!(counts.creates, 0);
    assert_eq!(fx.texts(), vec!["3", "1", "2"]);
    assert_eq!(fx.content_nodes(), vec![before[2], before[0], before[1]]);
}

#[test]
fn swapping_an_only_child_list_keeps_the_replacement() {
    let mut fx = Fixture::new();
    let mut block = Block::toggler("first", keyed_text_list(&["a", "b"], true));
    fx.mount(&mut block).unwrap();

    fx.patch(&mut block, Block::toggler("second", keyed_text_list(&["c"], true)))
        .unwrap();
    assert_eq!(fx.texts(), vec!["c"]);

    let counts = fx
        .patch(&mut block, Block::toggler("second", keyed_text_list::<&str>(&[], true)))
        .unwrap();
    assert_eq!(counts.clears, 1);
    assert!(fx.texts().is_empty());
}

#[test]
fn sole_child_slot_reaches_a_list_inside_a_toggler() {
    let mut fx = Fixture::new();
    let template = Template::parse("<ul><block-child-0/></ul>").unwrap();
    let element = |key: &str, ids: &[i64]| {
        Block::element(
            Rc::clone(&template),
            Vec::new(),
            vec![Some(Block::toggler(key, id_list(ids, false)))],
        )
    };

    let mut block = element("a", &[1, 2]);
    fx.mount(&mut block).unwrap();
    assert_eq!(fx.html(), "<ul>12</ul>");

    let counts = fx.patch(&mut block, element("a", &[])).unwrap();
    assert_eq!(counts.clears, 1);

    fx.patch(&mut block, element("b", &[3])).unwrap();
    assert_eq!(fx.html(), "<ul>3</ul>");

    let counts = fx.patch(&mut block, element("b", &[])).unwrap();
    assert_eq!(counts.clears, 1);
    assert_eq!(fx.html(), "<ul></ul>");
}

#[test]
fn remove_takes_the_child_with_it() {
    let mut fx = Fixture::new();
    let mut block = Block::toggler("a", Block::multi(vec![Some(Block::text("x")), None]));
    fx.mount(&mut block).unwrap();

    fx.remove(block).unwrap();
    assert!(fx.doc.children(fx.container).is_empty());
}
