use blockdom::Block;
use blockdom_test_support::fixture::Fixture;

#[test]
fn mount_inserts_a_single_text_node() {
    let mut fx = Fixture::new();
    let mut block = Block::text("hello");
    fx.mount(&mut block).unwrap();

    assert_eq!(fx.texts(), vec!["hello"]);
    assert_eq!(fx.anchor_count(), 0, "root anchor must not outlive mount");
    assert_eq!(block.el(), fx.node_with_text("hello"));
    assert_eq!(block.first_node(), block.el());
}

#[test]
fn equal_text_patch_performs_no_writes() {
    let mut fx = Fixture::new();
    let mut block = Block::text("same");
    fx.mount(&mut block).unwrap();

    let counts = fx.patch(&mut block, Block::text("same")).unwrap();
    assert_eq!(counts.writes(), 0);
    assert!(fx.doc.journal().is_empty(), "{:?}", fx.doc.journal());
}

#[test]
fn changed_text_is_one_write_to_the_same_node() {
    let mut fx = Fixture::new();
    let mut block = Block::text("before");
    fx.mount(&mut block).unwrap();
    let node = block.el();

    let counts = fx.patch(&mut block, Block::text("after")).unwrap();
    assert_eq!(counts.text_writes, 1);
    assert_eq!(counts.writes(), 1);
    assert_eq!(block.el(), node);
    assert_eq!(block.as_text(), Some("after"));
    assert_eq!(fx.texts(), vec!["after"]);
}

#[test]
fn mounting_after_existing_content_appends() {
    let mut fx = Fixture::new();
    let mut first = Block::text("a");
    let mut second = Block::text("b");
    fx.mount(&mut first).unwrap();
    fx.mount(&mut second).unwrap();
    assert_eq!(fx.texts(), vec!["a", "b"]);
}

#[test]
fn remove_frees_the_node() {
    let mut fx = Fixture::new();
    let mut block = Block::text("gone");
    fx.mount(&mut block).unwrap();
    let node = block.el().unwrap();

    let counts = fx.remove(block).unwrap();
    assert_eq!(counts.removes, 1);
    assert!(!fx.doc.is_live(node));
    assert!(fx.doc.children(fx.container).is_empty());
}

#[test]
fn comment_block_is_static() {
    let mut fx = Fixture::new();
    let mut block = Block::comment("note");
    fx.mount(&mut block).unwrap();
    assert_eq!(block.kind(), "comment");
    assert_eq!(fx.html(), "<!--note-->");
    assert!(fx.texts().is_empty());
    let node = block.el();

    let counts = fx.patch(&mut block, Block::comment("other")).unwrap();
    assert_eq!(counts.writes(), 0);
    assert_eq!(block.el(), node);
    assert_eq!(fx.html(), "<!--note-->");

    let counts = fx.remove(block).unwrap();
    assert_eq!(counts.removes, 1);
    assert!(fx.doc.children(fx.container).is_empty());
}

#[test]
fn comments_move_inside_keyed_lists() {
    let mut fx = Fixture::new();
    let items = |order: &[&str]| {
        order
            .iter()
            .map(|&name| match name {
                "c" => Block::comment("c").with_key("c"),
                text => Block::text(text).with_key(text),
            })
            .collect::<Vec<_>>()
    };
    let mut list = Block::list(items(&["c", "t"]), false, true);
    fx.mount(&mut list).unwrap();
    assert_eq!(fx.html(), "<!--c-->t");

    let counts = fx.patch(&mut list, Block::list(items(&["t", "c"]), false, true)).unwrap();
    assert_eq!(counts.moves, 1);
    assert_eq!(counts.creates, 0);
    assert_eq!(fx.html(), "t<!--c-->");
}
