#![no_main]

use blockdom::{Block, Template};
use dom::{Dom, Document};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(markup) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(template) = Template::parse(markup) else {
        return;
    };
    // Whatever parses must also mount, with every slot left empty.
    let mut doc = Document::new();
    let root = doc.root();
    let mut block = Block::element(template, Vec::new(), Vec::new());
    blockdom::mount(&mut block, &mut doc, root).unwrap();
    blockdom::remove(block, &mut doc).unwrap();
});
