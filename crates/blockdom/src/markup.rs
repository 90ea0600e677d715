//! Template markup scanner.
//!
//! Accepts a small XML-like subset and turns it into an [`ElementNode`] tree:
//! - exactly one root element, optionally surrounded by whitespace/comments;
//! - tag and attribute names restricted to ASCII `[A-Za-z0-9:_-]`;
//! - attribute values quoted with `"` or `'`, or bare (boolean) names;
//! - void elements (`br`, `img`, `input`, ...) need no closing tag;
//! - only the `&amp; &lt; &gt; &quot; &#39;` entities are decoded.
//!
//! Dynamic spots use reserved names:
//! - `<block-text-N/>`: text node fed from data entry `N`;
//! - `<block-child-N/>`: bind point for sub-block `N`;
//! - `block-attribute-N="name"`: attribute `name` fed from data entry `N`;
//! - `block-handler-N="event"`: listener for `event` running handler `N`;
//! - `block-attributes="N"`: attribute map fed from data entry `N`;
//! - `block-ref="N"`: the element's node is published through the ref at `N`.
//!
//! A `<block-child-N/>` that is the only content of its element gets no
//! placeholder; the sub-block is appended into the element instead.

use crate::template::{ElementNode, TemplateError, TemplateNode};
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const TEXT_SLOT: &str = "block-text-";
const CHILD_SLOT: &str = "block-child-";
const ATTRIBUTE_BINDING: &str = "block-attribute-";
const HANDLER_BINDING: &str = "block-handler-";
const ATTRIBUTES_BINDING: &str = "block-attributes";
const REF_BINDING: &str = "block-ref";
/// Element nesting allowed below the root.
const MAX_DEPTH: usize = 256;

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b':' | b'_' | b'-')
}

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

pub(crate) fn parse_template(markup: &str) -> Result<ElementNode, TemplateError> {
    let mut scanner = Scanner {
        input: markup,
        pos: 0,
    };
    scanner.skip_insignificant()?;
    let root = match scanner.parse_tag(0)? {
        TemplateNode::Element(root) => root,
        _ => return Err(TemplateError::RootNotElement),
    };
    scanner.skip_insignificant()?;
    if scanner.pos != markup.len() {
        return Err(TemplateError::RootNotElement);
    }
    Ok(root)
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error(&self, message: &'static str) -> TemplateError {
        TemplateError::Syntax {
            position: self.pos,
            message,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Whitespace and comments outside the root element.
    fn skip_insignificant(&mut self) -> Result<(), TemplateError> {
        loop {
            self.skip_whitespace();
            if self.rest().starts_with(COMMENT_START) {
                self.skip_comment()?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), TemplateError> {
        let body = self.pos + COMMENT_START.len();
        match self.input[body..].find(COMMENT_END) {
            Some(end) => {
                self.pos = body + end + COMMENT_END.len();
                Ok(())
            }
            None => Err(self.error("unterminated comment")),
        }
    }

    fn expect(&mut self, byte: u8, message: &'static str) -> Result<(), TemplateError> {
        if self.peek() != Some(byte) {
            return Err(self.error(message));
        }
        self.pos += 1;
        Ok(())
    }

    fn name(&mut self) -> Result<&'a str, TemplateError> {
        let start = self.pos;
        while self.peek().is_some_and(is_name_byte) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a name"));
        }
        // Name bytes are ASCII, so both ends are char boundaries.
        Ok(&self.input[start..self.pos])
    }

    fn index_suffix(&self, name: &str, prefix: &str, at: usize) -> Result<usize, TemplateError> {
        name[prefix.len()..]
            .parse::<usize>()
            .map_err(|_| TemplateError::BadIndex { position: at })
    }

    /// Parse a tag starting at `<`.
    fn parse_tag(&mut self, depth: usize) -> Result<TemplateNode, TemplateError> {
        if depth > MAX_DEPTH {
            return Err(self.error("elements nested too deeply"));
        }
        let tag_start = self.pos;
        self.expect(b'<', "expected `<`")?;
        let name = self.name()?;

        if name.starts_with(TEXT_SLOT) || name.starts_with(CHILD_SLOT) {
            let (prefix, is_text) = if name.starts_with(TEXT_SLOT) {
                (TEXT_SLOT, true)
            } else {
                (CHILD_SLOT, false)
            };
            let index = self.index_suffix(name, prefix, tag_start)?;
            self.skip_whitespace();
            if !self.rest().starts_with("/>") {
                return Err(self.error("placeholders must be self-closing"));
            }
            self.pos += 2;
            return Ok(if is_text {
                TemplateNode::TextSlot(index)
            } else {
                TemplateNode::ChildSlot(index)
            });
        }

        let mut element = ElementNode::new(name);
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    self.expect(b'>', "expected `>` after `/`")?;
                    return Ok(TemplateNode::Element(element));
                }
                Some(_) => {
                    let attr_start = self.pos;
                    let attr_name = self.name()?;
                    let value = self.attribute_value()?;
                    let value_index = || {
                        value
                            .trim()
                            .parse::<usize>()
                            .map_err(|_| TemplateError::BadIndex { position: attr_start })
                    };
                    element = if attr_name == ATTRIBUTES_BINDING {
                        element.bind_attrs(value_index()?)
                    } else if attr_name == REF_BINDING {
                        element.node_ref(value_index()?)
                    } else if attr_name.starts_with(ATTRIBUTE_BINDING) {
                        let index = self.index_suffix(attr_name, ATTRIBUTE_BINDING, attr_start)?;
                        element.bind_attr(index, &value)
                    } else if attr_name.starts_with(HANDLER_BINDING) {
                        let index = self.index_suffix(attr_name, HANDLER_BINDING, attr_start)?;
                        element.on(index, &value)
                    } else {
                        element.attr(attr_name, &value)
                    };
                }
                None => return Err(self.error("unterminated start tag")),
            }
        }

        if is_void_element(element.name()) {
            return Ok(TemplateNode::Element(element));
        }

        loop {
            match self.peek() {
                None => return Err(self.error("missing closing tag")),
                Some(b'<') => {
                    if self.rest().starts_with("</") {
                        self.pos += 2;
                        let close = self.name()?;
                        if close != element.name() {
                            return Err(self.error("mismatched closing tag"));
                        }
                        self.skip_whitespace();
                        self.expect(b'>', "expected `>` in closing tag")?;
                        return Ok(TemplateNode::Element(element));
                    }
                    if self.rest().starts_with(COMMENT_START) {
                        self.skip_comment()?;
                        continue;
                    }
                    let child = self.parse_tag(depth + 1)?;
                    element = element.child(child);
                }
                Some(_) => {
                    let start = self.pos;
                    let end = memchr(b'<', &self.bytes()[start..])
                        .map_or(self.input.len(), |rel| start + rel);
                    self.pos = end;
                    element = element.child(TemplateNode::Text(decode_entities(
                        &self.input[start..end],
                    )));
                }
            }
        }
    }

    fn attribute_value(&mut self) -> Result<String, TemplateError> {
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Ok(String::new());
        }
        self.pos += 1;
        self.skip_whitespace();
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                let start = self.pos + 1;
                let Some(rel) = memchr(quote, &self.bytes()[start..]) else {
                    return Err(self.error("unterminated attribute value"));
                };
                self.pos = start + rel + 1;
                Ok(decode_entities(&self.input[start..start + rel]))
            }
            Some(_) => {
                let start = self.pos;
                while self
                    .peek()
                    .is_some_and(|b| !b.is_ascii_whitespace() && b != b'>' && b != b'/')
                {
                    self.pos += 1;
                }
                Ok(decode_entities(&self.input[start..self.pos]))
            }
            None => Err(self.error("missing attribute value")),
        }
    }
}

fn decode_entities(raw: &str) -> String {
    if memchr(b'&', raw.as_bytes()).is_none() {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = [
            ("&amp;", '&'),
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&quot;", '"'),
            ("&#39;", '\''),
        ]
        .iter()
        .find(|(entity, _)| rest.starts_with(entity));
        match decoded {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
