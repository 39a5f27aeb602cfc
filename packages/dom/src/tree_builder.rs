//! Builds a [`Fragment`] from the token stream.
//!
//! Error recovery is lenient: unmatched close tags are ignored, unclosed
//! elements are closed at end of input, and anything the lexer cannot
//! classify is kept as text.

use crate::node::{DomNode, Element, Fragment};
use crate::tokenizer::{parse_open_tag, Token};
use crate::{escape::unescape, is_raw_text_element, is_void_element};
use logos::Logos;

/// Deepest element nesting the tree builder keeps. Elements opened below
/// this depth are skipped and the fragment is marked `truncated`.
pub const MAX_NESTING: usize = 1024;

/// Parse markup into a fragment. Never fails.
pub fn parse_fragment(source: &str) -> Fragment {
    let mut builder = TreeBuilder::default();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        match token {
            Ok(Token::OpenTag(raw)) => {
                let tag = parse_open_tag(raw);
                let mut element = Element::new(tag.name);
                element.attributes = tag.attributes;

                if is_void_element(&element.tag) || tag.self_closing {
                    builder.append(element.into());
                } else if is_raw_text_element(&element.tag) {
                    let remainder = lexer.remainder();
                    let end = find_close_tag(remainder, &element.tag);
                    if end > 0 {
                        element.children.push(DomNode::text(&remainder[..end]));
                    }
                    lexer.bump(end);
                    // The close tag that follows is unmatched and ignored
                    builder.append(element.into());
                } else {
                    builder.open(element);
                }
            }
            Ok(Token::CloseTag(name)) => builder.close(&name.to_ascii_lowercase()),
            Ok(Token::Text(text)) => builder.text(&unescape(text)),
            Ok(Token::Lt) => builder.text("<"),
            Ok(Token::Comment) => {}
            Err(()) => builder.text(lexer.slice()),
        }
    }

    builder.finish()
}

/// Byte offset of `</tag` in `source` (case-insensitive), or its length
fn find_close_tag(source: &str, tag: &str) -> usize {
    let needle = format!("</{tag}");
    source
        .to_ascii_lowercase()
        .find(&needle)
        .unwrap_or(source.len())
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<DomNode>,
    open: Vec<Element>,
    truncated: bool,
}

impl TreeBuilder {
    fn current_children(&mut self) -> &mut Vec<DomNode> {
        match self.open.last_mut() {
            Some(el) => &mut el.children,
            None => &mut self.root,
        }
    }

    fn append(&mut self, node: DomNode) {
        self.current_children().push(node);
    }

    fn open(&mut self, element: Element) {
        if self.open.len() >= MAX_NESTING {
            self.truncated = true;
            return;
        }
        self.open.push(element);
    }

    fn close(&mut self, tag: &str) {
        let Some(depth) = self.open.iter().rposition(|el| el.tag == tag) else {
            return;
        };
        while self.open.len() > depth {
            self.pop();
        }
    }

    fn pop(&mut self) {
        if let Some(element) = self.open.pop() {
            self.append(element.into());
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let children = self.current_children();
        if let Some(DomNode::Text { content }) = children.last_mut() {
            content.push_str(text);
        } else {
            children.push(DomNode::text(text));
        }
    }

    fn finish(mut self) -> Fragment {
        while !self.open.is_empty() {
            self.pop();
        }
        let mut fragment = Fragment::new(self.root);
        fragment.truncated = self.truncated;
        fragment
    }
}
