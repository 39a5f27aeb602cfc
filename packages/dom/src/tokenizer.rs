//! HTML tokenizer using logos
//!
//! Two lexers: [`Token`] splits markup into tags and text, and [`AttrToken`]
//! splits the inside of an open tag into names and values.

use crate::escape::unescape;
use logos::{Lexer, Logos};

/// Top-level markup tokens
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"<![a-zA-Z\[][^>]*>")] // doctype, CDATA
#[logos(skip r"<\?[^>]*>")] // processing instructions
pub enum Token<'src> {
    /// Comment body is consumed by the callback
    #[token("<!--", skip_comment)]
    Comment,

    /// Full open tag, from `<` to `>` inclusive
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9:-]*([^>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    OpenTag(&'src str),

    /// Close tag name
    #[regex(r"</[a-zA-Z][a-zA-Z0-9:-]*[^>]*>", close_tag_name)]
    CloseTag(&'src str),

    /// Raw (undecoded) text run
    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    /// A `<` that does not start a tag
    #[token("<")]
    Lt,
}

fn skip_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> bool {
    let remainder = lex.remainder();
    let end = remainder
        .find("-->")
        .map(|i| i + 3)
        .unwrap_or(remainder.len());
    lex.bump(end);
    true
}

fn close_tag_name<'src>(lex: &mut Lexer<'src, Token<'src>>) -> &'src str {
    let inner = &lex.slice()[2..];
    let end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == ':' || c == '-'))
        .unwrap_or(inner.len());
    &inner[..end]
}

/// Tokens inside an open tag, after the tag name
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum AttrToken<'src> {
    /// Attribute name or unquoted value
    #[regex(r#"[^ \t\r\n\f"'<>=/][^ \t\r\n\f"'<>=]*"#, |lex| lex.slice())]
    Word(&'src str),

    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#, strip_quotes)]
    DoubleQuoted(&'src str),

    #[regex(r"'[^']*'", strip_quotes)]
    SingleQuoted(&'src str),

    #[token("/")]
    Slash,
}

fn strip_quotes<'src>(lex: &mut Lexer<'src, AttrToken<'src>>) -> &'src str {
    let s = lex.slice();
    &s[1..s.len() - 1]
}

/// A parsed open tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    /// Lower-cased tag name
    pub name: String,
    /// Lower-cased names with decoded values, first occurrence wins
    pub attributes: Vec<(String, String)>,
    /// Written as `<tag ... />`
    pub self_closing: bool,
}

/// Split a raw open tag (`<img src="a.png" />`) into name, attributes and
/// self-closing flag
pub fn parse_open_tag(raw: &str) -> OpenTag {
    let inner = raw.strip_prefix('<').unwrap_or(raw);
    let inner = inner.strip_suffix('>').unwrap_or(inner);
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();

    OpenTag {
        name,
        attributes: parse_attributes(&inner[name_end..]),
        self_closing,
    }
}

fn parse_attributes(source: &str) -> Vec<(String, String)> {
    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut pending: Option<String> = None;
    let mut awaiting_value = false;

    for token in AttrToken::lexer(source) {
        match token {
            Ok(AttrToken::Eq) if pending.is_some() => awaiting_value = true,
            Ok(AttrToken::Word(word)) if awaiting_value => {
                if let Some(name) = pending.take() {
                    push_attribute(&mut attributes, name, word);
                }
                awaiting_value = false;
            }
            Ok(AttrToken::DoubleQuoted(value)) | Ok(AttrToken::SingleQuoted(value))
                if awaiting_value =>
            {
                if let Some(name) = pending.take() {
                    push_attribute(&mut attributes, name, value);
                }
                awaiting_value = false;
            }
            Ok(AttrToken::Word(word)) => {
                // Previous name had no value: boolean attribute
                if let Some(name) = pending.take() {
                    push_attribute(&mut attributes, name, "");
                }
                pending = Some(word.to_ascii_lowercase());
            }
            _ => {
                if let Some(name) = pending.take() {
                    push_attribute(&mut attributes, name, "");
                }
                awaiting_value = false;
            }
        }
    }

    if let Some(name) = pending {
        push_attribute(&mut attributes, name, "");
    }

    attributes
}

fn push_attribute(attributes: &mut Vec<(String, String)>, name: String, value: &str) {
    if !attributes.iter().any(|(n, _)| *n == name) {
        attributes.push((name, unescape(value).into_owned()));
    }
}
