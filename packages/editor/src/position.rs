//! # Positions and Selection
//!
//! A [`Position`] addresses a point in the tree by path:
//!
//! - `path` leads from the root to a container node, `offset` is a child
//!   index in `0..=child_count`.
//! - `path` leads to a text node, `offset` is a char index in
//!   `0..=text_len`.
//!
//! The same point can be written both ways (`(paragraph, 0)` and
//! `(first text, 0)`). Selections produced by a transaction are always in
//! canonical form: a text position only strictly inside a text node.

use folio_schema::Node;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Position {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Position in the root before its first child
    pub fn start() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Position between the node at `path` and its previous sibling.
    ///
    /// `None` for the root.
    pub fn before(path: &[usize]) -> Option<Self> {
        let (&index, parent) = path.split_last()?;
        Some(Self::new(parent.to_vec(), index))
    }

    /// Position between the node at `path` and its next sibling
    pub fn after(path: &[usize]) -> Option<Self> {
        let (&index, parent) = path.split_last()?;
        Some(Self::new(parent.to_vec(), index + 1))
    }

    fn key(&self) -> impl Iterator<Item = &usize> {
        self.path.iter().chain(std::iter::once(&self.offset))
    }
}

/// Document order for canonical positions
impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.path, self.offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Selection {
    /// Range between two positions; a cursor when they are equal
    Text { anchor: Position, head: Position },
    /// A whole selectable node
    Node { path: Vec<usize> },
}

impl Selection {
    pub fn cursor(position: Position) -> Self {
        Selection::Text {
            anchor: position.clone(),
            head: position,
        }
    }

    pub fn text(anchor: Position, head: Position) -> Self {
        Selection::Text { anchor, head }
    }

    pub fn node(path: Vec<usize>) -> Self {
        Selection::Node { path }
    }

    /// Start of the selection in document order
    pub fn from(&self) -> Position {
        match self {
            Selection::Text { anchor, head } => anchor.min(head).clone(),
            Selection::Node { path } => Position::before(path).unwrap_or_else(Position::start),
        }
    }

    /// End of the selection in document order
    pub fn to(&self) -> Position {
        match self {
            Selection::Text { anchor, head } => anchor.max(head).clone(),
            Selection::Node { path } => Position::after(path).unwrap_or_else(Position::start),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Text { anchor, head } => anchor == head,
            Selection::Node { .. } => false,
        }
    }

    /// Nothing in `doc` precedes the selection
    pub fn at_start(&self, _doc: &Node) -> bool {
        let from = self.from();
        from.offset == 0 && from.path.iter().all(|&i| i == 0)
    }

    /// Nothing in `doc` follows the selection
    pub fn at_end(&self, doc: &Node) -> bool {
        let to = self.to();
        let mut node = doc;
        for &index in &to.path {
            if index + 1 != node.child_count() {
                return false;
            }
            match node.child(index) {
                Some(child) => node = child,
                None => return false,
            }
        }
        if node.is_text() {
            to.offset == node.text_len()
        } else {
            to.offset == node.child_count()
        }
    }
}
