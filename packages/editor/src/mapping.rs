//! Document-order offsets used to map selections through steps.
//!
//! Every point in the tree gets a flat offset: a text char counts 1, a leaf
//! node 1, a container 2 (open and close) plus its content. The root's
//! content starts at 0. Splitting or merging text nodes leaves offsets
//! unchanged, which keeps mapping independent of text normalization.

use crate::errors::{TransactionError, TransactionResult};
use crate::position::{Position, Selection};
use folio_schema::{Node, SchemaRegistry};

pub(crate) fn is_leaf(node: &Node, schema: &SchemaRegistry) -> bool {
    node.is_text()
        || schema
            .resolve(&node.node_type)
            .map(|s| s.spec().is_leaf())
            .unwrap_or(node.content.is_empty())
}

pub(crate) fn node_size(node: &Node, schema: &SchemaRegistry) -> usize {
    if node.is_text() {
        node.text_len()
    } else if is_leaf(node, schema) {
        1
    } else {
        2 + content_size(&node.content, schema)
    }
}

pub(crate) fn content_size(nodes: &[Node], schema: &SchemaRegistry) -> usize {
    nodes.iter().map(|n| node_size(n, schema)).sum()
}

/// Flat offset of `pos` in `doc`
pub(crate) fn offset_of(doc: &Node, pos: &Position, schema: &SchemaRegistry) -> TransactionResult<usize> {
    let invalid = || TransactionError::InvalidPosition(pos.clone());

    let mut offset = 0;
    let mut node = doc;
    for (depth, &index) in pos.path.iter().enumerate() {
        let child = node.content.get(index).ok_or_else(invalid)?;
        offset += content_size(&node.content[..index], schema);

        if child.is_text() {
            if depth + 1 != pos.path.len() || pos.offset > child.text_len() {
                return Err(invalid());
            }
            return Ok(offset + pos.offset);
        }
        if is_leaf(child, schema) {
            return Err(invalid());
        }
        offset += 1;
        node = child;
    }

    if pos.offset > node.content.len() {
        return Err(invalid());
    }
    Ok(offset + content_size(&node.content[..pos.offset], schema))
}

/// Canonical position at flat `offset`
pub(crate) fn position_at(doc: &Node, offset: usize, schema: &SchemaRegistry) -> TransactionResult<Position> {
    let mut path = Vec::new();
    let mut node = doc;
    let mut start = 0;

    'descend: loop {
        let mut cursor = start;
        for (index, child) in node.content.iter().enumerate() {
            if offset == cursor {
                return Ok(Position::new(path, index));
            }
            let size = node_size(child, schema);
            if offset < cursor + size {
                path.push(index);
                if child.is_text() {
                    return Ok(Position::new(path, offset - cursor));
                }
                node = child;
                start = cursor + 1;
                continue 'descend;
            }
            cursor += size;
        }

        if offset == cursor {
            return Ok(Position::new(path, node.content.len()));
        }
        return Err(TransactionError::InvalidPosition(Position::new(path, offset)));
    }
}

/// Bring a position into canonical form
pub(crate) fn canonical(doc: &Node, pos: &Position, schema: &SchemaRegistry) -> TransactionResult<Position> {
    position_at(doc, offset_of(doc, pos, schema)?, schema)
}

/// Effect of one step on flat offsets: `deleted` units at `pos` replaced by
/// `inserted` units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StepMap {
    pub pos: usize,
    pub deleted: usize,
    pub inserted: usize,
}

impl StepMap {
    pub fn insert(pos: usize, inserted: usize) -> Self {
        Self { pos, deleted: 0, inserted }
    }

    pub fn delete(pos: usize, deleted: usize) -> Self {
        Self { pos, deleted, inserted: 0 }
    }

    /// Offsets at an insertion point move past the inserted content
    pub fn map(&self, offset: usize) -> usize {
        let end = self.pos + self.deleted;
        if offset < self.pos || (offset == self.pos && self.deleted > 0) {
            offset
        } else if offset >= end {
            offset - self.deleted + self.inserted
        } else {
            self.pos + self.inserted
        }
    }

    /// Whether `start..start + size` lies inside the deleted range
    pub fn deletes(&self, start: usize, size: usize) -> bool {
        self.deleted > 0 && self.pos <= start && start + size <= self.pos + self.deleted
    }
}

/// A selection expressed in flat offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlatSelection {
    Text { anchor: usize, head: usize },
    Node { start: usize, size: usize },
}

impl FlatSelection {
    pub fn of(selection: &Selection, doc: &Node, schema: &SchemaRegistry) -> TransactionResult<Self> {
        match selection {
            Selection::Text { anchor, head } => Ok(FlatSelection::Text {
                anchor: offset_of(doc, anchor, schema)?,
                head: offset_of(doc, head, schema)?,
            }),
            Selection::Node { path } => {
                let before = Position::before(path)
                    .ok_or_else(|| TransactionError::InvalidPosition(Position::new(path.clone(), 0)))?;
                let node = doc
                    .node_at(path)
                    .ok_or_else(|| TransactionError::InvalidPosition(before.clone()))?;
                Ok(FlatSelection::Node {
                    start: offset_of(doc, &before, schema)?,
                    size: node_size(node, schema),
                })
            }
        }
    }

    pub fn map(self, step: &StepMap) -> Self {
        match self {
            FlatSelection::Text { anchor, head } => FlatSelection::Text {
                anchor: step.map(anchor),
                head: step.map(head),
            },
            FlatSelection::Node { start, size } if step.deletes(start, size) => {
                let cursor = step.map(start);
                FlatSelection::Text { anchor: cursor, head: cursor }
            }
            FlatSelection::Node { start, size } => FlatSelection::Node {
                start: step.map(start),
                size,
            },
        }
    }

    pub fn resolve(self, doc: &Node, schema: &SchemaRegistry) -> TransactionResult<Selection> {
        match self {
            FlatSelection::Text { anchor, head } => Ok(Selection::text(
                position_at(doc, anchor, schema)?,
                position_at(doc, head, schema)?,
            )),
            FlatSelection::Node { start, .. } => {
                let mut before = position_at(doc, start, schema)?;
                before.path.push(before.offset);
                Ok(Selection::node(before.path))
            }
        }
    }
}
