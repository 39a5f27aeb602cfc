//! # Transactions
//!
//! A [`Transaction`] is a list of steps built against one document version.
//! Building never touches the tree; [`EditorState::apply`] validates and
//! applies every step to a private copy and either commits all of them as a
//! new version or rejects the whole transaction.
//!
//! ```text
//! Building ──apply──▶ Applying ──▶ Applied
//!                          └─────▶ Rejected
//! ```
//!
//! [`EditorState::apply`]: crate::EditorState::apply

use crate::errors::{TransactionError, TransactionResult};
use crate::mapping::{canonical, content_size, offset_of, position_at, FlatSelection, StepMap};
use crate::position::{Position, Selection};
use folio_schema::{Node, SchemaRegistry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionState {
    Building,
    Applying,
    Applied,
    Rejected,
}

/// One edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    /// Insert nodes at a position, splitting a text node if needed
    Insert { at: Position, nodes: Vec<Node> },
    /// Remove everything between two positions of the same container
    Delete { from: Position, to: Position },
    /// Replace the current selection (resolved when applied)
    ReplaceSelection { nodes: Vec<Node> },
    SetSelection { selection: Selection },
}

impl Step {
    /// Apply to `doc`, returning the selection mapped through this step
    pub(crate) fn apply(
        &self,
        doc: &mut Node,
        selection: &Selection,
        schema: &SchemaRegistry,
    ) -> TransactionResult<Selection> {
        if let Step::SetSelection { selection } = self {
            return check_selection(doc, selection, schema);
        }

        // Offsets of the running selection are taken before the tree changes
        let mut flat = FlatSelection::of(selection, doc, schema)?;

        let maps = match self {
            Step::Insert { at, nodes } => vec![insert(doc, at, nodes, schema)?],
            Step::Delete { from, to } => vec![delete(doc, from, to, schema)?],
            Step::ReplaceSelection { nodes } => {
                let (from, to) = (selection.from(), selection.to());
                let deleted = delete(doc, &from, &to, schema)?;
                let at = position_at(doc, deleted.pos, schema)?;
                vec![deleted, insert(doc, &at, nodes, schema)?]
            }
            Step::SetSelection { .. } => Vec::new(),
        };

        for map in &maps {
            flat = flat.map(map);
        }
        flat.resolve(doc, schema)
    }
}

/// Builder for a set of steps against one document version
#[derive(Debug, Clone)]
pub struct Transaction {
    base_version: u64,
    steps: Vec<Step>,
    scroll_into_view: bool,
    description: Option<String>,
    state: TransactionState,
}

impl Transaction {
    pub(crate) fn new(base_version: u64) -> Self {
        Self {
            base_version,
            steps: Vec::new(),
            scroll_into_view: false,
            description: None,
            state: TransactionState::Building,
        }
    }

    pub fn insert(mut self, at: Position, nodes: Vec<Node>) -> Self {
        self.steps.push(Step::Insert { at, nodes });
        self
    }

    pub fn delete(mut self, from: Position, to: Position) -> Self {
        self.steps.push(Step::Delete { from, to });
        self
    }

    pub fn replace_selection_with(mut self, node: Node) -> Self {
        self.steps.push(Step::ReplaceSelection { nodes: vec![node] });
        self
    }

    pub fn delete_selection(mut self) -> Self {
        self.steps.push(Step::ReplaceSelection { nodes: Vec::new() });
        self
    }

    pub fn set_selection(mut self, selection: Selection) -> Self {
        self.steps.push(Step::SetSelection { selection });
        self
    }

    /// Ask the view to bring the resulting selection into view
    pub fn scroll_into_view(mut self) -> Self {
        self.scroll_into_view = true;
        self
    }

    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub(crate) fn set_state(&mut self, state: TransactionState) {
        self.state = state;
    }

    pub(crate) fn scrolls_into_view(&self) -> bool {
        self.scroll_into_view
    }

    pub(crate) fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Immutable record of a committed transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedTransaction {
    pub steps: Vec<Step>,
    pub before_version: u64,
    pub after_version: u64,
    pub selection: Selection,
    pub scroll_into_view: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Step implementations
// ---------------------------------------------------------------------------

fn insert(doc: &mut Node, at: &Position, nodes: &[Node], schema: &SchemaRegistry) -> TransactionResult<StepMap> {
    let pos = offset_of(doc, at, schema)?;
    if nodes.is_empty() {
        return Ok(StepMap::insert(pos, 0));
    }

    let (container_path, text_split) = split_target(doc, at);
    let container = doc
        .node_at(&container_path)
        .ok_or_else(|| TransactionError::InvalidPosition(at.clone()))?;

    for node in nodes {
        schema.validate_node(node)?;
        if !schema.allows_child(&container.node_type, &node.node_type)? {
            return Err(TransactionError::ContentViolation {
                parent: container.node_type.clone(),
                child: node.node_type.clone(),
            });
        }
    }

    let container = doc
        .node_at_mut(&container_path)
        .ok_or_else(|| TransactionError::InvalidPosition(at.clone()))?;
    let index = match text_split {
        Some((index, chars)) => split_text(&mut container.content, index, chars),
        None => at.offset,
    };
    container.content.splice(index..index, nodes.iter().cloned());
    normalize_text(&mut container.content);
    schema.check_content(container)?;

    Ok(StepMap::insert(pos, content_size(nodes, schema)))
}

fn delete(doc: &mut Node, from: &Position, to: &Position, schema: &SchemaRegistry) -> TransactionResult<StepMap> {
    let (mut a, mut b) = (offset_of(doc, from, schema)?, offset_of(doc, to, schema)?);
    let (mut from, mut to) = (from, to);
    if a > b {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut from, &mut to);
    }
    if a == b {
        return Ok(StepMap::delete(a, 0));
    }

    let (from_container, from_split) = split_target(doc, from);
    let (to_container, to_split) = split_target(doc, to);
    if from_container != to_container {
        return Err(TransactionError::UnsupportedRange);
    }

    let container = doc
        .node_at_mut(&from_container)
        .ok_or_else(|| TransactionError::InvalidPosition(from.clone()))?;

    // Split at the end first so the start index stays valid
    let mut end = match to_split {
        Some((index, chars)) => split_text(&mut container.content, index, chars),
        None => to.offset,
    };
    let len_before = container.content.len();
    let start = match from_split {
        Some((index, chars)) => split_text(&mut container.content, index, chars),
        None => from.offset,
    };
    end += container.content.len() - len_before;

    container.content.drain(start..end);
    normalize_text(&mut container.content);
    schema.check_content(container)?;

    Ok(StepMap::delete(a, b - a))
}

fn check_selection(doc: &Node, selection: &Selection, schema: &SchemaRegistry) -> TransactionResult<Selection> {
    match selection {
        Selection::Text { anchor, head } => Ok(Selection::text(
            canonical(doc, anchor, schema)?,
            canonical(doc, head, schema)?,
        )),
        Selection::Node { path } => {
            let node = doc
                .node_at(path)
                .filter(|_| !path.is_empty())
                .ok_or_else(|| TransactionError::InvalidPosition(Position::new(path.clone(), 0)))?;
            let selectable = !node.is_text() && schema.resolve(&node.node_type)?.spec().selectable;
            if !selectable {
                return Err(TransactionError::NotSelectable(node.node_type.clone()));
            }
            Ok(selection.clone())
        }
    }
}

/// Container path plus, for text positions, `(child index, char offset)`
fn split_target(doc: &Node, at: &Position) -> (Vec<usize>, Option<(usize, usize)>) {
    match at.path.split_last() {
        Some((&index, parent)) if doc.node_at(&at.path).is_some_and(Node::is_text) => {
            (parent.to_vec(), Some((index, at.offset)))
        }
        _ => (at.path.clone(), None),
    }
}

/// Split the text child at `index` after `chars` chars; returns the child
/// index of the boundary
fn split_text(content: &mut Vec<Node>, index: usize, chars: usize) -> usize {
    let Some(text) = content.get(index).and_then(|n| n.text.clone()) else {
        return index;
    };
    if chars == 0 {
        return index;
    }
    let Some((byte, _)) = text.char_indices().nth(chars) else {
        return index + 1;
    };
    let (left, right) = text.split_at(byte);
    content[index] = Node::text(left);
    content.insert(index + 1, Node::text(right));
    index + 1
}

/// Merge adjacent text nodes and drop empty ones
fn normalize_text(content: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(content.len());
    for node in content.drain(..) {
        if let Some(text) = &node.text {
            if text.is_empty() {
                continue;
            }
            if let Some(Node { text: Some(prev), .. }) = merged.last_mut() {
                prev.push_str(text);
                continue;
            }
        }
        merged.push(node);
    }
    *content = merged;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(content: &[Node]) -> Vec<&str> {
        content.iter().filter_map(|n| n.text.as_deref()).collect()
    }

    #[test]
    fn test_split_text() {
        let mut content = vec![Node::text("héllo")];
        assert_eq!(split_text(&mut content, 0, 0), 0);
        assert_eq!(split_text(&mut content, 0, 5), 1);
        assert_eq!(content.len(), 1);

        assert_eq!(split_text(&mut content, 0, 2), 1);
        assert_eq!(texts(&content), vec!["hé", "llo"]);
    }

    #[test]
    fn test_normalize_text() {
        let mut content = vec![
            Node::text("a"),
            Node::text(""),
            Node::text("b"),
            Node::new("hardBreak", Default::default(), vec![]),
            Node::text("c"),
        ];
        normalize_text(&mut content);
        assert_eq!(content.len(), 3);
        assert_eq!(texts(&content), vec!["ab", "c"]);
    }

    #[test]
    fn test_builder_keeps_steps_in_order() {
        let tr = Transaction::new(3)
            .insert(Position::new(vec![0], 0), vec![Node::text("a")])
            .delete_selection()
            .scroll_into_view();
        assert_eq!(tr.base_version(), 3);
        assert_eq!(tr.state(), TransactionState::Building);
        assert!(matches!(tr.steps()[0], Step::Insert { .. }));
        assert_eq!(tr.steps()[1], Step::ReplaceSelection { nodes: vec![] });
        assert!(tr.scrolls_into_view());
    }
}
