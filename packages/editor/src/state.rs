//! # Editor State
//!
//! An immutable snapshot: document tree, version, selection and the schema
//! they conform to. Applying a transaction yields a new snapshot; the old
//! one stays valid and is what the undo history keeps.

use crate::errors::{TransactionError, TransactionResult};
use crate::mapping::{is_leaf, position_at};
use crate::position::{Position, Selection};
use crate::transaction::{AppliedTransaction, Transaction, TransactionState};
use folio_dom::Sanitizer;
use folio_schema::{Node, SchemaRegistry, SchemaResult};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct EditorState {
    doc: Arc<Node>,
    version: u64,
    selection: Selection,
    schema: Arc<SchemaRegistry>,
}

impl EditorState {
    /// State at version 0 with the cursor at the start of the document
    pub fn new(schema: Arc<SchemaRegistry>, doc: Node) -> TransactionResult<Self> {
        schema.validate_node(&doc)?;
        let selection = Selection::cursor(position_at(&doc, start_offset(&doc, &schema), &schema)?);
        Ok(Self {
            doc: Arc::new(doc),
            version: 0,
            selection,
            schema,
        })
    }

    /// Sanitize and parse markup into a fresh state
    pub fn from_html(
        schema: Arc<SchemaRegistry>,
        source: &str,
        sanitizer: &dyn Sanitizer,
    ) -> TransactionResult<Self> {
        let doc = schema.parse_html(source, sanitizer);
        Self::new(schema, doc)
    }

    pub fn doc(&self) -> &Node {
        &self.doc
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn schema(&self) -> &Arc<SchemaRegistry> {
        &self.schema
    }

    /// Start a transaction against this version
    pub fn tr(&self) -> Transaction {
        Transaction::new(self.version)
    }

    /// Position at the end of the last textblock
    pub fn end_position(&self) -> Position {
        let mut path = Vec::new();
        let mut node: &Node = &self.doc;
        while let Some(last) = node.content.last() {
            if is_leaf(last, &self.schema) {
                break;
            }
            path.push(node.content.len() - 1);
            node = last;
        }
        Position::new(path, node.content.len())
    }

    pub fn to_html(&self) -> SchemaResult<String> {
        self.schema.to_html(&self.doc)
    }

    /// Validate and apply every step of `tr`.
    ///
    /// On success returns the next state (version + 1) and the history
    /// record. On failure `self` is unchanged and `tr` is left `Rejected`.
    pub fn apply(&self, tr: &mut Transaction) -> TransactionResult<(EditorState, AppliedTransaction)> {
        if tr.state() != TransactionState::Building {
            return Err(TransactionError::Finished(tr.state()));
        }
        tr.set_state(TransactionState::Applying);

        match self.apply_steps(tr) {
            Ok((doc, selection)) => {
                tr.set_state(TransactionState::Applied);
                let version = self.version + 1;
                debug!(
                    version,
                    steps = tr.steps().len(),
                    description = tr.description().unwrap_or(""),
                    "Transaction applied"
                );

                let applied = AppliedTransaction {
                    steps: tr.steps().to_vec(),
                    before_version: self.version,
                    after_version: version,
                    selection: selection.clone(),
                    scroll_into_view: tr.scrolls_into_view(),
                    description: tr.description().map(str::to_string),
                };
                let next = EditorState {
                    doc: Arc::new(doc),
                    version,
                    selection,
                    schema: Arc::clone(&self.schema),
                };
                Ok((next, applied))
            }
            Err(e) => {
                tr.set_state(TransactionState::Rejected);
                warn!(version = self.version, error = %e, "Transaction rejected");
                Err(e)
            }
        }
    }

    fn apply_steps(&self, tr: &Transaction) -> TransactionResult<(Node, Selection)> {
        if tr.base_version() != self.version {
            return Err(TransactionError::StaleVersion {
                expected: self.version,
                actual: tr.base_version(),
            });
        }

        let mut doc = (*self.doc).clone();
        let mut selection = self.selection.clone();
        for step in tr.steps() {
            selection = step.apply(&mut doc, &selection, &self.schema)?;
        }
        self.schema.validate_node(&doc)?;

        Ok((doc, selection))
    }

    /// The document and selection of `snapshot` as the version after this one
    pub(crate) fn restore(&self, snapshot: &EditorState) -> EditorState {
        EditorState {
            doc: Arc::clone(&snapshot.doc),
            version: self.version + 1,
            selection: snapshot.selection.clone(),
            schema: Arc::clone(&self.schema),
        }
    }
}

/// Offset just inside the first block that can hold a cursor
fn start_offset(doc: &Node, schema: &SchemaRegistry) -> usize {
    let mut offset = 0;
    let mut node = doc;
    while let Some(first) = node.content.first() {
        if is_leaf(first, schema) {
            break;
        }
        offset += 1;
        node = first;
    }
    offset
}
