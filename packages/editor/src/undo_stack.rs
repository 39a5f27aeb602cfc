//! # Undo/Redo Stack
//!
//! Tracks editor history as state snapshots.
//!
//! ## Design
//!
//! - Each committed transaction records the state it replaced
//! - Undo restores that state's document and selection as a **new** version,
//!   so versions stay monotonic and in-flight transactions go stale
//! - Redo restores the state that was undone, again as a new version
//! - New transactions clear the redo stack
//! - Supports batched transactions (group several as one undo step)
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! let (next, applied) = state.apply(&mut tr)?;
//! stack.record(state, &applied);
//!
//! if let Some(previous) = stack.undo(&next) {
//!     // previous.version() == next.version() + 1
//! }
//! ```

use crate::state::EditorState;
use crate::transaction::AppliedTransaction;
use tracing::debug;

/// A group of transactions undone/redone together
#[derive(Debug, Clone)]
pub struct HistoryBatch {
    /// State before the first transaction of the batch
    pub before: EditorState,

    /// Records of the transactions in this batch (in application order)
    pub transactions: Vec<AppliedTransaction>,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl HistoryBatch {
    /// Create a single-transaction batch
    pub fn single(before: EditorState, applied: AppliedTransaction) -> Self {
        let description = applied.description.clone();
        Self {
            before,
            transactions: vec![applied],
            description,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Batch being built between `begin_batch` and `end_batch`
#[derive(Debug, Default)]
struct PendingBatch {
    before: Option<EditorState>,
    transactions: Vec<AppliedTransaction>,
    description: Option<String>,
}

/// Undo/redo stack for an editor
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: Vec<HistoryBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<HistoryBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<PendingBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record a committed transaction and the state it replaced
    pub fn record(&mut self, before: EditorState, applied: &AppliedTransaction) {
        if let Some(batch) = &mut self.current_batch {
            // Keep the state before the first transaction of the batch
            batch.before.get_or_insert(before);
            batch.transactions.push(applied.clone());
            self.redo_stack.clear();
        } else {
            self.push_batch(HistoryBatch::single(before, applied.clone()));
        }
    }

    /// Start a batch of transactions (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(PendingBatch::default());
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if let Some(before) = batch.before {
                self.push_batch(HistoryBatch {
                    before,
                    transactions: batch.transactions,
                    description: batch.description,
                });
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: HistoryBatch) {
        self.undo_stack.push(batch);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Undo the most recent batch.
    ///
    /// Returns the state to install: the recorded document and selection at
    /// version `current.version() + 1`. `None` if there is nothing to undo.
    pub fn undo(&mut self, current: &EditorState) -> Option<EditorState> {
        self.end_batch();
        let batch = self.undo_stack.pop()?;
        let restored = current.restore(&batch.before);
        debug!(
            from = current.version(),
            to = restored.version(),
            transactions = batch.transactions.len(),
            "Undo"
        );

        // Move to redo stack, remembering the state we leave
        self.redo_stack.push(HistoryBatch {
            before: current.clone(),
            ..batch
        });
        Some(restored)
    }

    /// Redo the most recently undone batch
    pub fn redo(&mut self, current: &EditorState) -> Option<EditorState> {
        let batch = self.redo_stack.pop()?;
        let restored = current.restore(&batch.before);
        debug!(from = current.version(), to = restored.version(), "Redo");

        // Move back to undo stack
        self.undo_stack.push(HistoryBatch {
            before: current.clone(),
            ..batch
        });
        Some(restored)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
            || self
                .current_batch
                .as_ref()
                .is_some_and(|batch| batch.before.is_some())
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use folio_dom::AllowlistSanitizer;
    use folio_schema::{Node, SchemaRegistry};
    use std::sync::Arc;

    fn state(html: &str) -> EditorState {
        let schema = Arc::new(SchemaRegistry::with_defaults().unwrap());
        EditorState::from_html(schema, html, &AllowlistSanitizer::default()).unwrap()
    }

    /// Append text to the first paragraph and record it
    fn append(stack: &mut UndoStack, state: EditorState, text: &str) -> EditorState {
        let at = Position::new(vec![0], state.doc().child(0).unwrap().child_count());
        let mut tr = state.tr().insert(at, vec![Node::text(text)]).set_description(text);
        let (next, applied) = state.apply(&mut tr).unwrap();
        stack.record(state, &applied);
        next
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_and_redo_create_new_versions() {
        let mut stack = UndoStack::new();
        let state = append(&mut stack, state("<p>Hello</p>"), " World");
        assert_eq!(state.version(), 1);
        assert_eq!(stack.undo_description(), Some(" World"));

        let undone = stack.undo(&state).unwrap();
        assert_eq!(undone.version(), 2);
        assert_eq!(undone.doc().text_content(), "Hello");
        assert!(stack.can_redo());

        let redone = stack.redo(&undone).unwrap();
        assert_eq!(redone.version(), 3);
        assert_eq!(redone.doc().text_content(), "Hello World");
        assert_eq!(redone.doc(), state.doc());
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_batched_transactions() {
        let mut stack = UndoStack::new();
        let initial = state("<p>Hello</p>");

        stack.begin_batch();
        stack.set_batch_description("Greet everyone");
        let state = append(&mut stack, initial.clone(), ",");
        let state = append(&mut stack, state, " everyone");
        stack.end_batch();

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Greet everyone"));

        let undone = stack.undo(&state).unwrap();
        assert_eq!(undone.doc(), initial.doc());
        assert_eq!(stack.undo_levels(), 0);
    }

    #[test]
    fn test_new_transaction_clears_redo() {
        let mut stack = UndoStack::new();
        let state = append(&mut stack, state("<p>Hello</p>"), "!");
        let state = stack.undo(&state).unwrap();
        assert_eq!(stack.redo_levels(), 1);

        append(&mut stack, state, "?");
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut stack = UndoStack::with_max_levels(2);
        let mut state = state("<p>Hello</p>");
        for i in 0..3 {
            state = append(&mut stack, state, &i.to_string());
        }
        assert_eq!(stack.undo_levels(), 2);
    }

    #[test]
    fn test_nothing_to_undo() {
        let mut stack = UndoStack::new();
        let state = state("<p>Hello</p>");
        assert!(stack.undo(&state).is_none());
        assert!(stack.redo(&state).is_none());
    }
}
