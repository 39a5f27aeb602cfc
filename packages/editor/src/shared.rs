//! Thread-safe editor handle.
//!
//! Every operation holds the lock for its whole duration, so "read version,
//! validate, commit" is one critical section and concurrent writers are
//! serialized in lock order.

use crate::editor::{Dispatch, Editor};
use crate::errors::TransactionResult;
use crate::state::EditorState;
use crate::transaction::{AppliedTransaction, Transaction};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SharedEditor {
    inner: Arc<Mutex<Editor>>,
}

impl SharedEditor {
    pub fn new(editor: Editor) -> Self {
        Self {
            inner: Arc::new(Mutex::new(editor)),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> EditorState {
        self.inner.lock().state().clone()
    }

    pub fn version(&self) -> u64 {
        self.inner.lock().state().version()
    }

    pub fn execute(&self, name: &str, payload: &Value) -> bool {
        self.inner.lock().execute(name, payload)
    }

    pub fn undo(&self) -> bool {
        self.inner.lock().undo()
    }

    pub fn redo(&self) -> bool {
        self.inner.lock().redo()
    }

    /// Run `f` with exclusive access to the editor
    pub fn with<R>(&self, f: impl FnOnce(&mut Editor) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl Dispatch for SharedEditor {
    fn dispatch(&mut self, tr: Transaction) -> TransactionResult<AppliedTransaction> {
        self.inner.lock().dispatch(tr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransactionError;
    use crate::position::Position;
    use folio_dom::AllowlistSanitizer;
    use folio_schema::{Node, SchemaRegistry};
    use serde_json::json;
    use std::thread;

    fn shared(html: &str) -> SharedEditor {
        let schema = Arc::new(SchemaRegistry::with_defaults().unwrap());
        let state = EditorState::from_html(schema, html, &AllowlistSanitizer::default()).unwrap();
        SharedEditor::new(Editor::new(state))
    }

    #[test]
    fn test_second_writer_on_same_version_is_stale() {
        let mut editor = shared("<p>ab</p>");
        let snapshot = editor.state();
        let first = snapshot.tr().insert(Position::new(vec![0], 1), vec![Node::text("c")]);
        let second = snapshot.tr().insert(Position::new(vec![0], 1), vec![Node::text("d")]);

        editor.dispatch(first).unwrap();
        assert_eq!(
            editor.dispatch(second).unwrap_err(),
            TransactionError::StaleVersion { expected: 1, actual: 0 }
        );
        assert_eq!(editor.state().doc().text_content(), "abc");
    }

    #[test]
    fn test_concurrent_commands_are_serialized() {
        let editor = shared("<p>x</p>");
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let editor = editor.clone();
                thread::spawn(move || editor.execute("insertText", &json!({"text": "y"})))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(editor.version(), 8);
        assert_eq!(editor.state().doc().text_content().len(), 9);
    }
}
