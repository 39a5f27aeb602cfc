//! # Editor
//!
//! Owns the current [`EditorState`], its history and the command registry.
//! All commits go through [`Dispatch::dispatch`], which applies a
//! transaction, swaps in the new state and records the old one for undo.

use crate::commands::CommandRegistry;
use crate::errors::{EditorError, TransactionResult};
use crate::state::EditorState;
use crate::transaction::{AppliedTransaction, Transaction};
use crate::undo_stack::UndoStack;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Commits transactions
pub trait Dispatch {
    fn dispatch(&mut self, tr: Transaction) -> TransactionResult<AppliedTransaction>;
}

#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    history: UndoStack,
    commands: Arc<CommandRegistry>,
    scroll_requested: bool,
}

impl Editor {
    pub fn new(state: EditorState) -> Self {
        Self {
            state,
            history: UndoStack::new(),
            commands: Arc::new(CommandRegistry::with_defaults()),
            scroll_requested: false,
        }
    }

    pub fn with_history_limit(mut self, max_levels: usize) -> Self {
        self.history = UndoStack::with_max_levels(max_levels);
        self
    }

    pub fn with_commands(mut self, commands: CommandRegistry) -> Self {
        self.commands = Arc::new(commands);
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut UndoStack {
        &mut self.history
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Returns and clears the pending scroll request
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Run a command by name. Unknown commands and rejected payloads yield
    /// `false`.
    pub fn execute(&mut self, name: &str, payload: &Value) -> bool {
        match self.try_execute(name, payload) {
            Ok(done) => done,
            Err(e) => {
                warn!(command = name, error = %e, "Command not executed");
                false
            }
        }
    }

    pub fn try_execute(&mut self, name: &str, payload: &Value) -> Result<bool, EditorError> {
        let commands = Arc::clone(&self.commands);
        let command = commands
            .get(name)
            .ok_or_else(|| EditorError::UnknownCommand(name.to_string()))?;
        let state = self.state.clone();
        Ok(command.execute(payload, &state, Some(self as &mut dyn Dispatch)))
    }

    /// Whether the command would succeed in the current state
    pub fn can_execute(&self, name: &str, payload: &Value) -> bool {
        self.commands
            .get(name)
            .is_some_and(|command| command.execute(payload, &self.state, None))
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.state) {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.state) {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        }
    }
}

impl Dispatch for Editor {
    fn dispatch(&mut self, tr: Transaction) -> TransactionResult<AppliedTransaction> {
        let mut tr = tr;
        let (next, applied) = self.state.apply(&mut tr)?;
        let previous = std::mem::replace(&mut self.state, next);
        self.history.record(previous, &applied);

        if applied.scroll_into_view {
            self.scroll_requested = true;
        }
        debug!(version = applied.after_version, "Dispatched transaction");
        Ok(applied)
    }
}
