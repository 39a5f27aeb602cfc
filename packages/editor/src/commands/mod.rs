//! # Commands
//!
//! A command turns a JSON payload into at most one transaction. It validates
//! the payload and builds the transaction before anything is dispatched, so a
//! rejected payload has no side effects.
//!
//! Called without a dispatcher, a command only reports whether it would
//! succeed: the transaction is applied to a throwaway copy of the state.

mod add_image;
mod delete_selection;
mod hard_break;
mod insert_text;

pub use add_image::{AddImage, ImagePayload};
pub use delete_selection::DeleteSelection;
pub use hard_break::InsertHardBreak;
pub use insert_text::{InsertText, TextPayload};

use crate::editor::Dispatch;
use crate::errors::EditorError;
use crate::state::EditorState;
use crate::transaction::Transaction;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Trait for implementing editor commands
pub trait Command: Send + Sync {
    /// Name the command is registered under
    fn name(&self) -> &'static str;

    /// Run the command. Returns `false` without side effects when the payload
    /// is invalid or the transaction would be rejected.
    fn execute(&self, payload: &Value, state: &EditorState, dispatch: Option<&mut dyn Dispatch>) -> bool;
}

/// Registry of available commands, keyed by name
pub struct CommandRegistry {
    commands: HashMap<&'static str, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with all built-in commands
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.add(Box::new(AddImage));
        registry.add(Box::new(InsertText));
        registry.add(Box::new(InsertHardBreak));
        registry.add(Box::new(DeleteSelection));
        registry
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Add a command, replacing any command with the same name
    pub fn add(&mut self, command: Box<dyn Command>) {
        self.commands.insert(command.name(), command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}

/// Deserialize a command payload
pub fn parse_payload<T: DeserializeOwned>(payload: &Value) -> Result<T, EditorError> {
    Ok(T::deserialize(payload)?)
}

/// Dispatch `tr`, or dry-run it when there is no dispatcher
pub(crate) fn run(command: &str, tr: Transaction, state: &EditorState, dispatch: Option<&mut dyn Dispatch>) -> bool {
    let result = match dispatch {
        Some(dispatch) => dispatch.dispatch(tr).map(|_| ()),
        None => {
            let mut tr = tr;
            state.apply(&mut tr).map(|_| ())
        }
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(command, error = %e, "Command transaction rejected");
            false
        }
    }
}
