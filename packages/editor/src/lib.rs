//! # Folio Editor
//!
//! Transaction engine and commands for Folio documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ dom: markup → sanitized DOM tree            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ schema: DOM → Node tree (and back)          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: versioned state + transactions      │
//! │  - Build steps against a version            │
//! │  - Apply all or nothing                     │
//! │  - Commands dispatch transactions           │
//! │  - Undo/redo over state snapshots           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **States are immutable**: applying a transaction yields a new state
//! 2. **Atomic commits**: every step applies or none does
//! 3. **Versions only grow**: a transaction built on an old version is stale
//! 4. **Schema is the gate**: no step may leave invalid content behind
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_dom::AllowlistSanitizer;
//! use folio_editor::{Editor, EditorState};
//! use folio_schema::SchemaRegistry;
//! use std::sync::Arc;
//!
//! let schema = Arc::new(SchemaRegistry::with_defaults()?);
//! let state = EditorState::from_html(schema, "<p>Hello</p>", &AllowlistSanitizer::default())?;
//! let mut editor = Editor::new(state);
//!
//! editor.execute("addImage", &json!({"imageUrl": "cat.png", "altText": "A cat"}));
//! println!("{}", editor.state().to_html()?);
//! ```

pub mod commands;
mod editor;
mod errors;
mod mapping;
mod position;
mod shared;
mod state;
mod transaction;
mod undo_stack;

pub use commands::{Command, CommandRegistry};
pub use editor::{Dispatch, Editor};
pub use errors::{EditorError, TransactionError, TransactionResult};
pub use position::{Position, Selection};
pub use shared::SharedEditor;
pub use state::EditorState;
pub use transaction::{AppliedTransaction, Step, Transaction, TransactionState};
pub use undo_stack::{HistoryBatch, UndoStack};
