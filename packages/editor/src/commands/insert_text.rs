//! `insertText`: replace the selection with text.

use super::{parse_payload, run, Command};
use crate::editor::Dispatch;
use crate::state::EditorState;
use folio_schema::Node;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPayload {
    pub text: String,
}

pub struct InsertText;

impl Command for InsertText {
    fn name(&self) -> &'static str {
        "insertText"
    }

    fn execute(&self, payload: &Value, state: &EditorState, dispatch: Option<&mut dyn Dispatch>) -> bool {
        let text = match parse_payload::<TextPayload>(payload) {
            Ok(payload) if !payload.text.is_empty() => payload.text,
            Ok(_) => return false,
            Err(e) => {
                debug!(command = self.name(), error = %e, "Rejected payload");
                return false;
            }
        };

        let tr = state
            .tr()
            .replace_selection_with(Node::text(text))
            .scroll_into_view();
        run(self.name(), tr, state, dispatch)
    }
}
