use super::{run, Command};
use crate::editor::Dispatch;
use crate::state::EditorState;
use serde_json::Value;

/// Remove the selected range or node. Fails on an empty selection.
pub struct DeleteSelection;

impl Command for DeleteSelection {
    fn name(&self) -> &'static str {
        "deleteSelection"
    }

    fn execute(&self, _payload: &Value, state: &EditorState, dispatch: Option<&mut dyn Dispatch>) -> bool {
        if state.selection().is_empty() {
            return false;
        }
        let tr = state.tr().delete_selection().scroll_into_view();
        run(self.name(), tr, state, dispatch)
    }
}
