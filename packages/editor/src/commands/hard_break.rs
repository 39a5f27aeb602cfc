use super::{run, Command};
use crate::editor::Dispatch;
use crate::state::EditorState;
use folio_schema::Attrs;
use serde_json::Value;

pub struct InsertHardBreak;

impl Command for InsertHardBreak {
    fn name(&self) -> &'static str {
        "insertHardBreak"
    }

    fn execute(&self, _payload: &Value, state: &EditorState, dispatch: Option<&mut dyn Dispatch>) -> bool {
        let Ok(node) = state.schema().create_node("hardBreak", Attrs::new(), Vec::new()) else {
            return false;
        };
        let tr = state.tr().replace_selection_with(node).scroll_into_view();
        run(self.name(), tr, state, dispatch)
    }
}
