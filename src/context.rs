use std::path::Path;

use egui::Pos2;

use crate::command::{Command, CommandHistory};
use crate::document::Document;
use crate::layer::LayerId;
use crate::project_io::{self, SnapshotError};
use crate::selection::SelectionController;
use crate::session::{DrawingSession, SessionEvent, ToolKind};

/// The single editing context: the document plus everything that edits it.
///
/// All pointer and keyboard events route through here, so the ownership story
/// stays flat: the context owns the document, the construction session, the
/// selection and the undo history, and "new project" rebuilds the whole thing
/// rather than resetting pieces ad hoc.
pub struct EditorContext {
    pub document: Document,
    pub session: DrawingSession,
    pub selection: SelectionController,
    pub history: CommandHistory,
    /// Layer that newly drawn elements are stamped onto.
    pub active_layer: LayerId,
}

impl EditorContext {
    pub fn new(name: &str) -> Self {
        Self {
            document: Document::new(name),
            session: DrawingSession::new(),
            selection: SelectionController::new(),
            history: CommandHistory::new(),
            active_layer: LayerId::new("ground"),
        }
    }

    /// Switching tools abandons any partially built shape.
    pub fn set_tool(&mut self, tool: Option<ToolKind>) {
        self.session.set_tool(tool);
    }

    /// Primary pointer press, in canvas coordinates. Either advances the
    /// in-progress shape or resolves to a selection or a committed element.
    pub fn pointer_pressed(&mut self, pos: Pos2) {
        match self
            .session
            .pointer_down(pos, &self.document.grid, &self.active_layer)
        {
            Some(SessionEvent::Select(p)) => {
                self.selection.select_at(p, &self.document);
            }
            Some(SessionEvent::Commit(command)) => self.execute(command),
            None => {}
        }
    }

    pub fn pointer_moved(&mut self, pos: Pos2) {
        self.session.pointer_move(pos, &self.document.grid);
    }

    pub fn pointer_released(&mut self, pos: Pos2) {
        if let Some(command) = self
            .session
            .pointer_up(pos, &self.document.grid, &self.active_layer)
        {
            self.execute(command);
        }
    }

    /// Secondary press force-commits an in-progress path.
    pub fn right_clicked(&mut self) {
        if let Some(command) = self.session.right_click(&self.active_layer) {
            self.execute(command);
        }
    }

    /// Enter commits a complete multi-point shape; incomplete ones stay open.
    pub fn enter_pressed(&mut self) {
        if let Some(command) = self.session.commit_pending(&self.active_layer) {
            self.execute(command);
        }
    }

    /// Escape discards in-progress construction unconditionally.
    pub fn escape_pressed(&mut self) {
        self.session.reset();
    }

    /// Reverts the latest recorded edit. The selection indexes into the
    /// element collection, so it is cleared whenever the collection shrinks.
    pub fn undo(&mut self) {
        if self.history.undo(&mut self.document) {
            self.selection.clear();
        }
    }

    /// Replaces the whole context with a fresh one, dropping the current
    /// document, history and selection.
    pub fn new_project(&mut self, name: &str) {
        *self = Self::new(name);
    }

    pub fn save_project(&mut self, path: &Path) -> Result<(), SnapshotError> {
        project_io::save(&mut self.document, path)
    }

    /// Loads a snapshot and swaps it in atomically: on any error the current
    /// document, selection and history are left exactly as they were.
    pub fn load_project(&mut self, path: &Path) -> Result<(), SnapshotError> {
        let document = project_io::load(path, &self.document)?;
        self.document = document;
        self.session.reset();
        self.selection.clear();
        self.history.clear();
        if self.document.layer(&self.active_layer).is_none() {
            self.active_layer = self.bottom_layer();
        }
        Ok(())
    }

    /// Lowest-z layer of the current document, the fallback active layer
    /// after loading a snapshot with a different layer set.
    fn bottom_layer(&self) -> LayerId {
        self.document
            .layers()
            .iter()
            .min_by_key(|(_, layer)| layer.z_index)
            .map(|(id, _)| id.clone())
            .unwrap_or_else(|| LayerId::new("ground"))
    }

    fn execute(&mut self, command: Command) {
        self.history.execute(command, &mut self.document);
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn no_snap(context: &mut EditorContext) {
        context.document.grid.snap_enabled = false;
    }

    #[test]
    fn drag_commits_through_history() {
        let mut context = EditorContext::new("test");
        no_snap(&mut context);
        context.set_tool(Some(ToolKind::Rectangle));
        context.pointer_pressed(pos2(0.0, 0.0));
        context.pointer_released(pos2(100.0, 60.0));

        assert_eq!(context.document.elements().len(), 1);
        assert!(context.history.can_undo());
    }

    #[test]
    fn undo_clears_selection() {
        let mut context = EditorContext::new("test");
        no_snap(&mut context);
        context.set_tool(Some(ToolKind::Rectangle));
        context.pointer_pressed(pos2(0.0, 0.0));
        context.pointer_released(pos2(100.0, 100.0));

        context.set_tool(Some(ToolKind::Select));
        context.pointer_pressed(pos2(50.0, 50.0));
        assert_eq!(context.selection.selected_index(), Some(0));

        context.undo();
        assert!(context.document.elements().is_empty());
        assert!(context.selection.selected_index().is_none());
    }

    #[test]
    fn new_project_rebuilds_everything() {
        let mut context = EditorContext::new("old");
        no_snap(&mut context);
        context.set_tool(Some(ToolKind::Line));
        context.pointer_pressed(pos2(0.0, 0.0));
        context.pointer_released(pos2(50.0, 50.0));

        context.new_project("fresh");
        assert_eq!(context.document.name, "fresh");
        assert!(context.document.elements().is_empty());
        assert!(!context.history.can_undo());
        assert!(context.session.active_tool().is_none());
    }

    #[test]
    fn failed_load_leaves_document_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not a snapshot").unwrap();

        let mut context = EditorContext::new("kept");
        no_snap(&mut context);
        context.set_tool(Some(ToolKind::Rectangle));
        context.pointer_pressed(pos2(0.0, 0.0));
        context.pointer_released(pos2(40.0, 40.0));

        assert!(context.load_project(&path).is_err());
        assert_eq!(context.document.name, "kept");
        assert_eq!(context.document.elements().len(), 1);
        assert!(context.history.can_undo());
    }

    #[test]
    fn load_falls_back_to_bottom_layer_when_active_layer_vanishes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(
            &path,
            r#"{
                "name": "beds only",
                "elements": [],
                "layers": {
                    "beds": {
                        "name": "Beds", "zIndex": 2, "visible": true, "opacity": 1.0,
                        "outlineColor": [34, 107, 34, 255], "fillColor": [102, 187, 102, 255],
                        "outlineAlpha": 1.0, "fillAlpha": 0.35
                    },
                    "base": {
                        "name": "Base", "zIndex": 0, "visible": true, "opacity": 1.0,
                        "outlineColor": [107, 142, 35, 255], "fillColor": [181, 209, 138, 255],
                        "outlineAlpha": 1.0, "fillAlpha": 0.35
                    }
                }
            }"#,
        )
        .unwrap();

        let mut context = EditorContext::new("test");
        context.active_layer = LayerId::new("water");
        context.load_project(&path).unwrap();
        assert_eq!(context.active_layer, LayerId::new("base"));
    }
}
