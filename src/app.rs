use std::path::PathBuf;

use egui::{Pos2, Rect};

use crate::catalog::{self, Plant, ProjectRegister};
use crate::context::EditorContext;
use crate::panels;
use crate::renderer::Renderer;

/// The eframe application: the editor context plus panel-local UI state.
pub struct GroundPlanApp {
    pub(crate) context: EditorContext,
    renderer: Renderer,
    /// Path fields are plain text inputs; there are no native file dialogs.
    pub(crate) project_path: String,
    pub(crate) plants_path: String,
    pub(crate) register_path: String,
    pub(crate) plants: Vec<Plant>,
    /// One-line status shown under the project controls, also used for
    /// load/save error reporting.
    pub(crate) status: Option<String>,
    pub(crate) confirm_new: bool,
}

impl Default for GroundPlanApp {
    fn default() -> Self {
        Self {
            context: EditorContext::default(),
            renderer: Renderer::new(),
            project_path: "project.json".to_string(),
            plants_path: "data/plants.json".to_string(),
            register_path: "data/projects.json".to_string(),
            plants: Vec::new(),
            status: None,
            confirm_new: false,
        }
    }
}

impl GroundPlanApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    pub fn save_project(&mut self) {
        let path = PathBuf::from(self.project_path.trim());
        match self.context.save_project(&path) {
            Ok(()) => self.status = Some(format!("Saved to {}", path.display())),
            Err(err) => {
                log::error!("save failed: {err}");
                self.status = Some(format!("Save failed: {err}"));
            }
        }
    }

    /// Loads a snapshot; on failure the current document is untouched and
    /// the error becomes the status line.
    pub fn load_project(&mut self) {
        let path = PathBuf::from(self.project_path.trim());
        match self.context.load_project(&path) {
            Ok(()) => self.status = Some(format!("Loaded {}", path.display())),
            Err(err) => {
                log::error!("load failed: {err}");
                self.status = Some(format!("Load failed: {err}"));
            }
        }
    }

    pub fn load_plants(&mut self) {
        let path = PathBuf::from(self.plants_path.trim());
        match catalog::load_plants(&path) {
            Ok(plants) => {
                self.status = Some(format!("Catalog: {} plants", plants.len()));
                self.plants = plants;
            }
            Err(err) => {
                log::error!("catalog load failed: {err}");
                self.status = Some(format!("Catalog failed: {err}"));
            }
        }
    }

    pub fn register_project(&mut self) {
        let register = ProjectRegister::new(self.register_path.trim());
        match register.append(&self.context.document.name) {
            Ok(record) => self.status = Some(format!("Registered as {}", record.id)),
            Err(err) => {
                log::error!("register failed: {err}");
                self.status = Some(format!("Register failed: {err}"));
            }
        }
    }

    /// Routes this frame's pointer and keyboard input into the session.
    /// Positions are translated into canvas coordinates first.
    pub fn handle_canvas_input(&mut self, ui: &egui::Ui, canvas: Rect) {
        let hover = ui.input(|i| i.pointer.hover_pos());
        if let Some(pos) = hover {
            let p = pos - canvas.min.to_vec2();
            let (pressed, released, secondary) = ui.input(|i| {
                (
                    i.pointer.primary_pressed(),
                    i.pointer.primary_released(),
                    i.pointer.secondary_pressed(),
                )
            });
            if pressed && canvas.contains(pos) {
                self.context.pointer_pressed(p);
            }
            if secondary && canvas.contains(pos) {
                self.context.right_clicked();
            }
            self.context.pointer_moved(p);
            // A release outside the canvas still completes the drag, at the
            // last known position.
            if released {
                self.context.pointer_released(p);
            }
        }
        if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.context.enter_pressed();
        }
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.context.escape_pressed();
        }
    }

    pub fn render_canvas(&self, painter: &egui::Painter, canvas: Rect, cursor: Option<Pos2>) {
        self.renderer.render(painter, canvas, &self.context, cursor);
    }
}

impl eframe::App for GroundPlanApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::tools_panel(self, ctx);
        panels::properties_panel(self, ctx);
        panels::central_panel(self, ctx);

        if self.confirm_new {
            egui::Window::new("New Project")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Discard the current design and start a new project?");
                    ui.horizontal(|ui| {
                        if ui.button("Start New").clicked() {
                            self.context.new_project("Untitled Project");
                            self.status = Some("New project".to_string());
                            self.confirm_new = false;
                        }
                        if ui.button("Cancel").clicked() {
                            self.confirm_new = false;
                        }
                    });
                });
        }
    }
}
