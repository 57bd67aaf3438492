use crate::app::GroundPlanApp;
use crate::session::ToolKind;

/// Left panel: tool selection, active layer, grid settings, undo and the
/// project controls.
pub fn tools_panel(app: &mut GroundPlanApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.context.session.active_tool();
            for tool in ToolKind::ALL {
                let is_selected = active == Some(tool);
                if ui.selectable_label(is_selected, tool.name()).clicked() {
                    log::info!("tool selected from UI: {}", tool.name());
                    // Clicking the active tool again deselects it.
                    let next = if is_selected { None } else { Some(tool) };
                    app.context.set_tool(next);
                }
            }
            ui.separator();

            ui.label("Active layer");
            let layers = &app.context.document;
            let selected_name = layers
                .layer(&app.context.active_layer)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| app.context.active_layer.to_string());
            let mut picked = None;
            egui::ComboBox::from_id_salt("active_layer")
                .selected_text(selected_name)
                .show_ui(ui, |ui| {
                    let mut ordered: Vec<_> = layers.layers().iter().collect();
                    ordered.sort_by_key(|(_, layer)| layer.z_index);
                    for (id, layer) in ordered {
                        if ui
                            .selectable_label(*id == app.context.active_layer, &layer.name)
                            .clicked()
                        {
                            picked = Some(id.clone());
                        }
                    }
                });
            if let Some(id) = picked {
                app.context.active_layer = id;
            }
            ui.separator();

            ui.label("Grid");
            let grid = &mut app.context.document.grid;
            ui.checkbox(&mut grid.enabled, "Show grid");
            ui.checkbox(&mut grid.snap_enabled, "Snap to grid");
            ui.horizontal(|ui| {
                ui.label("Cell size:");
                ui.add(
                    egui::DragValue::new(&mut grid.size)
                        .range(2..=200)
                        .suffix(" px"),
                );
            });
            ui.separator();

            let can_undo = app.context.history.can_undo();
            if ui
                .add_enabled(can_undo, egui::Button::new("Undo"))
                .clicked()
            {
                app.context.undo();
            }
            ui.label(format!("History: {} edits", app.context.history.len()));
            ui.separator();

            ui.heading("Project");
            ui.horizontal(|ui| {
                ui.label("Name:");
                ui.text_edit_singleline(&mut app.context.document.name);
            });
            ui.horizontal(|ui| {
                ui.label("File:");
                ui.text_edit_singleline(&mut app.project_path);
            });
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    app.save_project();
                }
                if ui.button("Load").clicked() {
                    app.load_project();
                }
                if ui.button("New").clicked() {
                    app.confirm_new = true;
                }
            });

            if let Some(status) = &app.status {
                ui.separator();
                ui.weak(status);
            }
        });
}
