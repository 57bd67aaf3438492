use egui::color_picker::{color_edit_button_srgba, Alpha};

use crate::app::GroundPlanApp;
use crate::element::Shape;
use crate::layer::{FALLBACK_FILL, FALLBACK_FILL_ALPHA, FALLBACK_OUTLINE, FALLBACK_OUTLINE_ALPHA};

/// Right panel: properties of the selected element, the layer list, and the
/// plant catalog / project register controls.
///
/// Property edits mutate the element directly; they do not go through the
/// command history and are not undoable.
pub fn properties_panel(app: &mut GroundPlanApp, ctx: &egui::Context) {
    egui::SidePanel::right("properties_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Selection");
            selection_section(app, ui);
            ui.separator();

            ui.heading("Layers");
            layers_section(app, ui);
            ui.separator();

            ui.heading("Catalog");
            catalog_section(app, ui);
        });
}

fn selection_section(app: &mut GroundPlanApp, ui: &mut egui::Ui) {
    let scale = app.context.document.scale;
    let ppm = scale.pixels_per_meter();
    let Some(index) = app.context.selection.selected_index() else {
        ui.weak("Nothing selected");
        return;
    };
    let Some(element) = app.context.document.element_mut(index) else {
        return;
    };

    ui.label(format!("{} on {}", element.shape.kind(), element.layer));

    // Lines and paths have no area; the row is omitted entirely for them.
    if let Some(area) = element.area(&scale) {
        ui.label(format!("Area: {area:.2} m\u{b2}"));
    }

    let mut label = element.label.clone().unwrap_or_default();
    ui.horizontal(|ui| {
        ui.label("Label:");
        if ui.text_edit_singleline(&mut label).changed() {
            element.label = (!label.is_empty()).then(|| label.clone());
        }
    });

    // Dimensions are edited in meters and stored in pixels.
    match &mut element.shape {
        Shape::Rectangle { width, height, .. } => {
            let mut w = *width / ppm;
            let mut h = *height / ppm;
            ui.horizontal(|ui| {
                ui.label("Width:");
                if ui
                    .add(egui::DragValue::new(&mut w).speed(0.1).suffix(" m"))
                    .changed()
                {
                    *width = (w * ppm).max(0.0);
                }
            });
            ui.horizontal(|ui| {
                ui.label("Height:");
                if ui
                    .add(egui::DragValue::new(&mut h).speed(0.1).suffix(" m"))
                    .changed()
                {
                    *height = (h * ppm).max(0.0);
                }
            });
        }
        Shape::Circle { radius, .. } => {
            let mut r = *radius / ppm;
            ui.horizontal(|ui| {
                ui.label("Radius:");
                if ui
                    .add(egui::DragValue::new(&mut r).speed(0.1).suffix(" m"))
                    .changed()
                {
                    *radius = (r * ppm).max(0.0);
                }
            });
        }
        Shape::Polygon { .. } | Shape::Path { .. } | Shape::Line { .. } => {}
    }

    ui.label("Style");
    let mut outline = element.outline_color.unwrap_or(FALLBACK_OUTLINE);
    ui.horizontal(|ui| {
        ui.label("Outline:");
        if color_edit_button_srgba(ui, &mut outline, Alpha::Opaque).changed() {
            element.outline_color = Some(outline);
        }
    });
    let mut fill = element.fill_color.unwrap_or(FALLBACK_FILL);
    ui.horizontal(|ui| {
        ui.label("Fill:");
        if color_edit_button_srgba(ui, &mut fill, Alpha::Opaque).changed() {
            element.fill_color = Some(fill);
        }
    });
    let mut outline_alpha = element.outline_alpha.unwrap_or(FALLBACK_OUTLINE_ALPHA);
    if ui
        .add(egui::Slider::new(&mut outline_alpha, 0.0..=1.0).text("Outline alpha"))
        .changed()
    {
        element.outline_alpha = Some(outline_alpha);
    }
    let mut fill_alpha = element.fill_alpha.unwrap_or(FALLBACK_FILL_ALPHA);
    if ui
        .add(egui::Slider::new(&mut fill_alpha, 0.0..=1.0).text("Fill alpha"))
        .changed()
    {
        element.fill_alpha = Some(fill_alpha);
    }
}

fn layers_section(app: &mut GroundPlanApp, ui: &mut egui::Ui) {
    let mut ordered: Vec<_> = app
        .context
        .document
        .layers()
        .iter()
        .map(|(id, layer)| (id.clone(), layer.name.clone(), layer.visible, layer.opacity))
        .collect();
    ordered.sort_by_key(|(id, ..)| {
        app.context
            .document
            .layer(id)
            .map(|l| l.z_index)
            .unwrap_or(u32::MAX)
    });

    for (id, name, mut visible, mut opacity) in ordered {
        ui.horizontal(|ui| {
            if ui.checkbox(&mut visible, &name).changed() {
                app.context.document.set_layer_visible(&id, visible);
            }
            if ui
                .add(egui::Slider::new(&mut opacity, 0.0..=1.0).show_value(false))
                .changed()
            {
                app.context.document.set_layer_opacity(&id, opacity);
            }
        });
    }
}

fn catalog_section(app: &mut GroundPlanApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label("Plants:");
        ui.text_edit_singleline(&mut app.plants_path);
    });
    if ui.button("Load catalog").clicked() {
        app.load_plants();
    }
    for plant in &app.plants {
        ui.label(format!(
            "{} - {} ({:.1} m)",
            plant.name, plant.category, plant.spread_m
        ));
    }
    ui.separator();
    ui.horizontal(|ui| {
        ui.label("Register:");
        ui.text_edit_singleline(&mut app.register_path);
    });
    if ui.button("Register project").clicked() {
        app.register_project();
    }
}
