use crate::app::GroundPlanApp;

/// Central canvas: routes this frame's input into the drawing session, then
/// repaints from the document and the session's transient state.
pub fn central_panel(app: &mut GroundPlanApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(
            ui.available_size(),
            egui::Sense::click_and_drag(),
        );
        let canvas = response.rect;

        app.handle_canvas_input(ui, canvas);

        let cursor = response
            .hover_pos()
            .map(|pos| pos - canvas.min.to_vec2());
        app.render_canvas(&painter, canvas, cursor);
    });
}
