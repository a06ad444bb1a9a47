use crate::ArtflowApp;

pub fn central_panel(app: &mut ArtflowApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available = ui.available_rect_before_wrap();
        let canvas_rect = app.handle_canvas_input(ctx, available);

        let (_response, painter) = ui.allocate_painter(available.size(), egui::Sense::click_and_drag());
        let texture = app.canvas_texture(ctx);
        painter.image(
            texture.id(),
            canvas_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if app.engine().is_drawing_shape() || app.has_pending_restores() {
            ctx.request_repaint();
        }
    });
}
