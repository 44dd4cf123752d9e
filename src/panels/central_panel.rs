use crate::SketchApp;

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, egui::Sense::drag());
            let canvas_rect = response.rect;

            // The canvas is rasterized at physical pixel resolution
            let pixels_per_point = ctx.pixels_per_point();
            let width = (canvas_rect.width() * pixels_per_point).max(0.0).floor() as u32;
            let height = (canvas_rect.height() * pixels_per_point).max(0.0).floor() as u32;
            app.engine_mut().set_viewport_size(width, height);

            app.handle_input(ctx, canvas_rect);

            let texture = app.canvas_texture(ctx);
            let image_rect = egui::Rect::from_min_size(
                canvas_rect.min,
                egui::vec2(width as f32, height as f32) / pixels_per_point,
            );
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture, image_rect, uv, egui::Color32::WHITE);

            if app.engine().is_gesture_active() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });
}
