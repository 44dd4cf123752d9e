use crate::SketchApp;
use crate::primitive::ShapeKind;

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active_mode = app.engine().mode();
            for mode in ShapeKind::ALL {
                if ui.selectable_label(active_mode == mode, mode.label()).clicked() {
                    log::info!("Mode selected from UI: {}", mode.label());
                    app.engine_mut().set_mode(mode);
                }
            }
            ui.separator();

            if ui.button("Clear").clicked() {
                app.engine_mut().clear();
            }

            ui.separator();
            ui.label("Name");
            ui.text_edit_singleline(app.drawing_name_mut());
            let saving = app.is_saving();
            if ui.add_enabled(!saving, egui::Button::new("Save")).clicked() {
                app.save_drawing();
            }
            if saving {
                ui.spinner();
            }
            if let Some(status) = app.status() {
                ui.label(status);
            }
            if let Some(error) = app.file_error() {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }

            ui.separator();
            ui.strong(format!("Saved drawings ({})", app.saved_drawings().len()));

            let mut open = None;
            let mut delete = None;
            egui::ScrollArea::vertical().show(ui, |ui| {
                for drawing in app.saved_drawings() {
                    ui.horizontal(|ui| {
                        ui.label(&drawing.name);
                        if ui.small_button("Open").clicked() {
                            open = Some(drawing.id);
                        }
                        if ui.small_button("Delete").clicked() {
                            delete = Some(drawing.id);
                        }
                    });
                }
            });
            if let Some(id) = open {
                app.open_saved(id);
            }
            if let Some(id) = delete {
                app.delete_saved(id);
            }
        });
}
