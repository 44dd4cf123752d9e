#![warn(clippy::all, rust_2018_idioms)]

use sketch_canvas::SketchApp;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Sketch Canvas",
        native_options,
        Box::new(|cc| Ok(Box::new(SketchApp::new(cc)))),
    )
}
