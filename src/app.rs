use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use crate::config::CanvasConfig;
use crate::engine::CanvasEngine;
use crate::error::CanvasResult;
use crate::file_handler::FileHandler;
use crate::input::{InputHandler, route_event};
use crate::panels::{central_panel, tools_panel};
use crate::primitive::ShapeKind;
use crate::store::{DrawingStore, MemoryStore, RecordId, SavedDrawing};
use crate::style::Style;
use crate::texture_manager::TextureManager;

/// The part of the app that survives a restart.
/// We derive Deserialize/Serialize so we can persist it on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct AppSettings {
    pub mode: ShapeKind,
    pub style: Style,
}

pub struct SketchApp {
    engine: CanvasEngine,
    input: InputHandler,
    textures: TextureManager,
    files: FileHandler,
    store: Arc<dyn DrawingStore>,
    pending_save: Option<Receiver<CanvasResult<RecordId>>>,
    saved: Vec<SavedDrawing>,
    drawing_name: String,
    status: Option<String>,
}

impl Default for SketchApp {
    fn default() -> Self {
        Self::with_store(AppSettings::default(), Arc::new(MemoryStore::new()))
    }
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: AppSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        log::info!("Starting in {} mode", settings.mode.label());
        Self::with_store(settings, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(settings: AppSettings, store: Arc<dyn DrawingStore>) -> Self {
        let config = CanvasConfig {
            mode: settings.mode,
            style: settings.style.sanitized(),
            ..CanvasConfig::default()
        };
        Self {
            engine: CanvasEngine::with_config(&config),
            input: InputHandler::new(),
            textures: TextureManager::new(),
            files: FileHandler::new(),
            store,
            pending_save: None,
            saved: Vec::new(),
            drawing_name: String::new(),
            status: None,
        }
    }

    pub fn engine(&self) -> &CanvasEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CanvasEngine {
        &mut self.engine
    }

    pub fn settings(&self) -> AppSettings {
        AppSettings {
            mode: self.engine.mode(),
            style: *self.engine.style(),
        }
    }

    pub fn saved_drawings(&self) -> &[SavedDrawing] {
        &self.saved
    }

    pub fn drawing_name_mut(&mut self) -> &mut String {
        &mut self.drawing_name
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn file_error(&self) -> Option<&str> {
        self.files.last_error()
    }

    pub fn is_saving(&self) -> bool {
        self.pending_save.is_some()
    }

    /// Export the canvas and hand it to the store on a worker thread
    pub fn save_drawing(&mut self) {
        if self.pending_save.is_some() {
            log::debug!("Save already in progress");
            return;
        }
        let image = self.engine.export_image();
        let name = std::mem::take(&mut self.drawing_name);
        let store = Arc::clone(&self.store);
        let (sender, receiver) = mpsc::channel();
        std::thread::spawn(move || {
            // The receiver is gone only if the app shut down mid-save
            let _ = sender.send(store.save(&name, &image));
        });
        self.pending_save = Some(receiver);
    }

    /// Pick up the result of a finished save, if any
    pub fn poll_save(&mut self) {
        let Some(receiver) = &self.pending_save else {
            return;
        };
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                log::error!("Save worker exited without a result");
                self.pending_save = None;
                return;
            }
        };
        self.pending_save = None;
        match result {
            Ok(_) => {
                self.status = Some("Saved".to_owned());
                self.refresh_saved();
            }
            Err(err) => {
                log::error!("Failed to save drawing: {}", err);
                self.status = Some(format!("Save failed: {err}"));
            }
        }
    }

    pub fn refresh_saved(&mut self) {
        match self.store.list() {
            Ok(saved) => self.saved = saved,
            Err(err) => log::error!("Failed to list drawings: {}", err),
        }
    }

    /// Start a new drawing on top of a saved one
    pub fn open_saved(&mut self, id: RecordId) {
        let Some(drawing) = self.saved.iter().find(|drawing| drawing.id == id) else {
            return;
        };
        if let Err(err) = self.engine.load_bitmap(Some(&drawing.image)) {
            log::warn!("Could not open '{}': {}", drawing.name, err);
            self.status = Some(err.to_string());
        }
    }

    pub fn delete_saved(&mut self, id: RecordId) {
        if let Err(err) = self.store.delete(id) {
            log::error!("Failed to delete drawing: {}", err);
            self.status = Some(err.to_string());
        }
        self.refresh_saved();
    }

    pub(crate) fn handle_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        for event in self.input.process_input(ctx, canvas_rect) {
            route_event(event, &mut self.engine);
        }
    }

    pub(crate) fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if let Some(image) = self.files.take_dropped_image(ctx) {
            if let Err(err) = self.engine.load_bitmap(Some(&image)) {
                log::warn!("Dropped image not applied: {}", err);
                self.status = Some(err.to_string());
            }
        }
    }

    pub(crate) fn canvas_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let engine = &self.engine;
        self.textures
            .get_or_update(ctx, engine.version(), || engine.render_preview())
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_save();
        if self.is_saving() {
            ctx.request_repaint();
        }
        self.handle_dropped_files(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
