#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod geometry;
pub mod input;
pub mod panels;
pub mod primitive;
mod raster;
pub mod renderer;
pub mod scene;
pub mod store;
pub mod style;
pub mod texture_manager;
pub mod util;

pub use app::{AppSettings, SketchApp};
pub use config::CanvasConfig;
pub use engine::CanvasEngine;
pub use error::{CanvasError, CanvasResult};
pub use event::{EventBus, EventHandler, SceneEvent};
pub use input::{Gesture, InputHandler, InputStateMachine, PointerEvent};
pub use primitive::{Primitive, ShapeKind};
pub use renderer::Renderer;
pub use scene::{Scene, SceneSnapshot};
pub use store::{DrawingStore, MemoryStore, RecordId, SavedDrawing};
pub use style::{LineCap, LineJoin, Style};
