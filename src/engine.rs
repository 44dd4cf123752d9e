use egui::{Color32, Pos2};
use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::config::CanvasConfig;
use crate::error::{CanvasError, CanvasResult};
use crate::event::{EventBus, EventHandler, SceneEvent};
use crate::input::{Gesture, InputStateMachine};
use crate::primitive::{Primitive, ShapeKind};
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::style::{LineCap, LineJoin, Style};

/// The interactive drawing surface.
///
/// Pointer events drive an input state machine; finished gestures are
/// committed to the scene with a frozen copy of the live style. Rendering and
/// export never mutate anything.
///
/// The engine is meant to be owned and driven by a single thread.
#[derive(Debug)]
pub struct CanvasEngine {
    scene: Scene,
    input: InputStateMachine,
    mode: ShapeKind,
    style: Style,
    renderer: Renderer,
    width: u32,
    height: u32,
    version: u64,
    events: EventBus,
}

impl Default for CanvasEngine {
    fn default() -> Self {
        Self::with_config(&CanvasConfig::default())
    }
}

impl CanvasEngine {
    /// Create an empty canvas of the given size with default settings
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(&CanvasConfig {
            width,
            height,
            ..CanvasConfig::default()
        })
    }

    pub fn with_config(config: &CanvasConfig) -> Self {
        Self {
            scene: Scene::new(),
            input: InputStateMachine::new(),
            mode: config.mode,
            style: config.style.sanitized(),
            renderer: Renderer::new(config.miter_limit),
            width: config.width,
            height: config.height,
            version: 0,
            events: EventBus::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Notifications

    /// Register a handler for scene-changed notifications
    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.events.subscribe(Box::new(handler));
    }

    /// Increases by one with every emitted [`SceneEvent`]
    pub fn version(&self) -> u64 {
        self.version
    }

    fn notify(&mut self, event: SceneEvent) {
        self.version += 1;
        self.events.emit(event);
    }

    // ---------------------------------------------------------------------
    // Pointer input

    pub fn on_pointer_down(&mut self, pos: Pos2) {
        if self.input.press(self.mode, pos) {
            self.notify(SceneEvent::GestureStarted { kind: self.mode });
        }
    }

    pub fn on_pointer_move(&mut self, pos: Pos2) {
        if self.input.drag(pos) {
            self.notify(SceneEvent::GestureUpdated);
        }
    }

    pub fn on_pointer_up(&mut self, pos: Pos2) {
        if let Some(primitive) = self.input.release(pos, self.style) {
            let kind = primitive.kind();
            let index = self.scene.append(primitive);
            self.notify(SceneEvent::PrimitiveCommitted { index, kind });
        }
    }

    pub fn is_gesture_active(&self) -> bool {
        self.input.is_active()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.input.gesture()
    }

    // ---------------------------------------------------------------------
    // Mode and style

    pub fn mode(&self) -> ShapeKind {
        self.mode
    }

    /// Switch the drawing mode. Any gesture in progress is dropped, not committed.
    pub fn set_mode(&mut self, mode: ShapeKind) {
        if self.input.abandon() {
            self.notify(SceneEvent::GestureAbandoned);
        }
        if self.mode != mode {
            let old = std::mem::replace(&mut self.mode, mode);
            log::debug!("Mode changed: {old:?} -> {mode:?}");
            self.notify(SceneEvent::ModeChanged { old, new: mode });
        }
    }

    /// The live style used by the next commit and by the current preview
    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_color(&mut self, color: Color32) {
        self.update_style(self.style.with_color(color));
    }

    /// Set the stroke width; values below 1 (and non-finite ones) are clamped to 1
    pub fn set_stroke_width(&mut self, width: f32) {
        self.update_style(self.style.with_width(width));
    }

    pub fn set_anti_alias(&mut self, anti_alias: bool) {
        self.update_style(self.style.with_anti_alias(anti_alias));
    }

    pub fn set_cap(&mut self, cap: LineCap) {
        self.update_style(self.style.with_cap(cap));
    }

    pub fn set_join(&mut self, join: LineJoin) {
        self.update_style(self.style.with_join(join));
    }

    fn update_style(&mut self, style: Style) {
        if self.style != style {
            self.style = style;
            self.notify(SceneEvent::StyleChanged);
        }
    }

    // ---------------------------------------------------------------------
    // Scene

    pub fn committed(&self) -> &[Primitive] {
        self.scene.committed()
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.scene.background()
    }

    /// Remove every primitive and the background and drop any active gesture
    pub fn clear(&mut self) {
        let abandoned = self.input.abandon();
        let had_content = !self.scene.is_empty();
        self.scene.clear();
        if abandoned || had_content {
            log::info!("🧹 Canvas cleared");
            self.notify(SceneEvent::Cleared);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Tell the engine how large the canvas is on screen.
    /// An existing background keeps its size and stays anchored at the origin.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if (self.width, self.height) != (width, height) {
            self.width = width;
            self.height = height;
            self.notify(SceneEvent::ViewportResized { width, height });
        }
    }

    /// Scale `image` to the viewport and use it as the background.
    ///
    /// The viewport size is adopted as the canvas size. A zero-sized
    /// viewport is rejected and leaves the scene untouched.
    pub fn set_background(&mut self, image: &RgbaImage, width: u32, height: u32) -> CanvasResult<()> {
        if width == 0 || height == 0 {
            log::warn!("Rejecting background for a {width}x{height} viewport");
            return Err(CanvasError::InvalidViewport { width, height });
        }
        self.set_viewport_size(width, height);

        let scaled = if image.dimensions() == (width, height) {
            image.clone()
        } else {
            imageops::resize(image, width, height, FilterType::Triangle)
        };
        log::info!(
            "🖼️ Background set: {}x{} scaled to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );
        self.scene.set_background(scaled);
        self.notify(SceneEvent::BackgroundChanged);
        Ok(())
    }

    /// Start over from `image`: clears the scene, then uses the image (if any)
    /// as background at the current canvas size.
    pub fn load_bitmap(&mut self, image: Option<&RgbaImage>) -> CanvasResult<()> {
        self.clear();
        match image {
            Some(image) => self.set_background(image, self.width, self.height),
            None => Ok(()),
        }
    }

    // ---------------------------------------------------------------------
    // Output

    /// The scene including the live preview, for on-screen display
    pub fn render_preview(&self) -> RgbaImage {
        let preview = self.input.preview(self.style);
        self.renderer
            .render(self.scene.snapshot(), preview.as_ref(), self.width, self.height)
    }

    /// Flatten the scene (including any live preview) to an opaque image at
    /// the canvas size. A zero-sized canvas yields a zero-area image.
    pub fn export_image(&self) -> RgbaImage {
        if self.width == 0 || self.height == 0 {
            log::debug!("Exporting a {}x{} canvas", self.width, self.height);
        }
        self.render_preview()
    }
}
