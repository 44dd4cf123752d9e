use egui::{Context, Pos2, Rect};

use crate::engine::CanvasEngine;

/// Canvas-local pointer event, ready for the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
}

/// Converts egui's primary pointer into [`PointerEvent`]s relative to the canvas.
///
/// Positions are reported in physical pixels, matching the canvas raster.
/// A gesture only starts when the press lands on the canvas; once started,
/// moves and the release are reported even outside it.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    pressed_on_canvas: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process this frame's raw input and generate pointer events
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<PointerEvent> {
        let (pos, pressed, released, pixels_per_point) = ctx.input(|input| {
            (
                input.pointer.interact_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pixels_per_point(),
            )
        });
        self.translate(pos, pressed, released, canvas_rect, pixels_per_point)
    }

    /// Frame-level translation, split out so it can run without a live context
    pub fn translate(
        &mut self,
        pos: Option<Pos2>,
        pressed: bool,
        released: bool,
        canvas_rect: Rect,
        pixels_per_point: f32,
    ) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let Some(pos) = pos.or(self.last_pointer_pos) else {
            return events;
        };
        let local = ((pos - canvas_rect.min) * pixels_per_point).to_pos2();

        if pressed && canvas_rect.contains(pos) {
            self.pressed_on_canvas = true;
            events.push(PointerEvent::Down(local));
        } else if self.pressed_on_canvas && Some(pos) != self.last_pointer_pos {
            events.push(PointerEvent::Move(local));
        }

        if released && self.pressed_on_canvas {
            self.pressed_on_canvas = false;
            events.push(PointerEvent::Up(local));
        }

        self.last_pointer_pos = Some(pos);
        events
    }
}

/// Feed a pointer event to the engine
pub fn route_event(event: PointerEvent, engine: &mut CanvasEngine) {
    match event {
        PointerEvent::Down(pos) => engine.on_pointer_down(pos),
        PointerEvent::Move(pos) => engine.on_pointer_move(pos),
        PointerEvent::Up(pos) => engine.on_pointer_up(pos),
    }
}
