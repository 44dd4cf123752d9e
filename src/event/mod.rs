mod bus;
mod events;

pub use bus::EventBus;
pub use events::SceneEvent;

/// Receives scene-changed notifications from a [`crate::CanvasEngine`].
///
/// Handlers run synchronously on the thread that mutated the engine.
pub trait EventHandler {
    fn handle_event(&mut self, event: &SceneEvent);
}

impl<F: FnMut(&SceneEvent)> EventHandler for F {
    fn handle_event(&mut self, event: &SceneEvent) {
        self(event)
    }
}
