use crate::primitive::ShapeKind;

/// What changed in the scene. Emitted after the change is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    GestureStarted { kind: ShapeKind },
    GestureUpdated,
    PrimitiveCommitted { index: usize, kind: ShapeKind },
    /// An active gesture was dropped without being committed
    GestureAbandoned,
    ModeChanged { old: ShapeKind, new: ShapeKind },
    /// Color, width or another style property of the live style changed
    StyleChanged,
    Cleared,
    BackgroundChanged,
    ViewportResized { width: u32, height: u32 },
}
