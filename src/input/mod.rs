use egui::Pos2;

use crate::primitive::{Primitive, ShapeKind};
use crate::style::Style;

mod router;
pub use router::{InputHandler, PointerEvent, route_event};

/// An uncommitted gesture.
///
/// Holds geometry only. The style is applied when the gesture is previewed or
/// committed, so the preview always follows the live style.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Freehand path, seeded with the press point
    FreeDraw { points: Vec<Pos2> },
    /// Two-point shape anchored at `start` and tracking the pointer in `current`
    Shape {
        kind: ShapeKind,
        start: Pos2,
        current: Pos2,
    },
}

impl Gesture {
    fn begin(kind: ShapeKind, pos: Pos2) -> Self {
        if kind.is_parametric() {
            Gesture::Shape {
                kind,
                start: pos,
                current: pos,
            }
        } else {
            Gesture::FreeDraw { points: vec![pos] }
        }
    }

    fn track(&mut self, pos: Pos2) {
        match self {
            Gesture::FreeDraw { points } => points.push(pos),
            Gesture::Shape { current, .. } => *current = pos,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Gesture::FreeDraw { .. } => ShapeKind::FreeDraw,
            Gesture::Shape { kind, .. } => *kind,
        }
    }

    /// The primitive this gesture would commit right now, styled with `style`
    pub fn to_primitive(&self, style: Style) -> Option<Primitive> {
        match self {
            Gesture::FreeDraw { points } => Some(Primitive::FreeDraw {
                points: points.clone(),
                style,
            }),
            Gesture::Shape {
                kind,
                start,
                current,
            } => Primitive::shape(*kind, *start, *current, style),
        }
    }

    fn into_primitive(self, style: Style) -> Option<Primitive> {
        match self {
            Gesture::FreeDraw { points } => Some(Primitive::FreeDraw { points, style }),
            Gesture::Shape {
                kind,
                start,
                current,
            } => Primitive::shape(kind, start, current, style),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Active(Gesture),
}

/// Turns press/drag/release events into at most one pending gesture and
/// hands back a [`Primitive`] when a gesture completes.
///
/// Events that do not fit the current state are ignored.
#[derive(Debug, Clone, Default)]
pub struct InputStateMachine {
    state: GestureState,
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, GestureState::Active(_))
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match &self.state {
            GestureState::Active(gesture) => Some(gesture),
            GestureState::Idle => None,
        }
    }

    /// Start a gesture of `kind` at `pos`. Returns false if one is already running.
    pub fn press(&mut self, kind: ShapeKind, pos: Pos2) -> bool {
        if self.is_active() {
            log::trace!("Ignoring press at {pos:?}: gesture already active");
            return false;
        }
        log::debug!("Gesture started: {kind:?} at {pos:?}");
        self.state = GestureState::Active(Gesture::begin(kind, pos));
        true
    }

    /// Extend the active gesture. Returns false while idle.
    pub fn drag(&mut self, pos: Pos2) -> bool {
        match &mut self.state {
            GestureState::Active(gesture) => {
                gesture.track(pos);
                true
            }
            GestureState::Idle => {
                log::trace!("Ignoring drag at {pos:?}: no active gesture");
                false
            }
        }
    }

    /// Finish the active gesture at `pos` and return the primitive to commit,
    /// carrying its own copy of `style`. Returns `None` while idle.
    pub fn release(&mut self, pos: Pos2, style: Style) -> Option<Primitive> {
        match std::mem::take(&mut self.state) {
            GestureState::Active(mut gesture) => {
                gesture.track(pos);
                let primitive = gesture.into_primitive(style);
                if let Some(primitive) = &primitive {
                    log::debug!("Gesture committed: {:?}", primitive.kind());
                }
                primitive
            }
            GestureState::Idle => {
                log::trace!("Ignoring release at {pos:?}: no active gesture");
                None
            }
        }
    }

    /// Drop the active gesture without committing it.
    /// Returns true if there was one.
    pub fn abandon(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            GestureState::Active(gesture) => {
                log::debug!("Gesture abandoned: {:?}", gesture.kind());
                true
            }
            GestureState::Idle => false,
        }
    }

    /// Preview of the active gesture in the given (live) style
    pub fn preview(&self, style: Style) -> Option<Primitive> {
        self.gesture().and_then(|gesture| gesture.to_primitive(style))
    }
}
