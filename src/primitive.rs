use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::geometry;
use crate::style::Style;

/// The drawing modes a gesture can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    FreeDraw,
    Line,
    Circle,
    Oval,
    Rectangle,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::FreeDraw,
        ShapeKind::Line,
        ShapeKind::Circle,
        ShapeKind::Oval,
        ShapeKind::Rectangle,
        ShapeKind::Triangle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::FreeDraw => "Free draw",
            ShapeKind::Line => "Line",
            ShapeKind::Circle => "Circle",
            ShapeKind::Oval => "Oval",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Triangle => "Triangle",
        }
    }

    /// True for kinds defined by a start and end point rather than a path
    pub fn is_parametric(self) -> bool {
        !matches!(self, ShapeKind::FreeDraw)
    }
}

/// One committed drawing object. Each variant carries its own [`Style`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    FreeDraw { points: Vec<Pos2>, style: Style },
    Line { start: Pos2, end: Pos2, style: Style },
    Circle { start: Pos2, end: Pos2, style: Style },
    Oval { start: Pos2, end: Pos2, style: Style },
    Rectangle { start: Pos2, end: Pos2, style: Style },
    Triangle { start: Pos2, end: Pos2, style: Style },
}

impl Primitive {
    /// Build the primitive for a two-point gesture.
    ///
    /// `None` for `FreeDraw`, which is built from its collected points instead.
    pub fn shape(kind: ShapeKind, start: Pos2, end: Pos2, style: Style) -> Option<Self> {
        let primitive = match kind {
            ShapeKind::FreeDraw => return None,
            ShapeKind::Line => Primitive::Line { start, end, style },
            ShapeKind::Circle => Primitive::Circle { start, end, style },
            ShapeKind::Oval => Primitive::Oval { start, end, style },
            ShapeKind::Rectangle => Primitive::Rectangle { start, end, style },
            ShapeKind::Triangle => Primitive::Triangle { start, end, style },
        };
        Some(primitive)
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Primitive::FreeDraw { .. } => ShapeKind::FreeDraw,
            Primitive::Line { .. } => ShapeKind::Line,
            Primitive::Circle { .. } => ShapeKind::Circle,
            Primitive::Oval { .. } => ShapeKind::Oval,
            Primitive::Rectangle { .. } => ShapeKind::Rectangle,
            Primitive::Triangle { .. } => ShapeKind::Triangle,
        }
    }

    pub fn style(&self) -> &Style {
        match self {
            Primitive::FreeDraw { style, .. }
            | Primitive::Line { style, .. }
            | Primitive::Circle { style, .. }
            | Primitive::Oval { style, .. }
            | Primitive::Rectangle { style, .. }
            | Primitive::Triangle { style, .. } => style,
        }
    }

    /// Gesture anchor points, `None` for free drawing
    pub fn endpoints(&self) -> Option<(Pos2, Pos2)> {
        match self {
            Primitive::FreeDraw { .. } => None,
            Primitive::Line { start, end, .. }
            | Primitive::Circle { start, end, .. }
            | Primitive::Oval { start, end, .. }
            | Primitive::Rectangle { start, end, .. }
            | Primitive::Triangle { start, end, .. } => Some((*start, *end)),
        }
    }

    /// Area the primitive can touch, including its stroke.
    ///
    /// The padding covers the half width, a miter tip and one pixel of anti-aliasing.
    pub fn bounds(&self, miter_limit: f32) -> Rect {
        let style = self.style();
        let padding = style.width() / 2.0 * miter_limit.max(1.0) + 1.0;
        match self {
            Primitive::FreeDraw { points, .. } => geometry::calculate_bounds(points, padding),
            Primitive::Line { start, end, .. }
            | Primitive::Oval { start, end, .. }
            | Primitive::Rectangle { start, end, .. } => {
                geometry::calculate_bounds(&[*start, *end], padding)
            }
            Primitive::Circle { start, end, .. } => {
                let circle = geometry::circle(*start, *end);
                Rect::from_center_size(circle.center, egui::Vec2::splat(circle.radius as f32 * 2.0))
                    .expand(padding)
            }
            Primitive::Triangle { start, end, .. } => {
                geometry::calculate_bounds(&geometry::triangle_vertices(*start, *end), padding)
            }
        }
    }
}
