use egui::{Pos2, Rect, vec2};
use image::RgbaImage;

use crate::geometry;
use crate::primitive::Primitive;
use crate::raster::{self, Piece, Point, WHITE};
use crate::scene::SceneSnapshot;
use crate::style::{LineCap, LineJoin, Style};

/// Miter length to stroke width ratio past which a miter join falls back to round
pub const DEFAULT_MITER_LIMIT: f32 = 4.0;

/// Turns a scene into pixels.
///
/// Rendering is a pure function of its inputs: the same snapshot, preview and
/// size always give the same image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    miter_limit: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_MITER_LIMIT)
    }
}

impl Renderer {
    pub fn new(miter_limit: f32) -> Self {
        Self {
            miter_limit: if miter_limit.is_finite() { miter_limit.max(1.0) } else { DEFAULT_MITER_LIMIT },
        }
    }

    pub fn miter_limit(&self) -> f32 {
        self.miter_limit
    }

    /// Render the scene at `width` x `height`.
    ///
    /// Paint order: white base, background, committed primitives in order,
    /// then `in_progress` on top. A zero-sized request returns an empty image.
    pub fn render(
        &self,
        snapshot: SceneSnapshot<'_>,
        in_progress: Option<&Primitive>,
        width: u32,
        height: u32,
    ) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(width, height, WHITE);
        if width == 0 || height == 0 {
            return image;
        }

        if let Some(background) = snapshot.background {
            raster::composite_background(&mut image, background);
        }

        for primitive in snapshot.committed.iter().chain(in_progress) {
            self.paint(&mut image, primitive);
        }

        image
    }

    /// Stroke a single primitive onto `image` with the primitive's own style
    pub fn paint(&self, image: &mut RgbaImage, primitive: &Primitive) {
        let canvas = Rect::from_min_size(Pos2::ZERO, vec2(image.width() as f32, image.height() as f32));
        if !primitive.bounds(self.miter_limit).intersects(canvas) {
            return;
        }
        let style = primitive.style();
        let pieces = self.outline(primitive);
        raster::fill_pieces(image, &pieces, style.half_width(), style.anti_alias(), style.color());
    }

    fn outline(&self, primitive: &Primitive) -> Vec<Piece> {
        let style = primitive.style();
        match primitive {
            Primitive::FreeDraw { points, .. } => self.polyline(points.iter().copied().map(Point::from), false, style),
            Primitive::Line { start, end, .. } => {
                self.polyline([Point::from(*start), Point::from(*end)], false, style)
            }
            Primitive::Circle { start, end, .. } => {
                let circle = geometry::circle(*start, *end);
                vec![Piece::Ring {
                    center: circle.center.into(),
                    radius: circle.radius,
                }]
            }
            Primitive::Oval { start, end, .. } => {
                let rect = geometry::bounding_box(*start, *end);
                let rx = f64::from(rect.width()) / 2.0;
                let ry = f64::from(rect.height()) / 2.0;
                if rx > 0.0 && ry > 0.0 {
                    vec![Piece::EllipseRing {
                        center: rect.center().into(),
                        rx,
                        ry,
                    }]
                } else {
                    // A flat oval is the segment across its box
                    self.polyline([Point::from(rect.min), Point::from(rect.max)], false, style)
                }
            }
            Primitive::Rectangle { start, end, .. } => {
                let corners = geometry::rect_corners(geometry::bounding_box(*start, *end));
                self.polyline(corners.map(Point::from), true, style)
            }
            Primitive::Triangle { start, end, .. } => {
                let vertices = geometry::triangle_vertices(*start, *end);
                self.polyline(vertices.map(Point::from), true, style)
            }
        }
    }

    /// Break a polyline into segments, end caps and joins.
    ///
    /// Segment ends inside the path are round, which forms a round join on
    /// its own and fills the inner side under a miter tip.
    fn polyline(&self, points: impl IntoIterator<Item = Point>, closed: bool, style: &Style) -> Vec<Piece> {
        let mut vertices: Vec<Point> = Vec::new();
        for point in points {
            if vertices.last() != Some(&point) {
                vertices.push(point);
            }
        }
        if closed && vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        let round_cap = style.cap() == LineCap::Round;
        match vertices.len() {
            0 => return Vec::new(),
            1 => {
                return vec![Piece::Segment {
                    a: vertices[0],
                    b: vertices[0],
                    round_start: round_cap,
                    round_end: round_cap,
                }];
            }
            _ => {}
        }

        let closed = closed && vertices.len() > 2;
        let count = vertices.len();
        let segment_count = if closed { count } else { count - 1 };

        let mut pieces: Vec<Piece> = (0..segment_count)
            .map(|i| Piece::Segment {
                a: vertices[i],
                b: vertices[(i + 1) % count],
                round_start: closed || i > 0 || round_cap,
                round_end: closed || i + 1 < segment_count || round_cap,
            })
            .collect();

        if style.join() == LineJoin::Miter {
            let half_width = style.half_width();
            let limit = f64::from(self.miter_limit);
            let joints = if closed { 0..count } else { 1..count - 1 };
            for i in joints {
                let prev = vertices[(i + count - 1) % count];
                let next = vertices[(i + 1) % count];
                if let Some(wedge) = raster::miter_wedge(prev, vertices[i], next, half_width, limit) {
                    pieces.push(wedge);
                }
            }
        }

        pieces
    }
}
