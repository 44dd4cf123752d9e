//! Software rasterizer for stroked outlines.
//!
//! A stroke is broken into [`Piece`]s, each with a signed distance function
//! (negative inside the painted area). Pixels are sampled at their centers.
//! All pieces of one primitive write into a shared coverage mask by taking the
//! maximum, then the mask is blended once, so overlapping joins never darken.

use std::ops::{Add, Mul, Sub};

use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Double precision point used for all coverage math
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    fn perp(self) -> Point {
        Point::new(-self.y, self.x)
    }

    fn normalized(self) -> Option<Point> {
        let len = self.length();
        (len > 0.0).then(|| self * (1.0 / len))
    }
}

impl From<Pos2> for Point {
    fn from(pos: Pos2) -> Self {
        Point::new(f64::from(pos.x), f64::from(pos.y))
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// One building block of a stroked outline
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Piece {
    /// Straight stroke from `a` to `b`. Each end is either round or cut flat.
    Segment {
        a: Point,
        b: Point,
        round_start: bool,
        round_end: bool,
    },
    /// Filled convex polygon, used for miter tips
    Wedge { points: Vec<Point> },
    /// Stroked circle outline
    Ring { center: Point, radius: f64 },
    /// Stroked axis-aligned ellipse outline. Both radii are positive.
    EllipseRing { center: Point, rx: f64, ry: f64 },
}

impl Piece {
    /// Signed distance from `p` to the painted area of this piece
    fn signed_distance(&self, p: Point, half_width: f64) -> f64 {
        match self {
            Piece::Segment {
                a,
                b,
                round_start,
                round_end,
            } => segment_distance(p, *a, *b, half_width, *round_start, *round_end),
            Piece::Wedge { points } => convex_polygon_distance(p, points),
            Piece::Ring { center, radius } => ((p - *center).length() - radius).abs() - half_width,
            Piece::EllipseRing { center, rx, ry } => {
                ellipse_distance(p - *center, *rx, *ry) - half_width
            }
        }
    }

    /// Pixel-space bounds `(min_x, min_y, max_x, max_y)` this piece can touch
    fn bounds(&self, half_width: f64) -> (f64, f64, f64, f64) {
        let pad = half_width + 1.0;
        match self {
            Piece::Segment { a, b, .. } => (
                a.x.min(b.x) - pad,
                a.y.min(b.y) - pad,
                a.x.max(b.x) + pad,
                a.y.max(b.y) + pad,
            ),
            Piece::Wedge { points } => points.iter().fold(
                (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
                |(x0, y0, x1, y1), p| (x0.min(p.x - 1.0), y0.min(p.y - 1.0), x1.max(p.x + 1.0), y1.max(p.y + 1.0)),
            ),
            Piece::Ring { center, radius } => (
                center.x - radius - pad,
                center.y - radius - pad,
                center.x + radius + pad,
                center.y + radius + pad,
            ),
            Piece::EllipseRing { center, rx, ry } => (
                center.x - rx - pad,
                center.y - ry - pad,
                center.x + rx + pad,
                center.y + ry + pad,
            ),
        }
    }
}

fn box_distance(dx: f64, dy: f64) -> f64 {
    if dx > 0.0 && dy > 0.0 {
        dx.hypot(dy)
    } else {
        dx.max(dy)
    }
}

fn segment_distance(p: Point, a: Point, b: Point, half_width: f64, round_start: bool, round_end: bool) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let Some(dir) = ab.normalized() else {
        // Zero length: a round cap still leaves a dot, a flat one leaves nothing
        return if round_start || round_end {
            ap.length() - half_width
        } else {
            f64::INFINITY
        };
    };
    let len = ab.length();
    let u = ap.dot(dir);
    let v = ap.cross(dir).abs();

    if u < 0.0 && round_start {
        return ap.length() - half_width;
    }
    if u > len && round_end {
        return (p - b).length() - half_width;
    }

    let mut dx = f64::NEG_INFINITY;
    if !round_start {
        dx = dx.max(-u);
    }
    if !round_end {
        dx = dx.max(u - len);
    }
    box_distance(dx, v - half_width)
}

fn convex_polygon_distance(p: Point, points: &[Point]) -> f64 {
    if points.len() < 3 {
        return f64::INFINITY;
    }
    let area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.cross(*b))
        .sum();
    if area.abs() < 1e-12 {
        return f64::INFINITY;
    }
    let orientation = area.signum();

    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .filter_map(|(a, b)| {
            let edge = (*b - *a).normalized()?;
            let outward = Point::new(edge.y, -edge.x) * orientation;
            Some((p - *a).dot(outward))
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Distance from `p` (relative to the center) to the ellipse curve.
///
/// The closest point is found by bisection on the root of the closest-point
/// equation, in the first quadrant with the major axis along x.
fn ellipse_distance(p: Point, rx: f64, ry: f64) -> f64 {
    let (x, y, a, b) = if rx >= ry {
        (p.x.abs(), p.y.abs(), rx, ry)
    } else {
        (p.y.abs(), p.x.abs(), ry, rx)
    };

    if y == 0.0 {
        // On the major axis: the nearest point is on the curve off-axis while
        // x is within the evolute, otherwise the major vertex
        let numer = a * x;
        let denom = a * a - b * b;
        if numer < denom {
            let t = numer / denom;
            let cx = a * t;
            let cy = b * (1.0 - t * t).sqrt();
            return (cx - x).hypot(cy);
        }
        return (x - a).abs();
    }
    if x == 0.0 {
        return (y - b).abs();
    }

    let z0 = x / a;
    let z1 = y / b;
    let g = z0 * z0 + z1 * z1 - 1.0;
    if g == 0.0 {
        return 0.0;
    }
    let r0 = (a / b) * (a / b);
    let s = closest_point_root(r0, z0, z1, g);
    let cx = r0 * x / (s + r0);
    let cy = y / (s + 1.0);
    (cx - x).hypot(cy - y)
}

const MAX_BISECTIONS: usize = 160;

/// Root `s` of `(r0 z0 / (s + r0))^2 + (z1 / (s + 1))^2 = 1`
fn closest_point_root(r0: f64, z0: f64, z1: f64, g: f64) -> f64 {
    let n0 = r0 * z0;
    let mut s0 = z1 - 1.0;
    let mut s1 = if g < 0.0 { 0.0 } else { n0.hypot(z1) - 1.0 };
    let mut s = 0.0;
    for _ in 0..MAX_BISECTIONS {
        s = (s0 + s1) / 2.0;
        if s == s0 || s == s1 {
            break;
        }
        let ratio0 = n0 / (s + r0);
        let ratio1 = z1 / (s + 1.0);
        let g = ratio0 * ratio0 + ratio1 * ratio1 - 1.0;
        if g > 0.0 {
            s0 = s;
        } else if g < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }
    s
}

/// Outer miter tip at vertex `v` between the segments `prev`-`v` and `v`-`next`.
///
/// `None` when the segments are collinear or the miter would exceed `limit`
/// (ratio of miter length to stroke width). The round end under the segments
/// then forms the join.
pub(crate) fn miter_wedge(prev: Point, v: Point, next: Point, half_width: f64, limit: f64) -> Option<Piece> {
    let d1 = (v - prev).normalized()?;
    let d2 = (next - v).normalized()?;
    let turn = d1.cross(d2);
    if turn.abs() < 1e-9 {
        return None;
    }

    let side = if turn > 0.0 { -1.0 } else { 1.0 };
    let n1 = d1.perp() * side;
    let n2 = d2.perp() * side;
    let bisector = (n1 + n2).normalized()?;
    let cos_half = bisector.dot(n1);
    if cos_half <= 1e-9 || 1.0 / cos_half > limit {
        return None;
    }

    Some(Piece::Wedge {
        points: vec![
            v,
            v + n1 * half_width,
            v + bisector * (half_width / cos_half),
            v + n2 * half_width,
        ],
    })
}

/// Per-primitive coverage in `[0, 1]`, restricted to the pixels it can touch
struct CoverageMask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl CoverageMask {
    fn new(image: &RgbaImage, pieces: &[Piece], half_width: f64) -> Option<Self> {
        let (x0, y0, x1, y1) = pieces.iter().map(|piece| piece.bounds(half_width)).fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(ax0, ay0, ax1, ay1), (bx0, by0, bx1, by1)| (ax0.min(bx0), ay0.min(by0), ax1.max(bx1), ay1.max(by1)),
        );
        let (x0, y0, x1, y1) = clip(image, (x0, y0, x1, y1))?;
        let (width, height) = (x1 - x0, y1 - y0);
        Some(Self {
            x0,
            y0,
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        })
    }

    fn accumulate(&mut self, image: &RgbaImage, piece: &Piece, half_width: f64, anti_alias: bool) {
        let Some((px0, py0, px1, py1)) = clip(image, piece.bounds(half_width)) else {
            return;
        };
        let px0 = px0.max(self.x0);
        let py0 = py0.max(self.y0);
        let px1 = px1.min(self.x0 + self.width);
        let py1 = py1.min(self.y0 + self.height);

        for y in py0..py1 {
            for x in px0..px1 {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let coverage = coverage(piece.signed_distance(center, half_width), anti_alias);
                if coverage > 0.0 {
                    let idx = ((y - self.y0) * self.width + (x - self.x0)) as usize;
                    self.data[idx] = self.data[idx].max(coverage);
                }
            }
        }
    }

    fn blend(&self, image: &mut RgbaImage, color: Color32) {
        for row in 0..self.height {
            for col in 0..self.width {
                let coverage = self.data[(row * self.width + col) as usize];
                if coverage > 0.0 {
                    let pixel = image.get_pixel_mut(self.x0 + col, self.y0 + row);
                    *pixel = blend_premultiplied(*pixel, color, coverage);
                }
            }
        }
    }
}

/// Clip float bounds to whole pixel indices `[x0, x1) x [y0, y1)` inside the image
fn clip(image: &RgbaImage, (x0, y0, x1, y1): (f64, f64, f64, f64)) -> Option<(u32, u32, u32, u32)> {
    if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
        return None;
    }
    let (w, h) = (f64::from(image.width()), f64::from(image.height()));
    let cx0 = x0.floor().clamp(0.0, w) as u32;
    let cy0 = y0.floor().clamp(0.0, h) as u32;
    let cx1 = x1.ceil().clamp(0.0, w) as u32;
    let cy1 = y1.ceil().clamp(0.0, h) as u32;
    (cx0 < cx1 && cy0 < cy1).then_some((cx0, cy0, cx1, cy1))
}

fn coverage(signed_distance: f64, anti_alias: bool) -> f32 {
    if anti_alias {
        (0.5 - signed_distance).clamp(0.0, 1.0) as f32
    } else if signed_distance <= 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Source-over of a premultiplied color, scaled by `coverage`, onto an opaque pixel
fn blend_premultiplied(dst: Rgba<u8>, color: Color32, coverage: f32) -> Rgba<u8> {
    let [r, g, b, a] = color.to_array();
    let keep = 1.0 - f32::from(a) / 255.0 * coverage;
    let mix = |src: u8, dst: u8| (f32::from(src) * coverage + f32::from(dst) * keep).round().clamp(0.0, 255.0) as u8;
    Rgba([mix(r, dst[0]), mix(g, dst[1]), mix(b, dst[2]), 255])
}

/// Stroke `pieces` onto `image` as one primitive
pub(crate) fn fill_pieces(image: &mut RgbaImage, pieces: &[Piece], half_width: f64, anti_alias: bool, color: Color32) {
    if pieces.is_empty() {
        return;
    }
    let Some(mut mask) = CoverageMask::new(image, pieces, half_width) else {
        return;
    };
    for piece in pieces {
        mask.accumulate(image, piece, half_width, anti_alias);
    }
    mask.blend(image, color);
}

/// Paint `background` at the origin over the (opaque) image, honoring its alpha.
/// Only the overlapping area is touched.
pub(crate) fn composite_background(image: &mut RgbaImage, background: &RgbaImage) {
    let width = image.width().min(background.width());
    let height = image.height().min(background.height());
    for y in 0..height {
        for x in 0..width {
            let src = background.get_pixel(x, y);
            let alpha = f32::from(src[3]) / 255.0;
            let dst = image.get_pixel_mut(x, y);
            let mix = |s: u8, d: u8| (f32::from(s) * alpha + f32::from(d) * (1.0 - alpha)).round() as u8;
            *dst = Rgba([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, WHITE)
    }

    fn segment(ax: f64, ay: f64, bx: f64, by: f64, round: bool) -> Piece {
        Piece::Segment {
            a: Point::new(ax, ay),
            b: Point::new(bx, by),
            round_start: round,
            round_end: round,
        }
    }

    #[test]
    fn test_butt_segment_stops_at_end_points() {
        let mut image = canvas(20, 20);
        fill_pieces(&mut image, &[segment(2.0, 10.0, 12.0, 10.0, false)], 2.0, false, Color32::BLACK);

        assert_eq!(*image.get_pixel(2, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(11, 9), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(12, 10), WHITE);
        assert_eq!(*image.get_pixel(1, 10), WHITE);
        assert_eq!(*image.get_pixel(6, 13), WHITE);
    }

    #[test]
    fn test_round_cap_extends_past_end_points() {
        let mut image = canvas(20, 20);
        fill_pieces(&mut image, &[segment(4.0, 10.0, 12.0, 10.0, true)], 2.0, false, Color32::BLACK);

        assert_eq!(*image.get_pixel(12, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(2, 9), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(15, 10), WHITE);
    }

    #[test]
    fn test_zero_length_segment() {
        let mut image = canvas(10, 10);
        fill_pieces(&mut image, &[segment(5.0, 5.0, 5.0, 5.0, false)], 2.0, true, Color32::BLACK);
        assert!(image.pixels().all(|p| *p == WHITE));

        fill_pieces(&mut image, &[segment(5.0, 5.0, 5.0, 5.0, true)], 2.0, true, Color32::BLACK);
        assert_eq!(*image.get_pixel(4, 4), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_overlapping_pieces_blend_once() {
        let color = Color32::from_rgba_unmultiplied(255, 0, 0, 128);
        let mut single = canvas(20, 20);
        fill_pieces(&mut single, &[segment(2.0, 10.0, 18.0, 10.0, false)], 2.0, false, color);

        let mut doubled = canvas(20, 20);
        let piece = segment(2.0, 10.0, 18.0, 10.0, false);
        fill_pieces(&mut doubled, &[piece.clone(), piece], 2.0, false, color);

        assert_eq!(single, doubled);
        assert_ne!(*single.get_pixel(10, 10), WHITE);
    }

    #[test]
    fn test_ring_outline() {
        let mut image = canvas(30, 30);
        let ring = Piece::Ring {
            center: Point::new(15.0, 15.0),
            radius: 10.0,
        };
        fill_pieces(&mut image, &[ring], 1.0, false, Color32::BLACK);

        assert_eq!(*image.get_pixel(24, 15), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(15, 5), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(15, 15), WHITE);
        assert_eq!(*image.get_pixel(28, 15), WHITE);
    }

    #[test]
    fn test_ellipse_outline() {
        let mut image = canvas(40, 20);
        let ellipse = Piece::EllipseRing {
            center: Point::new(20.0, 10.0),
            rx: 15.0,
            ry: 5.0,
        };
        fill_pieces(&mut image, &[ellipse], 1.0, false, Color32::BLACK);

        assert_eq!(*image.get_pixel(34, 9), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(20, 4), Rgba([0, 0, 0, 255]));
        assert_eq!(*image.get_pixel(20, 10), WHITE);
    }

    #[test]
    fn test_ellipse_distance_is_exact() {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;

        // Inside a flat ellipse the curve is never farther than the minor radius
        assert!(close(ellipse_distance(Point::new(0.0, 0.0), 20.0, 0.5), 0.5));
        assert!(ellipse_distance(Point::new(10.0, 0.0), 20.0, 0.5) <= 0.5);
        assert!(ellipse_distance(Point::new(0.5, 0.0), 20.0, 0.5) <= 0.5);

        // Vertices and outside points along the axes
        assert!(close(ellipse_distance(Point::new(25.0, 0.0), 20.0, 5.0), 5.0));
        assert!(close(ellipse_distance(Point::new(0.0, -8.0), 20.0, 5.0), 3.0));
        assert!(close(ellipse_distance(Point::new(0.0, 0.0), 0.5, 20.0), 0.5));

        // A circle is the radial distance
        assert!(close(ellipse_distance(Point::new(6.0, 8.0), 5.0, 5.0), 5.0));
        assert!(close(ellipse_distance(Point::new(1.5, 2.0), 5.0, 5.0), 2.5));
        assert!(close(ellipse_distance(Point::new(3.0, 4.0), 5.0, 5.0), 0.0));
    }

    #[test]
    fn test_flat_ellipse_has_no_gap() {
        let mut image = canvas(40, 22);
        let ellipse = Piece::EllipseRing {
            center: Point::new(20.0, 10.5),
            rx: 20.0,
            ry: 0.5,
        };
        fill_pieces(&mut image, &[ellipse], 2.5, false, Color32::BLACK);

        for y in 9..=11 {
            assert!((0..40).all(|x| *image.get_pixel(x, y) == Rgba([0, 0, 0, 255])), "row {y}");
        }
        assert_eq!(*image.get_pixel(20, 15), WHITE);
    }

    #[test]
    fn test_miter_wedge_right_angle() {
        let wedge = miter_wedge(
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 20.0),
            2.0,
            4.0,
        )
        .unwrap();
        let Piece::Wedge { points } = &wedge else {
            panic!("expected a wedge");
        };
        assert!((points[2].x - 12.0).abs() < 1e-9);
        assert!((points[2].y - 8.0).abs() < 1e-9);

        // Outer corner is filled, the inside of the turn is not part of the wedge
        assert!(wedge.signed_distance(Point::new(11.5, 8.5), 2.0) < 0.0);
        assert!(wedge.signed_distance(Point::new(8.0, 12.0), 2.0) > 0.0);
    }

    #[test]
    fn test_miter_limit_and_collinear() {
        let straight = miter_wedge(Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(10.0, 0.0), 2.0, 4.0);
        assert!(straight.is_none());

        // A very sharp turn exceeds a 4:1 miter
        let sharp = miter_wedge(Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 0.5), 2.0, 4.0);
        assert!(sharp.is_none());
    }

    #[test]
    fn test_anti_aliased_edge_is_partial() {
        let mut image = canvas(10, 10);
        // Edge of the stroke falls on pixel centers of row 7
        fill_pieces(&mut image, &[segment(0.0, 5.5, 10.0, 5.5, false)], 2.0, true, Color32::BLACK);

        assert_eq!(*image.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
        let edge = image.get_pixel(5, 7)[0];
        assert!(edge > 0 && edge < 255, "edge value {edge}");
        assert_eq!(*image.get_pixel(5, 9), WHITE);
    }

    #[test]
    fn test_background_alpha_over_white() {
        let mut image = canvas(4, 4);
        let background = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        composite_background(&mut image, &background);
        assert!(image.pixels().all(|p| *p == WHITE));

        let background = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        composite_background(&mut image, &background);
        assert_eq!(*image.get_pixel(1, 1), Rgba([10, 20, 30, 255]));
        assert_eq!(*image.get_pixel(2, 2), WHITE);
    }
}
