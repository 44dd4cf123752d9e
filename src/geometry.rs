use egui::{Pos2, Rect, pos2};

/// Circle described by a two-point gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Pos2,
    pub radius: f64,
}

/// Euclidean distance in double precision
pub fn distance(a: Pos2, b: Pos2) -> f64 {
    (f64::from(b.x) - f64::from(a.x)).hypot(f64::from(b.y) - f64::from(a.y))
}

/// The circle whose diameter is the segment `start`-`end`.
///
/// Coincident points give a radius of zero.
pub fn circle(start: Pos2, end: Pos2) -> Circle {
    let cx = (f64::from(start.x) + f64::from(end.x)) / 2.0;
    let cy = (f64::from(start.y) + f64::from(end.y)) / 2.0;
    Circle {
        center: pos2(cx as f32, cy as f32),
        radius: distance(start, end) / 2.0,
    }
}

/// Axis-aligned box spanned by two corners, normalized so `min <= max`
/// whichever way the gesture was dragged.
pub fn bounding_box(start: Pos2, end: Pos2) -> Rect {
    Rect::from_min_max(
        pos2(start.x.min(end.x), start.y.min(end.y)),
        pos2(start.x.max(end.x), start.y.max(end.y)),
    )
}

/// Triangle construction: the gesture end is one base corner and the other
/// base corner is the end mirrored horizontally through the start.
pub fn triangle_vertices(start: Pos2, end: Pos2) -> [Pos2; 3] {
    [start, end, pos2(start.x - (end.x - start.x), end.y)]
}

/// Corners of a rectangle in drawing order: top-left, top-right, bottom-right, bottom-left
pub fn rect_corners(rect: Rect) -> [Pos2; 4] {
    [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ]
}

/// Bounding box of a set of points, grown by `padding` on every side
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        pos2(min_x - padding, min_y - padding),
        pos2(max_x + padding, max_y + padding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_from_gesture() {
        let c = circle(pos2(5.0, 5.0), pos2(9.0, 5.0));
        assert_eq!(c.center, pos2(7.0, 5.0));
        assert_eq!(c.radius, 2.0);
    }

    #[test]
    fn test_circle_radius_is_half_distance() {
        let pairs = [
            (pos2(0.0, 0.0), pos2(3.0, 4.0)),
            (pos2(-7.5, 2.25), pos2(11.0, -6.0)),
            (pos2(100.0, 100.0), pos2(0.0, 0.0)),
        ];
        for (a, b) in pairs {
            assert_eq!(circle(a, b).radius, distance(a, b) / 2.0);
        }
        assert_eq!(circle(pos2(0.0, 0.0), pos2(3.0, 4.0)).radius, 2.5);
    }

    #[test]
    fn test_coincident_points_give_zero_radius() {
        let c = circle(pos2(4.0, 4.0), pos2(4.0, 4.0));
        assert_eq!(c.radius, 0.0);
        assert_eq!(c.center, pos2(4.0, 4.0));
    }

    #[test]
    fn test_bounding_box_ignores_drag_direction() {
        let down_right = bounding_box(pos2(2.0, 3.0), pos2(10.0, 20.0));
        let up_left = bounding_box(pos2(10.0, 20.0), pos2(2.0, 3.0));
        let mixed = bounding_box(pos2(10.0, 3.0), pos2(2.0, 20.0));

        assert_eq!(down_right, up_left);
        assert_eq!(down_right, mixed);
        assert!(down_right.left() <= down_right.right());
        assert!(down_right.top() <= down_right.bottom());
        assert_eq!(down_right.min, pos2(2.0, 3.0));
        assert_eq!(down_right.max, pos2(10.0, 20.0));
    }

    #[test]
    fn test_triangle_construction() {
        let [a, b, c] = triangle_vertices(pos2(10.0, 0.0), pos2(14.0, 8.0));
        assert_eq!(a, pos2(10.0, 0.0));
        assert_eq!(b, pos2(14.0, 8.0));
        assert_eq!(c, pos2(6.0, 8.0));
    }

    #[test]
    fn test_calculate_bounds() {
        assert_eq!(calculate_bounds(&[], 1.0), Rect::NOTHING);
        let rect = calculate_bounds(&[pos2(1.0, 5.0), pos2(4.0, -2.0)], 0.5);
        assert_eq!(rect.min, pos2(0.5, -2.5));
        assert_eq!(rect.max, pos2(4.5, 5.5));
    }
}
