use egui::Color32;
use serde::{Deserialize, Serialize};

/// Smallest stroke width the canvas accepts. Anything thinner is clamped up.
pub const MIN_STROKE_WIDTH: f32 = 1.0;

/// How the open ends of a stroke are finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    /// The stroke stops exactly at the end point
    #[default]
    Butt,
    /// A half-disc of the stroke's width is added past each end point
    Round,
}

/// How consecutive segments of a stroke meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
}

/// Stroke appearance.
///
/// `Style` is `Copy`: a primitive takes its own value at commit time, so later
/// changes to the live style never reach history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    color: Color32,
    width: f32,
    anti_alias: bool,
    cap: LineCap,
    join: LineJoin,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            width: 5.0,
            anti_alias: true,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
        }
    }
}

impl Style {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            color,
            width: clamp_width(width),
            ..Self::default()
        }
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    pub fn cap(&self) -> LineCap {
        self.cap
    }

    pub fn join(&self) -> LineJoin {
        self.join
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = clamp_width(width);
        self
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    /// Half of the stroke width, the distance a stroke reaches from its centerline
    pub fn half_width(&self) -> f64 {
        f64::from(self.width) / 2.0
    }

    /// Returns a copy with the width forced into the valid range.
    /// Used after deserializing, where the builder clamps were bypassed.
    pub fn sanitized(self) -> Self {
        self.with_width(self.width)
    }
}

/// Clamp a requested stroke width to [`MIN_STROKE_WIDTH`].
/// NaN and other non-finite widths also end up at the minimum.
pub fn clamp_width(width: f32) -> f32 {
    if width.is_finite() && width >= MIN_STROKE_WIDTH {
        return width;
    }
    log::warn!("Stroke width {width} is out of range, clamping to {MIN_STROKE_WIDTH}");
    MIN_STROKE_WIDTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_matches_original_brush() {
        let style = Style::default();
        assert_eq!(style.color(), Color32::BLACK);
        assert_eq!(style.width(), 5.0);
        assert!(style.anti_alias());
        assert_eq!(style.cap(), LineCap::Butt);
        assert_eq!(style.join(), LineJoin::Miter);
    }

    #[test]
    fn test_width_clamping() {
        assert_eq!(clamp_width(0.0), MIN_STROKE_WIDTH);
        assert_eq!(clamp_width(-3.0), MIN_STROKE_WIDTH);
        assert_eq!(clamp_width(f32::NAN), MIN_STROKE_WIDTH);
        assert_eq!(clamp_width(f32::INFINITY), MIN_STROKE_WIDTH);
        assert_eq!(clamp_width(0.5), MIN_STROKE_WIDTH);
        assert_eq!(clamp_width(12.5), 12.5);
    }

    #[test]
    fn test_style_is_a_value_copy() {
        let live = Style::new(Color32::RED, 3.0);
        let frozen = live;
        let live = live.with_color(Color32::BLUE).with_width(9.0);

        assert_eq!(frozen.color(), Color32::RED);
        assert_eq!(frozen.width(), 3.0);
        assert_eq!(live.color(), Color32::BLUE);
    }

    #[test]
    fn test_sanitized_repairs_deserialized_width() {
        let style: Style = serde_json::from_str(r#"{"width": -2.0}"#).unwrap();
        assert_eq!(style.sanitized().width(), MIN_STROKE_WIDTH);
        assert_eq!(style.color(), Color32::BLACK);
    }
}
