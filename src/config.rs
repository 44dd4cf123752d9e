use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CanvasResult;
use crate::primitive::ShapeKind;
use crate::renderer::DEFAULT_MITER_LIMIT;
use crate::style::Style;

/// Initial settings for a [`crate::CanvasEngine`].
///
/// Every field is optional in JSON; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub mode: ShapeKind,
    pub style: Style,
    pub miter_limit: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            mode: ShapeKind::FreeDraw,
            style: Style::default(),
            miter_limit: DEFAULT_MITER_LIMIT,
            width: 0,
            height: 0,
        }
    }
}

impl CanvasConfig {
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn sanitized(mut self) -> Self {
        self.style = self.style.sanitized();
        self
    }
}
