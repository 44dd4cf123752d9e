use image::RgbaImage;

use crate::primitive::Primitive;

/// Committed drawing state: the optional background plus primitives in paint order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    background: Option<RgbaImage>,
    committed: Vec<Primitive>,
}

/// Borrowed, point-in-time view of a [`Scene`] handed to the renderer.
///
/// While a snapshot is alive the scene cannot be mutated.
#[derive(Debug, Clone, Copy)]
pub struct SceneSnapshot<'a> {
    pub background: Option<&'a RgbaImage>,
    pub committed: &'a [Primitive],
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive on top of everything committed so far.
    /// Returns its index in paint order.
    pub fn append(&mut self, primitive: Primitive) -> usize {
        self.committed.push(primitive);
        self.committed.len() - 1
    }

    /// Drop all primitives and the background
    pub fn clear(&mut self) {
        self.committed.clear();
        self.background = None;
    }

    pub fn set_background(&mut self, image: RgbaImage) {
        self.background = Some(image);
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn committed(&self) -> &[Primitive] {
        &self.committed
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.background.is_none()
    }

    pub fn snapshot(&self) -> SceneSnapshot<'_> {
        SceneSnapshot {
            background: self.background.as_ref(),
            committed: &self.committed,
        }
    }
}
