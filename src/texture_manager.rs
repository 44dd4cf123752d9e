use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;

/// Keeps the canvas preview uploaded as a single texture, re-uploading only
/// when the engine reports a new scene version.
#[derive(Default)]
pub struct TextureManager {
    handle: Option<TextureHandle>,
    version: Option<u64>,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("has_texture", &self.handle.is_some())
            .field("version", &self.version)
            .finish()
    }
}

/// Convert a rendered canvas into an egui image
pub fn to_color_image(image: &RgbaImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the texture for `version` still has to be generated
    pub fn is_stale(&self, version: u64) -> bool {
        self.handle.is_none() || self.version != Some(version)
    }

    /// Get the texture for `version`, generating it with `render` if stale
    pub fn get_or_update<F>(&mut self, ctx: &Context, version: u64, render: F) -> TextureId
    where
        F: FnOnce() -> RgbaImage,
    {
        if self.is_stale(version) {
            let image = to_color_image(&render());
            match &mut self.handle {
                Some(handle) => handle.set(image, TextureOptions::NEAREST),
                None => {
                    self.handle = Some(ctx.load_texture("canvas", image, TextureOptions::NEAREST));
                }
            }
            self.version = Some(version);
        }

        match &self.handle {
            Some(handle) => handle.id(),
            None => TextureId::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_regenerates_on_new_version() {
        let ctx = Context::default();
        let mut textures = TextureManager::new();
        let mut renders = 0;

        assert!(textures.is_stale(0));
        textures.get_or_update(&ctx, 0, || {
            renders += 1;
            RgbaImage::new(2, 2)
        });
        textures.get_or_update(&ctx, 0, || {
            renders += 1;
            RgbaImage::new(2, 2)
        });
        assert_eq!(renders, 1);
        assert!(!textures.is_stale(0));

        textures.get_or_update(&ctx, 1, || {
            renders += 1;
            RgbaImage::new(2, 2)
        });
        assert_eq!(renders, 2);
        assert!(textures.is_stale(0));
    }

    #[test]
    fn test_color_image_conversion() {
        let image = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
        let color = to_color_image(&image);
        assert_eq!(color.size, [3, 2]);
        assert_eq!(color.pixels[0], egui::Color32::from_rgb(1, 2, 3));
    }
}
