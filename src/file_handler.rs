use std::path::Path;

use eframe::egui;
use image::RgbaImage;

use crate::error::CanvasResult;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Decode an encoded image (PNG, JPEG, ...) into RGBA pixels
pub fn decode_image(bytes: &[u8]) -> CanvasResult<RgbaImage> {
    let image = image::load_from_memory(bytes)?;
    log::debug!("Decoded image: {}x{}", image.width(), image.height());
    Ok(image.to_rgba8())
}

/// Read and decode an image file
pub fn load_image(path: impl AsRef<Path>) -> CanvasResult<RgbaImage> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

/// Check if a path looks like an image based on its extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Picks up files dropped onto the window and decodes the first image among them
#[derive(Debug, Default)]
pub struct FileHandler {
    last_error: Option<String>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error message from the most recent failed drop, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the decoded image if an image file was dropped this frame
    pub fn take_dropped_image(&mut self, ctx: &egui::Context) -> Option<RgbaImage> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let file_name = file
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| file.name.clone());

            let decoded = if let Some(bytes) = &file.bytes {
                decode_image(bytes)
            } else if let Some(path) = &file.path {
                if !file.mime.starts_with("image/") && !is_image_path(path) {
                    log::warn!("Dropped file is not a supported type: {}", file_name);
                    continue;
                }
                load_image(path)
            } else {
                log::warn!("Dropped file has no accessible data: {}", file_name);
                continue;
            };

            match decoded {
                Ok(image) => {
                    self.last_error = None;
                    return Some(image);
                }
                Err(err) => {
                    log::error!("Failed to load {}: {}", file_name, err);
                    self.last_error = Some(format!("{file_name}: {err}"));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_decode_png() {
        let source = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded, source);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("photo.PNG")));
        assert!(is_image_path(Path::new("dir/scan.jpeg")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("README")));
    }
}
