use thiserror::Error;

use crate::store::RecordId;

/// Errors reported by the canvas and its collaborators
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A background was supplied before the canvas had a non-zero size
    #[error("Cannot set a background on a {width}x{height} viewport")]
    InvalidViewport { width: u32, height: u32 },

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("No saved drawing with id {0}")]
    RecordNotFound(RecordId),
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;
