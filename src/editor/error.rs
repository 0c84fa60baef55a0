use thiserror::Error;

use super::tools::CropBox;

pub type EditorResult<T> = std::result::Result<T, EditorError>;

/// Recoverable failures of an [`EditorSession`](super::EditorSession) operation.
///
/// A failed operation leaves the session in its last committed state.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("unsupported or corrupt image data")]
    UnsupportedFormat(#[source] image::ImageError),

    #[error("image is {size} bytes, the limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error(
        "crop box {}x{} at ({}, {}) does not fit inside {image_width}x{image_height}",
        crop.width, crop.height, crop.x, crop.y
    )]
    InvalidCropBox {
        crop: CropBox,
        image_width: u32,
        image_height: u32,
    },

    /// Also raised for a resize percentage outside 10..=200; the size is the unclamped result.
    #[error(
        "invalid target dimensions {width}x{height}: sides must be in 1..={max} \
         and scale percentages in 10..=200"
    )]
    InvalidDimensions { width: u64, height: u64, max: u32 },

    #[error("text overlay {id} not found")]
    OverlayNotFound { id: u64 },

    #[error("nothing to undo")]
    NoHistory,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("unsupported export format `{0}`")]
    UnsupportedExportFormat(String),

    #[error("failed to encode image")]
    Encode(#[source] image::ImageError),

    #[error("failed to encode webp: {0}")]
    WebPEncode(String),
}
