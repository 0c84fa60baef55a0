mod adjust;
mod crop;
mod resize;
mod text;

pub use adjust::{Adjustments, ADJUSTMENT_MAX_PERCENT, ADJUSTMENT_NEUTRAL_PERCENT};
pub use crop::{CropBox, CropPreset};
pub use resize::{
    bounded_dimensions, ResizePreset, ResizeSpec, MAX_RESIZE_PERCENT, MIN_RESIZE_PERCENT,
};
pub use text::{
    TextAlign, TextFontFamily, TextFontStyle, TextFontWeight, TextOverlay, TextOverlayPatch,
    TextStyle, DEFAULT_OVERLAY_ANCHOR, DEFAULT_OVERLAY_TEXT, OPACITY_MAX, TEXT_SIZE_MAX,
    TEXT_SIZE_MIN,
};
