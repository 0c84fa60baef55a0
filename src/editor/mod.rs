//! The image editing session: one loaded raster, its bounded history and the live
//! tool parameters layered over it.

mod error;
pub mod history;
pub mod tools;

use std::sync::Arc;

use image::{imageops, RgbaImage};

use crate::config::EditorConfig;
use crate::export::ExportFormat;
use crate::geometry::ToolPoint;
use crate::render::{compose, RenderedSurface};

pub use error::{EditorError, EditorResult};
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use tools::{
    Adjustments, CropBox, CropPreset, ResizePreset, ResizeSpec, TextOverlay, TextOverlayPatch,
    TextStyle,
};

pub const DEFAULT_MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;
pub const DEFAULT_MAX_CANVAS_DIMENSION: u32 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub history_limit: usize,
    pub max_input_bytes: u64,
    pub max_canvas_dimension: u32,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_canvas_dimension: DEFAULT_MAX_CANVAS_DIMENSION,
        }
    }
}

impl SessionLimits {
    pub fn from_config(config: &EditorConfig) -> Self {
        let defaults = Self::default();
        Self {
            history_limit: config
                .history_limit
                .unwrap_or(defaults.history_limit)
                .max(1),
            max_input_bytes: config.max_input_bytes.unwrap_or(defaults.max_input_bytes),
            max_canvas_dimension: config
                .max_canvas_dimension
                .unwrap_or(defaults.max_canvas_dimension)
                .max(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    limits: SessionLimits,
    original: Arc<RgbaImage>,
    history: History,
    crop_box: CropBox,
    resize_target: (u32, u32),
    adjustments: Adjustments,
    overlays: Vec<TextOverlay>,
    next_overlay_id: u64,
}

impl EditorSession {
    /// Decodes `bytes` and opens a session seeded with the decoded raster.
    pub fn open(bytes: &[u8], limits: SessionLimits) -> EditorResult<Self> {
        let image = Arc::new(decode_image(bytes, &limits)?);
        let (width, height) = image.dimensions();
        tracing::info!(width, height, bytes = bytes.len(), "opened editing session");
        Ok(Self {
            limits,
            original: Arc::clone(&image),
            history: History::new(image, limits.history_limit),
            crop_box: CropBox::full(width, height),
            resize_target: (width, height),
            adjustments: Adjustments::IDENTITY,
            overlays: Vec::new(),
            next_overlay_id: 1,
        })
    }

    /// Loads a new image into this session, releasing the previous raster and history.
    ///
    /// Decoding happens first; on failure the session is left untouched.
    pub fn replace_image(&mut self, bytes: &[u8]) -> EditorResult<()> {
        let image = Arc::new(decode_image(bytes, &self.limits)?);
        let (width, height) = image.dimensions();
        self.original = Arc::clone(&image);
        self.history = History::new(image, self.limits.history_limit);
        self.crop_box = CropBox::full(width, height);
        self.resize_target = (width, height);
        self.adjustments = Adjustments::IDENTITY;
        self.overlays.clear();
        tracing::info!(width, height, bytes = bytes.len(), "replaced session image");
        Ok(())
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// The committed working raster.
    pub fn working_image(&self) -> &RgbaImage {
        self.history.current()
    }

    pub fn original_image(&self) -> &RgbaImage {
        &self.original
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.working_image().dimensions()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_position(&self) -> usize {
        self.history.position()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn crop_box(&self) -> CropBox {
        self.crop_box
    }

    pub fn resize_target(&self) -> (u32, u32) {
        self.resize_target
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    pub fn overlays(&self) -> &[TextOverlay] {
        &self.overlays
    }

    pub fn overlay(&self, id: u64) -> Option<&TextOverlay> {
        self.overlays.iter().find(|overlay| overlay.id == id)
    }

    /// Renders the crop result without committing it. The box is clamped to the image.
    pub fn preview_crop(&self, crop: CropBox) -> EditorResult<RenderedSurface> {
        let (width, height) = self.dimensions();
        let clamped = crop
            .clamped_to(width, height)
            .ok_or(EditorError::InvalidCropBox {
                crop,
                image_width: width,
                image_height: height,
            })?;
        let cropped = crop_image(self.working_image(), clamped);
        Ok(compose(&cropped, &self.adjustments, &self.overlays))
    }

    /// Replaces the working raster with the `crop` region. Overlay positions are kept
    /// in their old coordinates.
    pub fn apply_crop(&mut self, crop: CropBox) -> EditorResult<()> {
        let (width, height) = self.dimensions();
        if !crop.fits_within(width, height) {
            tracing::debug!(?crop, width, height, "rejected crop outside image bounds");
            return Err(EditorError::InvalidCropBox {
                crop,
                image_width: width,
                image_height: height,
            });
        }
        let cropped = crop_image(self.working_image(), crop);
        tracing::debug!(?crop, "applied crop");
        self.commit(cropped);
        Ok(())
    }

    pub fn apply_resize(&mut self, spec: ResizeSpec) -> EditorResult<()> {
        let (width, height) = self.dimensions();
        let max_dimension = self.limits.max_canvas_dimension;
        let target = spec.target_size(width, height, max_dimension)?;
        if target == (u64::from(width), u64::from(height)) {
            tracing::debug!(width, height, "resize target matches current size; skipped");
            return Ok(());
        }
        let (target_width, target_height) =
            tools::bounded_dimensions(target.0, target.1, max_dimension)?;
        let resized = imageops::resize(
            self.working_image(),
            target_width,
            target_height,
            imageops::FilterType::Triangle,
        );
        tracing::debug!(
            from_width = width,
            from_height = height,
            target_width,
            target_height,
            "applied resize"
        );
        self.commit(resized);
        Ok(())
    }

    /// Stores slider values that [`render`](Self::render) applies until committed.
    pub fn set_adjustments(&mut self, adjustments: Adjustments) {
        self.adjustments = adjustments;
    }

    pub fn preview_adjustments(&self, adjustments: Adjustments) -> RenderedSurface {
        compose(self.working_image(), &adjustments, &self.overlays)
    }

    /// Bakes `adjustments` into the working raster and resets the live values.
    pub fn apply_adjustments(&mut self, adjustments: Adjustments) {
        let adjusted = adjustments.apply(self.working_image());
        tracing::debug!(
            brightness = adjustments.brightness(),
            contrast = adjustments.contrast(),
            saturation = adjustments.saturation(),
            "applied adjustments"
        );
        self.commit(adjusted);
    }

    pub fn add_text_overlay(&mut self, style: TextStyle) -> u64 {
        self.add_text_overlay_at(tools::DEFAULT_OVERLAY_ANCHOR, style)
    }

    pub fn add_text_overlay_at(&mut self, anchor: ToolPoint, style: TextStyle) -> u64 {
        let id = self.next_overlay_id;
        self.next_overlay_id = self.next_overlay_id.saturating_add(1);
        self.overlays.push(TextOverlay::new(id, anchor, style));
        tracing::debug!(id, "added text overlay");
        id
    }

    pub fn update_text_overlay(&mut self, id: u64, patch: &TextOverlayPatch) -> EditorResult<()> {
        let overlay = self
            .overlays
            .iter_mut()
            .find(|overlay| overlay.id == id)
            .ok_or(EditorError::OverlayNotFound { id })?;
        patch.apply_to(overlay);
        Ok(())
    }

    /// Flips visibility and returns the new state.
    pub fn toggle_text_overlay(&mut self, id: u64) -> EditorResult<bool> {
        let overlay = self
            .overlays
            .iter_mut()
            .find(|overlay| overlay.id == id)
            .ok_or(EditorError::OverlayNotFound { id })?;
        overlay.visible = !overlay.visible;
        Ok(overlay.visible)
    }

    pub fn remove_text_overlay(&mut self, id: u64) -> EditorResult<TextOverlay> {
        let index = self
            .overlays
            .iter()
            .position(|overlay| overlay.id == id)
            .ok_or(EditorError::OverlayNotFound { id })?;
        tracing::debug!(id, "removed text overlay");
        Ok(self.overlays.remove(index))
    }

    /// Steps back one history entry. Overlays are not part of history.
    pub fn undo(&mut self) -> EditorResult<()> {
        if self.history.undo().is_none() {
            return Err(EditorError::NoHistory);
        }
        self.sync_tool_parameters();
        tracing::debug!(position = self.history.position(), "undo applied");
        Ok(())
    }

    pub fn redo(&mut self) -> EditorResult<()> {
        if self.history.redo().is_none() {
            return Err(EditorError::NothingToRedo);
        }
        self.sync_tool_parameters();
        tracing::debug!(position = self.history.position(), "redo applied");
        Ok(())
    }

    /// Restores the original raster as a new history entry and clears overlays.
    pub fn reset(&mut self) {
        self.overlays.clear();
        self.history.push(Arc::clone(&self.original));
        self.adjustments = Adjustments::IDENTITY;
        self.sync_tool_parameters();
        tracing::debug!("session reset to original image");
    }

    pub fn render(&self) -> RenderedSurface {
        compose(self.working_image(), &self.adjustments, &self.overlays)
    }

    pub fn export(&self, format: ExportFormat) -> EditorResult<Vec<u8>> {
        let surface = self.render();
        let bytes = format.encode(surface.as_image())?;
        tracing::info!(
            %format,
            width = surface.width(),
            height = surface.height(),
            bytes = bytes.len(),
            "exported image"
        );
        Ok(bytes)
    }

    fn commit(&mut self, image: RgbaImage) {
        self.history.push(Arc::new(image));
        self.adjustments = Adjustments::IDENTITY;
        self.sync_tool_parameters();
    }

    fn sync_tool_parameters(&mut self) {
        let (width, height) = self.dimensions();
        self.crop_box = CropBox::full(width, height);
        self.resize_target = (width, height);
    }
}

fn decode_image(bytes: &[u8], limits: &SessionLimits) -> EditorResult<RgbaImage> {
    let size = bytes.len() as u64;
    if size > limits.max_input_bytes {
        return Err(EditorError::FileTooLarge {
            size,
            limit: limits.max_input_bytes,
        });
    }
    let image = image::load_from_memory(bytes)
        .map_err(EditorError::UnsupportedFormat)?
        .to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(EditorError::InvalidDimensions {
            width: u64::from(image.width()),
            height: u64::from(image.height()),
            max: limits.max_canvas_dimension,
        });
    }
    Ok(image)
}

fn crop_image(image: &RgbaImage, crop: CropBox) -> RgbaImage {
    imageops::crop_imm(image, crop.x, crop.y, crop.width, crop.height).to_image()
}
