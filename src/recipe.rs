//! Edit recipes: a serialized list of session operations replayed in order.

use serde::Deserialize;

use crate::editor::tools::{
    Adjustments, CropBox, CropPreset, ResizeSpec, TextOverlayPatch, TextStyle,
};
use crate::editor::{EditorResult, EditorSession};
use crate::geometry::ToolPoint;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditStep {
    Crop(CropBox),
    CropPreset {
        preset: CropPreset,
    },
    Resize {
        spec: ResizeSpec,
    },
    Adjust(Adjustments),
    ApplyAdjustments(Adjustments),
    /// Adds an overlay; later steps refer to it by its position among added overlays.
    AddText {
        #[serde(default)]
        at: Option<ToolPoint>,
        #[serde(default)]
        style: Option<TextStyle>,
        #[serde(default)]
        patch: TextOverlayPatch,
    },
    UpdateText {
        overlay: usize,
        patch: TextOverlayPatch,
    },
    RemoveText {
        overlay: usize,
    },
    Undo,
    Redo,
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EditRecipe {
    #[serde(default)]
    pub steps: Vec<EditStep>,
}

impl EditRecipe {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Replays every step, stopping at the first failure. `default_style` is used by
    /// `add_text` steps without an explicit style.
    pub fn apply(&self, session: &mut EditorSession, default_style: TextStyle) -> EditorResult<()> {
        let mut added = Vec::new();
        let overlay_id = |added: &[u64], index: usize| {
            // Index past the end maps to an id that was never issued.
            added.get(index).copied().unwrap_or(u64::MAX)
        };

        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(index, ?step, "applying recipe step");
            match step {
                EditStep::Crop(crop) => session.apply_crop(*crop)?,
                EditStep::CropPreset { preset } => {
                    let (width, height) = session.dimensions();
                    session.apply_crop(CropBox::centered(*preset, width, height))?;
                }
                EditStep::Resize { spec } => session.apply_resize(*spec)?,
                EditStep::Adjust(adjustments) => session.set_adjustments(*adjustments),
                EditStep::ApplyAdjustments(adjustments) => {
                    session.apply_adjustments(*adjustments)
                }
                EditStep::AddText { at, style, patch } => {
                    let style = style.unwrap_or(default_style);
                    let id = match at {
                        Some(anchor) => session.add_text_overlay_at(*anchor, style),
                        None => session.add_text_overlay(style),
                    };
                    session.update_text_overlay(id, patch)?;
                    added.push(id);
                }
                EditStep::UpdateText { overlay, patch } => {
                    session.update_text_overlay(overlay_id(&added, *overlay), patch)?;
                }
                EditStep::RemoveText { overlay } => {
                    session.remove_text_overlay(overlay_id(&added, *overlay))?;
                }
                EditStep::Undo => session.undo()?,
                EditStep::Redo => session.redo()?,
                EditStep::Reset => session.reset(),
            }
        }
        Ok(())
    }
}
