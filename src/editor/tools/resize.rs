use serde::{Deserialize, Serialize};

use crate::editor::{EditorError, EditorResult};

pub const MIN_RESIZE_PERCENT: u32 = 10;
pub const MAX_RESIZE_PERCENT: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePreset {
    InstagramPost,
    InstagramStory,
    FacebookCover,
    TwitterHeader,
    YoutubeThumbnail,
    FullHd,
}

impl ResizePreset {
    pub const ALL: [ResizePreset; 6] = [
        Self::InstagramPost,
        Self::InstagramStory,
        Self::FacebookCover,
        Self::TwitterHeader,
        Self::YoutubeThumbnail,
        Self::FullHd,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::InstagramPost => "Instagram Post",
            Self::InstagramStory => "Instagram Story",
            Self::FacebookCover => "Facebook Cover",
            Self::TwitterHeader => "Twitter Header",
            Self::YoutubeThumbnail => "YouTube Thumbnail",
            Self::FullHd => "HD 1080p",
        }
    }

    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::InstagramPost => (1080, 1080),
            Self::InstagramStory => (1080, 1920),
            Self::FacebookCover => (820, 312),
            Self::TwitterHeader => (1500, 500),
            Self::YoutubeThumbnail => (1280, 720),
            Self::FullHd => (1920, 1080),
        }
    }
}

/// Target of a resize, resolved against the current image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeSpec {
    Exact { width: u32, height: u32 },
    Percentage(u32),
    Preset(ResizePreset),
}

impl ResizeSpec {
    /// Resolves to concrete pixel dimensions within `1..=max_dimension`.
    pub fn resolve(
        self,
        current_width: u32,
        current_height: u32,
        max_dimension: u32,
    ) -> EditorResult<(u32, u32)> {
        let (width, height) = self.target_size(current_width, current_height, max_dimension)?;
        bounded_dimensions(width, height, max_dimension)
    }

    /// Unbounded target size. Only the percentage range is checked here.
    pub fn target_size(
        self,
        current_width: u32,
        current_height: u32,
        max_dimension: u32,
    ) -> EditorResult<(u64, u64)> {
        match self {
            Self::Exact { width, height } => Ok((u64::from(width), u64::from(height))),
            Self::Preset(preset) => {
                let (width, height) = preset.dimensions();
                Ok((u64::from(width), u64::from(height)))
            }
            Self::Percentage(percent) => {
                let width = scale_dimension(current_width, percent);
                let height = scale_dimension(current_height, percent);
                if !(MIN_RESIZE_PERCENT..=MAX_RESIZE_PERCENT).contains(&percent) {
                    tracing::debug!(percent, "resize percentage outside supported range");
                    return Err(EditorError::InvalidDimensions {
                        width,
                        height,
                        max: max_dimension,
                    });
                }
                Ok((width, height))
            }
        }
    }
}

/// Narrows a target size to `u32` once both sides are in `1..=max_dimension`.
pub fn bounded_dimensions(width: u64, height: u64, max_dimension: u32) -> EditorResult<(u32, u32)> {
    let in_range = |value: u64| value > 0 && value <= u64::from(max_dimension);
    if !in_range(width) || !in_range(height) {
        return Err(EditorError::InvalidDimensions {
            width,
            height,
            max: max_dimension,
        });
    }
    // Both values are bounded by a u32 maximum at this point.
    Ok((width as u32, height as u32))
}

fn scale_dimension(value: u32, percent: u32) -> u64 {
    let scaled = (u64::from(value) * u64::from(percent) + 50) / 100;
    scaled.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_and_never_collapses_to_zero() {
        assert_eq!(ResizeSpec::Percentage(50).resolve(801, 600, 30_000).unwrap(), (401, 300));
        assert_eq!(ResizeSpec::Percentage(10).resolve(3, 3, 30_000).unwrap(), (1, 1));
        assert_eq!(ResizeSpec::Percentage(100).resolve(800, 600, 30_000).unwrap(), (800, 600));
        assert_eq!(ResizeSpec::Percentage(200).resolve(800, 600, 30_000).unwrap(), (1600, 1200));
    }

    #[test]
    fn percentage_outside_range_is_rejected() {
        for percent in [0, 9, 201] {
            let err = ResizeSpec::Percentage(percent)
                .resolve(800, 600, 30_000)
                .expect_err("out-of-range percentage should fail");
            assert!(matches!(err, EditorError::InvalidDimensions { max: 30_000, .. }));
        }
    }

    #[test]
    fn target_size_is_not_bounded_by_canvas_maximum() {
        assert_eq!(
            ResizeSpec::Percentage(100).target_size(30_001, 1, 30_000).unwrap(),
            (30_001, 1)
        );
        assert!(ResizeSpec::Percentage(100).resolve(30_001, 1, 30_000).is_err());
    }

    #[test]
    fn exact_dimensions_must_be_positive_and_bounded() {
        let err = ResizeSpec::Exact { width: 0, height: 100 }
            .resolve(800, 600, 30_000)
            .expect_err("zero width should fail");
        assert!(matches!(
            err,
            EditorError::InvalidDimensions { width: 0, height: 100, .. }
        ));

        let err = ResizeSpec::Exact { width: 30_001, height: 100 }
            .resolve(800, 600, 30_000)
            .expect_err("oversized width should fail");
        assert!(matches!(err, EditorError::InvalidDimensions { .. }));

        assert_eq!(
            ResizeSpec::Exact { width: 30_000, height: 1 }.resolve(800, 600, 30_000).unwrap(),
            (30_000, 1)
        );
    }

    #[test]
    fn scale_past_maximum_canvas_is_rejected() {
        let err = ResizeSpec::Percentage(200)
            .resolve(20_000, 10, 30_000)
            .expect_err("doubling past the canvas maximum should fail");
        assert!(matches!(
            err,
            EditorError::InvalidDimensions { width: 40_000, height: 20, max: 30_000 }
        ));
    }

    #[test]
    fn presets_resolve_to_fixed_dimensions() {
        for preset in ResizePreset::ALL {
            let resolved = ResizeSpec::Preset(preset).resolve(10, 10, 30_000).unwrap();
            assert_eq!(resolved, preset.dimensions(), "{}", preset.label());
        }
    }

    #[test]
    fn resize_spec_deserializes_from_tagged_json() {
        let spec: ResizeSpec =
            serde_json::from_str(r#"{"exact":{"width":10,"height":20}}"#).expect("exact");
        assert_eq!(spec, ResizeSpec::Exact { width: 10, height: 20 });
        let spec: ResizeSpec = serde_json::from_str(r#"{"percentage":50}"#).expect("percentage");
        assert_eq!(spec, ResizeSpec::Percentage(50));
        let spec: ResizeSpec =
            serde_json::from_str(r#"{"preset":"youtube_thumbnail"}"#).expect("preset");
        assert_eq!(spec, ResizeSpec::Preset(ResizePreset::YoutubeThumbnail));
    }
}
