use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropPreset {
    Free,
    #[serde(rename = "16:9")]
    Ratio16x9,
    #[serde(rename = "1:1")]
    Ratio1x1,
    #[serde(rename = "9:16")]
    Ratio9x16,
    Original,
}

impl CropPreset {
    pub const ALL: [CropPreset; 5] = [
        Self::Free,
        Self::Ratio16x9,
        Self::Ratio1x1,
        Self::Ratio9x16,
        Self::Original,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Ratio16x9 => "16:9",
            Self::Ratio1x1 => "1:1",
            Self::Ratio9x16 => "9:16",
            Self::Original => "Original",
        }
    }

    pub const fn ratio(self) -> Option<(u32, u32)> {
        match self {
            Self::Free => None,
            Self::Ratio16x9 => Some((16, 9)),
            Self::Ratio1x1 => Some((1, 1)),
            Self::Ratio9x16 => Some((9, 16)),
            Self::Original => None,
        }
    }

    /// Returns the effective aspect ratio for this preset.
    ///
    /// For fixed-ratio presets this returns the static ratio.
    /// For `Original` this returns the image dimensions as the ratio.
    /// For `Free` this returns `None`.
    pub fn resolve_ratio(self, image_width: u32, image_height: u32) -> Option<(u32, u32)> {
        self.ratio().or_else(|| {
            if self == Self::Original {
                Some((image_width.max(1), image_height.max(1)))
            } else {
                None
            }
        })
    }
}

/// Rectangle in working-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropBox {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn full(image_width: u32, image_height: u32) -> Self {
        Self::new(0, 0, image_width, image_height)
    }

    /// Largest box with the preset's aspect ratio, centered in the image.
    pub fn centered(preset: CropPreset, image_width: u32, image_height: u32) -> Self {
        let Some((ratio_x, ratio_y)) = preset.resolve_ratio(image_width, image_height) else {
            return Self::full(image_width, image_height);
        };
        let (width, height) = adjust_ratio_to_fit(image_width, image_height, ratio_x, ratio_y);
        let width = width.max(1).min(image_width);
        let height = height.max(1).min(image_height);
        Self::new(
            (image_width - width) / 2,
            (image_height - height) / 2,
            width,
            height,
        )
    }

    /// True when the box is non-empty and lies entirely inside the image.
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        right <= u64::from(image_width) && bottom <= u64::from(image_height)
    }

    /// Clamps the box into the image. Returns `None` for an empty box or image.
    pub fn clamped_to(&self, image_width: u32, image_height: u32) -> Option<Self> {
        if self.width == 0 || self.height == 0 || image_width == 0 || image_height == 0 {
            return None;
        }
        let x = self.x.min(image_width - 1);
        let y = self.y.min(image_height - 1);
        let width = self.width.min(image_width - x);
        let height = self.height.min(image_height - y);
        Some(Self::new(x, y, width, height))
    }
}

pub(crate) fn adjust_ratio_to_fit(
    width: u32,
    height: u32,
    ratio_x: u32,
    ratio_y: u32,
) -> (u32, u32) {
    let target_w = scale_ratio_dimension(height, ratio_x, ratio_y);
    let target_h = scale_ratio_dimension(width, ratio_y, ratio_x);

    if target_w <= width {
        (target_w, height)
    } else {
        (width, target_h)
    }
}

pub(crate) fn scale_ratio_dimension(base: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        0
    } else {
        let scaled = (u64::from(base) * u64::from(numerator)) / u64::from(denominator);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}
