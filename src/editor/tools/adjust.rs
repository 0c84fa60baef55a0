use image::RgbaImage;
use serde::{Deserialize, Serialize};

pub const ADJUSTMENT_MAX_PERCENT: u16 = 200;
pub const ADJUSTMENT_NEUTRAL_PERCENT: u16 = 100;

/// Brightness, contrast and saturation, each a percentage where 100 is identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAdjustments")]
pub struct Adjustments {
    brightness: u16,
    contrast: u16,
    saturation: u16,
}

#[derive(Deserialize)]
struct RawAdjustments {
    #[serde(default = "neutral")]
    brightness: u16,
    #[serde(default = "neutral")]
    contrast: u16,
    #[serde(default = "neutral")]
    saturation: u16,
}

const fn neutral() -> u16 {
    ADJUSTMENT_NEUTRAL_PERCENT
}

impl From<RawAdjustments> for Adjustments {
    fn from(raw: RawAdjustments) -> Self {
        Self::new(raw.brightness, raw.contrast, raw.saturation)
    }
}

impl Default for Adjustments {
    fn default() -> Self {
        Self::IDENTITY
    }
}

const fn clamp_percent(value: u16) -> u16 {
    if value > ADJUSTMENT_MAX_PERCENT {
        ADJUSTMENT_MAX_PERCENT
    } else {
        value
    }
}

impl Adjustments {
    pub const IDENTITY: Adjustments = Adjustments {
        brightness: ADJUSTMENT_NEUTRAL_PERCENT,
        contrast: ADJUSTMENT_NEUTRAL_PERCENT,
        saturation: ADJUSTMENT_NEUTRAL_PERCENT,
    };

    /// Values above 200 are clamped.
    pub const fn new(brightness: u16, contrast: u16, saturation: u16) -> Self {
        Self {
            brightness: clamp_percent(brightness),
            contrast: clamp_percent(contrast),
            saturation: clamp_percent(saturation),
        }
    }

    pub const fn brightness(&self) -> u16 {
        self.brightness
    }

    pub const fn contrast(&self) -> u16 {
        self.contrast
    }

    pub const fn saturation(&self) -> u16 {
        self.saturation
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Applies the filter chain `brightness() contrast() saturate()` with CSS filter
    /// semantics, clamping after each stage. Alpha is untouched.
    pub fn apply(&self, source: &RgbaImage) -> RgbaImage {
        if self.is_identity() {
            return source.clone();
        }

        let tone = self.tone_lut();
        let saturation = f32::from(self.saturation) / 100.0;
        let matrix = (self.saturation != ADJUSTMENT_NEUTRAL_PERCENT)
            .then(|| saturation_matrix(saturation));

        let mut output = source.clone();
        for pixel in output.pixels_mut() {
            let [r, g, b, a] = pixel.0;
            let (r, g, b) = (
                tone[usize::from(r)],
                tone[usize::from(g)],
                tone[usize::from(b)],
            );
            pixel.0 = match &matrix {
                Some(m) => {
                    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
                    [
                        to_channel(m[0][0] * r + m[0][1] * g + m[0][2] * b),
                        to_channel(m[1][0] * r + m[1][1] * g + m[1][2] * b),
                        to_channel(m[2][0] * r + m[2][1] * g + m[2][2] * b),
                        a,
                    ]
                }
                None => [r, g, b, a],
            };
        }
        output
    }

    fn tone_lut(&self) -> [u8; 256] {
        let brightness = f32::from(self.brightness) / 100.0;
        let contrast = f32::from(self.contrast) / 100.0;
        let mut lut = [0_u8; 256];
        for (value, slot) in lut.iter_mut().enumerate() {
            let normalized = value as f32 / 255.0;
            let brightened = (normalized * brightness).clamp(0.0, 1.0);
            let contrasted = ((brightened - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
            *slot = to_channel(contrasted * 255.0);
        }
        lut
    }
}

fn saturation_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba(color))
    }

    #[test]
    fn new_clamps_values_above_maximum() {
        let adjustments = Adjustments::new(250, 200, 1000);
        assert_eq!(adjustments.brightness(), 200);
        assert_eq!(adjustments.contrast(), 200);
        assert_eq!(adjustments.saturation(), 200);
    }

    #[test]
    fn identity_returns_identical_pixels() {
        let image = solid([10, 120, 250, 200]);
        assert_eq!(Adjustments::IDENTITY.apply(&image), image);
    }

    #[test]
    fn zero_brightness_turns_pixels_black_and_keeps_alpha() {
        let out = Adjustments::new(0, 100, 100).apply(&solid([10, 120, 250, 77]));
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 77]);
    }

    #[test]
    fn double_brightness_saturates_at_white() {
        let out = Adjustments::new(200, 100, 100).apply(&solid([100, 200, 20, 255]));
        assert_eq!(out.get_pixel(1, 1).0, [200, 255, 40, 255]);
    }

    #[test]
    fn zero_contrast_flattens_to_mid_gray() {
        let out = Adjustments::new(100, 0, 100).apply(&solid([0, 90, 255, 255]));
        assert_eq!(out.get_pixel(0, 0).0, [128, 128, 128, 255]);
    }

    #[test]
    fn zero_saturation_produces_gray_pixels() {
        let out = Adjustments::new(100, 100, 0).apply(&solid([200, 40, 90, 255]));
        let [r, g, b, a] = out.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn missing_fields_deserialize_as_neutral() {
        let adjustments: Adjustments =
            serde_json::from_str(r#"{"brightness":150}"#).expect("partial adjustments");
        assert_eq!(adjustments, Adjustments::new(150, 100, 100));
        let adjustments: Adjustments =
            serde_json::from_str(r#"{"contrast":900}"#).expect("out of range adjustments");
        assert_eq!(adjustments.contrast(), 200);
    }
}
