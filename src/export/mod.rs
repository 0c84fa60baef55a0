use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, RgbaImage};
use webp_animation::{
    Encoder as WebPEncoder, EncoderOptions, EncodingConfig, EncodingType, LossyEncodingConfig,
};

use crate::editor::{EditorError, EditorResult};

pub const DEFAULT_JPEG_QUALITY: u8 = 92;
pub const DEFAULT_WEBP_QUALITY: u8 = 80;
const WEBP_FRAME_DURATION_MS: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg { quality: u8 },
    Bmp,
    WebP { quality: u8 },
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
            Self::Bmp => "bmp",
            Self::WebP { .. } => "webp",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
            Self::Bmp => "image/bmp",
            Self::WebP { .. } => "image/webp",
        }
    }

    pub const fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg { .. } | Self::WebP { .. })
    }

    /// Same format with a quality override; lossless formats are unchanged.
    pub fn with_quality(self, quality: u8) -> Self {
        let quality = quality.clamp(1, 100);
        match self {
            Self::Jpeg { .. } => Self::Jpeg { quality },
            Self::WebP { .. } => Self::WebP { quality },
            other => other,
        }
    }

    pub fn encode(self, image: &RgbaImage) -> EditorResult<Vec<u8>> {
        let mut buffer = Vec::new();
        match self {
            Self::Jpeg { quality } => {
                let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
                JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
                    .encode(
                        rgb.as_raw(),
                        rgb.width(),
                        rgb.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(EditorError::Encode)?;
            }
            Self::WebP { quality } => return encode_lossy_webp(image, quality),
            Self::Png => write_lossless(image, ImageFormat::Png, &mut buffer)?,
            Self::Bmp => write_lossless(image, ImageFormat::Bmp, &mut buffer)?,
        }
        Ok(buffer)
    }
}

fn write_lossless(image: &RgbaImage, format: ImageFormat, buffer: &mut Vec<u8>) -> EditorResult<()> {
    image
        .write_to(&mut Cursor::new(buffer), format)
        .map_err(EditorError::Encode)
}

/// A single-frame stream; libwebp emits it as a plain still image.
fn encode_lossy_webp(image: &RgbaImage, quality: u8) -> EditorResult<Vec<u8>> {
    let options = EncoderOptions {
        encoding_config: Some(EncodingConfig {
            encoding_type: EncodingType::Lossy(LossyEncodingConfig::default()),
            quality: f32::from(quality.clamp(1, 100)),
            method: 4,
        }),
        ..EncoderOptions::default()
    };
    let webp_error = |err: webp_animation::Error| EditorError::WebPEncode(format!("{err:?}"));

    let mut encoder =
        WebPEncoder::new_with_options(image.dimensions(), options).map_err(webp_error)?;
    encoder.add_frame(image.as_raw(), 0).map_err(webp_error)?;
    let data = encoder.finalize(WEBP_FRAME_DURATION_MS).map_err(webp_error)?;
    Ok(data.to_vec())
}

impl FromStr for ExportFormat {
    type Err = EditorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg {
                quality: DEFAULT_JPEG_QUALITY,
            }),
            "bmp" => Ok(Self::Bmp),
            "webp" => Ok(Self::WebP {
                quality: DEFAULT_WEBP_QUALITY,
            }),
            _ => Err(EditorError::UnsupportedExportFormat(value.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
