use serde::{Deserialize, Serialize};

use crate::geometry::{Color, ToolPoint};

pub const DEFAULT_OVERLAY_TEXT: &str = "Your Text Here";
pub const DEFAULT_OVERLAY_ANCHOR: ToolPoint = ToolPoint::new(50, 50);
pub const TEXT_SIZE_MIN: u16 = 8;
pub const TEXT_SIZE_MAX: u16 = 400;
pub const OPACITY_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFontFamily {
    #[default]
    Sans,
    Serif,
    Monospace,
}

impl TextFontFamily {
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Sans => "Arial, sans-serif",
            Self::Serif => "Georgia, serif",
            Self::Monospace => "Courier New, monospace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Styling shared by every overlay created from the same defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_size: u16,
    pub font_family: TextFontFamily,
    pub color: Color,
    pub font_weight: TextFontWeight,
    pub font_style: TextFontStyle,
    pub text_align: TextAlign,
    pub opacity: u8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 32,
            font_family: TextFontFamily::Sans,
            color: Color::WHITE,
            font_weight: TextFontWeight::Normal,
            font_style: TextFontStyle::Normal,
            text_align: TextAlign::Left,
            opacity: OPACITY_MAX,
        }
    }
}

impl TextStyle {
    pub fn normalized(mut self) -> Self {
        self.font_size = clamp_text_size(self.font_size);
        self.opacity = self.opacity.min(OPACITY_MAX);
        self
    }
}

const fn clamp_text_size(size: u16) -> u16 {
    if size < TEXT_SIZE_MIN {
        TEXT_SIZE_MIN
    } else if size > TEXT_SIZE_MAX {
        TEXT_SIZE_MAX
    } else {
        size
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextOverlay {
    pub id: u64,
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub visible: bool,
    pub style: TextStyle,
}

impl TextOverlay {
    pub fn new(id: u64, anchor: ToolPoint, style: TextStyle) -> Self {
        Self {
            id,
            text: DEFAULT_OVERLAY_TEXT.to_string(),
            x: anchor.x,
            y: anchor.y,
            visible: true,
            style: style.normalized(),
        }
    }

    pub const fn anchor(&self) -> ToolPoint {
        ToolPoint::new(self.x, self.y)
    }
}

/// Partial update for a [`TextOverlay`]; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextOverlayPatch {
    pub text: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub font_size: Option<u16>,
    pub font_family: Option<TextFontFamily>,
    pub color: Option<Color>,
    pub font_weight: Option<TextFontWeight>,
    pub font_style: Option<TextFontStyle>,
    pub text_align: Option<TextAlign>,
    pub visible: Option<bool>,
    pub opacity: Option<u8>,
}

impl TextOverlayPatch {
    pub fn apply_to(&self, overlay: &mut TextOverlay) {
        if let Some(text) = &self.text {
            overlay.text.clone_from(text);
        }
        if let Some(x) = self.x {
            overlay.x = x;
        }
        if let Some(y) = self.y {
            overlay.y = y;
        }
        if let Some(visible) = self.visible {
            overlay.visible = visible;
        }

        let style = &mut overlay.style;
        if let Some(size) = self.font_size {
            style.font_size = clamp_text_size(size);
        }
        if let Some(family) = self.font_family {
            style.font_family = family;
        }
        if let Some(color) = self.color {
            style.color = color;
        }
        if let Some(weight) = self.font_weight {
            style.font_weight = weight;
        }
        if let Some(font_style) = self.font_style {
            style.font_style = font_style;
        }
        if let Some(align) = self.text_align {
            style.text_align = align;
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity.min(OPACITY_MAX);
        }
    }
}
