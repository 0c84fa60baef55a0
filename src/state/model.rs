use serde::{Deserialize, Serialize};

/// Scroll offset in pixels past which the header switches to its condensed form.
pub const HEADER_CONDENSE_OFFSET: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    /// Dark becomes light; anything else becomes dark.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::System | Self::Light => Self::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiState {
    pub theme: ThemeMode,
    pub scroll_offset: u32,
    pub header_condensed: bool,
}

impl UiState {
    pub const fn with_theme(theme: ThemeMode) -> Self {
        Self {
            theme,
            scroll_offset: 0,
            header_condensed: false,
        }
    }
}
