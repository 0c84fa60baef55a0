//! Shared geometric and color primitives used across editor, render and recipe modules.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPoint {
    pub x: i32,
    pub y: i32,
}

impl ToolPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{0}`: expected #rrggbb")]
pub struct ColorParseError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorParseError(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        let expanded = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return Err(invalid()),
        };
        let channel = |range: std::ops::Range<usize>| {
            expanded
                .get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(invalid)
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_long_and_short_hex() {
        assert_eq!("#ff8000".parse::<Color>(), Ok(Color::new(255, 128, 0)));
        assert_eq!("#FFF".parse::<Color>(), Ok(Color::WHITE));
    }

    #[test]
    fn color_rejects_missing_hash_and_bad_digits() {
        assert!("ff8000".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn color_serializes_as_lowercase_hex_string() {
        let json = serde_json::to_string(&Color::new(1, 2, 255)).expect("color should serialize");
        assert_eq!(json, "\"#0102ff\"");
        let back: Color = serde_json::from_str(&json).expect("color should deserialize");
        assert_eq!(back, Color::new(1, 2, 255));
    }
}
