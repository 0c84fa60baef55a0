//! Pure compositing of a session's state into a pixel buffer.
//!
//! Nothing in here touches a display surface; adapters push [`RenderedSurface`]
//! buffers to whatever surface the host provides.

mod glyphs;

use image::RgbaImage;

use crate::editor::tools::{Adjustments, TextOverlay};

/// Final composite of base raster, adjustment filter and overlays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSurface {
    image: RgbaImage,
}

impl RenderedSurface {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Row-major RGBA8 pixels.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// base -> adjustment filter -> visible overlays in insertion order.
pub fn compose(
    base: &RgbaImage,
    adjustments: &Adjustments,
    overlays: &[TextOverlay],
) -> RenderedSurface {
    let mut image = adjustments.apply(base);
    for overlay in overlays.iter().filter(|overlay| overlay.visible) {
        glyphs::draw_overlay(&mut image, overlay);
    }
    RenderedSurface { image }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::tools::TextStyle;
    use crate::geometry::{Color, ToolPoint};
    use image::Rgba;

    fn base() -> RgbaImage {
        RgbaImage::from_pixel(120, 40, Rgba([20, 40, 60, 255]))
    }

    fn overlay(id: u64, color: Color) -> TextOverlay {
        let style = TextStyle {
            color,
            font_size: 16,
            ..TextStyle::default()
        };
        let mut overlay = TextOverlay::new(id, ToolPoint::new(0, 0), style);
        overlay.text = "##".to_string();
        overlay
    }

    #[test]
    fn compose_is_deterministic() {
        let overlays = vec![overlay(1, Color::WHITE)];
        let adjustments = Adjustments::new(120, 80, 150);
        let first = compose(&base(), &adjustments, &overlays);
        let second = compose(&base(), &adjustments, &overlays);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn hidden_overlays_are_skipped() {
        let mut hidden = overlay(1, Color::WHITE);
        hidden.visible = false;
        let surface = compose(&base(), &Adjustments::IDENTITY, &[hidden]);
        assert_eq!(surface.as_image(), &base());
    }

    #[test]
    fn later_overlays_draw_on_top() {
        let red = Color::new(255, 0, 0);
        let blue = Color::new(0, 0, 255);
        let surface = compose(
            &base(),
            &Adjustments::IDENTITY,
            &[overlay(1, red), overlay(2, blue)],
        );
        assert!(surface.as_image().pixels().any(|p| p.0 == [0, 0, 255, 255]));
        assert!(!surface.as_image().pixels().any(|p| p.0 == [255, 0, 0, 255]));
    }
}
