use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};

use crate::editor::tools::{TextAlign, TextFontStyle, TextFontWeight, TextOverlay, OPACITY_MAX};
use crate::geometry::Color;

const GLYPH_CELLS: i64 = 8;

/// Half-open pixel rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl PixelRect {
    fn intersect(self, other: PixelRect) -> Option<PixelRect> {
        let rect = PixelRect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        (rect.left < rect.right && rect.top < rect.bottom).then_some(rect)
    }

    fn width(self) -> i64 {
        self.right - self.left
    }

    fn height(self) -> i64 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LaidOutLine<'a> {
    text: &'a str,
    offset: i64,
}

/// Pixel layout of one overlay, independent of the canvas it lands on.
///
/// Only metrics are stored; coverage is rasterized per clip rectangle, so a block far
/// larger than the canvas costs no more memory than the canvas itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextLayout<'a> {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
    scale: i64,
    cell: i64,
    line_height: i64,
    bold_extra: i64,
    italic: bool,
    lines: Vec<LaidOutLine<'a>>,
}

impl TextLayout<'_> {
    fn bounds(&self) -> PixelRect {
        // Sums were checked when the layout was built.
        PixelRect {
            left: self.left,
            top: self.top,
            right: self.left + self.width,
            bottom: self.top + self.height,
        }
    }

    fn slant(&self, glyph_row: i64) -> i64 {
        if self.italic {
            (GLYPH_CELLS - 1 - glyph_row) * self.scale / 4
        } else {
            0
        }
    }

    /// Coverage of the part of the block inside `clip`, row-major over the returned rect.
    fn rasterize(&self, clip: PixelRect) -> Option<(PixelRect, Vec<bool>)> {
        let area = self.bounds().intersect(clip)?;
        let area_width = area.width();
        let mut mask = vec![false; usize::try_from(area_width.checked_mul(area.height())?).ok()?];
        let glyph_span = self.cell + self.bold_extra + self.slant(0);

        for (line_index, line) in self.lines.iter().enumerate() {
            let line_top = self.top + line_index as i64 * self.line_height;
            if line_top >= area.bottom {
                break;
            }
            if line_top + self.cell <= area.top {
                continue;
            }

            for (char_index, ch) in line.text.chars().enumerate() {
                let glyph_left = self.left + line.offset + char_index as i64 * self.cell;
                if glyph_left >= area.right {
                    break;
                }
                if glyph_left + glyph_span <= area.left {
                    continue;
                }

                for (glyph_row, bits) in (0_i64..).zip(glyph_for(ch)) {
                    let row_left = glyph_left + self.slant(glyph_row);
                    let py = line_top + glyph_row * self.scale;
                    for glyph_column in 0..GLYPH_CELLS {
                        if (bits >> glyph_column) & 1 == 0 {
                            continue;
                        }
                        let px = row_left + glyph_column * self.scale;
                        let dot = PixelRect {
                            left: px,
                            top: py,
                            right: px + self.scale + self.bold_extra,
                            bottom: py + self.scale,
                        };
                        let Some(dot) = dot.intersect(area) else {
                            continue;
                        };
                        for y in dot.top..dot.bottom {
                            let row_start = (y - area.top) * area_width;
                            for x in dot.left..dot.right {
                                mask[(row_start + x - area.left) as usize] = true;
                            }
                        }
                    }
                }
            }
        }
        Some((area, mask))
    }

    #[cfg(test)]
    pub(crate) fn covered_pixels(&self) -> usize {
        self.rasterize(self.bounds())
            .map(|(_, mask)| mask.iter().filter(|covered| **covered).count())
            .unwrap_or(0)
    }
}

pub(crate) fn glyph_scale(font_size: u16) -> i64 {
    i64::from((font_size + 4) / 8).max(1)
}

fn glyph_for(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Lays out `overlay.text`. Returns `None` for empty text or a block whose extent
/// does not fit in `i64` coordinates.
pub(crate) fn layout_text(overlay: &TextOverlay) -> Option<TextLayout<'_>> {
    let style = &overlay.style;
    let scale = glyph_scale(style.font_size);
    let cell = GLYPH_CELLS * scale;
    let line_height = cell + scale;
    let bold_extra = match style.font_weight {
        TextFontWeight::Bold => (scale / 3).max(1),
        TextFontWeight::Normal => 0,
    };
    let italic = style.font_style == TextFontStyle::Italic;
    let slant_extra = if italic {
        (GLYPH_CELLS - 1) * scale / 4
    } else {
        0
    };

    let measured = overlay
        .text
        .split('\n')
        .map(|line| {
            let width = i64::try_from(line.chars().count()).ok()?.checked_mul(cell)?;
            Some((line, width))
        })
        .collect::<Option<Vec<_>>>()?;
    let text_width = measured.iter().map(|(_, width)| *width).max().unwrap_or(0);
    if text_width == 0 {
        return None;
    }

    let width = text_width.checked_add(bold_extra + slant_extra)?;
    let height = i64::try_from(measured.len())
        .ok()?
        .checked_mul(line_height)?
        .checked_sub(scale)?;
    let anchor_x = i64::from(overlay.x);
    let left = match style.text_align {
        TextAlign::Left => Some(anchor_x),
        TextAlign::Center => anchor_x.checked_sub(text_width / 2),
        TextAlign::Right => anchor_x.checked_sub(text_width),
    }?;
    let top = i64::from(overlay.y);
    left.checked_add(width)?;
    top.checked_add(height)?;

    let lines = measured
        .into_iter()
        .map(|(text, line_width)| LaidOutLine {
            text,
            offset: match style.text_align {
                TextAlign::Left => 0,
                TextAlign::Center => (text_width - line_width) / 2,
                TextAlign::Right => text_width - line_width,
            },
        })
        .collect();

    Some(TextLayout {
        left,
        top,
        width,
        height,
        scale,
        cell,
        line_height,
        bold_extra,
        italic,
        lines,
    })
}

/// Draws one overlay onto `canvas` with source-over blending; pixels outside the
/// canvas are clipped before any coverage is computed.
pub(crate) fn draw_overlay(canvas: &mut RgbaImage, overlay: &TextOverlay) {
    let alpha = opacity_to_alpha(overlay.style.opacity);
    if alpha == 0 {
        return;
    }
    let Some(layout) = layout_text(overlay) else {
        tracing::debug!(id = overlay.id, "text overlay has no drawable layout");
        return;
    };
    let canvas_rect = PixelRect {
        left: 0,
        top: 0,
        right: i64::from(canvas.width()),
        bottom: i64::from(canvas.height()),
    };
    let Some((area, mask)) = layout.rasterize(canvas_rect) else {
        return;
    };

    let area_width = area.width();
    for (index, covered) in (0_i64..).zip(mask) {
        if !covered {
            continue;
        }
        let x = area.left + index % area_width;
        let y = area.top + index / area_width;
        // `area` lies inside the canvas, so both coordinates fit in u32.
        let pixel = canvas.get_pixel_mut(x as u32, y as u32);
        *pixel = blend_over(*pixel, overlay.style.color, alpha);
    }
}

fn opacity_to_alpha(opacity: u8) -> u8 {
    let opacity = u32::from(opacity.min(OPACITY_MAX));
    ((opacity * 255 + 50) / 100) as u8
}

fn blend_over(dst: Rgba<u8>, color: Color, alpha: u8) -> Rgba<u8> {
    let src_alpha = u32::from(alpha);
    let dst_alpha = u32::from(dst.0[3]) * (255 - src_alpha);
    let out_alpha = src_alpha * 255 + dst_alpha;
    if out_alpha == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |src: u8, dst: u8| {
        let value = u32::from(src) * src_alpha * 255 + u32::from(dst) * dst_alpha;
        ((value + out_alpha / 2) / out_alpha) as u8
    };
    let (r, g, b) = color.rgb();
    Rgba([
        channel(r, dst.0[0]),
        channel(g, dst.0[1]),
        channel(b, dst.0[2]),
        ((out_alpha + 127) / 255) as u8,
    ])
}
