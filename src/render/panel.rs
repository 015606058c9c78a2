//! Side-by-side comparison panel with per-tile titles.
//!
//! Layout: `[margin | tile 0 | gap | tile 1 | gap | tile 2 | margin]`, each
//! tile topped by a title strip. No axes or ticks are drawn. Titles use the
//! 8×8 bitmap glyphs from `font8x8`, scaled with the tile width.
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{imageops, Rgb, RgbImage};
use serde::Deserialize;

const GLYPH: u32 = 8;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelParams {
    /// Titles for the original, mask and overlay tiles.
    pub titles: [String; 3],
    /// Outer margin and gap between tiles (px).
    pub margin: u32,
    pub background: [u8; 3],
    pub text_color: [u8; 3],
}

impl Default for PanelParams {
    fn default() -> Self {
        Self {
            titles: [
                "Original".to_string(),
                "Mask".to_string(),
                "Overlay".to_string(),
            ],
            margin: 16,
            background: [255, 255, 255],
            text_color: [0, 0, 0],
        }
    }
}

/// Compose same-sized tiles left to right under their titles.
pub fn compose_panel(tiles: &[&RgbImage; 3], params: &PanelParams) -> RgbImage {
    let (tw, th) = tiles[0].dimensions();
    let scale = (tw / (GLYPH * 20)).max(1);
    let title_h = GLYPH * scale + params.margin;
    let width = 4 * params.margin + 3 * tw;
    let height = 2 * params.margin + title_h + th;

    let mut canvas = RgbImage::from_pixel(width, height, Rgb(params.background));
    for (i, (tile, title)) in tiles.iter().zip(params.titles.iter()).enumerate() {
        let x0 = params.margin + i as u32 * (tw + params.margin);
        let y0 = params.margin + title_h;
        imageops::replace(&mut canvas, *tile, x0 as i64, y0 as i64);

        let text_w = title.chars().count() as u32 * GLYPH * scale;
        let tx = x0 + tw.saturating_sub(text_w) / 2;
        draw_text(&mut canvas, title, tx, params.margin, scale, Rgb(params.text_color));
    }
    canvas
}

/// Draw `text` with its top-left corner at (x, y); glyphs outside the
/// canvas are clipped, unknown characters are skipped.
pub fn draw_text(canvas: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let (cw, ch) = canvas.dimensions();
    let advance = GLYPH * scale;
    for (i, c) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(c) else {
            continue;
        };
        let gx = x + i as u32 * advance;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = gx + col * scale + sx;
                        let py = y + row as u32 * scale + sy;
                        if px < cw && py < ch {
                            canvas.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
    }
}
