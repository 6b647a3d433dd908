//! Font faces for card text.
//!
//! Text is measured and drawn with the same [`FontFace`], and the face is fully
//! loaded before layout starts, so wrap points always come from the metrics of
//! the font that ends up on the card.
//!
//! Two kinds of face exist:
//!
//! - `Outline`: a TrueType/OpenType face found through the system font
//!   database (`fontdb`) and rasterized with `ab_glyph`. Generic families
//!   (`sans-serif`, `serif`, `monospace`) resolve through fontdb's defaults.
//! - `Builtin`: the public-domain 8×8 bitmap glyphs from `font8x8`, always
//!   available and identical on every machine. Characters it has no glyph for
//!   are drawn as hollow boxes.
//!
//! A family that cannot be found falls back to `Builtin` with a warning.

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use fontdb::{Database, Family, Query};
use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

/// Family name that selects the bitmap face.
pub const BUILTIN_FAMILY: &str = "builtin";

const BITMAP_ADVANCE: f32 = 0.625;
const BITMAP_ASCENT: f32 = 0.875;

pub enum FontFace {
    Builtin,
    Outline(Box<FontVec>),
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontFace::Builtin => f.write_str("FontFace::Builtin"),
            FontFace::Outline(_) => f.write_str("FontFace::Outline(..)"),
        }
    }
}

impl FontFace {
    /// Resolves `family` to a loaded face.
    pub fn load(family: &str) -> Self {
        let family = family.trim();
        if family.is_empty() || family.eq_ignore_ascii_case(BUILTIN_FAMILY) {
            return FontFace::Builtin;
        }
        match load_system_face(family) {
            Some(font) => {
                debug!(family, "loaded system font");
                FontFace::Outline(Box::new(font))
            }
            None => {
                warn!(family, "font family not available, using the built-in face");
                FontFace::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontFace::Builtin)
    }

    /// Advance width of `text` at `px` pixels.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        match self {
            FontFace::Builtin => text.chars().count() as f32 * px * BITMAP_ADVANCE,
            FontFace::Outline(font) => {
                let scaled = font.as_scaled(PxScale::from(px));
                let mut width = 0.0;
                let mut prev: Option<GlyphId> = None;
                for c in text.chars() {
                    let id = scaled.glyph_id(c);
                    if let Some(p) = prev {
                        width += scaled.kern(p, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
        }
    }

    /// `(ascent, descent)` at `px`; descent is negative.
    pub fn v_metrics(&self, px: f32) -> (f32, f32) {
        match self {
            FontFace::Builtin => (px * BITMAP_ASCENT, px * (BITMAP_ASCENT - 1.0)),
            FontFace::Outline(font) => {
                let scaled = font.as_scaled(PxScale::from(px));
                (scaled.ascent(), scaled.descent())
            }
        }
    }

    /// Draws `text` with its left edge at `x` and baseline at `baseline`, in physical pixels.
    pub fn draw(
        &self,
        image: &mut RgbaImage,
        text: &str,
        x: f32,
        baseline: f32,
        px: f32,
        color: Rgba<u8>,
    ) {
        match self {
            FontFace::Builtin => draw_bitmap(image, text, x, baseline, px, color),
            FontFace::Outline(font) => draw_outline(font, image, text, x, baseline, px, color),
        }
    }
}

fn load_system_face(family: &str) -> Option<FontVec> {
    let mut db = Database::new();
    db.load_system_fonts();

    let families = [match family.to_ascii_lowercase().as_str() {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        _ => Family::Name(family),
    }];
    let query = Query {
        families: &families,
        ..Query::default()
    };

    let id = db.query(&query)?;
    let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    FontVec::try_from_vec_and_index(data, index).ok()
}

fn bitmap_glyph(c: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(c).or_else(|| LATIN_FONTS.get(c))
}

/// Hollow box for characters the bitmap font lacks.
const MISSING_GLYPH: [u8; 8] = [0x00, 0x7e, 0x42, 0x42, 0x42, 0x42, 0x7e, 0x00];

fn draw_bitmap(image: &mut RgbaImage, text: &str, x: f32, baseline: f32, px: f32, color: Rgba<u8>) {
    let cell_w = px * BITMAP_ADVANCE;
    let top = baseline - px * BITMAP_ASCENT;
    let (w, h) = image.dimensions();

    for (i, c) in text.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        let glyph = bitmap_glyph(c).unwrap_or(MISSING_GLYPH);
        let left = x + i as f32 * cell_w;
        for (row, bits) in glyph.iter().enumerate() {
            let y0 = (top + row as f32 * px / 8.0).round() as i64;
            let y1 = (top + (row + 1) as f32 * px / 8.0).round() as i64;
            for col in 0..8 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let x0 = (left + col as f32 * cell_w / 8.0).round() as i64;
                let x1 = (left + (col + 1) as f32 * cell_w / 8.0).round() as i64;
                for ty in y0.max(0)..y1.min(h as i64) {
                    for tx in x0.max(0)..x1.min(w as i64) {
                        image.put_pixel(tx as u32, ty as u32, color);
                    }
                }
            }
        }
    }
}

fn draw_outline(
    font: &FontVec,
    image: &mut RgbaImage,
    text: &str,
    x: f32,
    baseline: f32,
    px: f32,
    color: Rgba<u8>,
) {
    let scaled = font.as_scaled(PxScale::from(px));
    let (w, h) = image.dimensions();
    let mut caret = x;
    let mut prev: Option<GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        let glyph = id.with_scale_and_position(px, point(caret, baseline));
        caret += scaled.h_advance(id);
        prev = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let tx = bounds.min.x as i64 + gx as i64;
            let ty = bounds.min.y as i64 + gy as i64;
            if tx < 0 || ty < 0 || tx >= w as i64 || ty >= h as i64 {
                return;
            }
            let dst = image.get_pixel_mut(tx as u32, ty as u32);
            *dst = blend(*dst, color, coverage.clamp(0.0, 1.0));
        });
    }
}

fn blend(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let mix = |d: u8, s: u8| (s as f32 * coverage + d as f32 * (1.0 - coverage)).round() as u8;
    Rgba([
        mix(dst[0], src[0]),
        mix(dst[1], src[1]),
        mix(dst[2], src[2]),
        dst[3].max((coverage * 255.0).round() as u8),
    ])
}
