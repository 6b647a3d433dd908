//! Card layout math.
//!
//! Everything here is in logical pixels and expressed as fractions of the card
//! height, top to bottom:
//!
//! ```text
//! ┌──────────────────────────────┐  ─┬─ padding  (6% of height)
//! │        Wrapped title         │   │  lines × 1.2 × title px (6% of height)
//! │        second line           │  ─┴─ gap      (3% of height)
//! │      ┌──────────────┐        │
//! │      │   QR  box    │        │   qr box = min(width − 2·padding, 46% of height)
//! │      └──────────────┘        │  ─── gap
//! │     example.com/wrapped      │   lines × 1.2 × url px (3.8% of height)
//! └──────────────────────────────┘
//! ```
//!
//! Lines wrap greedily on whitespace to the padding-to-padding width. A word
//! wider than that on its own (long URLs, mostly) is broken between characters.

use super::font::FontFace;

pub const PADDING_RATIO: f32 = 0.06;
pub const GAP_RATIO: f32 = 0.03;
pub const TITLE_RATIO: f32 = 0.06;
pub const URL_RATIO: f32 = 0.038;
pub const QR_RATIO: f32 = 0.46;
pub const LINE_HEIGHT: f32 = 1.2;
/// Margin between the QR box edge and the code itself, split evenly on both sides.
pub const QR_INSET: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub gap: f32,
    pub title_px: f32,
    pub url_px: f32,
    pub title_lines: Vec<String>,
    pub url_lines: Vec<String>,
    pub title_top: f32,
    pub qr_box: f32,
    pub qr_top: f32,
    pub url_top: f32,
}

impl CardLayout {
    pub fn compute(face: &FontFace, width: u32, height: u32, title: &str, url_text: &str) -> Self {
        let width = width as f32;
        let height = height as f32;
        let padding = height * PADDING_RATIO;
        let gap = height * GAP_RATIO;
        let title_px = height * TITLE_RATIO;
        let url_px = height * URL_RATIO;
        let text_width = width - 2.0 * padding;
        let qr_box = text_width.min(height * QR_RATIO);

        let title_lines = wrap_text(face, title, title_px, text_width);
        let url_lines = wrap_text(face, url_text, url_px, text_width);

        let title_top = padding;
        let qr_top = title_top + title_lines.len() as f32 * title_px * LINE_HEIGHT + gap;
        let url_top = qr_top + qr_box + gap;

        Self {
            width,
            height,
            padding,
            gap,
            title_px,
            url_px,
            title_lines,
            url_lines,
            title_top,
            qr_box,
            qr_top,
            url_top,
        }
    }

    /// Side of the QR code proper, in logical pixels.
    pub fn qr_size(&self) -> f32 {
        (self.qr_box - QR_INSET).max(0.0)
    }

    pub fn qr_left(&self) -> f32 {
        (self.width - self.qr_box) / 2.0
    }
}

pub fn wrap_text(face: &FontFace, text: &str, px: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        for piece in break_word(face, word, px, max_width) {
            let candidate = if line.is_empty() {
                piece.clone()
            } else {
                format!("{} {}", line, piece)
            };
            if line.is_empty() || face.measure(&candidate, px) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::take(&mut line));
                line = piece;
            }
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Splits a word wider than `max_width` into chunks that fit. Each chunk keeps
/// at least one character so the wrap always makes progress.
fn break_word(face: &FontFace, word: &str, px: f32, max_width: f32) -> Vec<String> {
    if face.measure(word, px) <= max_width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && face.measure(&piece, px) > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
