//! # Cards
//!
//! A card is a PNG with a wrapped title, a QR code and the wrapped URL, drawn
//! at one of three fixed size tiers:
//!
//! | size   | portrait    | landscape   |
//! |--------|-------------|-------------|
//! | small  | 600 × 900   | 900 × 600   |
//! | medium | 900 × 1350  | 1350 × 900  |
//! | large  | 1200 × 1800 | 1800 × 1200 |
//!
//! Layout happens in these logical pixels. The pixel ratio (clamped to
//! `1.0..=2.0`) only scales the backing image, see [`Surface`].
//!
//! Every call to [`render`] allocates its own surface and hands it back by
//! value; nothing is shared between renders, which is what lets a batch export
//! loop over records without any reset step.
//!
//! The font is resolved before layout starts ([`font::FontFace::load`]), so
//! wrap points are measured with the face that is actually drawn.

pub mod font;
pub mod layout;
mod surface;

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use tracing::debug;

use crate::error::{LinkDeckError, Result};
use crate::normalize::{cosmetic_normalize, display_url};
use crate::qr::{self, QR_LIGHT};
use font::FontFace;
use layout::{CardLayout, LINE_HEIGHT, QR_INSET};

pub use surface::Surface;

pub const MIN_PIXEL_RATIO: f32 = 1.0;
pub const MAX_PIXEL_RATIO: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl CardSize {
    pub const ALL: [CardSize; 3] = [CardSize::Small, CardSize::Medium, CardSize::Large];

    /// Portrait `(width, height)` in logical pixels.
    pub fn base_dimensions(self) -> (u32, u32) {
        match self {
            CardSize::Small => (600, 900),
            CardSize::Medium => (900, 1350),
            CardSize::Large => (1200, 1800),
        }
    }
}

impl FromStr for CardSize {
    type Err = LinkDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "s" => Ok(CardSize::Small),
            "medium" | "m" => Ok(CardSize::Medium),
            "large" | "l" => Ok(CardSize::Large),
            other => Err(LinkDeckError::InvalidValue(format!(
                "unknown card size '{}' (expected small, medium or large)",
                other
            ))),
        }
    }
}

impl fmt::Display for CardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CardSize::Small => "small",
            CardSize::Medium => "medium",
            CardSize::Large => "large",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = LinkDeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            other => Err(LinkDeckError::InvalidValue(format!(
                "unknown orientation '{}' (expected portrait or landscape)",
                other
            ))),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        })
    }
}

/// An opaque RGB color, written `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.0, self.1, self.2, 0xff])
    }
}

impl FromStr for Rgb {
    type Err = LinkDeckError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || LinkDeckError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Ok(Rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardTheme {
    pub background: Rgb,
    pub title_color: Rgb,
    pub url_color: Rgb,
    pub font: String,
}

impl Default for CardTheme {
    fn default() -> Self {
        Self {
            background: Rgb(0xff, 0xff, 0xff),
            title_color: Rgb(0x11, 0x11, 0x11),
            url_color: Rgb(0x44, 0x44, 0x44),
            font: "sans-serif".to_string(),
        }
    }
}

/// Everything one render needs. Built per call and dropped afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRenderOptions {
    pub title: String,
    pub url: String,
    pub size: CardSize,
    pub orientation: Orientation,
    pub theme: CardTheme,
    pixel_ratio: f32,
}

impl CardRenderOptions {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            size: CardSize::default(),
            orientation: Orientation::default(),
            theme: CardTheme::default(),
            pixel_ratio: MIN_PIXEL_RATIO,
        }
    }

    pub fn with_size(mut self, size: CardSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_theme(mut self, theme: CardTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = if ratio.is_finite() {
            ratio.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
        } else {
            MIN_PIXEL_RATIO
        };
        self
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Logical `(width, height)` after applying the orientation.
    pub fn dimensions(&self) -> (u32, u32) {
        let (w, h) = self.size.base_dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Loads the configured font, then renders.
pub fn render(opts: &CardRenderOptions) -> Surface {
    let face = FontFace::load(&opts.theme.font);
    render_with_face(opts, &face)
}

pub fn render_with_face(opts: &CardRenderOptions, face: &FontFace) -> Surface {
    let (width, height) = opts.dimensions();
    let mut surface = Surface::new(width, height, opts.pixel_ratio);
    surface.fill(opts.theme.background.to_rgba());

    let url = cosmetic_normalize(&opts.url);
    let layout = CardLayout::compute(face, width, height, &opts.title, display_url(&url));
    debug!(
        width,
        height,
        scale = opts.pixel_ratio,
        title_lines = layout.title_lines.len(),
        url_lines = layout.url_lines.len(),
        qr_box = layout.qr_box,
        "card layout"
    );

    let center_x = width as f32 / 2.0;

    let title_slot = layout.title_px * LINE_HEIGHT;
    for (i, line) in layout.title_lines.iter().enumerate() {
        surface.draw_text_centered(
            face,
            line,
            center_x,
            layout.title_top + i as f32 * title_slot,
            title_slot,
            layout.title_px,
            opts.theme.title_color.to_rgba(),
        );
    }

    let qr_left = layout.qr_left();
    surface.fill_rect(qr_left, layout.qr_top, layout.qr_box, layout.qr_box, QR_LIGHT);
    let qr_pixels = (layout.qr_size() * surface.scale()).round() as u32;
    let code = qr::encode(&url, qr_pixels);
    surface.blit(
        &code,
        qr_left + QR_INSET / 2.0,
        layout.qr_top + QR_INSET / 2.0,
    );

    let url_slot = layout.url_px * LINE_HEIGHT;
    for (i, line) in layout.url_lines.iter().enumerate() {
        surface.draw_text_centered(
            face,
            line,
            center_x,
            layout.url_top + i as f32 * url_slot,
            url_slot,
            layout.url_px,
            opts.theme.url_color.to_rgba(),
        );
    }

    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::QR_DARK;

    fn builtin_options(title: &str, url: &str) -> CardRenderOptions {
        CardRenderOptions::new(title, url).with_theme(CardTheme {
            font: font::BUILTIN_FAMILY.to_string(),
            ..CardTheme::default()
        })
    }

    #[test]
    fn test_dimensions_for_every_size_and_orientation() {
        let expected = [
            (CardSize::Small, (600, 900)),
            (CardSize::Medium, (900, 1350)),
            (CardSize::Large, (1200, 1800)),
        ];
        for (size, (w, h)) in expected {
            let portrait = builtin_options("T", "a.test").with_size(size);
            assert_eq!(render(&portrait).pixel_size(), (w, h), "{size} portrait");

            let landscape = portrait.with_orientation(Orientation::Landscape);
            assert_eq!(render(&landscape).pixel_size(), (h, w), "{size} landscape");
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let opts = builtin_options("Thai Lessons", "https://example.com/thai")
            .with_size(CardSize::Small);
        let a = render(&opts);
        let b = render(&opts);
        assert_eq!(a.image().as_raw(), b.image().as_raw());
    }

    #[test]
    fn test_background_and_qr_are_painted() {
        let mut opts = builtin_options("Hello", "example.com").with_size(CardSize::Small);
        opts.theme.background = Rgb(0x20, 0x40, 0x60);
        let surface = render(&opts);
        let bg = opts.theme.background.to_rgba();
        assert_eq!(*surface.image().get_pixel(0, 0), bg);
        assert_eq!(*surface.image().get_pixel(599, 899), bg);
        assert!(surface.image().pixels().any(|p| *p == QR_DARK));
        assert!(surface.image().pixels().any(|p| *p == QR_LIGHT));
    }

    #[test]
    fn test_pixel_ratio_scales_backing_image_only() {
        let opts = builtin_options("T", "a.test")
            .with_size(CardSize::Small)
            .with_pixel_ratio(2.0);
        let surface = render(&opts);
        assert_eq!(surface.logical_size(), (600, 900));
        assert_eq!(surface.pixel_size(), (1200, 1800));
    }

    #[test]
    fn test_pixel_ratio_is_clamped() {
        assert_eq!(CardRenderOptions::new("", "").with_pixel_ratio(3.5).pixel_ratio(), 2.0);
        assert_eq!(CardRenderOptions::new("", "").with_pixel_ratio(0.5).pixel_ratio(), 1.0);
        assert_eq!(
            CardRenderOptions::new("", "").with_pixel_ratio(f32::NAN).pixel_ratio(),
            1.0
        );
    }

    #[test]
    fn test_oversized_url_still_renders() {
        let url = format!("https://example.com/{}", "x".repeat(5000));
        let surface = render(&builtin_options("", &url).with_size(CardSize::Small));
        assert_eq!(surface.pixel_size(), (600, 900));
        assert!(!surface.image().pixels().any(|p| *p == QR_DARK));
    }

    #[test]
    fn test_parse_colors() {
        assert_eq!("#fff".parse::<Rgb>().unwrap(), Rgb(255, 255, 255));
        assert_eq!("#11aaFF".parse::<Rgb>().unwrap(), Rgb(0x11, 0xaa, 0xff));
        assert_eq!(Rgb(0x11, 0xaa, 0xff).to_string(), "#11aaff");
        for bad in ["fff", "#ff", "#gggggg", "#1234567", ""] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_parse_size_and_orientation() {
        assert_eq!("Large".parse::<CardSize>().unwrap(), CardSize::Large);
        assert_eq!("m".parse::<CardSize>().unwrap(), CardSize::Medium);
        assert!("huge".parse::<CardSize>().is_err());
        assert_eq!(
            "landscape".parse::<Orientation>().unwrap(),
            Orientation::Landscape
        );
        assert!("sideways".parse::<Orientation>().is_err());
    }
}
