//! QR code rendering for cards.
//!
//! The bit matrix comes from the `qrcode` crate at error-correction level M.
//! This module only paints it: dark modules in `#111111` on white, with a
//! two-module quiet zone, scaled with nearest-neighbour sampling to exactly the
//! requested pixel size.
//!
//! Encoding never fails from the caller's point of view. Input the QR standard
//! cannot hold (too long for version 40) produces a blank white square and a
//! warning in the log, so one oversized URL cannot abort a batch of cards.

use image::Rgba;
use qrcode::{Color, EcLevel, QrCode};
use tracing::warn;

use crate::card::Surface;

pub const QR_DARK: Rgba<u8> = Rgba([0x11, 0x11, 0x11, 0xff]);
pub const QR_LIGHT: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
pub const QUIET_ZONE_MODULES: usize = 2;

/// Renders `data` as a `pixel_size` × `pixel_size` QR surface.
pub fn encode(data: &str, pixel_size: u32) -> Surface {
    let mut surface = Surface::square(pixel_size);
    surface.fill(QR_LIGHT);

    let code = match QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M) {
        Ok(code) => code,
        Err(e) => {
            warn!(error = %e, len = data.len(), "QR encode failed, leaving the code blank");
            return surface;
        }
    };

    if pixel_size == 0 {
        return surface;
    }

    let width = code.width();
    let colors = code.to_colors();
    let total = width + 2 * QUIET_ZONE_MODULES;
    let size = pixel_size as usize;

    let image = surface.image_mut();
    for py in 0..size {
        let my = py * total / size;
        if my < QUIET_ZONE_MODULES || my >= width + QUIET_ZONE_MODULES {
            continue;
        }
        let row = (my - QUIET_ZONE_MODULES) * width;
        for px in 0..size {
            let mx = px * total / size;
            if mx < QUIET_ZONE_MODULES || mx >= width + QUIET_ZONE_MODULES {
                continue;
            }
            if colors[row + mx - QUIET_ZONE_MODULES] == Color::Dark {
                image.put_pixel(px as u32, py as u32, QR_DARK);
            }
        }
    }

    surface
}
