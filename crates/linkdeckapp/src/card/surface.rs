use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use super::font::FontFace;
use crate::error::Result;

/// An owned drawing surface.
///
/// Callers lay out in logical pixels; the surface multiplies by its `scale`
/// (the clamped device pixel ratio) when it touches the backing image.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
    logical_width: u32,
    logical_height: u32,
    scale: f32,
}

impl Surface {
    pub fn new(logical_width: u32, logical_height: u32, scale: f32) -> Self {
        let physical = |v: u32| (v as f32 * scale).round() as u32;
        Self {
            image: RgbaImage::new(physical(logical_width), physical(logical_height)),
            logical_width,
            logical_height,
            scale,
        }
    }

    pub fn square(pixel_size: u32) -> Self {
        Self::new(pixel_size, pixel_size, 1.0)
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
        let (x0, y0) = self.to_physical(x, y);
        let (x1, y1) = self.to_physical(x + width, y + height);
        let (w, h) = self.image.dimensions();
        for py in y0.max(0)..y1.min(h as i64) {
            for px in x0.max(0)..x1.min(w as i64) {
                self.image.put_pixel(px as u32, py as u32, color);
            }
        }
    }

    /// Copies `src` (already at physical resolution) with its top-left at logical `(x, y)`.
    pub fn blit(&mut self, src: &Surface, x: f32, y: f32) {
        let (ox, oy) = self.to_physical(x, y);
        let (w, h) = self.image.dimensions();
        for (sx, sy, pixel) in src.image.enumerate_pixels() {
            let tx = ox + sx as i64;
            let ty = oy + sy as i64;
            if tx >= 0 && ty >= 0 && tx < w as i64 && ty < h as i64 {
                self.image.put_pixel(tx as u32, ty as u32, *pixel);
            }
        }
    }

    /// Draws one line of text centered on `center_x`, vertically centered in the
    /// slot that starts at `slot_top` and is `slot_height` tall. Logical units.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text_centered(
        &mut self,
        face: &FontFace,
        text: &str,
        center_x: f32,
        slot_top: f32,
        slot_height: f32,
        font_px: f32,
        color: Rgba<u8>,
    ) {
        let px = font_px * self.scale;
        let (ascent, descent) = face.v_metrics(px);
        let text_width = face.measure(text, px);
        let slot_top = slot_top * self.scale;
        let slot_height = slot_height * self.scale;

        let left = center_x * self.scale - text_width / 2.0;
        let baseline = slot_top + (slot_height - (ascent - descent)) / 2.0 + ascent;
        face.draw(&mut self.image, text, left, baseline, px, color);
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(self.image.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    fn to_physical(&self, x: f32, y: f32) -> (i64, i64) {
        (
            (x * self.scale).round() as i64,
            (y * self.scale).round() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_scale_multiplies_physical_size() {
        let surface = Surface::new(100, 50, 2.0);
        assert_eq!(surface.logical_size(), (100, 50));
        assert_eq!(surface.pixel_size(), (200, 100));
    }

    #[test]
    fn test_fill_rect_uses_logical_coordinates() {
        let mut surface = Surface::new(10, 10, 2.0);
        surface.fill(WHITE);
        surface.fill_rect(1.0, 1.0, 2.0, 2.0, RED);
        assert_eq!(*surface.image().get_pixel(2, 2), RED);
        assert_eq!(*surface.image().get_pixel(5, 5), RED);
        assert_eq!(*surface.image().get_pixel(6, 6), WHITE);
        assert_eq!(*surface.image().get_pixel(1, 1), WHITE);
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut surface = Surface::new(4, 4, 1.0);
        surface.fill_rect(-10.0, -10.0, 100.0, 100.0, RED);
        assert!(surface.image().pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_blit_places_source_at_offset() {
        let mut target = Surface::new(8, 8, 1.0);
        target.fill(WHITE);
        let mut src = Surface::square(2);
        src.fill(RED);
        target.blit(&src, 7.0, 7.0);
        assert_eq!(*target.image().get_pixel(7, 7), RED);
        assert_eq!(*target.image().get_pixel(6, 6), WHITE);
    }

    #[test]
    fn test_png_signature() {
        let surface = Surface::square(3);
        let png = surface.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
