// The scratchable raster: an RGBA copy of the cover that only ever loses alpha.
// Visual: where alpha reaches 0 the reveal content underneath shows through.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// Allocate a `width` x `height` raster with `cover` drawn scaled to fill it.
    pub fn with_cover(cover: &RgbaImage, width: u32, height: u32) -> Self {
        let mut surface = Self { pixels: RgbaImage::new(width, height) };
        surface.redraw(cover);
        surface
    }

    /// Throw away every stroke and paint the cover again.
    pub fn redraw(&mut self, cover: &RgbaImage) {
        let (w, h) = self.pixels.dimensions();
        self.pixels = if cover.dimensions() == (w, h) {
            cover.clone()
        } else {
            imageops::resize(cover, w, h, FilterType::Triangle)
        };
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Destination-out with a solid disc centred at (cx, cy).
    /// Pixels whose centre lies inside the radius lose all alpha.
    pub fn erase_disc(&mut self, cx: f64, cy: f64, radius: f64) {
        if radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let (w, h) = self.pixels.dimensions();
        let rr = radius * radius;

        // Scan just the bounding box, clipped to the raster
        let x0 = (cx - radius).floor().max(0.0) as u32;
        let y0 = (cy - radius).floor().max(0.0) as u32;
        let x1 = ((cx + radius).ceil().max(0.0) as u32).min(w);
        let y1 = ((cy + radius).ceil().max(0.0) as u32).min(h);

        for py in y0..y1 {
            let dy = py as f64 + 0.5 - cy;
            for px in x0..x1 {
                let dx = px as f64 + 0.5 - cx;
                if dx * dx + dy * dy <= rr {
                    erase_pixel(self.pixels.get_pixel_mut(px, py), 255);
                }
            }
        }
    }

    /// Destination-out with a bitmap whose top-left corner lands at (x, y).
    /// Each raster pixel keeps `1 - brush alpha` of its alpha.
    pub fn erase_bitmap(&mut self, brush: &RgbaImage, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let (w, h) = (self.pixels.width() as i64, self.pixels.height() as i64);
        let ox = x.round() as i64;
        let oy = y.round() as i64;

        for (bx, by, bp) in brush.enumerate_pixels() {
            let sx = ox + bx as i64;
            let sy = oy + by as i64;
            if sx < 0 || sy < 0 || sx >= w || sy >= h {
                continue;
            }
            let a = bp[3];
            if a == 0 {
                continue;
            }
            erase_pixel(self.pixels.get_pixel_mut(sx as u32, sy as u32), a);
        }
    }
}

/// 8-bit multiply with rounding, a*b/255.
fn u8_mult(a: u32, b: u32) -> u32 {
    let c = a * b + 0x80;
    ((c >> 8) + c) >> 8
}

/// Remove `strength` (0..255) worth of alpha. Fully erased pixels become
/// transparent black so they read back as all-zero bytes.
fn erase_pixel(px: &mut Rgba<u8>, strength: u8) {
    let keep = 255 - strength as u32;
    let a = u8_mult(px[3] as u32, keep);
    if a == 0 {
        *px = Rgba([0, 0, 0, 0]);
    } else {
        px[3] = a as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([200, 180, 160, 255]))
    }

    fn transparent_count(s: &Surface) -> usize {
        s.pixels().pixels().filter(|p| p[3] == 0).count()
    }

    #[test]
    fn test_cover_is_scaled_to_fill() {
        let cover = opaque(10, 5);
        let s = Surface::with_cover(&cover, 40, 20);
        assert_eq!((s.width(), s.height()), (40, 20));
        assert!(s.pixels().pixels().all(|p| p[3] >= 250));
    }

    #[test]
    fn test_erase_disc() {
        let mut s = Surface::with_cover(&opaque(100, 100), 100, 100);
        s.erase_disc(50.0, 50.0, 10.0);

        assert_eq!(*s.pixels().get_pixel(50, 50), Rgba([0, 0, 0, 0]));
        assert_eq!(s.pixels().get_pixel(50, 70)[3], 255);

        // Roughly pi * r^2
        let n = transparent_count(&s);
        assert!((300..=330).contains(&n), "erased {n}");
    }

    #[test]
    fn test_erase_disc_clips() {
        let mut s = Surface::with_cover(&opaque(20, 20), 20, 20);
        s.erase_disc(-5.0, -5.0, 8.0);
        s.erase_disc(1000.0, 1000.0, 8.0);
        s.erase_disc(f64::NAN, 3.0, 8.0);
        assert_eq!(*s.pixels().get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(s.pixels().get_pixel(19, 19)[3], 255);
    }

    #[test]
    fn test_erase_bitmap_uses_brush_alpha() {
        let mut s = Surface::with_cover(&opaque(10, 10), 10, 10);
        let brush = RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => Rgba([1, 2, 3, 255]),
            1 => Rgba([1, 2, 3, 128]),
            _ => Rgba([1, 2, 3, 0]),
        });
        s.erase_bitmap(&brush, 2.0, 2.0);

        assert_eq!(*s.pixels().get_pixel(2, 2), Rgba([0, 0, 0, 0]));
        assert_eq!(s.pixels().get_pixel(3, 2)[3], 127);
        assert_eq!(s.pixels().get_pixel(4, 2)[3], 255);
    }

    #[test]
    fn test_erase_never_adds_alpha() {
        let mut s = Surface::with_cover(&opaque(10, 10), 10, 10);
        let half = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 128]));
        s.erase_bitmap(&half, 0.0, 0.0);
        let after_one = s.pixels().get_pixel(5, 5)[3];
        s.erase_bitmap(&half, 0.0, 0.0);
        let after_two = s.pixels().get_pixel(5, 5)[3];
        assert!(after_two < after_one && after_one < 255);
    }

    #[test]
    fn test_redraw_restores_cover() {
        let cover = opaque(30, 30);
        let mut s = Surface::with_cover(&cover, 30, 30);
        s.erase_disc(15.0, 15.0, 30.0);
        assert_eq!(transparent_count(&s), 900);
        s.redraw(&cover);
        assert_eq!(transparent_count(&s), 0);
    }
}
