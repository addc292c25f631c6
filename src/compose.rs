// Flatten the scratch surface over the reveal content into a window frame.
// Visual: erased pixels show the reveal image, untouched pixels show the cover,
// partially erased ones (bitmap brush edges, fade-out) are mixed in linear light.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::gamma::GammaLut;
use crate::surface::Surface;
use crate::types::FrameBuffer;

/// Shown while the cover is still loading (or never loaded).
pub const PLACEHOLDER: u32 = 0x00_20_20_20;

/// Scale the reveal content to the card's logical size once, up front.
pub fn fit_reveal(reveal: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if reveal.dimensions() == (width, height) {
        return reveal.clone();
    }
    imageops::resize(reveal, width, height, FilterType::Triangle)
}

/// Draw the card into `out`. `reveal` must already match `out`'s size.
/// The surface (raster size) is sampled nearest-neighbour down to logical size.
/// `opacity` scales the whole cover (1 = opaque, 0 = hidden).
pub fn present(
    out: &mut FrameBuffer,
    surface: Option<&Surface>,
    reveal: &RgbaImage,
    opacity: f32,
    lut: &GammaLut,
) {
    let Some(surface) = surface else {
        // Nothing is visible until the cover is ready, not even the reveal content
        out.pixels.fill(PLACEHOLDER);
        return;
    };

    let (sw, sh) = (surface.width() as usize, surface.height() as usize);
    let opacity = opacity.clamp(0.0, 1.0);

    for y in 0..out.height {
        let sy = (y * sh / out.height.max(1)).min(sh.saturating_sub(1));
        for x in 0..out.width {
            let sx = (x * sw / out.width.max(1)).min(sw.saturating_sub(1));
            let under = reveal.get_pixel(x as u32, y as u32);
            let over = surface.pixels().get_pixel(sx as u32, sy as u32);

            let a = over[3] as f32 / 255.0 * opacity;
            let r = lut.mix(under[0], over[0], a) as u32;
            let g = lut.mix(under[1], over[1], a) as u32;
            let b = lut.mix(under[2], over[2], a) as u32;
            out.pixels[y * out.width + x] = (r << 16) | (g << 8) | b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_placeholder_until_loaded() {
        let mut out = FrameBuffer::new(4, 4);
        let reveal = RgbaImage::from_pixel(4, 4, Rgba([255, 215, 0, 255]));
        present(&mut out, None, &reveal, 1.0, &GammaLut::new());
        assert!(out.pixels.iter().all(|&p| p == PLACEHOLDER));
    }

    #[test]
    fn test_erased_pixels_show_reveal() {
        let lut = GammaLut::new();
        let cover = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]));
        // Quality 2: the surface is twice the logical size
        let mut surface = Surface::with_cover(&cover, 8, 8);
        surface.erase_disc(0.0, 0.0, 4.0);
        let reveal = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));

        let mut out = FrameBuffer::new(4, 4);
        present(&mut out, Some(&surface), &reveal, 1.0, &lut);
        assert_eq!(out.pixels[0], 0x00_FF_00_00);
        assert_eq!(out.pixels[15], 0x00_00_00_FF);

        // Fully faded: reveal everywhere
        present(&mut out, Some(&surface), &reveal, 0.0, &lut);
        assert!(out.pixels.iter().all(|&p| p == 0x00_FF_00_00));
    }
}
