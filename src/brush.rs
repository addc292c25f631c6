// Brush shapes stamped by the eraser.
// Visual: the round brush clears a hard-edged disc, the bitmap brush clears
// wherever its own alpha is set (soft/ragged edges come from the bitmap).

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::surface::Surface;
use crate::types::CustomBrush;

pub enum Brush {
    /// Circle of `radius` raster pixels.
    Round { radius: f64 },
    /// Bitmap stamped at `spec.width` x `spec.height`. `bitmap` stays `None`
    /// until the image finishes loading; stamping before that does nothing.
    Bitmap { spec: CustomBrush, bitmap: Option<RgbaImage> },
}

impl Brush {
    pub fn new(radius: f64, custom: Option<&CustomBrush>) -> Self {
        match custom {
            Some(spec) => Brush::Bitmap { spec: spec.clone(), bitmap: None },
            None => Brush::Round { radius },
        }
    }

    /// Install the decoded brush image, pre-scaled to its stamp size.
    /// Ignored for the round brush.
    pub fn set_bitmap(&mut self, image: &RgbaImage) {
        if let Brush::Bitmap { spec, bitmap } = self {
            let scaled = if image.dimensions() == (spec.width, spec.height) {
                image.clone()
            } else {
                imageops::resize(image, spec.width, spec.height, FilterType::Triangle)
            };
            *bitmap = Some(scaled);
        }
    }

    pub fn is_ready(&self) -> bool {
        match self {
            Brush::Round { .. } => true,
            Brush::Bitmap { bitmap, .. } => bitmap.is_some(),
        }
    }

    /// Area one stamp can touch, as `(left, top, right, bottom)` offsets from
    /// the stamp point. `None` while the brush cannot erase anything.
    pub fn reach(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Brush::Round { radius } => Some((-radius, -radius, *radius, *radius)),
            // Top-left anchored, and the anchor is rounded
            Brush::Bitmap { bitmap: Some(bitmap), .. } => {
                Some((-0.5, -0.5, bitmap.width() as f64 + 0.5, bitmap.height() as f64 + 0.5))
            }
            Brush::Bitmap { bitmap: None, .. } => None,
        }
    }

    /// Remove cover material at (x, y). Centre of the disc, top-left of the bitmap.
    pub fn stamp(&self, surface: &mut Surface, x: f64, y: f64) {
        match self {
            Brush::Round { radius } => surface.erase_disc(x, y, *radius),
            Brush::Bitmap { bitmap: Some(bitmap), .. } => surface.erase_bitmap(bitmap, x, y),
            Brush::Bitmap { bitmap: None, .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn spec() -> CustomBrush {
        CustomBrush { image: "brush.png".into(), width: 4, height: 4 }
    }

    #[test]
    fn test_bitmap_brush_is_inert_until_loaded() {
        let cover = RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]));
        let mut surface = Surface::with_cover(&cover, 10, 10);
        let mut brush = Brush::new(20.0, Some(&spec()));
        assert!(!brush.is_ready());

        brush.stamp(&mut surface, 2.0, 2.0);
        assert!(surface.pixels().pixels().all(|p| p[3] == 255));

        brush.set_bitmap(&RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        assert!(brush.is_ready());
        brush.stamp(&mut surface, 2.0, 2.0);
        let erased = surface.pixels().pixels().filter(|p| p[3] == 0).count();
        assert_eq!(erased, 16);
    }

    #[test]
    fn test_reach_follows_anchor() {
        assert_eq!(Brush::new(3.0, None).reach(), Some((-3.0, -3.0, 3.0, 3.0)));

        let mut brush = Brush::new(3.0, Some(&spec()));
        assert_eq!(brush.reach(), None);
        brush.set_bitmap(&RgbaImage::new(4, 4));
        assert_eq!(brush.reach(), Some((-0.5, -0.5, 4.5, 4.5)));
    }

    #[test]
    fn test_round_brush_ignores_bitmap() {
        let mut brush = Brush::new(5.0, None);
        brush.set_bitmap(&RgbaImage::new(2, 2));
        assert!(matches!(brush, Brush::Round { radius } if radius == 5.0));
        assert!(brush.is_ready());
    }
}
