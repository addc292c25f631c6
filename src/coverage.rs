// Coverage evaluator: how much of the check zone has been scratched away.

use image::RgbaImage;

use crate::types::CheckZone;

/// Byte stride used after every stroke and by the owner-facing handle.
pub const DEFAULT_STRIDE: usize = 32;

const BYTES_PER_PIXEL: usize = 4;
const ALPHA_CHANNEL: usize = 3;

/// Percentage (0..=100, rounded) of samples in `zone` whose alpha is exactly 0.
///
/// The zone's RGBA bytes are walked at `stride` byte steps; each step tests the
/// alpha byte of the pixel it falls in. A stride of 0 is treated as 1.
/// `zone` defaults to the whole raster and is clipped to it; an empty zone
/// yields 0.
pub fn filled_in_pixels(pixels: &RgbaImage, zone: Option<CheckZone>, stride: usize) -> u32 {
    let stride = stride.max(1);
    let (w, h) = pixels.dimensions();
    let zone = zone.unwrap_or(CheckZone::new(0, 0, w, h));
    let Some(zone) = zone.clip(w, h) else {
        return 0;
    };

    let row_bytes = zone.width as usize * BYTES_PER_PIXEL;
    let len = row_bytes * zone.height as usize;
    let raw = pixels.as_raw();
    let raster_row = w as usize * BYTES_PER_PIXEL;

    let mut samples = 0usize;
    let mut count = 0usize;
    for offset in (0..len).step_by(stride) {
        let row = offset / row_bytes;
        let col = (offset % row_bytes) / BYTES_PER_PIXEL;
        let idx = (zone.y as usize + row) * raster_row
            + (zone.x as usize + col) * BYTES_PER_PIXEL
            + ALPHA_CHANNEL;
        samples += 1;
        if raw[idx] == 0 {
            count += 1;
        }
    }

    if samples == 0 {
        return 0;
    }
    ((count as f64 / samples as f64) * 100.0).round() as u32
}
