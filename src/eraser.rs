// Eraser rasterizer: walks a stroke segment one raster unit at a time and
// stamps the brush at every step, so fast strokes leave no gaps under a round
// or bitmap brush the way a single line primitive would.

use crate::brush::Brush;
use crate::surface::Surface;
use crate::tracker::Segment;

/// Stamp `brush` along `segment`. Returns the number of stamps issued.
/// Steps whose stamp could not reach the raster are skipped.
pub fn stroke(surface: &mut Surface, brush: &Brush, segment: &Segment) -> usize {
    if !segment.distance.is_finite() {
        return 0;
    }
    let Some(reach) = brush.reach() else {
        return 0;
    };
    let (sin, cos) = segment.angle.sin_cos();
    let Some((first, last)) = steps_on_raster(surface, reach, segment, sin, cos) else {
        return 0;
    };

    let mut stamps = 0;
    let mut i = first;
    while i < segment.distance && i <= last {
        let x = segment.from.x + sin * i;
        let y = segment.from.y + cos * i;
        brush.stamp(surface, x, y);
        stamps += 1;
        i += 1.0;
    }
    stamps
}

/// Range of whole steps `i` for which a stamp at `from + (sin, cos) * i` can
/// touch the raster. `None` when the segment never comes close enough.
fn steps_on_raster(
    surface: &Surface,
    (left, top, right, bottom): (f64, f64, f64, f64),
    segment: &Segment,
    sin: f64,
    cos: f64,
) -> Option<(f64, f64)> {
    let (w, h) = (surface.width() as f64, surface.height() as f64);
    let mut t0 = 0.0f64;
    let mut t1 = segment.distance;

    // Stamp points that can reach the raster lie in [lo, hi] on each axis
    for (from, step, lo, hi) in [(segment.from.x, sin, -right, w - left), (segment.from.y, cos, -bottom, h - top)] {
        if step.abs() < 1e-12 {
            if from < lo || from > hi {
                return None;
            }
            continue;
        }
        let (a, b) = ((lo - from) / step, (hi - from) / step);
        t0 = t0.max(a.min(b));
        t1 = t1.min(a.max(b));
    }
    if t0 > t1 {
        return None;
    }
    // Whole steps keep stamps where the unclipped walk would put them
    Some((t0.ceil(), t1))
}
