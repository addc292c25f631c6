// Pointer tracker: raw mouse/touch input -> surface-local points -> stroke segments.
// Visual: the stroke lines up with the on-screen cursor no matter where the card
// sits on the page, how far the page is scrolled, or what the quality factor is.

use crate::types::Point;

/// Where the surface currently sits on screen, in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceGeometry {
    /// Bounding rectangle offset of the surface.
    pub left: f64,
    pub top: f64,
    /// Page scroll offset.
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl SurfaceGeometry {
    pub const fn at(left: f64, top: f64) -> Self {
        Self { left, top, scroll_x: 0.0, scroll_y: 0.0 }
    }
}

/// One raw pointer sample.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    /// Mouse, page coordinates.
    Mouse { page_x: f64, page_y: f64 },
    /// Touch, client coordinates of every active touch. Only the first is used.
    Touch { touches: Vec<(f64, f64)> },
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    Down(PointerInput),
    Move(PointerInput),
    Up,
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Drawing,
}

/// Path between two consecutive samples, ready to be stamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub distance: f64,
    /// `atan2(dx, dy)`
    pub angle: f64,
}

impl Segment {
    pub fn between(from: Point, to: Point) -> Self {
        Self { from, to, distance: from.distance_to(to), angle: from.angle_to(to) }
    }
}

#[derive(Debug)]
pub struct Tracker {
    mode: Mode,
    last_point: Option<Point>,
    quality: f64,
    geometry: SurfaceGeometry,
}

impl Tracker {
    pub fn new(quality: f64) -> Self {
        Self { mode: Mode::Idle, last_point: None, quality, geometry: SurfaceGeometry::default() }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    pub fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.geometry = geometry;
    }

    pub fn set_quality(&mut self, quality: f64) {
        self.quality = quality;
    }

    /// Map a raw sample to surface-local, quality-scaled coordinates.
    /// A touch event without an active touch carries no position.
    pub fn locate(&self, input: &PointerInput) -> Option<Point> {
        let g = &self.geometry;
        let (x, y) = match input {
            PointerInput::Mouse { page_x, page_y } => (*page_x, *page_y),
            PointerInput::Touch { touches } => *touches.first()?,
        };
        Some(Point::new(
            (x - g.left - g.scroll_x) * self.quality,
            (y - g.top - g.scroll_y) * self.quality,
        ))
    }

    /// Feed one event. Returns the segment to stamp for moves while drawing.
    /// `last_point` is advanced to the segment end before returning.
    pub fn handle(&mut self, event: &PointerEvent) -> Option<Segment> {
        match event {
            PointerEvent::Down(input) => {
                self.mode = Mode::Drawing;
                // Without a sample the next move starts a fresh stroke
                self.last_point = self.locate(input);
                None
            }
            PointerEvent::Move(input) => {
                if self.mode != Mode::Drawing {
                    return None;
                }
                let current = self.locate(input)?;
                let segment = match self.last_point {
                    Some(from) => Segment::between(from, current),
                    None => Segment { from: current, to: current, distance: 0.0, angle: 0.0 },
                };
                self.last_point = Some(current);
                Some(segment)
            }
            PointerEvent::Up | PointerEvent::Leave => {
                self.mode = Mode::Idle;
                None
            }
        }
    }

    /// Forget the stroke in progress: back to idle with no last point.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.last_point = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(x: f64, y: f64) -> PointerInput {
        PointerInput::Mouse { page_x: x, page_y: y }
    }

    #[test]
    fn test_locate_applies_offset_scroll_and_quality() {
        let mut t = Tracker::new(2.0);
        t.set_geometry(SurfaceGeometry { left: 10.0, top: 20.0, scroll_x: 5.0, scroll_y: 0.0 });
        assert_eq!(t.locate(&mouse(25.0, 30.0)), Some(Point::new(20.0, 20.0)));

        let touch = PointerInput::Touch { touches: vec![(15.0, 40.0), (99.0, 99.0)] };
        assert_eq!(t.locate(&touch), Some(Point::new(0.0, 40.0)));
        assert_eq!(t.locate(&PointerInput::Touch { touches: vec![] }), None);
    }

    #[test]
    fn test_touch_without_touches_is_not_a_sample() {
        let no_touch = || PointerInput::Touch { touches: vec![] };
        let mut t = Tracker::new(1.0);

        t.handle(&PointerEvent::Down(PointerInput::Touch { touches: vec![(290.0, 140.0)] }));
        assert_eq!(t.handle(&PointerEvent::Move(no_touch())), None);
        assert_eq!(t.mode(), Mode::Drawing);
        assert_eq!(t.last_point(), Some(Point::new(290.0, 140.0)));

        // The stroke carries on from the last real sample
        let seg = t.handle(&PointerEvent::Move(mouse(290.0, 130.0))).unwrap();
        assert_eq!(seg.from, Point::new(290.0, 140.0));
        assert_eq!(seg.distance, 10.0);

        // A sample-less down starts drawing without an anchor
        t.handle(&PointerEvent::Up);
        t.handle(&PointerEvent::Down(no_touch()));
        assert_eq!(t.mode(), Mode::Drawing);
        assert_eq!(t.last_point(), None);
        let seg = t.handle(&PointerEvent::Move(mouse(4.0, 4.0))).unwrap();
        assert_eq!(seg.distance, 0.0);
    }

    #[test]
    fn test_moves_only_count_while_drawing() {
        let mut t = Tracker::new(1.0);
        assert_eq!(t.handle(&PointerEvent::Move(mouse(5.0, 5.0))), None);
        assert_eq!(t.last_point(), None);

        t.handle(&PointerEvent::Down(mouse(0.0, 0.0)));
        assert_eq!(t.mode(), Mode::Drawing);

        let seg = t.handle(&PointerEvent::Move(mouse(3.0, 4.0))).unwrap();
        assert_eq!(seg.from, Point::new(0.0, 0.0));
        assert_eq!(seg.to, Point::new(3.0, 4.0));
        assert_eq!(seg.distance, 5.0);
        assert_eq!(t.last_point(), Some(Point::new(3.0, 4.0)));

        t.handle(&PointerEvent::Up);
        assert_eq!(t.mode(), Mode::Idle);
        // Kept until the next down or a reset
        assert_eq!(t.last_point(), Some(Point::new(3.0, 4.0)));
        assert_eq!(t.handle(&PointerEvent::Move(mouse(9.0, 9.0))), None);

        t.handle(&PointerEvent::Down(mouse(1.0, 1.0)));
        t.handle(&PointerEvent::Leave);
        assert_eq!(t.mode(), Mode::Idle);

        t.reset();
        assert_eq!(t.last_point(), None);
    }
}
