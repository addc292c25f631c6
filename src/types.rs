// Core value types shared by the tracker, the eraser and the coverage counter.

use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

/// Surface-local position, already multiplied by the quality factor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to `other`.
    pub fn distance_to(self, other: Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    /// Direction to `other` as `atan2(dx, dy)`: 0 points down the y axis,
    /// so stepping uses `sin` for x and `cos` for y.
    pub fn angle_to(self, other: Point) -> f64 {
        (other.x - self.x).atan2(other.y - self.y)
    }
}

/// Rectangle of the raster (in raster pixels) that gates completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct CheckZone {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CheckZone {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Intersect with a `width` x `height` raster. `None` when nothing is left.
    pub fn clip(self, width: u32, height: u32) -> Option<CheckZone> {
        let x0 = self.x.min(width);
        let y0 = self.y.min(height);
        let x1 = self.x.saturating_add(self.width).min(width);
        let y1 = self.y.saturating_add(self.height).min(height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(CheckZone { x: x0, y: y0, width: x1 - x0, height: y1 - y0 })
    }
}

impl FromStr for CheckZone {
    type Err = Error;

    /// Parses `X,Y,W,H`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let &[x, y, w, h] = parts.as_slice() else {
            return Err(Error::InvalidConfig(format!("check zone must be X,Y,W,H, got '{s}'")));
        };
        let num = |v: &str| {
            v.parse::<u32>()
                .map_err(|e| Error::InvalidConfig(format!("check zone value '{v}': {e}")))
        };
        Ok(CheckZone::new(num(x)?, num(y)?, num(w)?, num(h)?))
    }
}

/// Bitmap brush settings: where to load it from and the size it is stamped at.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CustomBrush {
    pub image: String,
    pub width: u32,
    pub height: u32,
}

/// Screen-ready frame; each entry is 0x00RRGGBB for minifb.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}
