// Public configuration surface of a scratch card.
// Can be built in code (`ScratchConfig::new(..).with_*`) or read from JSON.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{CheckZone, CustomBrush};

pub const DEFAULT_QUALITY: f64 = 1.0;
pub const DEFAULT_FINISH_PERCENT: u32 = 70;
pub const DEFAULT_BRUSH_SIZE: f64 = 20.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScratchConfig {
    /// Logical display width.
    pub width: u32,
    /// Logical display height.
    pub height: u32,
    /// Cover image source.
    pub image: String,
    /// Raster oversampling multiplier.
    #[serde(default = "default_quality")]
    pub quality: f64,
    /// Coverage (percent) that must be exceeded to complete.
    #[serde(default = "default_finish_percent")]
    pub finish_percent: u32,
    /// Radius of the round brush, in raster pixels.
    #[serde(default = "default_brush_size")]
    pub brush_size: f64,
    #[serde(default)]
    pub custom_brush: Option<CustomBrush>,
    #[serde(default)]
    pub custom_check_zone: Option<CheckZone>,
    #[serde(default = "default_fade_out")]
    pub fade_out_on_complete: bool,
}

fn default_quality() -> f64 {
    DEFAULT_QUALITY
}

fn default_finish_percent() -> u32 {
    DEFAULT_FINISH_PERCENT
}

fn default_brush_size() -> f64 {
    DEFAULT_BRUSH_SIZE
}

fn default_fade_out() -> bool {
    true
}

impl ScratchConfig {
    pub fn new(width: u32, height: u32, image: impl Into<String>) -> Self {
        Self {
            width,
            height,
            image: image.into(),
            quality: DEFAULT_QUALITY,
            finish_percent: DEFAULT_FINISH_PERCENT,
            brush_size: DEFAULT_BRUSH_SIZE,
            custom_brush: None,
            custom_check_zone: None,
            fade_out_on_complete: true,
        }
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_finish_percent(mut self, percent: u32) -> Self {
        self.finish_percent = percent;
        self
    }

    pub fn with_brush_size(mut self, radius: f64) -> Self {
        self.brush_size = radius;
        self
    }

    pub fn with_custom_brush(mut self, brush: CustomBrush) -> Self {
        self.custom_brush = Some(brush);
        self
    }

    pub fn with_check_zone(mut self, zone: CheckZone) -> Self {
        self.custom_check_zone = Some(zone);
        self
    }

    pub fn with_fade_out(mut self, fade: bool) -> Self {
        self.fade_out_on_complete = fade;
        self
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: ScratchConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.quality.is_finite() || self.quality <= 0.0 {
            return Err(Error::InvalidConfig(format!("quality must be positive, got {}", self.quality)));
        }
        if !self.brush_size.is_finite() || self.brush_size < 0.0 {
            return Err(Error::InvalidConfig(format!("brush size must be >= 0, got {}", self.brush_size)));
        }
        if let Some(brush) = &self.custom_brush {
            if brush.width == 0 || brush.height == 0 {
                return Err(Error::InvalidConfig("custom brush must have a non-zero size".into()));
            }
        }
        Ok(())
    }

    /// Radius the round brush actually uses. Zero means "unset" and falls back
    /// to [`DEFAULT_BRUSH_SIZE`].
    pub fn brush_radius(&self) -> f64 {
        if self.brush_size > 0.0 {
            self.brush_size
        } else {
            DEFAULT_BRUSH_SIZE
        }
    }

    /// Raster size: logical size times quality, at least 1x1.
    pub fn raster_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.quality).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let config = ScratchConfig::from_json(r#"{"width": 300, "height": 150, "image": "cover.png"}"#).unwrap();
        assert_eq!(config, ScratchConfig::new(300, 150, "cover.png"));
        assert_eq!(config.finish_percent, 70);
        assert_eq!(config.brush_size, 20.0);
        assert!(config.fade_out_on_complete);
    }

    #[test]
    fn test_full_json() {
        let config = ScratchConfig::from_json(
            r#"{
                "width": 300, "height": 150, "image": "cover.png",
                "quality": 2, "finishPercent": 50, "brushSize": 10,
                "customBrush": {"image": "brush.png", "width": 30, "height": 30},
                "customCheckZone": {"x": 0, "y": 0, "width": 50, "height": 50},
                "fadeOutOnComplete": false
            }"#,
        )
        .unwrap();
        assert_eq!(config.raster_size(), (600, 300));
        assert_eq!(config.finish_percent, 50);
        assert_eq!(config.custom_brush.as_ref().map(|b| b.width), Some(30));
        assert_eq!(config.custom_check_zone, Some(CheckZone::new(0, 0, 50, 50)));
        assert!(!config.fade_out_on_complete);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ScratchConfig::new(0, 150, "c").validate().is_err());
        assert!(ScratchConfig::new(300, 150, "c").with_quality(0.0).validate().is_err());
        assert!(ScratchConfig::new(300, 150, "c").with_quality(f64::NAN).validate().is_err());
        let brush = CustomBrush { image: "b".into(), width: 0, height: 30 };
        assert!(ScratchConfig::new(300, 150, "c").with_custom_brush(brush).validate().is_err());
        assert!(ScratchConfig::from_json("{").is_err());
        assert!(ScratchConfig::new(300, 150, "c").with_brush_size(-1.0).validate().is_err());
    }

    #[test]
    fn test_zero_brush_size_uses_default_radius() {
        let config = ScratchConfig::from_json(r#"{"width": 300, "height": 150, "image": "c", "brushSize": 0}"#).unwrap();
        assert_eq!(config.brush_size, 0.0);
        assert_eq!(config.brush_radius(), DEFAULT_BRUSH_SIZE);
        assert_eq!(ScratchConfig::new(300, 150, "c").with_brush_size(7.5).brush_radius(), 7.5);
    }
}
