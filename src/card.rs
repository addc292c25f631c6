// The scratch card: owns the raster, the loaded images, the pointer state and
// the completion state machine, and wires them together per event.
//
// Flow per pointer move:
//   tracker -> segment -> eraser (mutates surface) -> coverage -> completion

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::brush::Brush;
use crate::config::ScratchConfig;
use crate::coverage::{self, DEFAULT_STRIDE};
use crate::eraser;
use crate::error::{Error, Result};
use crate::loader::{Asset, Generation, ImageSource, Loaded, Loader};
use crate::surface::Surface;
use crate::tracker::{Mode, PointerEvent, SurfaceGeometry, Tracker};
use crate::types::{CustomBrush, Point};

/// How long the cover takes to fade out after completion.
pub const FADE_DURATION: Duration = Duration::from_secs(1);

/// What an owning collaborator gets to do with a card: poll progress and start over.
/// The raster itself stays private to the card.
pub trait ScratchHandle {
    /// Scratched percentage of the check zone (0..=100) at the default stride.
    fn filled_in_pixels(&self) -> u32;
    /// Restore the full cover and start a new completion cycle.
    fn reset(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Unfinished,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed(String),
}

/// Opacity transition of the cover.
#[derive(Clone, Copy, Debug)]
pub struct Fade {
    from: f32,
    to: f32,
    duration: Duration,
    started: Instant,
}

impl Fade {
    /// Jump straight to `opacity`.
    pub fn settled(opacity: f32) -> Self {
        Self { from: opacity, to: opacity, duration: Duration::ZERO, started: Instant::now() }
    }

    pub fn to(from: f32, to: f32, duration: Duration) -> Self {
        Self { from, to, duration, started: Instant::now() }
    }

    /// Opacity the transition ends at.
    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn opacity_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * t.clamp(0.0, 1.0)
    }
}

pub struct ScratchCard {
    config: ScratchConfig,
    loader: Loader,
    generation: Generation,

    cover: Option<RgbaImage>,
    cover_state: LoadState,
    brush: Brush,
    brush_state: LoadState,
    surface: Option<Surface>,

    tracker: Tracker,
    completion: Completion,
    fade: Fade,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl ScratchCard {
    /// Validate `config` and start loading the cover (and custom brush, if any).
    /// Nothing is drawable until `poll_loads`/`wait_for_loads` applies the cover.
    pub fn new(config: ScratchConfig, source: Arc<dyn ImageSource>) -> Result<Self> {
        config.validate()?;
        let mut card = Self {
            brush: Brush::new(config.brush_radius(), config.custom_brush.as_ref()),
            tracker: Tracker::new(config.quality),
            config,
            loader: Loader::new(source),
            generation: Generation::default(),
            cover: None,
            cover_state: LoadState::Pending,
            brush_state: LoadState::Ready,
            surface: None,
            completion: Completion::Unfinished,
            fade: Fade::settled(1.0),
            on_complete: None,
        };
        card.reload();
        Ok(card)
    }

    /// Called once per completion cycle, when coverage first exceeds the threshold.
    pub fn on_complete(&mut self, callback: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    fn reload(&mut self) {
        self.generation = self.generation.next();
        self.cover = None;
        self.surface = None;
        self.cover_state = LoadState::Pending;
        self.loader.request(self.generation, Asset::Cover, &self.config.image);

        self.brush = Brush::new(self.config.brush_radius(), self.config.custom_brush.as_ref());
        match &self.config.custom_brush {
            Some(custom) => {
                self.brush_state = LoadState::Pending;
                self.loader.request(self.generation, Asset::Brush, &custom.image);
            }
            None => self.brush_state = LoadState::Ready,
        }
    }

    /// Swap the cover image. Reloads everything if the source changed.
    pub fn set_image(&mut self, uri: impl Into<String>) {
        let uri = uri.into();
        if uri != self.config.image {
            self.config.image = uri;
            self.reload();
        }
    }

    /// Swap (or drop) the custom brush. Reloads everything if it changed.
    pub fn set_custom_brush(&mut self, brush: Option<CustomBrush>) -> Result<()> {
        if brush == self.config.custom_brush {
            return Ok(());
        }
        if let Some(b) = &brush {
            if b.width == 0 || b.height == 0 {
                return Err(Error::InvalidConfig("custom brush must have a non-zero size".into()));
            }
        }
        self.config.custom_brush = brush;
        self.reload();
        Ok(())
    }

    /// New logical size and/or quality. The raster is reallocated and the cached
    /// cover redrawn; nothing is reloaded and the completion state is kept.
    pub fn set_size(&mut self, width: u32, height: u32, quality: f64) -> Result<()> {
        let mut next = self.config.clone();
        next.width = width;
        next.height = height;
        next.quality = quality;
        next.validate()?;
        self.config = next;
        self.tracker.set_quality(quality);
        if let Some(cover) = &self.cover {
            let (w, h) = self.config.raster_size();
            self.surface = Some(Surface::with_cover(cover, w, h));
        }
        Ok(())
    }

    /// Where the surface sits on screen, for pointer mapping.
    pub fn set_geometry(&mut self, geometry: SurfaceGeometry) {
        self.tracker.set_geometry(geometry);
    }

    /// Apply finished image loads without blocking. Call once per frame.
    pub fn poll_loads(&mut self) {
        for loaded in self.loader.drain() {
            self.apply(loaded);
        }
    }

    /// Block until no load is outstanding or `timeout` passes.
    pub fn wait_for_loads(&mut self, timeout: Duration) {
        for loaded in self.loader.wait(timeout) {
            self.apply(loaded);
        }
    }

    fn apply(&mut self, loaded: Loaded) {
        if loaded.generation != self.generation {
            debug!(uri = %loaded.uri, asset = ?loaded.asset, "dropping stale image load");
            return;
        }
        match (loaded.asset, loaded.image) {
            (Asset::Cover, Ok(image)) => {
                let (w, h) = self.config.raster_size();
                info!(uri = %loaded.uri, width = w, height = h, "cover ready");
                self.surface = Some(Surface::with_cover(&image, w, h));
                self.cover = Some(image);
                self.cover_state = LoadState::Ready;
            }
            (Asset::Brush, Ok(image)) => {
                debug!(uri = %loaded.uri, "custom brush ready");
                self.brush.set_bitmap(&image);
                self.brush_state = LoadState::Ready;
            }
            (asset, Err(err)) => {
                warn!(?asset, %err, "image load failed");
                let state = LoadState::Failed(err.to_string());
                match asset {
                    Asset::Cover => self.cover_state = state,
                    Asset::Brush => self.brush_state = state,
                }
            }
        }
    }

    /// Feed one pointer event. Moves while drawing erase along the path and
    /// re-evaluate completion.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        let Some(segment) = self.tracker.handle(event) else {
            return;
        };
        if let Some(surface) = self.surface.as_mut() {
            eraser::stroke(surface, &self.brush, &segment);
        }
        let filled = self.filled_in_pixels_with(DEFAULT_STRIDE);
        self.evaluate(filled);
    }

    fn evaluate(&mut self, filled: u32) {
        if self.completion == Completion::Finished {
            return;
        }
        if filled > self.config.finish_percent {
            if self.config.fade_out_on_complete {
                self.fade = Fade::to(1.0, 0.0, FADE_DURATION);
            }
            self.completion = Completion::Finished;
            info!(filled, threshold = self.config.finish_percent, "scratch card complete");
            if let Some(callback) = self.on_complete.as_mut() {
                callback();
            }
        }
    }

    /// Scratched percentage of the check zone, sampling every `stride` bytes.
    /// 0 while there is no raster.
    pub fn filled_in_pixels_with(&self, stride: usize) -> u32 {
        match &self.surface {
            Some(surface) => coverage::filled_in_pixels(surface.pixels(), self.config.custom_check_zone, stride),
            None => 0,
        }
    }

    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }

    /// True once the cover has been drawn into the raster.
    pub fn is_loaded(&self) -> bool {
        self.surface.is_some()
    }

    pub fn cover_state(&self) -> &LoadState {
        &self.cover_state
    }

    pub fn brush_state(&self) -> &LoadState {
        &self.brush_state
    }

    /// First load failure of the current generation, if any.
    pub fn load_error(&self) -> Option<&str> {
        match (&self.cover_state, &self.brush_state) {
            (LoadState::Failed(reason), _) | (_, LoadState::Failed(reason)) => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn completion(&self) -> Completion {
        self.completion
    }

    pub fn is_finished(&self) -> bool {
        self.completion == Completion::Finished
    }

    pub fn mode(&self) -> Mode {
        self.tracker.mode()
    }

    pub fn last_point(&self) -> Option<Point> {
        self.tracker.last_point()
    }

    pub fn fade(&self) -> Fade {
        self.fade
    }

    pub fn opacity_at(&self, now: Instant) -> f32 {
        self.fade.opacity_at(now)
    }
}

impl ScratchHandle for ScratchCard {
    fn filled_in_pixels(&self) -> u32 {
        self.filled_in_pixels_with(DEFAULT_STRIDE)
    }

    fn reset(&mut self) {
        if let (Some(surface), Some(cover)) = (self.surface.as_mut(), self.cover.as_ref()) {
            surface.redraw(cover);
        }
        self.fade = Fade::settled(1.0);
        self.tracker.reset();
        self.completion = Completion::Unfinished;
        debug!("scratch card reset");
    }
}
