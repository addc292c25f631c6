// Asynchronous image loading for the cover and the custom brush.
// Fetches run on detached workers; results come back over a channel and are
// only applied by the card that owns the receiver, on its own thread.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use image::RgbaImage;
use tracing::debug;

use crate::error::{Error, Result};

/// Where image bytes come from.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, uri: &str) -> Result<RgbaImage>;
}

/// Decodes images from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileSource;

impl ImageSource for FileSource {
    fn fetch(&self, uri: &str) -> Result<RgbaImage> {
        let img = image::open(Path::new(uri)).map_err(|e| Error::image_load(uri, e))?;
        Ok(img.to_rgba8())
    }
}

/// Pre-decoded images keyed by URI.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    images: HashMap<String, RgbaImage>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, uri: impl Into<String>, image: RgbaImage) -> Self {
        self.images.insert(uri.into(), image);
        self
    }
}

impl ImageSource for MemorySource {
    fn fetch(&self, uri: &str) -> Result<RgbaImage> {
        self.images.get(uri).cloned().ok_or_else(|| Error::image_load(uri, "not found"))
    }
}

/// Bumped on every reload; results from an older generation are stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asset {
    Cover,
    Brush,
}

pub struct Loaded {
    pub generation: Generation,
    pub asset: Asset,
    pub uri: String,
    pub image: Result<RgbaImage>,
}

pub struct Loader {
    source: Arc<dyn ImageSource>,
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
    in_flight: usize,
}

impl Loader {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { source, tx, rx, in_flight: 0 }
    }

    /// Start fetching `uri` in the background.
    pub fn request(&mut self, generation: Generation, asset: Asset, uri: &str) {
        debug!(?generation, ?asset, uri, "image load requested");
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let uri = uri.to_owned();
        self.in_flight += 1;
        thread::spawn(move || {
            let image = source.fetch(&uri);
            // The receiver is gone once the owning card is dropped; nothing to do then.
            let _ = tx.send(Loaded { generation, asset, uri, image });
        });
    }

    /// Number of requests whose result has not been collected yet.
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Collect whatever finished, without blocking.
    pub fn drain(&mut self) -> Vec<Loaded> {
        let done: Vec<Loaded> = self.rx.try_iter().collect();
        self.in_flight -= done.len();
        done
    }

    /// Block until every request is back or `timeout` runs out.
    pub fn wait(&mut self, timeout: Duration) -> Vec<Loaded> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::new();
        while self.in_flight > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(left) {
                Ok(loaded) => {
                    self.in_flight -= 1;
                    done.push(loaded);
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        done
    }
}
