//! Scratch-off reveal surface.
//!
//! A cover image sits on top of some reveal content. Dragging a pointer across
//! it erases the cover along the path; once more than `finish_percent` of the
//! check zone is gone, the card completes (optionally fading the rest of the
//! cover out) and calls back once.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use scratch_card::{FileSource, PointerEvent, PointerInput, ScratchCard, ScratchConfig, ScratchHandle};
//!
//! let config = ScratchConfig::new(300, 150, "cover.png").with_finish_percent(50);
//! let mut card = ScratchCard::new(config, Arc::new(FileSource)).unwrap();
//! card.on_complete(|| println!("revealed!"));
//! card.wait_for_loads(Duration::from_secs(5));
//!
//! card.handle_pointer(&PointerEvent::Down(PointerInput::Mouse { page_x: 0.0, page_y: 75.0 }));
//! card.handle_pointer(&PointerEvent::Move(PointerInput::Mouse { page_x: 300.0, page_y: 75.0 }));
//! card.handle_pointer(&PointerEvent::Up);
//! println!("{}% scratched", card.filled_in_pixels());
//! ```

pub mod brush;
pub mod card;
pub mod compose;
pub mod config;
pub mod coverage;
pub mod eraser;
pub mod error;
pub mod gamma;
pub mod loader;
pub mod surface;
pub mod tracker;
pub mod types;

pub use card::{Completion, Fade, LoadState, ScratchCard, ScratchHandle};
pub use config::ScratchConfig;
pub use error::{Error, Result};
pub use loader::{FileSource, ImageSource, MemorySource};
pub use tracker::{Mode, PointerEvent, PointerInput, SurfaceGeometry};
pub use types::{CheckZone, CustomBrush, FrameBuffer, Point};
