// What you SEE:
// • A grey cover sits on top of the reveal image.
// • Hold Left Mouse and drag: the cover is scratched away under the cursor.
// • Once enough of the check zone is gone the rest fades out (unless --no-fade).
// • R starts a new card. ESC quits.

mod draw;

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use image::{Rgba, RgbaImage};
use tracing::{Level, info};

use draw::{Drawer, draw_crosshair, draw_text_5x7};
use scratch_card::compose::{fit_reveal, present};
use scratch_card::gamma::GammaLut;
use scratch_card::{
    CheckZone, CustomBrush, Error, FileSource, FrameBuffer, LoadState, ScratchCard, ScratchConfig, ScratchHandle,
};

#[derive(Parser)]
#[clap(version, about = "Scratch-off reveal card")]
struct Cli {
    /// Cover image (what gets scratched away)
    #[clap(long, value_parser)]
    cover: Option<String>,

    /// Image revealed underneath the cover
    #[clap(long, value_parser)]
    reveal: Option<PathBuf>,

    /// JSON config file; command line flags override its values
    #[clap(long, value_parser)]
    config: Option<PathBuf>,

    #[clap(long, value_parser)]
    width: Option<u32>,

    #[clap(long, value_parser)]
    height: Option<u32>,

    /// Raster oversampling multiplier
    #[clap(long, value_parser)]
    quality: Option<f64>,

    /// Percentage that must be scratched to complete the card
    #[clap(long, value_parser)]
    finish_percent: Option<u32>,

    /// Radius of the round brush
    #[clap(long, value_parser)]
    brush_size: Option<f64>,

    /// Bitmap brush image
    #[clap(long, value_parser)]
    brush: Option<String>,

    #[clap(long, value_parser, default_value_t = 30)]
    brush_width: u32,

    #[clap(long, value_parser, default_value_t = 30)]
    brush_height: u32,

    /// Only this raster region (X,Y,W,H) counts towards completion
    #[clap(long, value_parser)]
    check_zone: Option<CheckZone>,

    /// Keep the remaining cover visible after completion
    #[clap(long)]
    no_fade: bool,

    /// Debug logging
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn to_config(&self) -> Result<ScratchConfig, Error> {
        let mut config = match (&self.config, &self.cover) {
            (Some(path), _) => ScratchConfig::from_path(path)?,
            (None, Some(cover)) => ScratchConfig::new(300, 150, cover.clone()),
            (None, None) => return Err(Error::InvalidConfig("either --cover or --config is required".into())),
        };
        if let Some(cover) = &self.cover {
            config.image = cover.clone();
        }
        if let Some(w) = self.width {
            config.width = w;
        }
        if let Some(h) = self.height {
            config.height = h;
        }
        if let Some(q) = self.quality {
            config.quality = q;
        }
        if let Some(p) = self.finish_percent {
            config.finish_percent = p;
        }
        if let Some(r) = self.brush_size {
            config.brush_size = r;
        }
        if let Some(image) = &self.brush {
            config.custom_brush = Some(CustomBrush {
                image: image.clone(),
                width: self.brush_width,
                height: self.brush_height,
            });
        }
        if self.check_zone.is_some() {
            config.custom_check_zone = self.check_zone;
        }
        if self.no_fade {
            config.fade_out_on_complete = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Default reveal content: a gold band on a dark background.
fn default_reveal(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        let band = y > height / 3 && y < 2 * height / 3;
        if band {
            Rgba([255, 215, 0, 255])
        } else {
            Rgba([30, 30, 60, 255])
        }
    })
}

/// The owning collaborator only ever sees the narrow handle.
fn new_round(card: &mut dyn ScratchHandle, finished: &Cell<bool>) {
    card.reset();
    finished.set(false);
    info!("new card");
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let config = cli.to_config()?;
    let (w, h) = (config.width, config.height);

    /* --- Card + window setup ---
       Visual: a placeholder shows until the cover finishes loading. */
    let mut card = ScratchCard::new(config, Arc::new(FileSource))?;
    let finished = Rc::new(Cell::new(false));
    let flag = Rc::clone(&finished);
    card.on_complete(move || {
        info!("card revealed");
        flag.set(true);
    });

    let mut drawer = Drawer::new("Scratch Card", w as usize, h as usize)?;
    let mut screen = FrameBuffer::new(w as usize, h as usize);
    let lut = GammaLut::new();

    let reveal = match &cli.reveal {
        Some(path) => image::open(path)
            .map_err(|e| Error::ImageLoad { uri: path.display().to_string(), reason: e.to_string() })?
            .to_rgba8(),
        None => default_reveal(w, h),
    };
    let reveal = fit_reveal(&reveal, w, h);

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        // 1) Pick up finished image loads (cover appears, brush becomes active)
        card.poll_loads();

        // 2) Inputs
        if drawer.r_pressed_once() {
            new_round(&mut card, &finished);
        }
        for event in drawer.pointer_events() {
            card.handle_pointer(&event);
        }

        // 3) Cover over reveal, with the current fade opacity
        present(&mut screen, card.surface(), &reveal, card.opacity_at(Instant::now()), &lut);

        // 4) HUD + crosshair
        let hud = match card.cover_state() {
            LoadState::Pending => "LOADING".to_string(),
            LoadState::Failed(_) => "LOAD FAILED".to_string(),
            LoadState::Ready if finished.get() => "DONE | R: NEW CARD".to_string(),
            LoadState::Ready => format!("SCRATCHED {}%", card.filled_in_pixels()),
        };
        draw_text_5x7(&mut screen, 6, 6, &hud, 0x00_FF_FF_FF);
        if let Some((mx, my)) = drawer.mouse_pos() {
            draw_crosshair(&mut screen, mx as i32, my as i32, 8, 0x00_FF_CC_33);
        }

        // 5) Present to the window
        drawer.present(&screen)?;
    }
    Ok(())
}
