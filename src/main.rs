use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

mod animate;
mod color_order;
mod config;
mod error;
mod layout;
mod protocol;
mod screen;
mod transport;

use animate::SystemClock;
use config::Config;
use layout::StripLayout;
use screen::Raster;
use transport::{LedTransport, SerialTransport};

#[derive(Parser)]
#[command(name = "led_marquee")]
#[command(about = "Scrolls and pulsates images across a serpentine LED matrix over serial.", long_about = None)]
struct Cli {
    /// Path to configuration file (JSON)
    config: String,

    /// Enable debug output (per-frame logging)
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Load configuration
    let config_data = fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read config file {}", cli.config))?;
    let config: Config = serde_json::from_str(&config_data)
        .with_context(|| format!("Failed to parse config file {}", cli.config))?;
    if config.playlist.is_empty() {
        bail!("Playlist is empty, nothing to display");
    }

    // Normalize every image up front so a bad file fails before the
    // hardware is touched
    let mut screens = Vec::new();
    for entry in &config.playlist {
        let screen = Raster::load(
            entry.image(),
            config.panel.height as u32,
            entry.background(),
        )?;
        // a panel wider than the image is a config error; catch it before
        // the port opens
        screen.window(0, config.panel.width)?;
        info!(
            "loaded {} as {}x{}",
            entry.image().display(),
            screen.width(),
            screen.height()
        );
        screens.push(screen);
    }

    let layout = StripLayout::new(
        config.panel.width,
        config.panel.height,
        config.panel.dead_pixels,
    );
    let mut transport = SerialTransport::open(&config.output)?;
    if transport.count() != layout.slot_count() {
        bail!(
            "Strip has {} slots but the {}x{} panel needs {}",
            transport.count(),
            config.panel.width,
            config.panel.height,
            layout.slot_count()
        );
    }

    // Set up Ctrl-C handler with graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::Relaxed);
    }) {
        warn!("could not set Ctrl-C handler: {}", e);
    }
    info!("press Ctrl-C to quit");

    let mut clock = SystemClock;
    let result = animate::run_playlist(
        &config.playlist,
        &screens,
        &layout,
        &mut transport,
        &mut clock,
        &running,
        config.settle(),
    );

    // Leave the strip dark no matter how the playlist ended
    if let Err(e) = transport.blank() {
        warn!("could not blank the strip: {}", e);
    } else {
        info!("display off");
    }
    result
}
