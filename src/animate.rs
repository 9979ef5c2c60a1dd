use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info};

use crate::config::{AnimationConfig, PulsateConfig, ScrollConfig};
use crate::layout::StripLayout;
use crate::screen::Raster;
use crate::transport::LedTransport;

/// Time source for the animation loops. Production uses the system clock;
/// tests inject one that only advances when slept on.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&mut self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Triangle-wave brightness state. Starts fully lit and fades; the
/// direction reverses whenever a step clamps at 0 or 255.
pub struct BrightnessWave {
    level: i32,
    direction: i32,
    step: i32,
}

impl BrightnessWave {
    pub fn new(step: u8) -> BrightnessWave {
        BrightnessWave {
            level: 255,
            direction: -1,
            step: step as i32,
        }
    }

    /// Advance one tick and return the new brightness.
    pub fn tick(&mut self) -> u8 {
        self.level += self.direction * self.step;
        if self.level > 255 {
            self.level = 255;
            self.direction = -1;
        }
        if self.level < 0 {
            self.level = 0;
            self.direction = 1;
        }
        self.level as u8
    }
}

/// Cycle through the playlist until `running` clears, blanking the strip
/// for a settle delay between entries. Every screen is checked against the
/// panel width up front, so a misconfigured entry fails before anything is
/// written to the transport.
pub fn run_playlist(
    playlist: &[AnimationConfig],
    screens: &[Raster],
    layout: &StripLayout,
    transport: &mut dyn LedTransport,
    clock: &mut dyn Clock,
    running: &AtomicBool,
    settle: Duration,
) -> Result<()> {
    for screen in screens {
        screen.window(0, layout.width())?;
    }
    while running.load(Ordering::Relaxed) {
        for (entry, screen) in playlist.iter().zip(screens) {
            if !running.load(Ordering::Relaxed) {
                break;
            }
            info!(
                "{} {} for {}s",
                entry.mode(),
                entry.image().display(),
                entry.duration().as_secs()
            );
            run(entry, screen, layout, transport, clock, running)?;

            // dark pause between entries so transitions do not smear
            transport.blank()?;
            if running.load(Ordering::Relaxed) {
                clock.sleep(settle);
            }
        }
    }
    Ok(())
}

/// Run one playlist entry until its duration elapses or `running` clears.
pub fn run(
    animation: &AnimationConfig,
    screen: &Raster,
    layout: &StripLayout,
    transport: &mut dyn LedTransport,
    clock: &mut dyn Clock,
    running: &AtomicBool,
) -> Result<()> {
    match animation {
        AnimationConfig::Scroll(config) => {
            run_scroll(screen, layout, transport, clock, running, config)
        }
        AnimationConfig::Pulsate(config) => {
            run_pulsate(screen, layout, transport, clock, running, config)
        }
    }
}

/// Pan the raster across the panel, wrapping around its right edge.
pub fn run_scroll(
    screen: &Raster,
    layout: &StripLayout,
    transport: &mut dyn LedTransport,
    clock: &mut dyn Clock,
    running: &AtomicBool,
    config: &ScrollConfig,
) -> Result<()> {
    let mut offset: i64 = 0;
    let mut frames: u64 = 0;
    let started = clock.now();
    while running.load(Ordering::Relaxed) && clock.now() - started < config.duration() {
        push_frame(screen, layout, transport, offset, None)?;
        frames += 1;
        clock.sleep(config.tick());
        offset += config.step;
    }
    debug!("scroll finished after {} frames", frames);
    Ok(())
}

/// Hold the raster at a fixed offset and breathe its brightness.
pub fn run_pulsate(
    screen: &Raster,
    layout: &StripLayout,
    transport: &mut dyn LedTransport,
    clock: &mut dyn Clock,
    running: &AtomicBool,
    config: &PulsateConfig,
) -> Result<()> {
    let mut wave = BrightnessWave::new(config.step);
    let mut frames: u64 = 0;
    let started = clock.now();
    while running.load(Ordering::Relaxed) && clock.now() - started < config.duration() {
        let brightness = wave.tick();
        push_frame(screen, layout, transport, config.offset, Some(brightness))?;
        frames += 1;
        clock.sleep(config.tick());
    }
    debug!("pulsate finished after {} frames", frames);
    Ok(())
}

/// Window the raster, map it onto the strip, and commit it.
fn push_frame(
    screen: &Raster,
    layout: &StripLayout,
    transport: &mut dyn LedTransport,
    offset: i64,
    brightness: Option<u8>,
) -> Result<()> {
    let window = screen.window(offset, layout.width())?;
    let mut frame = layout.frame(&window)?;
    if let Some(brightness) = brightness {
        for pixel in &mut frame {
            *pixel = pixel.scaled(brightness);
        }
    }
    for (index, pixel) in frame.iter().enumerate() {
        transport.set_pixel(index, *pixel)?;
    }
    transport.show()
}
