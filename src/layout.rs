use crate::error::Error;
use crate::screen::{Pixel, Window};

/// Physical wiring of one serpentine panel.
///
/// The strip enters at the bottom-left corner and snakes across the columns:
/// the first run climbs column 0 bottom-to-top, the next descends column 1
/// top-to-bottom, and so on. Panels built from segments joined over unwired
/// gaps carry one dead slot before and after every run; dead slots have no
/// source pixel and always render off.
#[derive(Debug, Clone, Copy)]
pub struct StripLayout {
    width: usize,
    height: usize,
    dead_pixels: bool,
}

impl StripLayout {
    pub fn new(width: usize, height: usize, dead_pixels: bool) -> StripLayout {
        StripLayout {
            width,
            height,
            dead_pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Slots per wired run, dead padding included.
    fn run_len(&self) -> usize {
        self.height + if self.dead_pixels { 2 } else { 0 }
    }

    /// Total addressable slots on the strip.
    pub fn slot_count(&self) -> usize {
        self.width * self.run_len()
    }

    /// The window cell shown at physical slot `slot`, as (row, col), or
    /// `None` for a dead slot.
    pub fn source_for_slot(&self, slot: usize) -> Option<(usize, usize)> {
        let run = slot / self.run_len();
        let mut pos = slot % self.run_len();
        if self.dead_pixels {
            if pos == 0 || pos == self.run_len() - 1 {
                return None;
            }
            pos -= 1;
        }
        let row = if run % 2 == 0 {
            self.height - 1 - pos
        } else {
            pos
        };
        Some((row, run))
    }

    /// Flatten a window into physical wiring order.
    pub fn frame(&self, window: &Window<'_>) -> Result<Vec<Pixel>, Error> {
        if window.width() != self.width || window.height() != self.height {
            return Err(Error::LayoutDimension {
                got_width: window.width(),
                got_height: window.height(),
                want_width: self.width,
                want_height: self.height,
            });
        }
        let frame = (0..self.slot_count())
            .map(|slot| match self.source_for_slot(slot) {
                Some((row, col)) => window.get(row, col),
                None => Pixel::OFF,
            })
            .collect();
        Ok(frame)
    }
}
