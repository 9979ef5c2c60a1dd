use std::path::PathBuf;

use thiserror::Error;

/// Failures in the pixel pipeline. All of these are fatal to the current
/// animation and surface to the caller, which blanks the strip and exits.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load image {path}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image is {src_width}x{src_height}, which resizes to zero columns at height {height}")]
    InvalidDimensions {
        src_width: u32,
        src_height: u32,
        height: u32,
    },

    #[error("panel is {panel} columns wide but the image only has {base}")]
    PanelTooWide { panel: usize, base: usize },

    #[error("window is {got_width}x{got_height} but the strip layout expects {want_width}x{want_height}")]
    LayoutDimension {
        got_width: usize,
        got_height: usize,
        want_width: usize,
        want_height: usize,
    },
}
