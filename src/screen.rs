use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::Error;

/// One LED color, 8 bits per channel. The whole pipeline works in RGB;
/// reordering for the wire happens at the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    /// An unlit LED.
    pub const OFF: Pixel = Pixel { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Pixel {
        Pixel { r, g, b }
    }

    /// Scale every channel by `brightness / 255`.
    pub fn scaled(self, brightness: u8) -> Pixel {
        let scale = |c: u8| ((c as u16 * brightness as u16) / 255) as u8;
        Pixel {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

impl From<[u8; 3]> for Pixel {
    fn from(rgb: [u8; 3]) -> Pixel {
        Pixel {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
        }
    }
}

/// A normalized image: a row-major RGB grid exactly as tall as the panel.
/// Row 0 is the top of the source image. Built once per image, never mutated.
#[derive(Debug, PartialEq, Eq)]
pub struct Raster {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl Raster {
    /// Load an image file and normalize it to `height` rows. The width
    /// follows from the source aspect ratio, rounded to nearest.
    ///
    /// Sources with an alpha channel are flattened onto `background`, so a
    /// black background leaves transparent regions unlit and a white one
    /// lights them fully.
    pub fn load(path: &Path, height: u32, background: Pixel) -> Result<Raster, Error> {
        let img = image::open(path).map_err(|source| Error::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Raster::normalize(img, height, background)
    }

    fn normalize(img: DynamicImage, height: u32, background: Pixel) -> Result<Raster, Error> {
        let (src_width, src_height) = (img.width(), img.height());
        let width = (src_width as f64 * height as f64 / src_height as f64).round() as u32;
        if width == 0 {
            return Err(Error::InvalidDimensions {
                src_width,
                src_height,
                height,
            });
        }

        let resized = img.resize_exact(width, height, FilterType::Lanczos3);
        let pixels = if resized.color().has_alpha() {
            resized
                .into_rgba8()
                .pixels()
                .map(|p| blend(p.0, background))
                .collect()
        } else {
            resized
                .into_rgb8()
                .pixels()
                .map(|p| Pixel::new(p.0[0], p.0[1], p.0[2]))
                .collect()
        };

        Ok(Raster {
            pixels,
            width: width as usize,
            height: height as usize,
        })
    }

    #[cfg(test)]
    pub fn from_pixels(pixels: Vec<Pixel>, width: usize, height: usize) -> Raster {
        assert_eq!(pixels.len(), width * height);
        Raster {
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn get(&self, row: usize, col: usize) -> Pixel {
        self.pixels[row * self.width + col]
    }

    /// A `panel_width`-column view starting `offset` columns from the left
    /// edge, wrapping past the right edge back to column 0.
    ///
    /// The raster behaves as if tiled forever horizontally: any two offsets
    /// that differ by a multiple of the width see identical pixels, and
    /// negative offsets wrap toward the right edge.
    pub fn window(&self, offset: i64, panel_width: usize) -> Result<Window<'_>, Error> {
        if panel_width > self.width {
            return Err(Error::PanelTooWide {
                panel: panel_width,
                base: self.width,
            });
        }
        let start = offset.rem_euclid(self.width as i64) as usize;
        Ok(Window {
            raster: self,
            start,
            width: panel_width,
        })
    }
}

/// Composite one source pixel over an opaque background.
fn blend(rgba: [u8; 4], background: Pixel) -> Pixel {
    let [r, g, b, a] = rgba;
    let a = a as u16;
    let mix = |src: u8, bg: u8| ((src as u16 * a + bg as u16 * (255 - a)) / 255) as u8;
    Pixel {
        r: mix(r, background.r),
        g: mix(g, background.g),
        b: mix(b, background.b),
    }
}

/// A borrowed view of one panel-sized slice of a raster.
pub struct Window<'a> {
    raster: &'a Raster,
    start: usize,
    width: usize,
}

impl Window<'_> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.raster.height
    }

    pub fn get(&self, row: usize, col: usize) -> Pixel {
        self.raster.get(row, (self.start + col) % self.raster.width)
    }
}
