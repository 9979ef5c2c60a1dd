use serde::Deserialize;

use crate::screen::Pixel;

/// Channel order expected by the strip controller. Most WS281x strips want
/// GRB; four-channel variants carry a dedicated white LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorOrder {
    Rgb,
    Grb,
    Bgr,
    Rgbw,
    Grbw,
}

impl ColorOrder {
    /// Wire bytes for one frame of pixels, in strip order.
    pub fn encode(self, frame: &[Pixel]) -> Vec<u8> {
        match self {
            ColorOrder::Rgb => frame.iter().flat_map(|p| [p.r, p.g, p.b]).collect(),
            ColorOrder::Grb => frame.iter().flat_map(|p| [p.g, p.r, p.b]).collect(),
            ColorOrder::Bgr => frame.iter().flat_map(|p| [p.b, p.g, p.r]).collect(),
            ColorOrder::Rgbw => frame
                .iter()
                .flat_map(|p| {
                    let (r, g, b, w) = split_white(*p);
                    [r, g, b, w]
                })
                .collect(),
            ColorOrder::Grbw => frame
                .iter()
                .flat_map(|p| {
                    let (r, g, b, w) = split_white(*p);
                    [g, r, b, w]
                })
                .collect(),
        }
    }
}

/// Move the common component of R, G and B onto the white channel.
fn split_white(p: Pixel) -> (u8, u8, u8, u8) {
    let w = p.r.min(p.g).min(p.b);
    (p.r - w, p.g - w, p.b - w, w)
}
