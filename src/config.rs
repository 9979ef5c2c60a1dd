use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::color_order::ColorOrder;
use crate::protocol::Protocol;
use crate::screen::Pixel;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub panel: PanelConfig,
    pub output: OutputConfig,
    pub playlist: Vec<AnimationConfig>,
    /// How long the strip stays dark between playlist entries.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Config {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Geometry of the visible panel.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_panel_dim")]
    pub width: usize,
    #[serde(default = "default_panel_dim")]
    pub height: usize,
    /// Set for strips wired with unaddressed gap slots between segments.
    #[serde(default)]
    pub dead_pixels: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub port: String,
    pub baud_rate: u32,
    #[serde(default = "default_protocol")]
    pub protocol: Protocol,
    #[serde(default = "default_color_order")]
    pub color_order: ColorOrder,
    pub led_count: usize,
}

/// One playlist entry. The `mode` field picks the animation.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AnimationConfig {
    Scroll(ScrollConfig),
    Pulsate(PulsateConfig),
}

impl AnimationConfig {
    pub fn mode(&self) -> &'static str {
        match self {
            AnimationConfig::Scroll(_) => "scroll",
            AnimationConfig::Pulsate(_) => "pulsate",
        }
    }

    pub fn image(&self) -> &Path {
        match self {
            AnimationConfig::Scroll(c) => &c.image,
            AnimationConfig::Pulsate(c) => &c.image,
        }
    }

    pub fn background(&self) -> Pixel {
        match self {
            AnimationConfig::Scroll(c) => Pixel::from(c.background),
            AnimationConfig::Pulsate(c) => Pixel::from(c.background),
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            AnimationConfig::Scroll(c) => c.duration(),
            AnimationConfig::Pulsate(c) => c.duration(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrollConfig {
    pub image: PathBuf,
    pub duration_secs: u64,
    /// Columns the window advances per tick.
    #[serde(default = "default_scroll_step")]
    pub step: i64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Transparent regions of the source flatten onto this color.
    #[serde(default = "default_background")]
    pub background: [u8; 3],
}

impl ScrollConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PulsateConfig {
    pub image: PathBuf,
    pub duration_secs: u64,
    /// Brightness change per tick.
    #[serde(default = "default_brightness_step")]
    pub step: u8,
    /// Column the window holds still at while pulsating.
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_background")]
    pub background: [u8; 3],
}

impl PulsateConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

fn default_panel_dim() -> usize {
    16
}

fn default_settle_ms() -> u64 {
    250
}

fn default_scroll_step() -> i64 {
    8
}

fn default_brightness_step() -> u8 {
    10
}

fn default_tick_ms() -> u64 {
    50
}

fn default_background() -> [u8; 3] {
    [255, 255, 255]
}

fn default_protocol() -> Protocol {
    Protocol::Adalight
}

fn default_color_order() -> ColorOrder {
    ColorOrder::Grb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "panel": { "width": 16, "height": 16, "dead_pixels": true },
            "output": {
                "port": "/dev/ttyUSB0",
                "baud_rate": 2000000,
                "protocol": "awa",
                "color_order": "GRB",
                "led_count": 288
            },
            "settle_ms": 500,
            "playlist": [
                {
                    "mode": "scroll",
                    "image": "art/banner.png",
                    "duration_secs": 20,
                    "step": 4,
                    "background": [0, 0, 0]
                },
                {
                    "mode": "pulsate",
                    "image": "art/logo.png",
                    "duration_secs": 10,
                    "offset": 8
                }
            ]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.panel.width, 16);
        assert!(config.panel.dead_pixels);
        assert_eq!(config.output.protocol, Protocol::Awa);
        assert_eq!(config.output.color_order, ColorOrder::Grb);
        assert_eq!(config.settle(), Duration::from_millis(500));
        assert_eq!(config.playlist.len(), 2);

        match &config.playlist[0] {
            AnimationConfig::Scroll(scroll) => {
                assert_eq!(scroll.step, 4);
                assert_eq!(scroll.background, [0, 0, 0]);
                assert_eq!(scroll.duration(), Duration::from_secs(20));
            }
            other => panic!("expected scroll, got {:?}", other),
        }
        match &config.playlist[1] {
            AnimationConfig::Pulsate(pulsate) => {
                assert_eq!(pulsate.offset, 8);
                assert_eq!(pulsate.step, 10);
            }
            other => panic!("expected pulsate, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_fill_in() {
        let json = r#"{
            "panel": {},
            "output": { "port": "/dev/ttyACM0", "baud_rate": 115200, "led_count": 256 },
            "playlist": [
                { "mode": "scroll", "image": "a.png", "duration_secs": 5 }
            ]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.panel.width, 16);
        assert_eq!(config.panel.height, 16);
        assert!(!config.panel.dead_pixels);
        assert_eq!(config.output.protocol, Protocol::Adalight);
        assert_eq!(config.output.color_order, ColorOrder::Grb);
        assert_eq!(config.settle_ms, 250);

        match &config.playlist[0] {
            AnimationConfig::Scroll(scroll) => {
                assert_eq!(scroll.step, 8);
                assert_eq!(scroll.tick(), Duration::from_millis(50));
                assert_eq!(scroll.background, [255, 255, 255]);
            }
            other => panic!("expected scroll, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let json = r#"{ "mode": "sparkle", "image": "a.png", "duration_secs": 5 }"#;
        assert!(serde_json::from_str::<AnimationConfig>(json).is_err());
    }
}
