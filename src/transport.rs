use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info, warn};

use crate::color_order::ColorOrder;
use crate::config::OutputConfig;
use crate::protocol::Protocol;
use crate::screen::Pixel;

/// Boundary to the physical strip. The animation driver stages a full frame
/// with `set_pixel` and commits it with `show`; nothing reaches the wire
/// in between.
pub trait LedTransport {
    fn set_pixel(&mut self, index: usize, pixel: Pixel) -> Result<()>;
    fn show(&mut self) -> Result<()>;
    /// Total addressable slots on the strip.
    fn count(&self) -> usize;

    /// Stage and commit an all-off frame.
    fn blank(&mut self) -> Result<()> {
        for index in 0..self.count() {
            self.set_pixel(index, Pixel::OFF)?;
        }
        self.show()
    }
}

/// LED strip behind a serial port speaking one of the supported framings.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    frame: Vec<Pixel>,
    protocol: Protocol,
    color_order: ColorOrder,
}

impl SerialTransport {
    /// Open the configured port, 8N1 with no flow control.
    pub fn open(config: &OutputConfig) -> Result<SerialTransport> {
        let mut port = serialport::new(&config.port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open()
            .with_context(|| format!("Failed to open serial port {}", config.port))?;

        port.set_timeout(Duration::from_millis(1000))?;

        if let Err(e) = port.write_data_terminal_ready(true) {
            warn!("could not set DTR on {}: {}", config.port, e);
        }

        // Give the controller a moment to settle after opening
        thread::sleep(Duration::from_millis(100));

        info!(
            "opened {} at {} baud: {} slots, {:?}/{:?}",
            config.port, config.baud_rate, config.led_count, config.protocol, config.color_order
        );

        Ok(SerialTransport {
            port,
            frame: vec![Pixel::OFF; config.led_count],
            protocol: config.protocol,
            color_order: config.color_order,
        })
    }
}

impl LedTransport for SerialTransport {
    fn set_pixel(&mut self, index: usize, pixel: Pixel) -> Result<()> {
        let count = self.frame.len();
        let slot = self
            .frame
            .get_mut(index)
            .with_context(|| format!("pixel index {} out of range for {} slots", index, count))?;
        *slot = pixel;
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let payload = self.color_order.encode(&self.frame);
        let bytes = self.protocol.encode(self.frame.len(), &payload);
        debug!("writing {} bytes for {} slots", bytes.len(), self.frame.len());
        self.port
            .write_all(&bytes)
            .context("Failed to write frame to serial port")?;
        self.port
            .flush()
            .context("Failed to flush serial port")?;
        Ok(())
    }

    fn count(&self) -> usize {
        self.frame.len()
    }
}
