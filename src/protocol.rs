use serde::Deserialize;

/// Serial framing understood by the strip controller firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Classic Adalight: "Ada" header, LED count, XOR check, raw pixels.
    Adalight,
    /// HyperSerial "Awa" framing with Fletcher checksums on the payload.
    Awa,
}

impl Protocol {
    /// Wrap one frame of wire bytes for a strip of `led_count` LEDs.
    pub fn encode(self, led_count: usize, payload: &[u8]) -> Vec<u8> {
        match self {
            Protocol::Adalight => encode_adalight(led_count, payload),
            Protocol::Awa => encode_awa(led_count, payload),
        }
    }
}

fn encode_adalight(led_count: usize, payload: &[u8]) -> Vec<u8> {
    let count_hi = (led_count >> 8) as u8;
    let count_lo = led_count as u8;

    let mut frame = Vec::with_capacity(6 + payload.len());
    frame.push(0x41); // 'A'
    frame.push(0x64); // 'd'
    frame.push(0x61); // 'a'
    frame.push(count_hi);
    frame.push(count_lo);
    frame.push(count_hi ^ count_lo ^ 0x55);
    frame.extend_from_slice(payload);
    frame
}

fn encode_awa(led_count: usize, payload: &[u8]) -> Vec<u8> {
    // the Awa count field is led_count - 1
    let count = led_count.saturating_sub(1);
    let count_hi = (count >> 8) as u8;
    let count_lo = count as u8;

    let mut frame = Vec::with_capacity(6 + payload.len() + 3);
    frame.push(0x41); // 'A'
    frame.push(0x77); // 'w'
    frame.push(0x61); // 'a'
    frame.push(count_hi);
    frame.push(count_lo);
    frame.push(count_hi ^ count_lo ^ 0x55);
    frame.extend_from_slice(payload);

    // Fletcher checksums over the payload
    let mut fletcher1: u16 = 0;
    let mut fletcher2: u16 = 0;
    let mut fletcher_ext: u16 = 0;
    for (position, &byte) in payload.iter().enumerate() {
        fletcher1 = (fletcher1 + byte as u16) % 255;
        fletcher2 = (fletcher2 + fletcher1) % 255;
        fletcher_ext = (fletcher_ext + (byte as u16 ^ position as u16)) % 255;
    }
    // the firmware reserves 0x41 for the header
    if fletcher_ext == 0x41 {
        fletcher_ext = 0xaa;
    }
    frame.push(fletcher1 as u8);
    frame.push(fletcher2 as u8);
    frame.push(fletcher_ext as u8);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adalight_header_and_check() {
        let payload = [1u8, 2, 3, 4, 5, 6, 7, 8, 9];
        let frame = Protocol::Adalight.encode(3, &payload);
        assert_eq!(&frame[0..3], b"Ada");
        assert_eq!(frame[3], 0);
        assert_eq!(frame[4], 3);
        assert_eq!(frame[5], 3 ^ 0x55);
        assert_eq!(&frame[6..], &payload);
    }

    #[test]
    fn test_adalight_count_spans_two_bytes() {
        let frame = Protocol::Adalight.encode(300, &[]);
        assert_eq!(frame[3], 1);
        assert_eq!(frame[4], 44);
        assert_eq!(frame[5], 1 ^ 44 ^ 0x55);
    }

    #[test]
    fn test_awa_count_is_led_count_minus_one() {
        let frame = Protocol::Awa.encode(256, &[]);
        assert_eq!(&frame[0..3], b"Awa");
        assert_eq!(frame[3], 0);
        assert_eq!(frame[4], 255);
        assert_eq!(frame[5], 255 ^ 0x55);
    }

    #[test]
    fn test_awa_fletcher_trailer() {
        let frame = Protocol::Awa.encode(1, &[1, 2, 3]);
        // fletcher1: 1, 3, 6; fletcher2: 1, 4, 10; ext: 1^0, 2^1, 3^2 summed
        assert_eq!(&frame[frame.len() - 3..], &[6, 10, 5]);
    }

    #[test]
    fn test_awa_checksum_avoids_header_byte() {
        // a single 0x41 at position 0 would make the extended sum 0x41
        let frame = Protocol::Awa.encode(1, &[0x41]);
        assert_eq!(&frame[frame.len() - 3..], &[0x41, 0x41, 0xaa]);
    }
}
