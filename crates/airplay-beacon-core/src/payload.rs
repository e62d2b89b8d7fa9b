//! AirPlay service-discovery manufacturer data

use std::net::Ipv4Addr;

/// Bluetooth SIG company identifier for Apple, Inc.
pub const APPLE_COMPANY_ID: u16 = 0x004C;

/// Apple data unit header: type 0x09 (AirPlay target), length 8, flags 0x13,
/// seed 0x30
const AIRPLAY_HEADER: [u8; 4] = [0x09, 0x08, 0x13, 0x30];

/// Length of the manufacturer payload in bytes
pub const PAYLOAD_LEN: usize = AIRPLAY_HEADER.len() + 4 + 2;

/// Build the manufacturer-specific payload advertised under [`APPLE_COMPANY_ID`].
///
/// Layout: `09 08 13 30`, the four address octets, then the port big-endian.
pub fn manufacturer_payload(ipv4: Ipv4Addr, port: u16) -> [u8; PAYLOAD_LEN] {
    let mut out = [0u8; PAYLOAD_LEN];
    out[..4].copy_from_slice(&AIRPLAY_HEADER);
    out[4..8].copy_from_slice(&ipv4.octets());
    out[8..].copy_from_slice(&port.to_be_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_layout() {
        let payload = manufacturer_payload(Ipv4Addr::new(192, 168, 1, 50), 7000);
        assert_eq!(
            payload,
            [0x09, 0x08, 0x13, 0x30, 192, 168, 1, 50, 0x1B, 0x58]
        );
        assert_eq!(hex::encode(payload), "09081330c0a801321b58");
    }
}
