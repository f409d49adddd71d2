//! Physical addresses and magic packet framing.
//!
//! A magic packet is six `0xFF` bytes followed by the target's 48-bit
//! hardware address repeated sixteen times.

use std::fmt;
use std::str::FromStr;

/// Length of a magic packet in bytes.
pub const MAGIC_PACKET_LEN: usize = 6 + 16 * 6;

/// Error returned when a physical address string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid physical address '{input}': {reason}")]
pub struct MacParseError {
    pub input: String,
    pub reason: &'static str,
}

/// A 48-bit link-layer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    /// Accepts `AABBCCDDEEFF`, `AA:BB:CC:DD:EE:FF`, `AA-BB-CC-DD-EE-FF`
    /// and `AABB.CCDD.EEFF`, in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason| MacParseError {
            input: s.to_string(),
            reason,
        };

        let digits: String = match s.len() {
            12 => s.to_string(),
            14 => {
                let groups: Vec<&str> = s.split('.').collect();
                if groups.len() != 3 || groups.iter().any(|g| g.len() != 4) {
                    return Err(fail("expected three dot-separated groups of four digits"));
                }
                groups.concat()
            }
            17 => {
                let sep = if s.contains(':') { ':' } else { '-' };
                let groups: Vec<&str> = s.split(sep).collect();
                if groups.len() != 6 || groups.iter().any(|g| g.len() != 2) {
                    return Err(fail("expected six separated pairs of digits"));
                }
                groups.concat()
            }
            _ => return Err(fail("unexpected length")),
        };

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(fail("non-hexadecimal digit"));
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|_| fail("non-hexadecimal digit"))?;
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// A ready-to-send wake frame.
#[derive(Clone, PartialEq, Eq)]
pub struct MagicPacket([u8; MAGIC_PACKET_LEN]);

impl MagicPacket {
    pub fn new(mac: &MacAddress) -> Self {
        let mut bytes = [0xFFu8; MAGIC_PACKET_LEN];
        for chunk in bytes[6..].chunks_exact_mut(6) {
            chunk.copy_from_slice(&mac.0);
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MagicPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MagicPacket")
            .field("len", &self.0.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: MacAddress = MacAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

    #[test]
    fn parses_common_notations() {
        for input in [
            "AA:BB:CC:DD:EE:FF",
            "aa:bb:cc:dd:ee:ff",
            "AA-BB-CC-DD-EE-FF",
            "AABBCCDDEEFF",
            "aabb.ccdd.eeff",
        ] {
            assert_eq!(input.parse::<MacAddress>().unwrap(), TARGET, "{input}");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for input in [
            "",
            "AA:BB:CC:DD:EE",
            "AA:BB:CC:DD:EE:GG",
            "AA:BB-CC:DD:EE:FF",
            "AABBCCDDEEF",
            "AAB:BCC:DDE:EFF:::",
            "AABB.CCDDE.EFF",
        ] {
            assert!(input.parse::<MacAddress>().is_err(), "{input} should fail");
        }
    }

    #[test]
    fn display_is_upper_colon_form() {
        let mac: MacAddress = "11-22-33-aa-bb-cc".parse().unwrap();
        assert_eq!(mac.to_string(), "11:22:33:AA:BB:CC");
    }

    #[test]
    fn magic_packet_layout() {
        let packet = MagicPacket::new(&TARGET);
        let bytes = packet.as_bytes();

        assert_eq!(bytes.len(), 102);
        assert!(bytes[..6].iter().all(|&b| b == 0xFF));
        for chunk in bytes[6..].chunks(6) {
            assert_eq!(chunk, &TARGET.octets());
        }
    }
}
