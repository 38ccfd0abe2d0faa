//! CRC32 checksums for snapshot payloads
//!
//! Format: `crc32:XXXXXXXX` (lowercase hex, zero-padded)

use crc32fast::Hasher;

pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Parses `crc32:XXXXXXXX`, returning None for anything else.
pub fn parse_checksum(s: &str) -> Option<u32> {
    let hex = s.strip_prefix("crc32:")?;
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_detects_change() {
        let a = compute_checksum(b"{\"last_id\":1}");
        let b = compute_checksum(b"{\"last_id\":2}");
        assert_ne!(a, b);
        assert_eq!(a, compute_checksum(b"{\"last_id\":1}"));
    }

    #[test]
    fn test_format_and_parse() {
        assert_eq!(format_checksum(0xDEADBEEF), "crc32:deadbeef");
        assert_eq!(format_checksum(1), "crc32:00000001");
        assert_eq!(parse_checksum("crc32:deadbeef"), Some(0xDEADBEEF));
        assert_eq!(parse_checksum("md5:deadbeef"), None);
        assert_eq!(parse_checksum("crc32:beef"), None);
        assert_eq!(parse_checksum("crc32:zzzzzzzz"), None);
    }
}
