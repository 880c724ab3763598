use crc32fast::Hasher;

/// CRC32 (IEEE) over the full payload, rendered as the 8-character
/// lowercase hex string of the big-endian 32-bit value. The firmware
/// compares this against its own checksum of the received body.
pub(crate) fn crc32_hex(payload: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(payload);
    format!("{:08x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_checksum() {
        // Standard CRC32 (IEEE) check value
        assert_eq!(crc32_hex(b"123456789"), "cbf43926");
    }

    #[test]
    fn test_empty_payload_pads_to_eight_chars() {
        assert_eq!(crc32_hex(b""), "00000000");
    }

    #[test]
    fn test_checksum_is_deterministic() {
        let payload = b"G28\nG1 X10 Y10 F3000\n";
        let first = crc32_hex(payload);
        let second = crc32_hex(payload);
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
