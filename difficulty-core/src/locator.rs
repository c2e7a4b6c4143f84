use log::debug;

/// Name of the first record in the difficulty block.
pub const MARKER: &str = "CIVIC_OPINION";

/// Character count of [`MARKER`], as stored in its length prefix.
pub const MARKER_UNITS: u16 = 13;

/// The marker minus its last character. The high byte of the final
/// character may be shared with the following value, so only the first
/// twelve characters are reliable to search for.
pub const MARKER_PROBE: &str = "CIVIC_OPINIO";

/// Encode text the way names are stored in the buffer: UTF-16LE, no BOM.
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Find the offset of the marker record's length prefix.
///
/// Every occurrence of the probe is checked, and the first one whose
/// preceding two bytes read as the full marker length (little-endian)
/// wins. Substring hits elsewhere in the buffer fail that check.
pub fn locate(buf: &[u8]) -> Option<usize> {
    let probe = encode_utf16le(MARKER_PROBE);
    if buf.len() < probe.len() {
        return None;
    }

    for (pos, window) in buf.windows(probe.len()).enumerate() {
        if window != probe.as_slice() {
            continue;
        }
        if pos < 2 {
            debug!("Marker match at {pos} has no room for a length prefix");
            continue;
        }

        let len = u16::from_le_bytes([buf[pos - 2], buf[pos - 1]]);
        if len == MARKER_UNITS {
            return Some(pos - 2);
        }
        debug!("Marker match at {pos} rejected, length prefix {len}");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixed_marker(len: u16) -> Vec<u8> {
        let mut out = len.to_le_bytes().to_vec();
        out.extend(encode_utf16le(MARKER_PROBE));
        out
    }

    #[test]
    fn probe_is_marker_without_last_char() {
        assert_eq!(MARKER_PROBE.len() + 1, MARKER.len());
        assert!(MARKER.starts_with(MARKER_PROBE));
        assert_eq!(MARKER.encode_utf16().count(), MARKER_UNITS as usize);
    }

    #[test]
    fn finds_prefixed_marker() {
        let mut buf = vec![0xAA; 7];
        buf.extend(prefixed_marker(13));
        assert_eq!(locate(&buf), Some(7));
    }

    #[test]
    fn rejects_wrong_length_prefix() {
        let mut buf = vec![0x00; 4];
        buf.extend(prefixed_marker(12));
        assert_eq!(locate(&buf), None);
    }

    #[test]
    fn skips_false_match_and_takes_next() {
        let mut buf = prefixed_marker(40);
        buf.extend([0x55; 3]);
        let second = buf.len();
        buf.extend(prefixed_marker(13));
        assert_eq!(locate(&buf), Some(second));
    }

    #[test]
    fn match_at_buffer_start_has_no_prefix() {
        let buf = encode_utf16le(MARKER_PROBE);
        assert_eq!(locate(&buf), None);
    }

    #[test]
    fn short_or_empty_buffer() {
        assert_eq!(locate(&[]), None);
        assert_eq!(locate(&[0x0D, 0x00, b'C']), None);
    }
}
