//! Synthetic buffers for tests.

use crate::locator::{encode_utf16le, MARKER};
use crate::scanner::{resolve_overlap, ValueBoundary, TRAILER_LEN};

const TRAILER: [u8; TRAILER_LEN] = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];

pub(crate) struct BlockBuilder {
    buf: Vec<u8>,
}

impl BlockBuilder {
    pub(crate) fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub(crate) fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Length prefix, UTF-16LE name, big-endian value, trailer.
    pub(crate) fn record(mut self, name: &str, value: f64) -> Self {
        let units = name.encode_utf16().count() as u16;
        self.buf.extend_from_slice(&units.to_le_bytes());
        self.buf.extend(encode_utf16le(name));
        self.buf.extend_from_slice(&value.to_be_bytes());
        self.buf.extend_from_slice(&TRAILER);
        self
    }

    /// Like [`record`](Self::record), but the value's first byte replaces
    /// the high byte of the name's last character.
    pub(crate) fn overlapped_record(mut self, name: &str, value: f64) -> Self {
        let lead = value.to_be_bytes()[0];
        assert_eq!(resolve_overlap(lead), ValueBoundary::Overlap, "{value} cannot overlap");

        let units = name.encode_utf16().count() as u16;
        self.buf.extend_from_slice(&units.to_le_bytes());
        let mut name_bytes = encode_utf16le(name);
        name_bytes.pop();
        self.buf.extend(name_bytes);
        self.buf.extend_from_slice(&value.to_be_bytes());
        self.buf.extend_from_slice(&TRAILER);
        self
    }

    /// The block's first record, laid out as in real saves.
    pub(crate) fn marker_record(self, value: f64) -> Self {
        self.overlapped_record(MARKER, value)
    }

    pub(crate) fn terminator(mut self) -> Self {
        self.buf.extend_from_slice(&[0, 0]);
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        self.buf
    }
}
