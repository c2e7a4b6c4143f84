use log::{debug, warn};

use crate::Record;

/// Largest name length (in UTF-16 units) accepted before the scan assumes
/// it has walked off the end of the block.
pub const MAX_NAME_UNITS: u16 = 100;

pub const VALUE_LEN: usize = 8;

/// Unexamined bytes between a record's value and the next length prefix.
pub const TRAILER_LEN: usize = 8;

pub const SENTINEL_NAME: &str = "<Decode Error>";

/// Leading bytes of big-endian doubles of either sign whose exponent puts
/// them around 1.0 (magnitudes from about 3e-5 up to 131072).
pub const OVERLAP_LEAD_BYTES: [u8; 4] = [0x3F, 0x40, 0xBF, 0xC0];

/// Where a record's value starts relative to the end of its name region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueBoundary {
    /// The last byte of the name region is the value's first byte.
    Overlap,
    /// The value starts right after the name region.
    NoOverlap,
}

impl ValueBoundary {
    fn value_offset(self, name_end: usize) -> usize {
        match self {
            ValueBoundary::Overlap => name_end - 1,
            ValueBoundary::NoOverlap => name_end,
        }
    }
}

/// Decide the value boundary from the byte just before the nominal name end.
///
/// For a plain ASCII name that byte is the zero high byte of the last
/// character, so anything that looks like the lead byte of a difficulty
/// multiplier is taken as a shared byte. Multipliers outside the covered
/// magnitude range are misread as non-overlapping.
pub fn resolve_overlap(byte: u8) -> ValueBoundary {
    if OVERLAP_LEAD_BYTES.contains(&byte) {
        ValueBoundary::Overlap
    } else {
        ValueBoundary::NoOverlap
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordName {
    Decoded(String),
    Sentinel,
}

impl RecordName {
    /// Decode a raw UTF-16LE name region. With an overlapping value the
    /// region's final byte belongs to the value, so the last unit is
    /// rebuilt from its low byte alone.
    pub fn decode(raw: &[u8], boundary: ValueBoundary) -> Self {
        let mut units: Vec<u16> = raw
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        if boundary == ValueBoundary::Overlap {
            if let Some(last) = units.last_mut() {
                *last &= 0x00FF;
            }
        }

        match String::from_utf16(&units) {
            Ok(name) => RecordName::Decoded(name),
            Err(_) => RecordName::Sentinel,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            RecordName::Decoded(name) => name,
            RecordName::Sentinel => SENTINEL_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    EndOfBuffer,
    NameLength(u16),
    TruncatedName,
    TruncatedValue,
}

enum Step {
    Record { record: Record, next: usize },
    Stop(StopReason),
}

fn read_record(buf: &[u8], cursor: usize) -> Step {
    let Some(len_bytes) = buf.get(cursor..cursor + 2) else {
        return Step::Stop(StopReason::EndOfBuffer);
    };
    let name_units = u16::from_le_bytes([len_bytes[0], len_bytes[1]]);
    if name_units == 0 || name_units > MAX_NAME_UNITS {
        return Step::Stop(StopReason::NameLength(name_units));
    }

    let name_start = cursor + 2;
    let name_end = name_start + name_units as usize * 2;
    let Some(raw_name) = buf.get(name_start..name_end) else {
        return Step::Stop(StopReason::TruncatedName);
    };

    let boundary = resolve_overlap(buf[name_end - 1]);
    let value_offset = boundary.value_offset(name_end);

    let Some(value_bytes) = buf.get(value_offset..value_offset + VALUE_LEN) else {
        return Step::Stop(StopReason::TruncatedValue);
    };
    let mut be = [0u8; VALUE_LEN];
    be.copy_from_slice(value_bytes);
    let value = f64::from_be_bytes(be);

    let decoded = RecordName::decode(raw_name, boundary);
    if decoded == RecordName::Sentinel {
        warn!("Could not decode record name at offset {name_start}");
    }
    let name = decoded.into_string();

    debug!("Record {name:?} = {value} at {value_offset} ({boundary:?})");

    Step::Record {
        record: Record {
            name,
            value_offset,
            value,
        },
        next: value_offset + VALUE_LEN + TRAILER_LEN,
    }
}

/// Walk the records of a block starting at the length prefix `start`.
///
/// Scanning ends at the first record that fails a sanity check; whatever
/// was read before it is kept.
pub fn scan(buf: &[u8], start: usize) -> Vec<Record> {
    let mut records = Vec::new();
    let mut cursor = start;

    loop {
        match read_record(buf, cursor) {
            Step::Record { record, next } => {
                records.push(record);
                cursor = next;
            }
            Step::Stop(reason) => {
                debug!("Scan stopped at offset {cursor}: {reason:?}");
                break;
            }
        }
    }

    records
}
