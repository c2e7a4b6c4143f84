use serde::{Deserialize, Serialize};

use crate::scanner::VALUE_LEN;
use crate::{EditorError, Result};

/// A new value for the 8-byte window at `value_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edit {
    pub value_offset: usize,
    pub value: f64,
}

/// Overwrite each edit's value window with the big-endian encoding of the
/// new value. Every edit is bounds-checked before anything is written, so
/// a rejected list leaves the buffer untouched.
pub fn patch(buf: &mut [u8], edits: &[Edit]) -> Result<()> {
    for edit in edits {
        let fits = edit
            .value_offset
            .checked_add(VALUE_LEN)
            .map_or(false, |end| end <= buf.len());
        if !fits {
            return Err(EditorError::EditOutOfBounds {
                offset: edit.value_offset,
                len: buf.len(),
            });
        }
    }

    for edit in edits {
        let window = &mut buf[edit.value_offset..edit.value_offset + VALUE_LEN];
        window.copy_from_slice(&edit.value.to_be_bytes());
    }

    Ok(())
}
