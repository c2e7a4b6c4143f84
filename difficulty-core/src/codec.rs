use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use log::info;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::Result;

/// How a save file was stored on disk when it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Container {
    /// zlib stream; the buffer is its decompressed payload.
    Compressed,
    /// Not a zlib stream; the bytes were taken as the buffer directly.
    Raw,
}

pub struct Decoded {
    pub buffer: Vec<u8>,
    pub container: Container,
}

/// Decompress a save file. Anything that is not a valid zlib stream is
/// treated as an already-decompressed buffer instead of an error.
pub fn decode(raw: &[u8]) -> Decoded {
    if raw.is_empty() {
        return Decoded {
            buffer: Vec::new(),
            container: Container::Raw,
        };
    }

    let mut decoder = ZlibDecoder::new(raw);
    let mut out = Vec::with_capacity(raw.len().saturating_mul(4));
    match decoder.read_to_end(&mut out) {
        Ok(_) => {
            info!("File decompressed successfully ({} -> {} bytes).", raw.len(), out.len());
            Decoded {
                buffer: out,
                container: Container::Compressed,
            }
        }
        Err(e) => {
            info!("File read as raw, assuming already decompressed ({e}).");
            Decoded {
                buffer: raw.to_vec(),
                container: Container::Raw,
            }
        }
    }
}

/// Compress a buffer for writing. Saves are always written compressed,
/// whatever the input container was.
pub fn encode(buffer: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(buffer)?;
    let out = encoder.finish()?;
    Ok(out)
}
