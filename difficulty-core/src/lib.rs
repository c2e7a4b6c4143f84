use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod codec;
pub mod config;
pub mod locator;
pub mod patch;
pub mod scanner;

#[cfg(test)]
mod fixture;

pub use codec::Container;
pub use config::{EditorConfig, Preset};
pub use patch::Edit;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config file error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("edit at offset {offset} does not fit in a {len}-byte buffer")]
    EditOutOfBounds { offset: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, EditorError>;

/// One difficulty setting found in the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    /// Absolute offset of the big-endian value inside the decompressed buffer.
    pub value_offset: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadWarning {
    #[error("could not find difficulty settings block (CIVIC_OPINION not found)")]
    BlockNotFound,
}

/// A decompressed save together with the records scanned from it.
///
/// The buffer never leaves this struct; callers get copies of the records
/// and hand back [`Edit`]s.
#[derive(Debug, Clone)]
pub struct SaveFile {
    buffer: Vec<u8>,
    container: Container,
    records: Vec<Record>,
    warnings: Vec<LoadWarning>,
}

impl SaveFile {
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.clone()
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Patch the buffer and return the compressed bytes to write.
    ///
    /// Every edit must target a record scanned from this buffer.
    pub fn save(&mut self, edits: &[Edit]) -> Result<Vec<u8>> {
        if let Some(stray) = edits
            .iter()
            .find(|e| !self.records.iter().any(|r| r.value_offset == e.value_offset))
        {
            return Err(EditorError::Config(format!(
                "edit at offset {} does not belong to a scanned record",
                stray.value_offset
            )));
        }

        let bytes = save(&mut self.buffer, edits)?;

        for edit in edits {
            if let Some(record) = self
                .records
                .iter_mut()
                .find(|r| r.value_offset == edit.value_offset)
            {
                record.value = edit.value;
            }
        }

        Ok(bytes)
    }
}

/// Decompress (or take as raw) a save file and scan its difficulty block.
pub fn load(raw: &[u8]) -> SaveFile {
    let decoded = codec::decode(raw);
    let mut warnings = Vec::new();

    let records = match locator::locate(&decoded.buffer) {
        Some(start) => {
            info!("Scanning started at offset {start}");
            let records = scanner::scan(&decoded.buffer, start);
            info!("Found {} settings.", records.len());
            records
        }
        None => {
            let warning = LoadWarning::BlockNotFound;
            warn!("{warning}");
            warnings.push(warning);
            Vec::new()
        }
    };

    SaveFile {
        buffer: decoded.buffer,
        container: decoded.container,
        records,
        warnings,
    }
}

/// Set every record to the same value, e.g. from a [`Preset`].
pub fn bulk_assign(records: &mut [Record], value: f64) {
    for record in records {
        record.value = value;
    }
}

/// One edit per record, carrying its current value.
pub fn edits_from_records(records: &[Record]) -> Vec<Edit> {
    records
        .iter()
        .map(|r| Edit {
            value_offset: r.value_offset,
            value: r.value,
        })
        .collect()
}

/// Apply edits in place, then compress the whole buffer.
pub fn save(buffer: &mut [u8], edits: &[Edit]) -> Result<Vec<u8>> {
    patch::patch(buffer, edits)?;
    codec::encode(buffer)
}

pub fn load_path(path: &Path) -> Result<SaveFile> {
    let raw = fs::read(path)?;
    Ok(load(&raw))
}

/// `<dir>/<prefix><file name>` next to the input.
pub fn default_output_path(input: &Path, prefix: &str) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{prefix}{file_name}"))
}

/// Write through a sibling temp file so a failed write leaves no partial save.
pub fn write_save(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            EditorError::Config(format!("output path has no file name: {}", path.display()))
        })?;
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    let written = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
