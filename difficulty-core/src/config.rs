use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// A named value applied to every record at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub value: f64,
}

impl Preset {
    fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub presets: Vec<Preset>,
    /// Prepended to the input file name when no output path is given.
    pub output_prefix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            presets: vec![
                Preset::new("normal", 1.0),
                Preset::new("hard", 0.4),
                Preset::new("easy", 1.5),
            ],
            output_prefix: "edited_".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }
}

pub fn config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir().or_else(dirs::data_dir)?;
    base.push("SyxDifficulty");
    base.push("config.json");
    Some(base)
}

/// Read a config file, falling back to defaults if it is missing or invalid.
pub fn load_config_from(path: &Path) -> EditorConfig {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return EditorConfig::default(),
    };

    match serde_json::from_str::<EditorConfig>(&data) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Ignoring invalid config {}: {e}", path.display());
            EditorConfig::default()
        }
    }
}

pub fn load_config() -> EditorConfig {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => EditorConfig::default(),
    }
}

pub fn save_config_to(path: &Path, cfg: &EditorConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(cfg)?;
    fs::write(path, data)?;
    Ok(())
}
