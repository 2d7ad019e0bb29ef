//! Settings file - TOML defaults for the command-line tool
//!
//! ```toml
//! [search]
//! window_length = 4
//! window_length_max = 8
//! frame_tolerance = 1
//! distance_tolerance = 0.05
//!
//! [input]
//! files = ["walk01.txt", "walk02.txt"]
//! discard = 6
//! bones = 31
//!
//! [logging]
//! level = "info"
//! ```
//!
//! License: MIT
//! Author: Moroya Sakamoto

use std::path::{Path, PathBuf};
use std::string::{String, ToString};
use std::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::config::{SearchConfig, SearchParams};
use crate::error::SettingsError;
use crate::mocap::MocapLayout;

/// Recording inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub files: Vec<PathBuf>,
    pub discard: usize,
    pub bones: usize,
    pub root: usize,
    /// Use the rayon sweep when built with `parallel`
    pub parallel: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        let layout = MocapLayout::default();
        Self {
            files: Vec::new(),
            discard: layout.discard,
            bones: layout.bones,
            root: layout.root,
            parallel: false,
        }
    }
}

impl InputSettings {
    pub fn layout(&self) -> MocapLayout {
        MocapLayout { discard: self.discard, bones: self.bones, root: self.root }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// Main settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotifSettings {
    pub search: SearchParams,
    pub input: InputSettings,
    pub logging: LoggingSettings,
}

impl MotifSettings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save settings to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validated search configuration
    pub fn search_config(&self) -> Result<SearchConfig, SettingsError> {
        Ok(self.search.validate()?)
    }
}
