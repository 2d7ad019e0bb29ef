//! Error types
//!
//! License: MIT
//! Author: Moroya Sakamoto

use thiserror::Error;

/// Invalid search parameters, reported before any scanning starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("window length must be at least 2, got {0}")]
    WindowTooShort(i64),

    #[error("window length range must increase: max {max} is not greater than {min}")]
    InvalidRange { min: i64, max: i64 },

    #[error("frame tolerance must not be negative, got {0}")]
    NegativeFrameTolerance(i64),

    #[error("distance tolerance must be a non-negative number, got {0}")]
    InvalidDistanceTolerance(f32),
}

/// Malformed input to the signal store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("signal table has no channels")]
    Empty,

    #[error("channel {channel} has {found} values, expected {expected}")]
    Ragged { channel: usize, expected: usize, found: usize },

    #[error("frame {frame} has {found} joints, expected {expected}")]
    RaggedFrame { frame: usize, expected: usize, found: usize },

    #[error("root joint {root} is outside a {channels}-joint frame")]
    MissingRoot { root: usize, channels: usize },
}

/// Failure while reading motion-capture recordings
#[cfg(feature = "std")]
#[derive(Error, Debug)]
pub enum MocapError {
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}, column {column}: cannot parse {value:?} as a number")]
    Parse { line: usize, column: usize, value: std::string::String },

    #[error("line {line} has {found} values, expected at least {expected}")]
    ShortLine { line: usize, expected: usize, found: usize },

    #[error("{}: {source}", path.display())]
    InFile {
        path: std::path::PathBuf,
        #[source]
        source: std::boxed::Box<MocapError>,
    },

    #[error(transparent)]
    Signal(#[from] SignalError),
}

/// Failure while loading or saving a settings file
#[cfg(feature = "std")]
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
