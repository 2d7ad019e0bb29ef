//! Search configuration - raw parameters and their validated form
//!
//! `SearchParams` carries user-supplied numbers as-is (possibly negative or
//! inverted); `SearchParams::validate` turns them into a `SearchConfig` the
//! matcher can run without further checks.
//!
//! License: MIT
//! Author: Moroya Sakamoto

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest window the matcher accepts
pub const MIN_WINDOW_LENGTH: usize = 2;

/// Raw search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Window length (or first length of a sweep)
    pub window_length: i64,
    /// Last length of a sweep, inclusive
    pub window_length_max: Option<i64>,
    /// Mismatched samples tolerated per comparison (see `Tolerance`)
    pub frame_tolerance: i64,
    /// Largest per-sample difference still counted as equal
    pub distance_tolerance: f32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            window_length: 4,
            window_length_max: None,
            frame_tolerance: 0,
            distance_tolerance: 0.0,
        }
    }
}

impl SearchParams {
    /// Single window length
    pub fn single(window_length: i64, frame_tolerance: i64, distance_tolerance: f32) -> Self {
        Self { window_length, window_length_max: None, frame_tolerance, distance_tolerance }
    }

    /// Inclusive sweep over `window_length..=window_length_max`
    pub fn range(
        window_length: i64,
        window_length_max: i64,
        frame_tolerance: i64,
        distance_tolerance: f32,
    ) -> Self {
        Self {
            window_length,
            window_length_max: Some(window_length_max),
            frame_tolerance,
            distance_tolerance,
        }
    }

    /// Check every parameter and build the matcher configuration
    pub fn validate(&self) -> Result<SearchConfig, ConfigError> {
        if self.window_length < MIN_WINDOW_LENGTH as i64 {
            return Err(ConfigError::WindowTooShort(self.window_length));
        }
        let min = self.window_length as usize;
        let span = match self.window_length_max {
            None => WindowSpan::Single(min),
            Some(max) if max > self.window_length => WindowSpan::Range { min, max: max as usize },
            Some(max) => {
                return Err(ConfigError::InvalidRange { min: self.window_length, max });
            }
        };
        if self.frame_tolerance < 0 {
            return Err(ConfigError::NegativeFrameTolerance(self.frame_tolerance));
        }
        // NaN fails the comparison as well
        if !(self.distance_tolerance >= 0.0) {
            return Err(ConfigError::InvalidDistanceTolerance(self.distance_tolerance));
        }
        Ok(SearchConfig {
            span,
            tolerance: Tolerance {
                frames: self.frame_tolerance as usize,
                distance: self.distance_tolerance,
            },
        })
    }
}

/// Window lengths covered by one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSpan {
    Single(usize),
    /// Inclusive, `max > min`
    Range { min: usize, max: usize },
}

impl WindowSpan {
    /// First (smallest) length
    pub fn min(self) -> usize {
        match self {
            Self::Single(len) => len,
            Self::Range { min, .. } => min,
        }
    }

    /// Last (largest) length
    pub fn max(self) -> usize {
        match self {
            Self::Single(len) => len,
            Self::Range { max, .. } => max,
        }
    }

    /// Upper bound of a sweep, `None` for a single length
    pub fn range_max(self) -> Option<usize> {
        match self {
            Self::Single(_) => None,
            Self::Range { max, .. } => Some(max),
        }
    }

    /// Lengths in sweep order (ascending)
    pub fn lengths(self) -> core::ops::RangeInclusive<usize> {
        self.min()..=self.max()
    }
}

/// Comparison tolerances
///
/// A sample pair matches when `|a - b| <= distance`. A non-matching pair
/// is tolerated while the mismatches charged so far are `<= frames`, which
/// admits `frames + 1` mismatches per window before the comparison fails.
///
/// Note: `frames = 0` still tolerates one mismatched sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub frames: usize,
    pub distance: f32,
}

/// Validated search configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub span: WindowSpan,
    pub tolerance: Tolerance,
}
