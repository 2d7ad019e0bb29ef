//! ALICE-Motif - Tolerant motif search over motion-capture signals
//!
//! Reduces every joint of a motion-capture recording to its distance from
//! the root joint, then finds windows that recur (within one joint or across
//! joints) under a per-sample distance tolerance and a mismatch budget.
//! The search core is `no_std` + `alloc`; file reading, reporting and
//! settings need the `std` feature, the rayon sweep needs `parallel`.
//!
//! Author: Moroya Sakamoto

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod config;
pub mod error;
pub mod joint;
pub mod matcher;
pub mod signal;

#[cfg(feature = "std")]
pub mod mocap;
#[cfg(feature = "std")]
pub mod report;
#[cfg(feature = "std")]
pub mod settings;
#[cfg(feature = "parallel")]
pub mod parallel;

pub use config::{SearchConfig, SearchParams, Tolerance, WindowSpan};
pub use error::{ConfigError, SignalError};
pub use joint::{bone_name, Vec3k, BONE_COUNT, ROOT_BONE};
pub use matcher::{
    find_patterns, windows_match, window_starts, CancelToken, FnSink, Match, MatchSink,
    PatternFinder, PatternScan, SweepSummary,
};
pub use signal::{ChannelStats, SignalStore};

#[cfg(feature = "std")]
pub use error::{MocapError, SettingsError};
#[cfg(feature = "std")]
pub use mocap::{load_recordings, MocapLayout, RecordingSet};
#[cfg(feature = "std")]
pub use report::{JsonLinesReport, TextReport};
#[cfg(feature = "std")]
pub use settings::MotifSettings;
