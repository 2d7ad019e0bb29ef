//! Recording reader - text motion-capture files to a signal store
//!
//! One frame per line, whitespace/tab separated floats:
//!
//! ```text
//! [discard values] [x of bone 0..N] [y of bone 0..N] [z of bone 0..N] [ignored...]
//! ```
//!
//! Recordings are concatenated in the order given into one frame axis.
//!
//! License: MIT
//! Author: Moroya Sakamoto

use std::boxed::Box;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::vec::Vec;

use tracing::{debug, info, trace};

use crate::error::MocapError;
use crate::joint::{Vec3k, BONE_COUNT, ROOT_BONE};
use crate::signal::SignalStore;

/// Column layout of a recording line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MocapLayout {
    /// Leading values skipped on every line
    pub discard: usize,
    /// Bones per frame
    pub bones: usize,
    /// Bone the distances are measured from
    pub root: usize,
}

impl Default for MocapLayout {
    fn default() -> Self {
        Self { discard: 6, bones: BONE_COUNT, root: ROOT_BONE }
    }
}

impl MocapLayout {
    /// Minimum number of values a line must carry
    pub fn values_per_line(&self) -> usize {
        self.discard + 3 * self.bones
    }

    /// Parse one line into joint positions (`line` is 1-based, for errors)
    pub fn parse_frame(&self, text: &str, line: usize) -> Result<Vec<Vec3k>, MocapError> {
        let needed = self.values_per_line();
        let mut coords = Vec::with_capacity(3 * self.bones);
        let mut found = 0;
        for (column, token) in text.split_whitespace().enumerate() {
            found += 1;
            if column < self.discard || column >= needed {
                continue;
            }
            let value = token.parse::<f32>().map_err(|_| MocapError::Parse {
                line,
                column: column + 1,
                value: token.into(),
            })?;
            coords.push(value);
        }
        if found < needed {
            return Err(MocapError::ShortLine { line, expected: needed, found });
        }

        let (xs, rest) = coords.split_at(self.bones);
        let (ys, zs) = rest.split_at(self.bones);
        Ok(xs.iter()
            .zip(ys)
            .zip(zs)
            .map(|((&x, &y), &z)| Vec3k::new(x, y, z))
            .collect())
    }
}

/// Parse every non-blank line of a recording
pub fn parse_recording<R: BufRead>(reader: R, layout: &MocapLayout) -> Result<Vec<Vec<Vec3k>>, MocapError> {
    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            trace!(line = index + 1, "blank line skipped");
            continue;
        }
        frames.push(layout.parse_frame(&line, index + 1)?);
    }
    Ok(frames)
}

/// One input file of a concatenated set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingInfo {
    pub path: PathBuf,
    pub frame_count: usize,
}

/// Concatenated recordings and their signal store
#[derive(Debug, Clone)]
pub struct RecordingSet {
    pub store: SignalStore,
    pub recordings: Vec<RecordingInfo>,
}

impl RecordingSet {
    /// Map a global frame to `(recording index, frame within that recording)`
    pub fn locate(&self, frame: usize) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (index, rec) in self.recordings.iter().enumerate() {
            if frame < offset + rec.frame_count {
                return Some((index, frame - offset));
            }
            offset += rec.frame_count;
        }
        None
    }
}

/// Read, reduce and concatenate recordings in the given order
pub fn load_recordings<P: AsRef<Path>>(paths: &[P], layout: &MocapLayout) -> Result<RecordingSet, MocapError> {
    let mut frames = Vec::new();
    let mut recordings = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let parsed = File::open(path)
            .map_err(MocapError::from)
            .and_then(|file| parse_recording(BufReader::new(file), layout))
            .map_err(|source| MocapError::InFile { path: path.to_path_buf(), source: Box::new(source) })?;
        info!(path = %path.display(), frames = parsed.len(), "recording loaded");
        recordings.push(RecordingInfo { path: path.to_path_buf(), frame_count: parsed.len() });
        frames.extend(parsed);
    }

    let store = SignalStore::from_frames(&frames, layout.root)?;
    debug!(
        recordings = recordings.len(),
        frames = store.frame_count(),
        channels = store.channel_count(),
        "signal store built"
    );
    Ok(RecordingSet { store, recordings })
}
