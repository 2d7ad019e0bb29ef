//! Signal store - per-joint distance-from-root table
//!
//! An immutable `channel × frame` table of scalar distances, stored
//! channel-major so that every window is a contiguous slice. Per-channel
//! mean and standard deviation plus the global maximum are computed once
//! at construction.
//!
//! License: MIT
//! Author: Moroya Sakamoto

use alloc::vec::Vec;

use crate::error::SignalError;
use crate::joint::{sqrt, Vec3k};

/// Summary statistics of one channel
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ChannelStats {
    /// Mean distance from root
    pub mean: f32,
    /// Population standard deviation
    pub std_dev: f32,
}

/// Rectangular table of distance signals
#[derive(Debug, Clone)]
pub struct SignalStore {
    values: Vec<f32>,
    channel_count: usize,
    frame_count: usize,
    stats: Vec<ChannelStats>,
    max_value: f32,
}

impl SignalStore {
    /// Build from one value vector per channel
    ///
    /// All channels must have the same length.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Result<Self, SignalError> {
        let frame_count = channels.first().ok_or(SignalError::Empty)?.len();
        let channel_count = channels.len();

        let mut values = Vec::with_capacity(channel_count * frame_count);
        for (channel, series) in channels.into_iter().enumerate() {
            if series.len() != frame_count {
                return Err(SignalError::Ragged {
                    channel,
                    expected: frame_count,
                    found: series.len(),
                });
            }
            values.extend_from_slice(&series);
        }
        Ok(Self::with_values(values, channel_count, frame_count))
    }

    /// Reduce joint positions to distances from the root joint
    ///
    /// Each frame is one slice of joint positions; every frame must carry
    /// the same number of joints.
    pub fn from_frames<F: AsRef<[Vec3k]>>(frames: &[F], root: usize) -> Result<Self, SignalError> {
        let channel_count = frames.first().ok_or(SignalError::Empty)?.as_ref().len();
        if root >= channel_count {
            return Err(SignalError::MissingRoot { root, channels: channel_count });
        }
        let frame_count = frames.len();

        let mut values = alloc::vec![0.0f32; channel_count * frame_count];
        for (frame, joints) in frames.iter().enumerate() {
            let joints = joints.as_ref();
            if joints.len() != channel_count {
                return Err(SignalError::RaggedFrame {
                    frame,
                    expected: channel_count,
                    found: joints.len(),
                });
            }
            let origin = joints[root];
            for (channel, joint) in joints.iter().enumerate() {
                values[channel * frame_count + frame] = joint.distance(origin);
            }
        }
        Ok(Self::with_values(values, channel_count, frame_count))
    }

    fn with_values(values: Vec<f32>, channel_count: usize, frame_count: usize) -> Self {
        let mut stats = Vec::with_capacity(channel_count);
        if frame_count > 0 {
            let n = frame_count as f32;
            for series in values.chunks_exact(frame_count) {
                let mean = series.iter().sum::<f32>() / n;
                let mut sq = 0.0f32;
                for &v in series {
                    let d = v - mean;
                    sq += d * d;
                }
                stats.push(ChannelStats { mean, std_dev: sqrt(sq / n) });
            }
        }
        stats.resize(channel_count, ChannelStats { mean: 0.0, std_dev: 0.0 });

        let max_value = if values.is_empty() {
            0.0
        } else {
            values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
        };

        Self { values, channel_count, frame_count, stats, max_value }
    }

    /// Number of channels (joints)
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Number of frames across all concatenated recordings
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Value at `(channel, frame)`
    ///
    /// Panics when either index is out of range.
    pub fn value(&self, channel: usize, frame: usize) -> f32 {
        assert!(channel < self.channel_count && frame < self.frame_count,
            "({channel}, {frame}) outside {}x{} signal table", self.channel_count, self.frame_count);
        self.values[channel * self.frame_count + frame]
    }

    /// Full series of one channel
    pub fn channel(&self, channel: usize) -> &[f32] {
        let start = channel * self.frame_count;
        &self.values[start..start + self.frame_count]
    }

    /// Values of `channel` over `[start, start + len)`
    pub fn window(&self, channel: usize, start: usize, len: usize) -> &[f32] {
        &self.channel(channel)[start..start + len]
    }

    /// Statistics of one channel
    pub fn stats(&self, channel: usize) -> ChannelStats {
        self.stats[channel]
    }

    /// Largest value across all channels and frames (0 for an empty table)
    pub fn max_value(&self) -> f32 {
        self.max_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_from_channels_layout() {
        let store = SignalStore::from_channels(vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 2.0, 3.0],
        ]).unwrap();
        assert_eq!(store.channel_count(), 2);
        assert_eq!(store.frame_count(), 3);
        assert_eq!(store.value(1, 2), 3.0);
        assert_eq!(store.window(1, 1, 2), &[2.0, 3.0]);
    }

    #[test]
    fn test_ragged_channels_rejected() {
        let err = SignalStore::from_channels(vec![vec![0.0; 4], vec![1.0; 3]]).unwrap_err();
        assert_eq!(err, SignalError::Ragged { channel: 1, expected: 4, found: 3 });
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(SignalStore::from_channels(Vec::new()).unwrap_err(), SignalError::Empty);
    }

    #[test]
    fn test_stats_population_std_dev() {
        let store = SignalStore::from_channels(vec![
            vec![0.0; 4],
            vec![2.0, 4.0, 4.0, 6.0],
        ]).unwrap();
        let s = store.stats(1);
        assert_eq!(s.mean, 4.0);
        // sqrt((4 + 0 + 0 + 4) / 4)
        assert_eq!(s.std_dev, core::f32::consts::SQRT_2);
        assert_eq!(store.stats(0), ChannelStats { mean: 0.0, std_dev: 0.0 });
        assert_eq!(store.max_value(), 6.0);
    }

    #[test]
    fn test_zero_frames() {
        let store = SignalStore::from_channels(vec![Vec::new(), Vec::new()]).unwrap();
        assert_eq!(store.frame_count(), 0);
        assert_eq!(store.stats(1).mean, 0.0);
        assert!(store.channel(1).is_empty());
    }

    #[test]
    fn test_from_frames_distance_to_root() {
        let frames = vec![
            [Vec3k::new(1.0, 1.0, 1.0), Vec3k::new(4.0, 5.0, 1.0)],
            [Vec3k::new(0.0, 0.0, 0.0), Vec3k::new(0.0, 0.0, 2.0)],
        ];
        let store = SignalStore::from_frames(&frames, 0).unwrap();
        assert_eq!(store.channel_count(), 2);
        assert_eq!(store.frame_count(), 2);
        assert_eq!(store.value(0, 0), 0.0);
        assert_eq!(store.value(1, 0), 5.0);
        assert_eq!(store.value(1, 1), 2.0);
        assert_eq!(store.max_value(), 5.0);
    }

    #[test]
    fn test_from_frames_bad_root() {
        let frames = vec![[Vec3k::ZERO; 3]];
        let err = SignalStore::from_frames(&frames, 3).unwrap_err();
        assert_eq!(err, SignalError::MissingRoot { root: 3, channels: 3 });
    }

    #[test]
    fn test_from_frames_ragged() {
        let frames: Vec<Vec<Vec3k>> = vec![vec![Vec3k::ZERO; 3], vec![Vec3k::ZERO; 2]];
        let err = SignalStore::from_frames(&frames, 0).unwrap_err();
        assert_eq!(err, SignalError::RaggedFrame { frame: 1, expected: 3, found: 2 });
    }

    #[test]
    #[should_panic]
    fn test_value_out_of_range_panics() {
        let store = SignalStore::from_channels(vec![vec![1.0, 2.0]]).unwrap();
        store.value(0, 2);
    }
}
