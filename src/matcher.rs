//! Matcher - tolerant multi-signal motif search
//!
//! Brute-force scan over every origin window `(channel, start)` and every
//! candidate window of the same length:
//!
//! ```text
//! for length in span:
//!   for origin channel in 1..C:            // root channel 0 is never an origin
//!     for origin start with start + length < F:
//!       for candidate channel in origin..C:  // unordered channel pairs once
//!         for candidate start with start + length < F, except the origin itself:
//!           tolerant compare → count
//!     count > 1 → emit Match
//! ```
//!
//! Matches stream to a `MatchSink` in discovery order; the engine buffers
//! nothing and keeps no state between calls.
//!
//! License: MIT
//! Author: Moroya Sakamoto

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;
use core::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{SearchConfig, SearchParams, Tolerance};
use crate::error::ConfigError;
use crate::signal::SignalStore;

/// First channel used as a search origin (channel 0 is the root)
pub const FIRST_ORIGIN_CHANNEL: usize = 1;

/// A recurring window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Channel of the representative occurrence
    pub origin_channel: usize,
    /// Start frame of the representative occurrence
    pub origin_position: usize,
    /// Window length
    pub length: usize,
    /// Other windows matching this one under tolerance
    pub match_count: usize,
    /// Values of the representative occurrence
    pub pattern: Vec<f32>,
}

/// Outcome of one search
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepSummary {
    pub total_matches: usize,
    pub window_length: usize,
    /// Upper bound of a sweep, `None` for a single length
    pub window_length_max: Option<usize>,
    pub frame_tolerance: usize,
    pub distance_tolerance: f32,
    /// False when the search was cancelled before the last window
    pub completed: bool,
}

/// Receiver of matches
pub trait MatchSink {
    /// Called once per match, in discovery order
    fn on_match(&mut self, found: Match);

    /// Called once after the last match
    fn on_complete(&mut self, _summary: &SweepSummary) {}
}

impl MatchSink for Vec<Match> {
    fn on_match(&mut self, found: Match) {
        self.push(found);
    }
}

impl<S: MatchSink + ?Sized> MatchSink for &mut S {
    fn on_match(&mut self, found: Match) {
        (**self).on_match(found);
    }

    fn on_complete(&mut self, summary: &SweepSummary) {
        (**self).on_complete(summary);
    }
}

/// Closure adapter: `FnSink(|m| ...)`
pub struct FnSink<F>(pub F);

impl<F: FnMut(Match)> MatchSink for FnSink<F> {
    fn on_match(&mut self, found: Match) {
        (self.0)(found);
    }
}

/// Shared cancellation flag, checked once per origin window
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A window position inside the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WindowRef {
    pub channel: usize,
    pub start: usize,
}

/// Start frames that fit a window of `length`
///
/// A start `p` is accepted only while `p + length < frame_count`, so the
/// last frame of the series never ends a window.
pub fn window_starts(frame_count: usize, length: usize) -> Range<usize> {
    0..frame_count.saturating_sub(length)
}

/// Tolerant element-wise comparison of two equal-length windows
pub fn windows_match(origin: &[f32], candidate: &[f32], tolerance: &Tolerance) -> bool {
    debug_assert_eq!(origin.len(), candidate.len());
    let mut mismatches = 0usize;
    for (&a, &b) in origin.iter().zip(candidate) {
        let diff = if a > b { a - b } else { b - a };
        if diff <= tolerance.distance {
            continue;
        }
        if mismatches <= tolerance.frames {
            mismatches += 1;
        } else {
            return false;
        }
    }
    true
}

/// Count windows matching `origin`, reporting each compared pair to `probe`
///
/// Candidates come from channels `>= origin.channel` only; the origin
/// window itself is skipped.
pub(crate) fn count_matches<P>(
    store: &SignalStore,
    origin: WindowRef,
    length: usize,
    tolerance: &Tolerance,
    probe: &mut P,
) -> usize
where
    P: FnMut(WindowRef, WindowRef),
{
    let pattern = store.window(origin.channel, origin.start, length);
    let starts = window_starts(store.frame_count(), length);
    let mut count = 0;
    for channel in origin.channel..store.channel_count() {
        let series = store.channel(channel);
        for start in starts.clone() {
            if channel == origin.channel && start == origin.start {
                continue;
            }
            probe(origin, WindowRef { channel, start });
            if windows_match(pattern, &series[start..start + length], tolerance) {
                count += 1;
            }
        }
    }
    count
}

/// Build the match for `origin` when it recurs at least twice elsewhere
pub(crate) fn scan_origin<P>(
    store: &SignalStore,
    origin: WindowRef,
    length: usize,
    tolerance: &Tolerance,
    probe: &mut P,
) -> Option<Match>
where
    P: FnMut(WindowRef, WindowRef),
{
    let match_count = count_matches(store, origin, length, tolerance, probe);
    if match_count > 1 {
        Some(Match {
            origin_channel: origin.channel,
            origin_position: origin.start,
            length,
            match_count,
            pattern: store.window(origin.channel, origin.start, length).to_vec(),
        })
    } else {
        None
    }
}

/// Pattern search over a signal store
#[derive(Debug, Clone)]
pub struct PatternFinder {
    config: SearchConfig,
    cancel: Option<CancelToken>,
}

impl PatternFinder {
    pub fn new(config: SearchConfig) -> Self {
        Self { config, cancel: None }
    }

    /// Stop between origin windows once `token` is cancelled
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Lazy iterator over matches, in discovery order
    pub fn scan<'a>(&'a self, store: &'a SignalStore) -> PatternScan<'a> {
        PatternScan {
            store,
            tolerance: self.config.tolerance,
            cancel: self.cancel.as_ref(),
            length: self.config.span.min(),
            max_length: self.config.span.max(),
            channel: FIRST_ORIGIN_CHANNEL,
            position: 0,
            cancelled: false,
        }
    }

    /// Run the full search, streaming matches into `sink`
    pub fn run<S: MatchSink + ?Sized>(&self, store: &SignalStore, sink: &mut S) -> SweepSummary {
        self.log_start(store);
        let mut scan = self.scan(store);
        let mut total = 0;
        for found in scan.by_ref() {
            debug!(
                channel = found.origin_channel,
                position = found.origin_position,
                length = found.length,
                match_count = found.match_count,
                "pattern found"
            );
            total += 1;
            sink.on_match(found);
        }
        let summary = self.summary(total, !scan.is_cancelled());
        self.finish(&summary, sink);
        summary
    }

    pub(crate) fn log_start(&self, store: &SignalStore) {
        info!(
            channels = store.channel_count(),
            frames = store.frame_count(),
            window_length = self.config.span.min(),
            window_length_max = self.config.span.max(),
            frame_tolerance = self.config.tolerance.frames,
            distance_tolerance = self.config.tolerance.distance,
            "pattern search started"
        );
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    pub(crate) fn summary(&self, total_matches: usize, completed: bool) -> SweepSummary {
        SweepSummary {
            total_matches,
            window_length: self.config.span.min(),
            window_length_max: self.config.span.range_max(),
            frame_tolerance: self.config.tolerance.frames,
            distance_tolerance: self.config.tolerance.distance,
            completed,
        }
    }

    pub(crate) fn finish<S: MatchSink + ?Sized>(&self, summary: &SweepSummary, sink: &mut S) {
        if summary.completed {
            info!(total_matches = summary.total_matches, "pattern search finished");
        } else {
            warn!(total_matches = summary.total_matches, "pattern search cancelled");
        }
        sink.on_complete(summary);
    }
}

/// Validate `params`, then search `store` and stream matches into `sink`
///
/// Configuration errors are returned before the sink sees anything. A store
/// too short for the requested windows yields a summary with zero matches.
pub fn find_patterns<S: MatchSink + ?Sized>(
    params: &SearchParams,
    store: &SignalStore,
    sink: &mut S,
) -> Result<SweepSummary, ConfigError> {
    let config = params.validate()?;
    Ok(PatternFinder::new(config).run(store, sink))
}

/// Iterator over matches of a `PatternFinder`
///
/// Each `next` scans origin windows until one recurs. Cancellation is
/// checked before each origin window.
pub struct PatternScan<'a> {
    store: &'a SignalStore,
    tolerance: Tolerance,
    cancel: Option<&'a CancelToken>,
    length: usize,
    max_length: usize,
    channel: usize,
    position: usize,
    cancelled: bool,
}

impl PatternScan<'_> {
    /// True once the scan stopped on a cancellation request
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn next_origin(&mut self) -> Option<(WindowRef, usize)> {
        loop {
            // Longer windows never fit once this length has no start left
            if self.length > self.max_length
                || self.store.channel_count() <= FIRST_ORIGIN_CHANNEL
                || window_starts(self.store.frame_count(), self.length).is_empty()
            {
                return None;
            }
            if self.channel >= self.store.channel_count() {
                debug!(length = self.length, "window length done");
                self.length += 1;
                self.channel = FIRST_ORIGIN_CHANNEL;
                self.position = 0;
                continue;
            }
            if self.position >= window_starts(self.store.frame_count(), self.length).end {
                self.channel += 1;
                self.position = 0;
                continue;
            }
            let origin = WindowRef { channel: self.channel, start: self.position };
            self.position += 1;
            return Some((origin, self.length));
        }
    }
}

impl Iterator for PatternScan<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.cancelled {
            return None;
        }
        loop {
            if self.cancel.is_some_and(CancelToken::is_cancelled) {
                self.cancelled = true;
                return None;
            }
            let (origin, length) = self.next_origin()?;
            let found = scan_origin(self.store, origin, length, &self.tolerance, &mut |_: WindowRef, _: WindowRef| {});
            if found.is_some() {
                return found;
            }
        }
    }
}
