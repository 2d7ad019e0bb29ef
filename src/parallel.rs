//! Parallel sweep - rayon over `(length, origin channel)` units
//!
//! Each unit scans every origin window of one channel at one length. Units
//! are collected in sweep order before anything reaches the sink, so the
//! emitted sequence is identical to `PatternFinder::run` and the sink needs
//! no synchronization.
//!
//! License: MIT
//! Author: Moroya Sakamoto

use alloc::vec::Vec;

use rayon::prelude::*;
use tracing::debug;

use crate::matcher::{
    scan_origin, window_starts, MatchSink, Match, PatternFinder, SweepSummary, WindowRef,
    FIRST_ORIGIN_CHANNEL,
};
use crate::signal::SignalStore;

impl PatternFinder {
    /// Same result as `run`, with origin scanning spread over rayon's pool
    ///
    /// Cancellation is still checked per origin window; units that observe
    /// it stop early and the sweep reports `completed = false`.
    pub fn run_parallel<S: MatchSink + ?Sized>(&self, store: &SignalStore, sink: &mut S) -> SweepSummary {
        self.log_start(store);
        let tolerance = self.config().tolerance;

        // Lengths past `frame_count - 1` have no window start
        let span = self.config().span;
        let fit_max = span.max().min(store.frame_count().saturating_sub(1));
        let units: Vec<(usize, usize)> = (span.min()..=fit_max)
            .flat_map(|length| {
                (FIRST_ORIGIN_CHANNEL..store.channel_count()).map(move |channel| (length, channel))
            })
            .collect();
        debug!(units = units.len(), "parallel sweep units");

        let results: Vec<(Vec<Match>, bool)> = units
            .into_par_iter()
            .map(|(length, channel)| {
                let mut found = Vec::new();
                for start in window_starts(store.frame_count(), length) {
                    if self.is_cancelled() {
                        return (found, false);
                    }
                    let origin = WindowRef { channel, start };
                    if let Some(m) = scan_origin(store, origin, length, &tolerance, &mut |_: WindowRef, _: WindowRef| {}) {
                        found.push(m);
                    }
                }
                (found, true)
            })
            .collect();

        let mut total = 0;
        let mut completed = true;
        for (found, unit_completed) in results {
            if !completed {
                break;
            }
            total += found.len();
            for m in found {
                sink.on_match(m);
            }
            completed = unit_completed;
        }
        let summary = self.summary(total, completed);
        self.finish(&summary, sink);
        summary
    }
}
