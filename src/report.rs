//! Reports - match sinks that write to any `io::Write`
//!
//! `TextReport` prints a table row per match followed by the criteria used;
//! `JsonLinesReport` writes one JSON object per match and a final summary
//! object. Both keep the first I/O error, stop writing, and hand it back
//! from `finish`.
//!
//! License: MIT
//! Author: Moroya Sakamoto

use std::format;
use std::io::{self, Write};
use std::string::String;
use std::vec::Vec;

use serde::Serialize;
use tracing::warn;

use crate::joint::bone_name;
use crate::matcher::{Match, MatchSink, SweepSummary};

/// "Pattern length = 4 with distance threshold = 0.5, and frame threshold = 1."
pub fn describe_criteria(summary: &SweepSummary) -> String {
    let lengths = match summary.window_length_max {
        Some(max) => format!("Pattern lengths from {} to {}", summary.window_length, max),
        None => format!("Pattern length = {}", summary.window_length),
    };
    format!(
        "{lengths} with distance threshold = {}, and frame threshold = {}.",
        summary.distance_tolerance, summary.frame_tolerance
    )
}

fn format_pattern(pattern: &[f32]) -> String {
    let values: Vec<String> = pattern.iter().map(|v| format!("{v:.4}")).collect();
    format!("[{}]", values.join(", "))
}

/// Plain-text table report
pub struct TextReport<W: Write> {
    out: W,
    rows: usize,
    error: Option<io::Error>,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out, rows: 0, error: None }
    }

    /// Rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the writer, or the first write error
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut W) -> io::Result<()>,
    {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = f(&mut self.out) {
            warn!(error = %err, "report write failed, further output dropped");
            self.error = Some(err);
        }
    }
}

impl<W: Write> MatchSink for TextReport<W> {
    fn on_match(&mut self, found: Match) {
        let header = self.rows == 0;
        self.rows += 1;
        self.write_with(|out| {
            if header {
                writeln!(out, "{:>4}  {:<16} {:>7} {:>6} {:>7}  Pattern",
                    "Bone", "Name", "Frame", "Length", "Matches")?;
            }
            writeln!(out, "{:>4}  {:<16} {:>7} {:>6} {:>7}  {}",
                found.origin_channel,
                bone_name(found.origin_channel),
                found.origin_position,
                found.length,
                found.match_count,
                format_pattern(&found.pattern))
        });
    }

    fn on_complete(&mut self, summary: &SweepSummary) {
        let criteria = describe_criteria(summary);
        self.write_with(|out| {
            if !summary.completed {
                writeln!(out, "Search cancelled before completion; results are partial.")?;
            }
            if summary.total_matches == 0 {
                writeln!(out, "Your request did not find any results. Please try again.")?;
                writeln!(out, "Query criteria used: {criteria}")
            } else {
                writeln!(out)?;
                writeln!(out, "Query criteria used: {criteria}")?;
                writeln!(out, "Found {} matches across all bone streams.", summary.total_matches)
            }
        });
    }
}

#[derive(Serialize)]
struct SummaryLine<'a> {
    summary: &'a SweepSummary,
}

/// One JSON object per line: every match, then `{"summary": ...}`
pub struct JsonLinesReport<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesReport<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Flush and return the writer, or the first write error
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_line<T: Serialize>(&mut self, value: &T) {
        if self.error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.out, value)
            .map_err(io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"));
        if let Err(err) = result {
            warn!(error = %err, "report write failed, further output dropped");
            self.error = Some(err);
        }
    }
}

impl<W: Write> MatchSink for JsonLinesReport<W> {
    fn on_match(&mut self, found: Match) {
        self.write_line(&found);
    }

    fn on_complete(&mut self, summary: &SweepSummary) {
        self.write_line(&SummaryLine { summary });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;

    fn sample_match() -> Match {
        Match {
            origin_channel: 16,
            origin_position: 120,
            length: 3,
            match_count: 4,
            pattern: vec![1.0, 1.25, 1.5],
        }
    }

    fn summary(total_matches: usize, max: Option<usize>, completed: bool) -> SweepSummary {
        SweepSummary {
            total_matches,
            window_length: 3,
            window_length_max: max,
            frame_tolerance: 1,
            distance_tolerance: 0.5,
            completed,
        }
    }

    /// Writer that fails every call
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_describe_criteria() {
        assert_eq!(
            describe_criteria(&summary(1, None, true)),
            "Pattern length = 3 with distance threshold = 0.5, and frame threshold = 1."
        );
        assert!(describe_criteria(&summary(1, Some(6), true)).starts_with("Pattern lengths from 3 to 6"));
    }

    #[test]
    fn test_text_report_rows_and_footer() {
        let mut report = TextReport::new(Vec::new());
        report.on_match(sample_match());
        report.on_match(sample_match());
        report.on_complete(&summary(2, None, true));
        assert_eq!(report.rows(), 2);
        let text = String::from_utf8(report.finish().unwrap()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Bone"));
        assert!(lines[1].contains("Head"));
        assert!(lines[1].contains("[1.0000, 1.2500, 1.5000]"));
        assert!(text.contains("Found 2 matches across all bone streams."));
        assert!(!text.contains("cancelled"));
    }

    #[test]
    fn test_text_report_no_results() {
        let mut report = TextReport::new(Vec::new());
        report.on_complete(&summary(0, Some(5), true));
        let text = String::from_utf8(report.finish().unwrap()).unwrap();
        assert!(text.contains("did not find any results"));
        assert!(text.contains("Pattern lengths from 3 to 5"));
        assert!(!text.contains("Bone"));
    }

    #[test]
    fn test_text_report_cancelled_notice() {
        let mut report = TextReport::new(Vec::new());
        report.on_match(sample_match());
        report.on_complete(&summary(1, None, false));
        let text = String::from_utf8(report.finish().unwrap()).unwrap();
        assert!(text.contains("results are partial"));
    }

    #[test]
    fn test_text_report_keeps_first_error() {
        let mut report = TextReport::new(Broken);
        report.on_match(sample_match());
        report.on_complete(&summary(1, None, true));
        let err = report.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_json_lines_report() {
        let mut report = JsonLinesReport::new(Vec::new());
        report.on_match(sample_match());
        report.on_complete(&summary(1, None, true));
        let text = String::from_utf8(report.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["origin_channel"], 16);
        assert_eq!(first["match_count"], 4);
        assert_eq!(first["pattern"].as_array().unwrap().len(), 3);

        let last: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(last["summary"]["total_matches"], 1);
        assert_eq!(last["summary"]["window_length_max"], serde_json::Value::Null);
        assert_eq!(last["summary"]["completed"], true);
    }

    #[test]
    fn test_report_as_engine_sink() {
        use crate::config::SearchParams;
        use crate::matcher::find_patterns;
        use crate::signal::SignalStore;

        let store = SignalStore::from_channels(vec![vec![0.0; 10], vec![2.0; 10]]).unwrap();
        let mut report = TextReport::new(Vec::new());
        let summary = find_patterns(&SearchParams::single(3, 0, 0.0), &store, &mut report).unwrap();
        assert_eq!(report.rows(), summary.total_matches);
        let text = String::from_utf8(report.finish().unwrap()).unwrap();
        assert!(text.contains("Left Hip Joint"));
    }
}
