//! CLI output formatting for runs and dry runs.
//!
//! # Information-First Display
//!
//! Every candidate leads with its positional index and the file name as found
//! on disk. What happened to it is shown as an indented context line, so the
//! output reads as an inventory of the source directory while still naming
//! the artifact each file maps to.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Processing 3 images
//! 001 a.png
//!     Resized: 3a7bd3e2…b1c4.png
//! 002 b.png
//!     Skipped: 3a7bd3e2…b1c4.png (cached)
//! 003 c.png
//!     Failed: decode error: Failed to decode images/c.png: …
//! Cache: 1 resized, 1 skipped, 1 failed (3 total)
//! ```
//!
//! With `--json` each outcome is one JSON object per line, followed by the
//! stats object.
//!
//! ## Check
//!
//! ```text
//! 001 a.png (640x480)
//!     Key: 3a7bd3e2…b1c4.png
//!     Status: cached
//! 002 d.gif
//!     Status: unreadable (read error: …)
//!
//! 1 cached, 0 pending, 1 unreadable
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::cache::{CacheStats, Outcome};
use crate::process::{CandidateOutcome, CheckEntry, CheckStatus, ProcessEvent};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Run output
// ============================================================================

/// The context line describing a candidate's outcome.
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Resized { key } => format!("Resized: {key}"),
        Outcome::Skipped { key } => format!("Skipped: {key} (cached)"),
        Outcome::Failed { reason } => format!("Failed: {reason}"),
    }
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { total } => {
            vec![format!("Processing {}", plural(*total, "image"))]
        }
        ProcessEvent::Finished { index, result, .. } => vec![
            format!("{} {}", format_index(*index), result.file_name),
            format!("{}{}", indent(1), format_outcome(&result.outcome)),
        ],
    }
}

/// Print a progress event to stdout.
pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

pub fn format_run_summary(stats: &CacheStats) -> String {
    format!("Cache: {}", stats)
}

/// One outcome as a single-line JSON object.
pub fn format_outcome_json(outcome: &CandidateOutcome) -> serde_json::Result<String> {
    serde_json::to_string(outcome)
}

/// Run stats as a single-line JSON object.
pub fn format_stats_json(stats: &CacheStats) -> serde_json::Result<String> {
    serde_json::to_string(stats)
}

// ============================================================================
// Check output
// ============================================================================

/// Format dry-run results: one entry per candidate plus a tally.
pub fn format_check_output(entries: &[CheckEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    let (mut cached, mut pending, mut unreadable) = (0, 0, 0);

    for (i, entry) in entries.iter().enumerate() {
        let header = match entry.dimensions {
            Some(d) => format!(
                "{} {} ({}x{})",
                format_index(i + 1),
                entry.file_name,
                d.width,
                d.height
            ),
            None => format!("{} {}", format_index(i + 1), entry.file_name),
        };
        lines.push(header);

        match &entry.status {
            CheckStatus::Cached { key } => {
                cached += 1;
                lines.push(format!("{}Key: {}", indent(1), key));
                lines.push(format!("{}Status: cached", indent(1)));
            }
            CheckStatus::Pending { key } => {
                pending += 1;
                lines.push(format!("{}Key: {}", indent(1), key));
                lines.push(format!("{}Status: pending", indent(1)));
            }
            CheckStatus::Unreadable { message } => {
                unreadable += 1;
                lines.push(format!("{}Status: unreadable ({})", indent(1), message));
            }
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} cached, {} pending, {} unreadable",
        cached, pending, unreadable
    ));
    lines
}

pub fn print_check_output(entries: &[CheckEntry]) {
    for line in format_check_output(entries) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, FailureReason};
    use crate::hash::hash_bytes;
    use crate::imaging::Dimensions;
    use std::path::PathBuf;

    fn key(bytes: &[u8], ext: &str) -> CacheKey {
        CacheKey::new(hash_bytes(bytes), ext)
    }

    fn finished(index: usize, name: &str, outcome: Outcome) -> ProcessEvent {
        ProcessEvent::Finished {
            index,
            total: 3,
            result: CandidateOutcome {
                file_name: name.to_string(),
                source_path: PathBuf::from("images").join(name),
                outcome,
            },
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn plural_handles_one() {
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(0, "image"), "0 images");
    }

    // =========================================================================
    // Run output
    // =========================================================================

    #[test]
    fn started_event_shows_total() {
        assert_eq!(
            format_process_event(&ProcessEvent::Started { total: 3 }),
            vec!["Processing 3 images"]
        );
    }

    #[test]
    fn resized_event_names_the_artifact() {
        let k = key(b"a", ".png");
        let lines = format_process_event(&finished(1, "a.png", Outcome::Resized { key: k.clone() }));
        assert_eq!(lines, vec!["001 a.png".to_string(), format!("    Resized: {k}")]);
    }

    #[test]
    fn skipped_event_is_marked_cached() {
        let k = key(b"a", ".png");
        let lines = format_process_event(&finished(2, "b.png", Outcome::Skipped { key: k.clone() }));
        assert_eq!(lines[0], "002 b.png");
        assert_eq!(lines[1], format!("    Skipped: {k} (cached)"));
    }

    #[test]
    fn failed_event_includes_reason() {
        let lines = format_process_event(&finished(
            3,
            "c.png",
            Outcome::Failed {
                reason: FailureReason::DecodeError("truncated".into()),
            },
        ));
        assert_eq!(lines[1], "    Failed: decode error: truncated");
    }

    #[test]
    fn run_summary_uses_stats_display() {
        let stats = CacheStats {
            resized: 1,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(
            format_run_summary(&stats),
            "Cache: 1 resized, 1 skipped, 1 failed (3 total)"
        );
    }

    #[test]
    fn outcome_json_is_single_line_and_flat() {
        let k = key(b"a", ".png");
        let outcome = CandidateOutcome {
            file_name: "a.png".into(),
            source_path: PathBuf::from("images/a.png"),
            outcome: Outcome::Resized { key: k.clone() },
        };
        let json = format_outcome_json(&outcome).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["file_name"], "a.png");
        assert_eq!(value["outcome"], "resized");
        assert_eq!(value["key"], k.to_string());
    }

    #[test]
    fn stats_json_has_counts() {
        let json = format_stats_json(&CacheStats {
            resized: 2,
            skipped: 0,
            failed: 1,
        })
        .unwrap();
        assert_eq!(json, r#"{"resized":2,"skipped":0,"failed":1}"#);
    }

    // =========================================================================
    // Check output
    // =========================================================================

    #[test]
    fn check_output_lists_each_status() {
        let a = key(b"a", ".png");
        let b = key(b"b", ".jpg");
        let entries = vec![
            CheckEntry {
                file_name: "a.png".into(),
                status: CheckStatus::Cached { key: a.clone() },
                dimensions: Some(Dimensions {
                    width: 640,
                    height: 480,
                }),
            },
            CheckEntry {
                file_name: "b.jpg".into(),
                status: CheckStatus::Pending { key: b.clone() },
                dimensions: None,
            },
            CheckEntry {
                file_name: "c.gif".into(),
                status: CheckStatus::Unreadable {
                    message: "permission denied".into(),
                },
                dimensions: None,
            },
        ];

        let lines = format_check_output(&entries);

        assert_eq!(
            lines,
            vec![
                "001 a.png (640x480)".to_string(),
                format!("    Key: {a}"),
                "    Status: cached".to_string(),
                "002 b.jpg".to_string(),
                format!("    Key: {b}"),
                "    Status: pending".to_string(),
                "003 c.gif".to_string(),
                "    Status: unreadable (permission denied)".to_string(),
                String::new(),
                "1 cached, 1 pending, 1 unreadable".to_string(),
            ]
        );
    }

    #[test]
    fn check_output_empty() {
        assert_eq!(
            format_check_output(&[]),
            vec!["0 cached, 0 pending, 0 unreadable"]
        );
    }
}
