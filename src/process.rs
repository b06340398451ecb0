//! Run driver: discovery → cache gate → outcomes.
//!
//! A run prepares the output directory, discovers candidates, and pushes
//! each one through the [`ResizeGate`] in discovery order, one at a time.
//!
//! ## Failure policy
//!
//! Only directory-level problems are errors: a missing source directory or
//! an output directory that cannot be created ([`ProcessError::OutputDir`])
//! aborts the run before any candidate is touched. Everything that goes wrong with an individual file
//! is an [`Outcome::Failed`] in the returned [`RunSummary`]; the run carries
//! on with the next candidate.
//!
//! ## Interrupted runs
//!
//! A killed run can leave a hidden temporary file in the output directory.
//! The next run deletes any that are more than 15 minutes old before
//! processing starts.
//!
//! ## Progress events
//!
//! Callers that want live output pass a channel sender; a [`ProcessEvent`]
//! is sent at the start of the run and after every candidate. The channel is
//! best-effort: a dropped receiver does not stop the run.

use crate::cache::{CacheKey, CacheStats, Outcome, ResizeGate};
use crate::config::Config;
use crate::imaging::{Dimensions, ImageBackend, RustBackend, supported_extensions};
use crate::scan::{self, ScanError};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Partial writes younger than this may belong to a concurrent run.
const STALE_PARTIAL_AGE: Duration = Duration::from_secs(15 * 60);

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// One candidate's terminal outcome, with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateOutcome {
    pub file_name: String,
    pub source_path: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Progress events sent while a run is in flight.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// Discovery finished; `total` candidates will be processed.
    Started { total: usize },
    /// Candidate `index` (1-based) reached a terminal outcome.
    Finished {
        index: usize,
        total: usize,
        result: CandidateOutcome,
    },
}

/// Everything a run produced, in processing order.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<CandidateOutcome>,
    pub stats: CacheStats,
}

impl RunSummary {
    pub fn failures(&self) -> impl Iterator<Item = &CandidateOutcome> {
        self.outcomes.iter().filter(|o| o.outcome.is_failed())
    }
}

/// Run with the production [`RustBackend`].
pub fn run(
    config: &Config,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    for ext in unsupported_extensions(config) {
        warn!(extension = %ext, "no encoder for this extension; its files will fail to resize");
    }
    run_with_backend(&RustBackend::new(), config, events)
}

/// Configured extensions the [`RustBackend`] cannot write thumbnails for.
pub fn unsupported_extensions(config: &Config) -> Vec<&str> {
    config
        .discovery
        .extensions
        .iter()
        .map(String::as_str)
        .filter(|ext| {
            !supported_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .collect()
}

/// Run using a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    config: &Config,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, ProcessError> {
    scan::prepare_output_dir(&config.output_dir).map_err(|source| ProcessError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;
    let swept = scan::remove_stale_partials(&config.output_dir, STALE_PARTIAL_AGE);
    if swept > 0 {
        info!(count = swept, "removed partial files from an interrupted run");
    }
    let candidates = scan::discover(config)?;
    let total = candidates.len();
    info!(
        total,
        source = %config.source_dir.display(),
        output = %config.output_dir.display(),
        "processing candidates"
    );
    emit(&events, ProcessEvent::Started { total });

    let gate = ResizeGate::new(backend, config);
    let mut summary = RunSummary::default();

    for (i, candidate) in candidates.iter().enumerate() {
        let outcome = gate.process(candidate);
        summary.stats.record(&outcome);

        let result = CandidateOutcome {
            file_name: candidate.file_name.clone(),
            source_path: candidate.path.clone(),
            outcome,
        };
        emit(
            &events,
            ProcessEvent::Finished {
                index: i + 1,
                total,
                result: result.clone(),
            },
        );
        summary.outcomes.push(result);
    }

    info!(stats = %summary.stats, "run complete");
    Ok(summary)
}

fn emit(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // Receiver may have hung up; the run still completes.
        let _ = tx.send(event);
    }
}

/// Cache state of a candidate as seen by a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// An artifact exists; a run would skip this file.
    Cached { key: CacheKey },
    /// No artifact yet; a run would resize this file.
    Pending { key: CacheKey },
    /// The file could not be hashed; a run would report a read error.
    Unreadable { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckEntry {
    pub file_name: String,
    #[serde(flatten)]
    pub status: CheckStatus,
    /// Source dimensions, when the header could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// Dry run with the production [`RustBackend`].
pub fn check(config: &Config) -> Result<Vec<CheckEntry>, ProcessError> {
    check_with_backend(&RustBackend::new(), config)
}

/// Dry run: hash every candidate and report whether it is already cached.
///
/// Writes nothing, not even the output directory.
pub fn check_with_backend(
    backend: &impl ImageBackend,
    config: &Config,
) -> Result<Vec<CheckEntry>, ProcessError> {
    let candidates = scan::discover(config)?;
    let gate = ResizeGate::new(backend, config);

    Ok(candidates
        .iter()
        .map(|candidate| {
            let status = match gate.lookup(candidate) {
                Ok(lookup) if lookup.cached => CheckStatus::Cached { key: lookup.key },
                Ok(lookup) => CheckStatus::Pending { key: lookup.key },
                Err(e) => CheckStatus::Unreadable {
                    message: e.to_string(),
                },
            };
            let dimensions = match status {
                CheckStatus::Unreadable { .. } => None,
                _ => backend.identify(&candidate.path).ok(),
            };
            CheckEntry {
                file_name: candidate.file_name.clone(),
                status,
                dimensions,
            }
        })
        .collect())
}
