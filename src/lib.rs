//! # thumbcache
//!
//! A batch thumbnailer that never does the same work twice. Every recognized
//! image in a source directory becomes a fixed-size, center-cropped
//! thumbnail in an output directory, named after the SHA-256 of the source
//! bytes.
//!
//! # Architecture
//!
//! A run is a straight line through three collaborators:
//!
//! ```text
//! scan      images/        →  Vec<Candidate>   (list + extension filter)
//! cache     Candidate      →  Outcome          (hash → exists? → resize)
//! process   Vec<Candidate> →  RunSummary       (drive, count, report)
//! ```
//!
//! Only the [`cache`] stage makes decisions. It hashes the candidate, looks
//! for `<digest><ext>` in the output directory, and calls the
//! [`imaging`] backend only when nothing is there.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Lists the source directory, filters by extension, prepares the output directory |
//! | [`hash`] | Streaming SHA-256 of file contents |
//! | [`cache`] | Cache keys, the resize gate, outcomes, and run statistics |
//! | [`imaging`] | Pure-Rust fill resize + center crop behind the [`imaging::ImageBackend`] trait |
//! | [`process`] | Run driver, progress events, dry-run check |
//! | [`config`] | `thumbcache.toml` loading, merging, and validation |
//! | [`types`] | Shared types passed between stages |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## The Output Directory Is the Cache
//!
//! There is no manifest, database, or timestamp file. A thumbnail's name is
//! the hash of what it was made from, so its presence alone proves it is up
//! to date. Copying the output directory elsewhere copies the cache with it;
//! deleting a file forces exactly that image to be regenerated.
//!
//! ## Failures Are Outcomes
//!
//! A corrupt or unreadable image is reported and skipped, never fatal. Only
//! problems that make the whole run meaningless (no source directory, an
//! output directory that cannot be created) are errors.
//!
//! A process killed mid-write can leave a hidden `.thumbcache-*.part` file
//! in the output directory. It never carries a cache-key name, so it cannot
//! be mistaken for a thumbnail, and the next run removes it.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling, and encoding use the `image` crate only. The binary
//! has no system dependencies.

pub mod cache;
pub mod config;
pub mod hash;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
