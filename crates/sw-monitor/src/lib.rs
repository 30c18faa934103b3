//! Drift monitor for shiftwatch.
//!
//! Drives one comparison cycle over a watch directory: scans local reference
//! copies, fetches their remote counterparts, fingerprints both, and hands
//! drifted items to the diff engine. Everything that touches the outside
//! world sits behind a small trait so the cycle can run against in-memory
//! collaborators in tests.
//!
//! # Key Types
//!
//! - [`Monitor`] -- Cycle driver and baseline fetcher
//! - [`MonitorConfig`] -- TOML-backed configuration
//! - [`RemoteSource`] / [`HttpRemoteSource`] -- Remote fetch
//! - [`MetadataExtractor`] / [`TextRecognizer`] -- Extraction channels for media
//! - [`LogSink`] / [`SnapshotSink`] -- Append-only report log and drift snapshots
//! - [`CycleSummary`] -- Per-cycle outcome and unified fingerprint

pub mod config;
pub mod cycle;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod scan;
pub mod sink;

pub use config::MonitorConfig;
pub use cycle::{CycleSummary, ItemOutcome, ItemRecord, Monitor};
pub use error::{MonitorError, MonitorResult};
pub use extract::{ExifExtractor, MetadataExtractor, TesseractRecognizer, TextRecognizer};
pub use fetch::{FetchResponse, HttpRemoteSource, InMemoryRemote, RemoteSource};
pub use scan::{classify, scan_directory, MonitoredItem};
pub use sink::{
    snapshot_name, AppendLog, DirSnapshotSink, InMemoryLog, InMemorySnapshots, LogSink,
    SnapshotSink,
};
