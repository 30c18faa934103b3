//! Diff engine for shiftwatch.
//!
//! Turns two versions of a monitored item into a bounded, human-readable
//! [`DiffReport`]. Every differ is a pure function: inputs arrive as
//! parameters, the report is the return value, and nothing is retained
//! between calls.
//!
//! # Key Types
//!
//! - [`DiffReport`] / [`ChangeCounter`] -- Report lines plus the itemization cap
//! - [`diff_tables`] -- Positional row/field comparison for tabular content
//! - [`diff_lines`] -- Positional line comparison for any two text blobs
//! - [`diff_opaque`] -- Fingerprint-only comparison for unmodeled formats
//! - [`diff_media`] -- Fingerprint plus metadata and recognized-text reconciliation
//! - [`DiffInput`] -- Closed set of per-category inputs, dispatched to the right differ

pub mod dispatch;
pub mod error;
pub mod line_diff;
pub mod media_diff;
pub mod opaque_diff;
pub mod report;
pub mod row_diff;
pub mod table;

pub use dispatch::DiffInput;
pub use error::{DiffError, DiffResult, Side};
pub use line_diff::diff_lines;
pub use media_diff::{diff_media, METADATA_CHANNEL, TEXT_CHANNEL};
pub use opaque_diff::diff_opaque;
pub use report::{
    ChangeCounter, DiffReport, DEFAULT_MAX_REPORT_CHARS, MAX_CHANGES, TRUNCATION_MARKER,
};
pub use row_diff::diff_tables;
pub use table::{parse_table, parse_tables};
