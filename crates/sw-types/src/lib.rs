//! Foundation types for shiftwatch.
//!
//! Every other shiftwatch crate depends on `sw-types`. The types here are
//! plain values: they are created fresh for one comparison and dropped once
//! the resulting report has been handed off.
//!
//! # Key Types
//!
//! - [`Fingerprint`] -- Fixed-length content digest, used as an equality proxy
//! - [`ContentBlob`] / [`ItemCategory`] -- Raw bytes tagged with how they are compared
//! - [`Row`] / [`Table`] -- Positional tabular content
//! - [`ExtractionOutcome`] / [`ExtractionError`] -- Result of one extraction channel

pub mod blob;
pub mod error;
pub mod extraction;
pub mod fingerprint;
pub mod table;

pub use blob::{ContentBlob, ItemCategory};
pub use error::TypeError;
pub use extraction::{ExtractionError, ExtractionOutcome};
pub use fingerprint::Fingerprint;
pub use table::{Row, Table};
