//! Error types for the diff crate.

use std::fmt;

/// Which copy of a monitored item an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Local,
    Remote,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Local => f.write_str("local"),
            Side::Remote => f.write_str("remote"),
        }
    }
}

/// Errors that can occur while preparing content for a diff.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Tabular content could not be parsed; the row differ is never invoked.
    #[error("error parsing {side}: {source}")]
    Parse {
        side: Side,
        #[source]
        source: csv::Error,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
