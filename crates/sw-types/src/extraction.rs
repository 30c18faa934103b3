use thiserror::Error;

/// Why an extraction channel produced no text for one side of a comparison.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The format is declared unsupported by this channel. Kept distinct
    /// from backend failures so an unsupported format never reads as empty text.
    #[error("{format} format not supported for {channel}")]
    Unsupported { format: String, channel: String },

    /// The content was readable but contained nothing the backend could decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// The extraction backend itself failed (missing binary, crash, bad exit).
    #[error("backend error: {0}")]
    Backend(String),

    /// Staging the content for the backend failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExtractionError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Outcome of one extraction channel (structured metadata or recognized
/// text) for one side of a comparison.
pub type ExtractionOutcome = Result<String, ExtractionError>;
