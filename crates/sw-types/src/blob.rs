use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// How a monitored item's content is compared once drift is detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemCategory {
    /// Comma-separated rows, compared row by row and field by field.
    Tabular,
    /// Binary documents with no structural model, compared by digest only.
    OpaqueDocument,
    /// Images, compared by digest plus metadata and recognized text.
    Media,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tabular => "tabular",
            Self::OpaqueDocument => "opaque-document",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemCategory {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tabular" => Ok(Self::Tabular),
            "opaque-document" => Ok(Self::OpaqueDocument),
            "media" => Ok(Self::Media),
            other => Err(TypeError::UnknownCategory(other.to_string())),
        }
    }
}

/// Immutable bytes of one side (local or remote) of a monitored item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentBlob {
    bytes: Bytes,
    category: ItemCategory,
}

impl ContentBlob {
    pub fn new(bytes: impl Into<Bytes>, category: ItemCategory) -> Self {
        Self {
            bytes: bytes.into(),
            category,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap reference-counted handle to the underlying bytes.
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
