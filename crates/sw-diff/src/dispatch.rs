//! Closed-variant dispatch from item category to differ.

use sw_types::{ContentBlob, ExtractionOutcome, ItemCategory, Table};

use crate::media_diff::diff_media;
use crate::opaque_diff::diff_opaque;
use crate::report::DiffReport;
use crate::row_diff::diff_tables;

/// Everything one differ needs for one drifted item.
#[derive(Clone, Debug)]
pub enum DiffInput {
    /// Parsed local and remote tables.
    Tabular { local: Table, remote: Table },
    /// Raw document bytes, compared by fingerprint only.
    OpaqueDocument {
        local: ContentBlob,
        remote: ContentBlob,
        label: String,
    },
    /// Raw media bytes plus the four extraction outcomes.
    Media {
        local: ContentBlob,
        remote: ContentBlob,
        local_meta: ExtractionOutcome,
        remote_meta: ExtractionOutcome,
        local_text: ExtractionOutcome,
        remote_text: ExtractionOutcome,
    },
}

impl DiffInput {
    pub fn category(&self) -> ItemCategory {
        match self {
            DiffInput::Tabular { .. } => ItemCategory::Tabular,
            DiffInput::OpaqueDocument { .. } => ItemCategory::OpaqueDocument,
            DiffInput::Media { .. } => ItemCategory::Media,
        }
    }

    /// Run the differ matching this variant.
    pub fn diff(&self) -> DiffReport {
        match self {
            DiffInput::Tabular { local, remote } => diff_tables(local, remote),
            DiffInput::OpaqueDocument {
                local,
                remote,
                label,
            } => diff_opaque(local, remote, label),
            DiffInput::Media {
                local,
                remote,
                local_meta,
                remote_meta,
                local_text,
                remote_text,
            } => diff_media(
                local,
                remote,
                local_meta,
                remote_meta,
                local_text,
                remote_text,
            ),
        }
    }
}
