//! Watch-directory scanning.

use std::fs;
use std::path::{Path, PathBuf};

use sw_types::ItemCategory;
use tracing::{debug, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorResult;

/// A local reference copy selected for monitoring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitoredItem {
    /// File name, also used as the remote item identifier.
    pub name: String,
    pub path: PathBuf,
    pub category: ItemCategory,
}

impl MonitoredItem {
    /// Lowercase extension without the dot, or empty.
    pub fn extension(&self) -> String {
        extension_of(&self.name)
    }
}

pub(crate) fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Decide how a file is compared, or `None` if it is not monitored.
///
/// `.csv` is tabular and `.pdf` is an opaque document. Images are media
/// only when their lowercase name contains the configured filter.
pub fn classify(name: &str, config: &MonitorConfig) -> Option<ItemCategory> {
    let ext = extension_of(name);
    match ext.as_str() {
        "csv" => Some(ItemCategory::Tabular),
        "pdf" => Some(ItemCategory::OpaqueDocument),
        _ if config.media_extensions.iter().any(|m| m.eq_ignore_ascii_case(&ext))
            && name
                .to_lowercase()
                .contains(&config.media_name_filter.to_lowercase()) =>
        {
            Some(ItemCategory::Media)
        }
        _ => None,
    }
}

/// List monitored files directly inside `config.watch_dir`, sorted by name.
///
/// Symlinks are followed. Entries that cannot be inspected are logged and
/// skipped; only an unreadable watch directory fails the scan. Drift
/// snapshots (`.changed`) and the shift log never classify, so they are
/// never picked up as items.
pub fn scan_directory(config: &MonitorConfig) -> MonitorResult<Vec<MonitoredItem>> {
    let mut items = Vec::new();
    for entry in fs::read_dir(&config.watch_dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "skipping entry");
                continue;
            }
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %entry.path().display(), "skipping non-UTF-8 file name");
            continue;
        };
        if let Some(category) = classify(&name, config) {
            items.push(MonitoredItem {
                path: entry.path(),
                name,
                category,
            });
        }
    }
    items.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(items)
}
