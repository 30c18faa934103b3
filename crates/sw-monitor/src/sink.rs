//! Report log and drift snapshot sinks.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::MonitorResult;

/// Append-only destination for rendered diff reports.
pub trait LogSink: Send + Sync {
    /// Append each entry followed by a newline.
    fn append(&self, entries: &[String]) -> MonitorResult<()>;
}

/// Destination for remote copies of drifted items.
pub trait SnapshotSink: Send + Sync {
    /// Persist `data` under [`snapshot_name`]`(name, stamp)`.
    fn persist(&self, name: &str, stamp: &str, data: &[u8]) -> MonitorResult<PathBuf>;
}

/// Derived snapshot name: the original name, an underscore, the timestamp
/// with spaces replaced by underscores, and a `.changed` suffix.
pub fn snapshot_name(name: &str, stamp: &str) -> String {
    format!("{name}_{}.changed", stamp.replace(' ', "_"))
}

/// Shift log file, opened in append mode (and created if needed) for each
/// batch.
#[derive(Clone, Debug)]
pub struct AppendLog {
    path: PathBuf,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for AppendLog {
    fn append(&self, entries: &[String]) -> MonitorResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for entry in entries {
            writer.write_all(entry.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Writes snapshots next to the reference copies.
#[derive(Clone, Debug)]
pub struct DirSnapshotSink {
    dir: PathBuf,
}

impl DirSnapshotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SnapshotSink for DirSnapshotSink {
    fn persist(&self, name: &str, stamp: &str, data: &[u8]) -> MonitorResult<PathBuf> {
        let path = self.dir.join(snapshot_name(name, stamp));
        fs::write(&path, data)?;
        Ok(path)
    }
}

/// Log sink that keeps entries in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().expect("log mutex poisoned").clone()
    }
}

impl LogSink for InMemoryLog {
    fn append(&self, entries: &[String]) -> MonitorResult<()> {
        self.entries
            .lock()
            .expect("log mutex poisoned")
            .extend_from_slice(entries);
        Ok(())
    }
}

/// Snapshot sink that keeps `(derived name, bytes)` pairs in memory.
/// Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct InMemorySnapshots {
    saved: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl InMemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().expect("snapshot mutex poisoned").clone()
    }
}

impl SnapshotSink for InMemorySnapshots {
    fn persist(&self, name: &str, stamp: &str, data: &[u8]) -> MonitorResult<PathBuf> {
        let derived = snapshot_name(name, stamp);
        self.saved
            .lock()
            .expect("snapshot mutex poisoned")
            .push((derived.clone(), data.to_vec()));
        Ok(PathBuf::from(derived))
    }
}
