//! The monitoring cycle.
//!
//! One cycle walks the scanned items strictly in order: fetch, fingerprint,
//! and on drift diff, bound, queue, and snapshot. Nothing is retried and no
//! per-item failure aborts the cycle. Queued reports are written to the log
//! sink once at the end, and the cycle's fingerprints fold into a single
//! unified fingerprint.

use bytes::Bytes;
use serde::Serialize;
use sw_crypto::{fingerprint, CycleDigest};
use sw_diff::{parse_tables, DiffInput, DiffReport, DiffResult};
use sw_types::{ContentBlob, Fingerprint, ItemCategory};
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorResult;
use crate::extract::{ExifExtractor, MetadataExtractor, TesseractRecognizer, TextRecognizer};
use crate::fetch::{HttpRemoteSource, RemoteSource};
use crate::scan::{scan_directory, MonitoredItem};
use crate::sink::{AppendLog, DirSnapshotSink, LogSink, SnapshotSink};

/// Human-facing timestamp used in report headers and snapshot names.
const STAMP_FORMAT: &str = "%b %d, %Y - %I:%M%p";

/// What happened to one item during a cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Unchanged { fingerprint: Fingerprint },
    Shifted { local: Fingerprint, remote: Fingerprint },
    /// The remote answered with a non-success status.
    Unavailable { status: u16 },
    TransportFailed { error: String },
    /// The local reference copy could not be read; the item was skipped.
    LocalReadFailed { error: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub name: String,
    pub category: ItemCategory,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Result of one cycle.
#[derive(Clone, Debug, Serialize)]
pub struct CycleSummary {
    pub timestamp: String,
    pub items: Vec<ItemRecord>,
    /// Bounded reports, in item order, as handed to the log sink.
    pub reports: Vec<String>,
    /// Fingerprint of the concatenated per-item fingerprints.
    pub unified: Fingerprint,
    /// Set when the log sink rejected this cycle's reports.
    pub log_error: Option<String>,
}

impl CycleSummary {
    pub fn shift_count(&self) -> usize {
        self.reports.len()
    }
}

/// Cycle driver bound to one configuration and set of collaborators.
pub struct Monitor {
    config: MonitorConfig,
    remote: Box<dyn RemoteSource>,
    metadata: Box<dyn MetadataExtractor>,
    text: Box<dyn TextRecognizer>,
    log: Box<dyn LogSink>,
    snapshots: Box<dyn SnapshotSink>,
}

impl Monitor {
    /// Build a monitor with the production collaborators: HTTP fetch, EXIF,
    /// tesseract, the append log, and snapshots in the watch directory.
    pub fn new(config: MonitorConfig) -> MonitorResult<Self> {
        config.validate()?;
        Ok(Self {
            remote: Box::new(HttpRemoteSource::new(&config)?),
            metadata: Box::new(ExifExtractor),
            text: Box::new(TesseractRecognizer::from_config(&config)),
            log: Box::new(AppendLog::new(config.log_path())),
            snapshots: Box::new(DirSnapshotSink::new(config.watch_dir.clone())),
            config,
        })
    }

    pub fn with_remote(mut self, remote: impl RemoteSource + 'static) -> Self {
        self.remote = Box::new(remote);
        self
    }

    pub fn with_metadata(mut self, metadata: impl MetadataExtractor + 'static) -> Self {
        self.metadata = Box::new(metadata);
        self
    }

    pub fn with_text(mut self, text: impl TextRecognizer + 'static) -> Self {
        self.text = Box::new(text);
        self
    }

    pub fn with_log(mut self, log: impl LogSink + 'static) -> Self {
        self.log = Box::new(log);
        self
    }

    pub fn with_snapshots(mut self, snapshots: impl SnapshotSink + 'static) -> Self {
        self.snapshots = Box::new(snapshots);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Scan the watch directory and run one cycle over what was found.
    pub async fn run_cycle(&self) -> MonitorResult<CycleSummary> {
        let items = scan_directory(&self.config)?;
        info!(
            dir = %self.config.watch_dir.display(),
            items = items.len(),
            "starting cycle"
        );
        Ok(self.run_items(&items).await)
    }

    /// Run one cycle over an explicit, already ordered item list.
    pub async fn run_items(&self, items: &[MonitoredItem]) -> CycleSummary {
        let stamp = chrono::Local::now().format(STAMP_FORMAT).to_string();
        let mut digest = CycleDigest::new();
        let mut records = Vec::with_capacity(items.len());
        let mut reports = Vec::new();

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.fetch_pause()).await;
            }
            let outcome = self
                .check_item(item, &stamp, &mut digest, &mut reports)
                .await;
            records.push(ItemRecord {
                name: item.name.clone(),
                category: item.category,
                outcome,
            });
        }

        let mut log_error = None;
        if !reports.is_empty() {
            if let Err(e) = self.log.append(&reports) {
                error!(error = %e, "failed to write shift log");
                log_error = Some(e.to_string());
            }
        }

        let unified = digest.finish();
        info!(items = items.len(), shifts = reports.len(), %unified, "cycle complete");
        CycleSummary {
            timestamp: stamp,
            items: records,
            reports,
            unified,
            log_error,
        }
    }

    async fn check_item(
        &self,
        item: &MonitoredItem,
        stamp: &str,
        digest: &mut CycleDigest,
        reports: &mut Vec<String>,
    ) -> ItemOutcome {
        let response = match self.remote.fetch(&item.name).await {
            Ok(response) => response,
            Err(e) => {
                warn!(item = %item.name, error = %e, "fetch failed");
                digest.push(&Fingerprint::ZERO);
                return ItemOutcome::TransportFailed {
                    error: e.to_string(),
                };
            }
        };

        if !response.is_success() {
            warn!(item = %item.name, status = response.status, "SHIFT DETECTED: remote unavailable");
            let report = DiffReport::remote_unavailable(response.status, &response.url)
                .with_header(self.header(item, stamp));
            reports.push(report.render_bounded(self.config.max_report_chars));
            digest.push(&Fingerprint::ZERO);
            return ItemOutcome::Unavailable {
                status: response.status,
            };
        }

        let local = match tokio::fs::read(&item.path).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                warn!(item = %item.name, error = %e, "local read failed; skipping");
                return ItemOutcome::LocalReadFailed {
                    error: e.to_string(),
                };
            }
        };

        let local_fp = fingerprint(&local);
        let remote_fp = fingerprint(&response.body);
        digest.push(&remote_fp);

        if local_fp == remote_fp {
            info!(item = %item.name, hash = %remote_fp.short(), "no change");
            return ItemOutcome::Unchanged {
                fingerprint: remote_fp,
            };
        }

        warn!(item = %item.name, "SHIFT DETECTED");
        let report = match self.diff_input(item, local, response.body.clone()).await {
            Ok(input) => input.diff(),
            Err(e) => DiffReport::unavailable(e),
        };
        let rendered = report
            .with_header(self.header(item, stamp))
            .render_bounded(self.config.max_report_chars);
        debug!(item = %item.name, chars = rendered.chars().count(), "report queued");
        reports.push(rendered);

        if let Err(e) = self.snapshots.persist(&item.name, stamp, &response.body) {
            warn!(item = %item.name, error = %e, "failed to save changed snapshot");
        }

        ItemOutcome::Shifted {
            local: local_fp,
            remote: remote_fp,
        }
    }

    /// Prepare the differ input for a drifted item.
    async fn diff_input(
        &self,
        item: &MonitoredItem,
        local: Bytes,
        remote: Bytes,
    ) -> DiffResult<DiffInput> {
        match item.category {
            ItemCategory::Tabular => {
                let (local, remote) = parse_tables(&local, &remote)?;
                Ok(DiffInput::Tabular { local, remote })
            }
            ItemCategory::OpaqueDocument => Ok(DiffInput::OpaqueDocument {
                local: ContentBlob::new(local, ItemCategory::OpaqueDocument),
                remote: ContentBlob::new(remote, ItemCategory::OpaqueDocument),
                label: item.extension().to_uppercase(),
            }),
            ItemCategory::Media => {
                let local = ContentBlob::new(local, ItemCategory::Media);
                let remote = ContentBlob::new(remote, ItemCategory::Media);
                Ok(DiffInput::Media {
                    local_meta: self.metadata.extract(&local, &item.name).await,
                    remote_meta: self.metadata.extract(&remote, &item.name).await,
                    local_text: self.text.recognize(&local, &item.name).await,
                    remote_text: self.text.recognize(&remote, &item.name).await,
                    local,
                    remote,
                })
            }
        }
    }

    fn header(&self, item: &MonitoredItem, stamp: &str) -> String {
        let kind = match item.category {
            ItemCategory::Tabular => "Diff".to_string(),
            ItemCategory::OpaqueDocument => format!("{} Diff", item.extension().to_uppercase()),
            ItemCategory::Media => "Image Diff".to_string(),
        };
        format!("[{stamp}] {kind} for {}", item.name)
    }

    /// Overwrite every scanned local reference copy with its current remote
    /// bytes. Failures are logged and skipped. Returns how many were saved.
    pub async fn fetch_baselines(&self) -> MonitorResult<usize> {
        let items = scan_directory(&self.config)?;
        info!(items = items.len(), "fetching baselines");
        let mut saved = 0;

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.fetch_pause()).await;
            }
            let response = match self.remote.fetch(&item.name).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(item = %item.name, error = %e, "baseline fetch failed");
                    continue;
                }
            };
            if !response.is_success() {
                warn!(item = %item.name, status = response.status, url = %response.url, "baseline unavailable");
                continue;
            }
            match tokio::fs::write(&item.path, &response.body).await {
                Ok(()) => {
                    info!(item = %item.name, "baseline saved");
                    saved += 1;
                }
                Err(e) => warn!(item = %item.name, error = %e, "baseline save failed"),
            }
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use async_trait::async_trait;
    use sw_diff::TRUNCATION_MARKER;
    use sw_types::{ExtractionError, ExtractionOutcome};

    use super::*;
    use crate::error::MonitorError;
    use crate::fetch::{FetchResponse, InMemoryRemote};
    use crate::sink::{InMemoryLog, InMemorySnapshots};

    struct FixedMetadata;

    #[async_trait]
    impl MetadataExtractor for FixedMetadata {
        async fn extract(&self, blob: &ContentBlob, _name: &str) -> ExtractionOutcome {
            match blob.bytes() {
                b"local-image" => Ok("GPS: 45.0".into()),
                _ => Err(ExtractionError::Decode("no exif segment".into())),
            }
        }
    }

    struct FixedText;

    #[async_trait]
    impl TextRecognizer for FixedText {
        async fn recognize(&self, blob: &ContentBlob, _name: &str) -> ExtractionOutcome {
            Ok(String::from_utf8_lossy(blob.bytes()).into_owned())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl RemoteSource for Unreachable {
        async fn fetch(&self, _name: &str) -> MonitorResult<FetchResponse> {
            Err(MonitorError::Transport("connection refused".into()))
        }
    }

    struct BrokenLog;

    impl LogSink for BrokenLog {
        fn append(&self, _entries: &[String]) -> MonitorResult<()> {
            Err(MonitorError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    fn config(dir: &Path) -> MonitorConfig {
        MonitorConfig {
            base_url: "https://example.test/baseline/".into(),
            watch_dir: dir.to_path_buf(),
            fetch_pause_secs: 0,
            ..Default::default()
        }
    }

    fn monitor(dir: &Path, remote: InMemoryRemote) -> (Monitor, InMemoryLog, InMemorySnapshots) {
        let log = InMemoryLog::new();
        let snaps = InMemorySnapshots::new();
        let monitor = Monitor::new(config(dir))
            .unwrap()
            .with_remote(remote)
            .with_metadata(FixedMetadata)
            .with_text(FixedText)
            .with_log(log.clone())
            .with_snapshots(snaps.clone());
        (monitor, log, snaps)
    }

    #[tokio::test]
    async fn unchanged_items_produce_no_reports() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), b"a,b\n").unwrap();
        fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();
        let mut remote = InMemoryRemote::new();
        remote.insert("a.csv", b"a,b\n".to_vec());
        remote.insert("b.pdf", b"%PDF".to_vec());

        let (monitor, log, snaps) = monitor(dir.path(), remote);
        let summary = monitor.run_cycle().await.unwrap();

        assert_eq!(summary.shift_count(), 0);
        assert!(log.entries().is_empty());
        assert!(snaps.saved().is_empty());
        assert!(matches!(summary.items[0].outcome, ItemOutcome::Unchanged { .. }));

        let concat = format!(
            "{}{}",
            fingerprint(b"a,b\n").to_hex(),
            fingerprint(b"%PDF").to_hex()
        );
        assert_eq!(summary.unified, fingerprint(concat.as_bytes()));
    }

    #[tokio::test]
    async fn tabular_drift_is_diffed_logged_and_snapshotted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("prices.csv"), b"a,b\nc,d\n").unwrap();
        let mut remote = InMemoryRemote::new();
        remote.insert("prices.csv", b"a,x\nc,d\n".to_vec());

        let (monitor, log, snaps) = monitor(dir.path(), remote);
        let summary = monitor.run_cycle().await.unwrap();

        assert_eq!(summary.shift_count(), 1);
        let report = &log.entries()[0];
        assert!(report.contains("] Diff for prices.csv\n"));
        assert!(report.contains("Modified field in row 1, col 2: 'b' → 'x'"));

        let saved = snaps.saved();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].0.starts_with("prices.csv_"));
        assert!(saved[0].0.ends_with(".changed"));
        assert_eq!(saved[0].1, b"a,x\nc,d\n");
        assert_eq!(
            summary.items[0].outcome,
            ItemOutcome::Shifted {
                local: fingerprint(b"a,b\nc,d\n"),
                remote: fingerprint(b"a,x\nc,d\n"),
            }
        );
    }

    #[tokio::test]
    async fn unavailable_remote_reports_and_zeroes_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gone.csv"), b"a\n").unwrap();
        let (monitor, log, snaps) = monitor(dir.path(), InMemoryRemote::new());

        let summary = monitor.run_cycle().await.unwrap();

        assert_eq!(summary.items[0].outcome, ItemOutcome::Unavailable { status: 404 });
        assert!(log.entries()[0].contains("Remote unavailable (HTTP 404) - potential deletion or rename"));
        assert!(snaps.saved().is_empty());
        assert_eq!(
            summary.unified,
            fingerprint(Fingerprint::ZERO.to_hex().as_bytes())
        );
    }

    #[tokio::test]
    async fn transport_failure_continues_cycle() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), b"a\n").unwrap();
        fs::write(dir.path().join("b.csv"), b"b\n").unwrap();
        let (monitor, log, _) = monitor(dir.path(), InMemoryRemote::new());
        let monitor = monitor.with_remote(Unreachable);

        let summary = monitor.run_cycle().await.unwrap();

        assert_eq!(summary.items.len(), 2);
        assert!(summary
            .items
            .iter()
            .all(|r| matches!(r.outcome, ItemOutcome::TransportFailed { .. })));
        assert!(log.entries().is_empty());
        let zeros = Fingerprint::ZERO.to_hex().repeat(2);
        assert_eq!(summary.unified, fingerprint(zeros.as_bytes()));
    }

    #[tokio::test]
    async fn malformed_csv_reports_diff_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("t.csv"), b"a,b\n").unwrap();
        let mut remote = InMemoryRemote::new();
        remote.insert("t.csv", b"a,b\nc\n".to_vec());

        let (monitor, log, _) = monitor(dir.path(), remote);
        monitor.run_cycle().await.unwrap();

        let report = &log.entries()[0];
        assert!(report.contains("Diff unavailable: error parsing remote"));
        assert!(!report.contains("Modified"));
    }

    #[tokio::test]
    async fn opaque_drift_reports_fingerprints() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc.pdf"), b"%PDF-1").unwrap();
        let mut remote = InMemoryRemote::new();
        remote.insert("doc.pdf", b"%PDF-2".to_vec());

        let (monitor, log, _) = monitor(dir.path(), remote);
        monitor.run_cycle().await.unwrap();

        let report = &log.entries()[0];
        assert!(report.contains("] PDF Diff for doc.pdf\n"));
        assert!(report.contains(&fingerprint(b"%PDF-1").to_hex()));
        assert!(report.contains(&fingerprint(b"%PDF-2").to_hex()));
    }

    #[tokio::test]
    async fn media_drift_reconciles_both_channels() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("harbor_map.png"), b"local-image").unwrap();
        let mut remote = InMemoryRemote::new();
        remote.insert("harbor_map.png", b"remote-image".to_vec());

        let (monitor, log, _) = monitor(dir.path(), remote);
        let summary = monitor.run_cycle().await.unwrap();

        let report = &summary.reports[0];
        assert_eq!(report, &log.entries()[0]);
        assert!(report.contains("] Image Diff for harbor_map.png\n"));
        assert!(report.contains("EXIF: local present, remote extraction failed"));
        assert!(report.contains("GPS: 45.0"));
        assert!(report.contains("OCR changed:"));
        assert!(report.contains("Modified OCR line 1: 'local-image' → 'remote-image'"));
    }

    #[tokio::test]
    async fn long_reports_are_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let local: String = (0..40).map(|i| format!("{}\n", "l".repeat(60) + &i.to_string())).collect();
        let remote: String = (0..40).map(|i| format!("{}\n", "r".repeat(60) + &i.to_string())).collect();
        fs::write(dir.path().join("wide.csv"), local).unwrap();
        let mut remote_src = InMemoryRemote::new();
        remote_src.insert("wide.csv", remote.into_bytes());

        let (monitor, log, _) = monitor(dir.path(), remote_src);
        monitor.run_cycle().await.unwrap();

        let report = &log.entries()[0];
        assert_eq!(report.chars().count(), 500);
        assert!(report.ends_with(TRUNCATION_MARKER));
    }

    #[tokio::test]
    async fn log_failure_still_yields_summary() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), b"a\n").unwrap();
        let mut remote = InMemoryRemote::new();
        remote.insert("a.csv", b"b\n".to_vec());

        let (monitor, _, _) = monitor(dir.path(), remote);
        let summary = monitor.with_log(BrokenLog).run_cycle().await.unwrap();

        assert_eq!(summary.shift_count(), 1);
        assert!(summary.log_error.unwrap().contains("read-only"));
        assert!(!summary.unified.is_zero());
    }

    #[tokio::test]
    async fn unreadable_local_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut remote = InMemoryRemote::new();
        remote.insert("ghost.csv", b"a\n".to_vec());
        let (monitor, log, _) = monitor(dir.path(), remote);

        let item = MonitoredItem {
            name: "ghost.csv".into(),
            path: dir.path().join("ghost.csv"),
            category: ItemCategory::Tabular,
        };
        let summary = monitor.run_items(&[item]).await;

        assert!(matches!(
            summary.items[0].outcome,
            ItemOutcome::LocalReadFailed { .. }
        ));
        assert!(log.entries().is_empty());
        assert_eq!(summary.unified, fingerprint(b""));
    }

    #[tokio::test]
    async fn baseline_overwrites_local_copies() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), b"old\n").unwrap();
        fs::write(dir.path().join("b.pdf"), b"old").unwrap();
        let mut remote = InMemoryRemote::new();
        remote.insert("a.csv", b"new\n".to_vec());

        let (monitor, _, _) = monitor(dir.path(), remote);
        let saved = monitor.fetch_baselines().await.unwrap();

        assert_eq!(saved, 1);
        assert_eq!(fs::read(dir.path().join("a.csv")).unwrap(), b"new\n");
        assert_eq!(fs::read(dir.path().join("b.pdf")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn summary_serializes_to_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), b"a\n").unwrap();
        let mut remote = InMemoryRemote::new();
        remote.insert("a.csv", b"a\n".to_vec());

        let (monitor, _, _) = monitor(dir.path(), remote);
        let summary = monitor.run_cycle().await.unwrap();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["items"][0]["name"], "a.csv");
        assert_eq!(json["items"][0]["category"], "tabular");
        assert_eq!(json["items"][0]["outcome"], "unchanged");
        assert_eq!(json["unified"], summary.unified.to_hex());
    }
}
