use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sw_diff::{DEFAULT_MAX_REPORT_CHARS, TRUNCATION_MARKER};

use crate::error::{MonitorError, MonitorResult};

/// Monitor configuration, loaded from TOML. Missing keys take defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Remote prefix each item's file name is appended to.
    pub base_url: String,
    /// Directory holding the local reference copies.
    pub watch_dir: PathBuf,
    /// Append-only shift log. Relative paths resolve against `watch_dir`.
    pub log_file: PathBuf,
    pub interval_minutes: u64,
    /// Pause between successive remote fetches within one cycle.
    pub fetch_pause_secs: u64,
    pub request_timeout_secs: u64,
    /// Hard cap on each report written to the log.
    pub max_report_chars: usize,
    /// Images are only monitored when their lowercase name contains this.
    pub media_name_filter: String,
    pub media_extensions: Vec<String>,
    /// Extensions the recognized-text channel declares unsupported.
    pub ocr_unsupported: Vec<String>,
    pub tesseract_bin: PathBuf,
    pub user_agent: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            watch_dir: PathBuf::from("."),
            log_file: PathBuf::from("shifts.log"),
            interval_minutes: 60,
            fetch_pause_secs: 5,
            request_timeout_secs: 30,
            max_report_chars: DEFAULT_MAX_REPORT_CHARS,
            media_name_filter: "map".into(),
            media_extensions: ["jpg", "jpeg", "png", "avif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ocr_unsupported: vec!["avif".into()],
            tesseract_bin: PathBuf::from("tesseract"),
            user_agent: concat!("shiftwatch/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl MonitorConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> MonitorResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> MonitorResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> MonitorResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(MonitorError::Config("base_url must be set".into()));
        }
        if self.interval_minutes == 0 {
            return Err(MonitorError::Config(
                "interval_minutes must be positive".into(),
            ));
        }
        if self.max_report_chars <= TRUNCATION_MARKER.len() {
            return Err(MonitorError::Config(format!(
                "max_report_chars must exceed {} to hold the truncation marker",
                TRUNCATION_MARKER.len()
            )));
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        if self.log_file.is_absolute() {
            self.log_file.clone()
        } else {
            self.watch_dir.join(&self.log_file)
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn fetch_pause(&self) -> Duration {
        Duration::from_secs(self.fetch_pause_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
