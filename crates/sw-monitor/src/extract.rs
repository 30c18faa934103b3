//! Extraction channels for media items.
//!
//! Both channels work from in-memory bytes so local and remote copies go
//! through exactly the same path. Failures are values, never panics: every
//! call yields an [`ExtractionOutcome`].

use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use sw_diff::TEXT_CHANNEL;
use sw_types::{ContentBlob, ExtractionError, ExtractionOutcome};
use tokio::process::Command;
use tracing::debug;

use crate::config::MonitorConfig;
use crate::scan::extension_of;

/// Structured-metadata channel.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, blob: &ContentBlob, name: &str) -> ExtractionOutcome;
}

/// Recognized-text channel.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, blob: &ContentBlob, name: &str) -> ExtractionOutcome;
}

/// EXIF metadata rendered as one `Tag: value` line per field.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExifExtractor;

impl ExifExtractor {
    pub fn render(data: &[u8]) -> ExtractionOutcome {
        let exif = exif::Reader::new()
            .read_from_container(&mut Cursor::new(data))
            .map_err(|e| ExtractionError::Decode(e.to_string()))?;

        let mut out = String::new();
        for field in exif.fields() {
            out.push_str(&format!(
                "{}: {}\n",
                field.tag,
                field.display_value().with_unit(&exif)
            ));
        }
        Ok(out)
    }
}

#[async_trait]
impl MetadataExtractor for ExifExtractor {
    async fn extract(&self, blob: &ContentBlob, _name: &str) -> ExtractionOutcome {
        Self::render(blob.bytes())
    }
}

/// Recognized text from the `tesseract` command-line engine.
///
/// The blob is staged in a temporary file carrying the item's extension,
/// since the engine sniffs the format from the file.
#[derive(Clone, Debug)]
pub struct TesseractRecognizer {
    binary: PathBuf,
    unsupported: Vec<String>,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<PathBuf>, unsupported: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            unsupported,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(&config.tesseract_bin, config.ocr_unsupported.clone())
    }

    fn is_unsupported(&self, ext: &str) -> bool {
        self.unsupported.iter().any(|u| u.eq_ignore_ascii_case(ext))
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, blob: &ContentBlob, name: &str) -> ExtractionOutcome {
        let ext = extension_of(name);
        if self.is_unsupported(&ext) {
            return Err(ExtractionError::Unsupported {
                format: ext.to_uppercase(),
                channel: TEXT_CHANNEL.to_string(),
            });
        }

        let staged = tempfile::Builder::new()
            .prefix("shiftwatch-")
            .suffix(&format!(".{ext}"))
            .tempfile()?;
        tokio::fs::write(staged.path(), blob.bytes()).await?;

        debug!(item = name, binary = %self.binary.display(), "running text recognition");
        let output = Command::new(&self.binary)
            .arg(staged.path())
            .arg("stdout")
            .output()
            .await
            .map_err(|e| ExtractionError::Backend(format!("{}: {e}", self.binary.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Backend(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use sw_types::ItemCategory;

    use super::*;

    fn image(bytes: &[u8]) -> ContentBlob {
        ContentBlob::new(bytes.to_vec(), ItemCategory::Media)
    }

    #[tokio::test]
    async fn exif_on_non_image_is_decode_error() {
        let outcome = ExifExtractor.extract(&image(b"plain text"), "x_map.jpg").await;
        assert!(matches!(outcome, Err(ExtractionError::Decode(_))));
    }

    #[tokio::test]
    async fn avif_is_declared_unsupported() {
        let ocr = TesseractRecognizer::new("tesseract", vec!["avif".into()]);
        let outcome = ocr.recognize(&image(b"...."), "coast_MAP.AVIF").await;
        assert_eq!(
            outcome,
            Err(ExtractionError::Unsupported {
                format: "AVIF".into(),
                channel: "OCR".into(),
            })
        );
    }

    #[tokio::test]
    async fn missing_binary_is_backend_error() {
        let ocr = TesseractRecognizer::new("/nonexistent/tesseract", Vec::new());
        let outcome = ocr.recognize(&image(b"\x89PNG"), "harbor_map.png").await;
        assert!(matches!(outcome, Err(ExtractionError::Backend(_))));
    }

    #[test]
    fn from_config_uses_configured_unsupported_list() {
        let config = MonitorConfig::default();
        let ocr = TesseractRecognizer::from_config(&config);
        assert!(ocr.is_unsupported("avif"));
        assert!(!ocr.is_unsupported("png"));
    }
}
