//! Media reconciliation: a fingerprint comparison plus two independent
//! extraction channels, each reconciled across local and remote outcomes.

use sw_crypto::fingerprint;
use sw_types::{ContentBlob, ExtractionOutcome};

use crate::line_diff::diff_lines;
use crate::opaque_diff::fingerprint_line;
use crate::report::DiffReport;

/// Label of the structured-metadata channel.
pub const METADATA_CHANNEL: &str = "EXIF";

/// Label of the recognized-text channel.
pub const TEXT_CHANNEL: &str = "OCR";

/// Compare two media blobs.
///
/// The report opens with both full fingerprints, followed by the metadata
/// section and then the recognized-text section. Each section is produced
/// by [`reconcile_channel`] and is never empty.
pub fn diff_media(
    local: &ContentBlob,
    remote: &ContentBlob,
    local_meta: &ExtractionOutcome,
    remote_meta: &ExtractionOutcome,
    local_text: &ExtractionOutcome,
    remote_text: &ExtractionOutcome,
) -> DiffReport {
    let mut report = DiffReport::new();
    report.push(fingerprint_line(
        &fingerprint(local.bytes()),
        &fingerprint(remote.bytes()),
    ));
    reconcile_channel(&mut report, METADATA_CHANNEL, local_meta, remote_meta);
    reconcile_channel(&mut report, TEXT_CHANNEL, local_text, remote_text);
    report
}

/// Append one channel's section, keyed on which sides extracted successfully.
fn reconcile_channel(
    report: &mut DiffReport,
    label: &str,
    local: &ExtractionOutcome,
    remote: &ExtractionOutcome,
) {
    match (local, remote) {
        (Ok(old), Ok(new)) if old == new => {
            report.push(format!("{label} unchanged"));
        }
        (Ok(old), Ok(new)) => {
            report.push(format!("{label} changed:"));
            report.extend(diff_lines(old, new, label));
        }
        (Ok(old), Err(cause)) => {
            report.push(format!("{label}: local present, remote extraction failed"));
            report.push(format!("Remote {label} error: {cause}"));
            report.push(format!("Local {label}:"));
            report.push(old.as_str());
        }
        (Err(cause), Ok(new)) => {
            report.push(format!("{label}: remote added, local extraction failed"));
            report.push(format!("Local {label} error: {cause}"));
            report.push(format!("Remote {label}:"));
            report.push(new.as_str());
        }
        (Err(local_cause), Err(remote_cause)) => {
            report.push(format!("Local {label} error: {local_cause}"));
            report.push(format!("Remote {label} error: {remote_cause}"));
        }
    }
}
