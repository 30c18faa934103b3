//! Fingerprint-only comparison for formats with no structural model.

use sw_crypto::fingerprint;
use sw_types::{ContentBlob, Fingerprint};

use crate::report::DiffReport;

/// The audit line naming both full fingerprints.
pub(crate) fn fingerprint_line(local: &Fingerprint, remote: &Fingerprint) -> String {
    format!("File Hash: Local={local}, Remote={remote}")
}

/// Report that two blobs differ, with both fingerprints and no content detail.
pub fn diff_opaque(local: &ContentBlob, remote: &ContentBlob, label: &str) -> DiffReport {
    let local_fp = fingerprint(local.bytes());
    let remote_fp = fingerprint(remote.bytes());

    let mut report = DiffReport::new();
    if local_fp == remote_fp {
        report.push(format!("No {label} changes identified"));
    } else {
        report.push(format!("{label} content differs (compared by fingerprint only)"));
    }
    report.push(fingerprint_line(&local_fp, &remote_fp));
    report
}

#[cfg(test)]
mod tests {
    use sw_types::ItemCategory;

    use super::*;

    fn pdf(bytes: &[u8]) -> ContentBlob {
        ContentBlob::new(bytes.to_vec(), ItemCategory::OpaqueDocument)
    }

    #[test]
    fn reports_both_full_fingerprints() {
        let local = pdf(b"%PDF-1.7 one");
        let remote = pdf(b"%PDF-1.7 two");
        let report = diff_opaque(&local, &remote, "PDF");

        let rendered = report.render();
        assert!(rendered.contains(&fingerprint(local.bytes()).to_hex()));
        assert!(rendered.contains(&fingerprint(remote.bytes()).to_hex()));
        assert_eq!(report.lines()[0], "PDF content differs (compared by fingerprint only)");
    }

    #[test]
    fn no_content_detail_regardless_of_size() {
        let local = pdf(&vec![b'a'; 100_000]);
        let mut bigger = vec![b'a'; 200_000];
        bigger[150_000] = b'b';
        let remote = pdf(&bigger);

        let report = diff_opaque(&local, &remote, "PDF");
        assert_eq!(report.lines().len(), 2);
        assert!(!report.render().contains("aaaa"));
    }

    #[test]
    fn identical_blobs_still_produce_a_line() {
        let blob = pdf(b"same");
        let report = diff_opaque(&blob, &blob, "PDF");
        assert_eq!(report.lines()[0], "No PDF changes identified");
    }
}
