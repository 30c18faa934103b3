//! Positional line comparison for arbitrary text.
//!
//! Used for both extracted metadata dumps and recognized-text dumps; nothing
//! here is specific to images.

use crate::report::{ChangeCounter, DiffReport};

/// Compare two texts line by line.
///
/// Lines are trimmed before comparison. A line that is blank on one side
/// and not the other is reported as added or omitted; two non-blank lines
/// that differ are reported as modified. `label` names the source of the
/// text (e.g. `EXIF`, `OCR`) in every emitted line.
pub fn diff_lines(local: &str, remote: &str, label: &str) -> DiffReport {
    let local_lines: Vec<&str> = local.split('\n').collect();
    let remote_lines: Vec<&str> = remote.split('\n').collect();

    let mut report = DiffReport::new();
    let mut counter = ChangeCounter::new();
    let lines = local_lines.len().max(remote_lines.len());

    for i in 0..lines {
        if counter.is_capped() {
            break;
        }
        let old = local_lines.get(i).map(|l| l.trim()).unwrap_or("");
        let new = remote_lines.get(i).map(|l| l.trim()).unwrap_or("");

        if old.is_empty() && !new.is_empty() {
            counter.added += 1;
            report.push(format!("Added {label} line {}: {new}", i + 1));
        } else if new.is_empty() && !old.is_empty() {
            counter.omitted += 1;
            report.push(format!("Omitted {label} line {}: {old}", i + 1));
        } else if old != new {
            counter.modified += 1;
            report.push(format!("Modified {label} line {}: '{old}' → '{new}'", i + 1));
        }
    }

    if counter.is_zero() {
        report.push(format!("No {label} changes identified"));
    }
    report
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::report::MAX_CHANGES;

    #[test]
    fn modified_line() {
        let report = diff_lines("Make: Canon\nModel: X\n", "Make: Canon\nModel: Y\n", "EXIF");
        assert_eq!(report.lines(), ["Modified EXIF line 2: 'Model: X' → 'Model: Y'"]);
    }

    #[test]
    fn added_and_omitted_lines() {
        let report = diff_lines("keep\n\nold", "keep\nnew\n", "OCR");
        assert_eq!(
            report.lines(),
            ["Added OCR line 2: new", "Omitted OCR line 3: old"]
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let report = diff_lines("  hello \r\nworld", "hello\n\tworld  ", "OCR");
        assert_eq!(report.lines(), ["No OCR changes identified"]);
    }

    #[test]
    fn identical_text_renders_fallback_only() {
        let text = "GPS: 45.0\nMake: Nikon\n";
        let report = diff_lines(text, text, "EXIF");
        assert_eq!(report.lines(), ["No EXIF changes identified"]);
    }

    #[test]
    fn empty_inputs_render_fallback() {
        let report = diff_lines("", "", "OCR");
        assert_eq!(report.lines(), ["No OCR changes identified"]);
    }

    #[test]
    fn itemization_stops_at_cap() {
        let remote: String = (0..40).map(|i| format!("line {i}\n")).collect();
        let report = diff_lines("", &remote, "OCR");
        assert_eq!(report.lines().len(), MAX_CHANGES);
        assert_eq!(report.lines()[0], "Added OCR line 1: line 0");
    }

    proptest! {
        #[test]
        fn change_lines_never_exceed_cap(local in "[ab \n]{0,200}", remote in "[ab \n]{0,200}") {
            let report = diff_lines(&local, &remote, "OCR");
            prop_assert!(report.lines().len() <= MAX_CHANGES);
            prop_assert!(!report.lines().is_empty());
        }

        #[test]
        fn diff_is_reflexive(text in "[a-z \n]{0,200}") {
            let report = diff_lines(&text, &text, "EXIF");
            prop_assert_eq!(report.lines(), ["No EXIF changes identified".to_string()]);
        }
    }
}
