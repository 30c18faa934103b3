//! Positional row/field comparison for tabular content.

use sw_types::{Row, Table};

use crate::report::{ChangeCounter, DiffReport};

/// Line emitted when the content differs but no row or field delta was found.
pub const NO_ROW_CHANGES: &str = "No specific changes identified (full content mismatch)";

/// Compare two tables row by row.
///
/// Rows are aligned by position, never by key. Within a row only the first
/// differing field is reported. Row and column numbers are 1-based, and
/// itemization stops once the change counter is capped.
pub fn diff_tables(local: &Table, remote: &Table) -> DiffReport {
    let mut report = DiffReport::new();
    let mut counter = ChangeCounter::new();
    let rows = local.len().max(remote.len());

    for i in 0..rows {
        if counter.is_capped() {
            break;
        }
        match (local.get(i), remote.get(i)) {
            (None, Some(remote_row)) => {
                counter.added += 1;
                report.push(format!("Added row {}: {}", i + 1, remote_row.join(",")));
            }
            (Some(local_row), None) => {
                counter.omitted += 1;
                report.push(format!("Omitted row {}: {}", i + 1, local_row.join(",")));
            }
            (Some(local_row), Some(remote_row)) => {
                if let Some((col, old, new)) = first_field_change(local_row, remote_row) {
                    counter.modified += 1;
                    report.push(format!(
                        "Modified field in row {}, col {}: '{}' → '{}'",
                        i + 1,
                        col + 1,
                        old,
                        new
                    ));
                }
            }
            (None, None) => break,
        }
    }

    if counter.is_zero() {
        report.push(NO_ROW_CHANGES);
    }
    report
}

/// First column where the rows disagree. A missing field compares as empty.
fn first_field_change<'a>(local: &'a Row, remote: &'a Row) -> Option<(usize, &'a str, &'a str)> {
    let cols = local.len().max(remote.len());
    (0..cols).find_map(|j| {
        let old = local.get(j).map(String::as_str).unwrap_or("");
        let new = remote.get(j).map(String::as_str).unwrap_or("");
        (old != new).then_some((j, old, new))
    })
}
