//! Diff reports: an optional header plus ordered change lines.

use std::fmt;

/// Maximum number of itemized change lines a row or line diff records.
/// Once reached, comparison stops without any further note.
pub const MAX_CHANGES: usize = 10;

/// Default bound on a rendered report handed to the log sink.
pub const DEFAULT_MAX_REPORT_CHARS: usize = 500;

/// Suffix appended to reports cut at the length bound.
pub const TRUNCATION_MARKER: &str = "... (truncated)";

/// A human-readable difference report.
///
/// Reports built by the differs always carry at least one line: a report
/// with no itemized changes renders an explicit "no changes identified"
/// line instead of an empty body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffReport {
    header: String,
    lines: Vec<String>,
}

impl DiffReport {
    /// Create an empty report with no header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the header line.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// Report for an item whose remote copy is no longer served.
    pub fn remote_unavailable(status: u16, url: &str) -> Self {
        let mut report = Self::new();
        report.push(format!(
            "Remote unavailable (HTTP {status}) - potential deletion or rename (URL: {url})"
        ));
        report
    }

    /// Report for an item whose content could not be prepared for diffing.
    pub fn unavailable(reason: impl fmt::Display) -> Self {
        let mut report = Self::new();
        report.push(format!("Diff unavailable: {reason}"));
        report
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append every line of another report, dropping its header.
    pub fn extend(&mut self, other: DiffReport) {
        self.lines.extend(other.lines);
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.lines.is_empty()
    }

    /// Render the report, one `\n`-terminated line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.header.is_empty() {
            out.push_str(&self.header);
            out.push('\n');
        }
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Render the report, cut to at most `max_chars` characters.
    ///
    /// A cut report ends with [`TRUNCATION_MARKER`] and is exactly
    /// `max_chars` long. Bounds too small to hold the marker yield the
    /// marker alone.
    pub fn render_bounded(&self, max_chars: usize) -> String {
        truncate_report(self.render(), max_chars)
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Cut `text` on a char boundary so that it fits in `max_chars` together
/// with the truncation marker.
pub fn truncate_report(text: String, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text;
    }
    let keep = max_chars.saturating_sub(TRUNCATION_MARKER.chars().count());
    let cut = text
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
    out.push_str(&text[..cut]);
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Per-diff tally of itemized changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChangeCounter {
    pub added: usize,
    pub omitted: usize,
    pub modified: usize,
}

impl ChangeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.added + self.omitted + self.modified
    }

    /// True once [`MAX_CHANGES`] lines have been recorded.
    pub fn is_capped(&self) -> bool {
        self.total() >= MAX_CHANGES
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }
}
