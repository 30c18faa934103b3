//! Tabular content parsing.
//!
//! Content is read as headerless CSV. Every record must have the same field
//! count as the first; ragged or non-UTF-8 content is a parse error.

use sw_types::Table;

use crate::error::{DiffError, DiffResult, Side};

/// Parse CSV bytes into a positional table.
pub fn parse_table(data: &[u8]) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(data);

    reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect()
}

/// Parse both sides of a tabular item, naming the side that failed.
pub fn parse_tables(local: &[u8], remote: &[u8]) -> DiffResult<(Table, Table)> {
    let local = parse_table(local).map_err(|source| DiffError::Parse {
        side: Side::Local,
        source,
    })?;
    let remote = parse_table(remote).map_err(|source| DiffError::Parse {
        side: Side::Remote,
        source,
    })?;
    Ok((local, remote))
}
