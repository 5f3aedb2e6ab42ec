// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Comma-separated tables with a header row.
//!
//! Quoted fields may contain commas, doubled quotes and line breaks. Blank
//! lines are skipped and surrounding whitespace is trimmed from every field.
//! Rows are not required to match the header's width; callers decide.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("no header row")]
    Empty,
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of the column called `name`
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Read `text` as a table. With `comments`, lines starting with `#` are
/// ignored.
pub fn read_table(text: &str, comments: bool) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(comments.then_some(b'#'))
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(TableError::Empty);
    }
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(Table { headers, rows })
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
