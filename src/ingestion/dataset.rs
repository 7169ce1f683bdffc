//! Raw tabular input as handed over by the data-entry collaborator

use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::types::*;

/// A headered grid of text cells with no fixed schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularDataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TabularDataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a dataset from string slices, handy for collaborators holding literal grids
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    /// Decode a headered CSV stream
    ///
    /// Rows may be shorter or longer than the header; missing cells read as blank.
    pub fn from_csv_reader<R: Read>(reader: R) -> EngineResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if record.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Cell text for a row and column, blank when the row is short
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}
