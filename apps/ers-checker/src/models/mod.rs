//! Error report data models serialized for the upload results page.
//!
//! Numeric-looking fields (`column`, `row`, counts, sheet numbers) are kept
//! as strings: the JSON consumer reads them as text.

pub mod findings;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::num::ParseIntError;
use thiserror::Error;

/// Row value marking an error that is not tied to a specific row.
pub const NO_ROW: &str = "0";

#[derive(Debug, Error)]
#[error("column '{column}' is not an integer")]
/// Raised when a cell error's column cannot be read as a number.
pub struct ColumnParseError {
    pub column: String,
    #[source]
    pub source: ParseIntError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single error flagged at a column/row of a sheet.
pub struct CellError {
    column: String,
    row: String,
    error: String,
}

impl CellError {
    pub fn new(
        column: impl Into<String>,
        row: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            row: row.into(),
            error: error.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn row(&self) -> &str {
        &self.row
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    /// Numeric value of `column`.
    pub fn column_number(&self) -> Result<i32, ColumnParseError> {
        self.column
            .parse::<i32>()
            .map_err(|source| ColumnParseError {
                column: self.column.clone(),
                source,
            })
    }

    /// Three-way comparison on the numeric column value, so "3" < "10".
    ///
    /// Both columns are parsed at call time; a non-integer column on either
    /// side is returned as an error instead of being ordered.
    pub fn compare_column(&self, other: &CellError) -> Result<Ordering, ColumnParseError> {
        let ours = self.column_number()?;
        let theirs = other.column_number()?;
        Ok(ours.cmp(&theirs))
    }

    fn is_sheet_level(&self) -> bool {
        self.row == NO_ROW
    }
}

/// Stable sort by numeric column. The slice is left untouched when any
/// column fails to parse.
pub fn sort_by_column(errors: &mut [CellError]) -> Result<(), ColumnParseError> {
    let keys = errors
        .iter()
        .map(CellError::column_number)
        .collect::<Result<Vec<_>, _>>()?;
    let mut keyed: Vec<(i32, CellError)> = keys.into_iter().zip(errors.iter().cloned()).collect();
    keyed.sort_by_key(|(k, _)| *k);
    for (slot, (_, e)) in errors.iter_mut().zip(keyed) {
        *slot = e;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Number of occurrences of one error code.
pub struct ErrorTypeCount {
    error_code: String,
    error_count: String,
}

impl ErrorTypeCount {
    pub fn new(error_code: impl Into<String>, error_count: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            error_count: error_count.into(),
        }
    }

    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    pub fn error_count(&self) -> &str {
        &self.error_count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// One worksheet and the cell errors found on it.
pub struct Sheet {
    number: String,
    name: String,
    error_count: String,
    error_list: Vec<CellError>,
}

impl Sheet {
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        error_count: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            error_count: error_count.into(),
            error_list: Vec::new(),
        }
    }

    /// Append `error` unless its row is the `"0"` sentinel.
    pub fn add_error(&mut self, error: CellError) {
        if !error.is_sheet_level() {
            self.error_list.push(error);
        }
    }

    pub fn sort_errors_by_column(&mut self) -> Result<(), ColumnParseError> {
        sort_by_column(&mut self.error_list)
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error_count(&self) -> &str {
        &self.error_count
    }

    pub fn errors(&self) -> &[CellError] {
        &self.error_list
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Error type counts gathered across sheets, in insertion order.
pub struct CorrelatedData {
    all_correlated_data: Vec<ErrorTypeCount>,
}

impl CorrelatedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, count: ErrorTypeCount) {
        self.all_correlated_data.push(count);
    }

    pub fn all(&self) -> &[ErrorTypeCount] {
        &self.all_correlated_data
    }

    pub fn len(&self) -> usize {
        self.all_correlated_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_correlated_data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Root of the error report: total count plus sheets keyed by number.
///
/// Keys are ordered as strings, so "10" sorts before "2". Existing consumers
/// read the map in this order; use [`ErrorList::sheets_in_numeric_order`] for
/// display.
pub struct ErrorList {
    total_error_count: String,
    sheets: BTreeMap<String, Sheet>,
}

impl ErrorList {
    pub fn new(total_error_count: impl Into<String>) -> Self {
        Self {
            total_error_count: total_error_count.into(),
            sheets: BTreeMap::new(),
        }
    }

    /// Insert `sheet` under its number, returning the sheet it replaced.
    pub fn add_sheet(&mut self, sheet: Sheet) -> Option<Sheet> {
        self.sheets.insert(sheet.number.clone(), sheet)
    }

    pub fn total_error_count(&self) -> &str {
        &self.total_error_count
    }

    pub fn sheets(&self) -> &BTreeMap<String, Sheet> {
        &self.sheets
    }

    /// Sheets ordered by numeric sheet number; non-numeric numbers go last,
    /// in key order.
    pub fn sheets_in_numeric_order(&self) -> Vec<&Sheet> {
        let mut out: Vec<&Sheet> = self.sheets.values().collect();
        out.sort_by_key(|s| match s.number.parse::<u64>() {
            Ok(n) => (0u8, n),
            Err(_) => (1u8, 0),
        });
        out
    }
}
