//! Findings schema: raw per-sheet errors emitted by the validation engine.

use super::CellError;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
/// Top-level findings document.
pub struct Findings {
    #[serde(default)]
    pub sheets: Vec<SheetFindings>,
}

#[derive(Debug, Deserialize)]
/// Errors reported for one worksheet, sentinel rows included.
pub struct SheetFindings {
    pub number: String,
    pub name: String,
    #[serde(default)]
    pub errors: Vec<CellError>,
}
