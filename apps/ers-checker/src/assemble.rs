//! Build an error report from engine findings.
//!
//! Every raw error counts towards the sheet and total counts, including
//! sentinel row `"0"` entries that `Sheet::add_error` leaves out of the
//! per-cell list. Error type counts are derived across all sheets.

use crate::models::findings::Findings;
use crate::models::{ColumnParseError, CorrelatedData, ErrorList, ErrorTypeCount, Sheet};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("cannot read findings '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("findings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("findings are not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("findings are not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("sheet '{sheet}': {source}")]
    Column {
        sheet: String,
        #[source]
        source: ColumnParseError,
    },
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AssembleOptions {
    /// Sort each sheet's cell errors by numeric column.
    pub sort_by_column: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Assembled report handed to printers.
pub struct Report {
    pub error_list: ErrorList,
    pub correlated_data: CorrelatedData,
}

impl Report {
    /// True when the report carries no errors at all.
    pub fn is_clean(&self) -> bool {
        self.error_list.total_error_count() == "0"
    }
}

/// Read a findings document, decoding by file extension (JSON by default).
pub fn load_findings(path: &Path) -> Result<Findings, AssembleError> {
    let data = fs::read_to_string(path).map_err(|source| AssembleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    debug!(path = %path.display(), ext = %ext, "loading findings");
    let findings = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&data)?,
        "toml" => toml::from_str(&data)?,
        _ => serde_json::from_str(&data)?,
    };
    Ok(findings)
}

/// Assemble `ErrorList` and `CorrelatedData` from raw findings.
pub fn assemble(findings: Findings, opts: &AssembleOptions) -> Result<Report, AssembleError> {
    let mut total = 0usize;
    let mut by_code: BTreeMap<String, usize> = BTreeMap::new();
    let mut sheets: Vec<Sheet> = Vec::with_capacity(findings.sheets.len());

    for sf in findings.sheets {
        let raw = sf.errors.len();
        total += raw;
        let mut sheet = Sheet::new(sf.number, sf.name, raw.to_string());
        for e in sf.errors {
            *by_code.entry(e.error().to_string()).or_insert(0) += 1;
            sheet.add_error(e);
        }
        if opts.sort_by_column {
            sheet
                .sort_errors_by_column()
                .map_err(|source| AssembleError::Column {
                    sheet: sheet.number().to_string(),
                    source,
                })?;
        }
        debug!(
            sheet = sheet.number(),
            reported = raw,
            listed = sheet.errors().len(),
            "assembled sheet"
        );
        sheets.push(sheet);
    }

    let mut error_list = ErrorList::new(total.to_string());
    for sheet in sheets {
        if let Some(prev) = error_list.add_sheet(sheet) {
            warn!(
                sheet = prev.number(),
                name = prev.name(),
                "duplicate sheet number; earlier entry replaced"
            );
        }
    }

    let mut codes: Vec<(String, usize)> = by_code.into_iter().collect();
    codes.sort_by(|(a, _), (b, _)| compare_codes(a, b));
    let mut correlated_data = CorrelatedData::new();
    for (code, count) in codes {
        correlated_data.put(ErrorTypeCount::new(code, count.to_string()));
    }

    Ok(Report {
        error_list,
        correlated_data,
    })
}

/// Numeric order when both codes are integers, string order otherwise.
fn compare_codes(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::findings::SheetFindings;
    use crate::models::CellError;
    use tempfile::tempdir;

    fn sheet(number: &str, errors: Vec<CellError>) -> SheetFindings {
        SheetFindings {
            number: number.into(),
            name: format!("Sheet{number}"),
            errors,
        }
    }

    #[test]
    fn test_assemble_counts_include_sentinel_rows() {
        let findings = Findings {
            sheets: vec![
                sheet(
                    "1",
                    vec![
                        CellError::new("0", "0", "10"),
                        CellError::new("4", "3", "2"),
                    ],
                ),
                sheet("2", vec![CellError::new("1", "8", "2")]),
            ],
        };
        let report = assemble(findings, &AssembleOptions::default()).unwrap();
        assert_eq!(report.error_list.total_error_count(), "3");
        let s1 = &report.error_list.sheets()["1"];
        assert_eq!(s1.error_count(), "2");
        assert_eq!(s1.errors().len(), 1);
        // Codes ordered numerically: "2" before "10"
        let counts: Vec<_> = report
            .correlated_data
            .all()
            .iter()
            .map(|c| (c.error_code(), c.error_count()))
            .collect();
        assert_eq!(counts, vec![("2", "2"), ("10", "1")]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_assemble_sorts_and_reports_bad_column() {
        let findings = Findings {
            sheets: vec![sheet(
                "1",
                vec![CellError::new("12", "1", "1"), CellError::new("2", "1", "1")],
            )],
        };
        let opts = AssembleOptions {
            sort_by_column: true,
        };
        let report = assemble(findings, &opts).unwrap();
        let cols: Vec<_> = report.error_list.sheets()["1"]
            .errors()
            .iter()
            .map(|e| e.column())
            .collect();
        assert_eq!(cols, vec!["2", "12"]);

        let bad = Findings {
            sheets: vec![sheet("7", vec![CellError::new("B", "1", "1")])],
        };
        match assemble(bad, &opts) {
            Err(AssembleError::Column { sheet, source }) => {
                assert_eq!(sheet, "7");
                assert_eq!(source.column, "B");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_assemble_duplicate_sheet_replaced() {
        let findings = Findings {
            sheets: vec![
                sheet("1", vec![CellError::new("1", "1", "1")]),
                sheet("1", vec![]),
            ],
        };
        let report = assemble(findings, &AssembleOptions::default()).unwrap();
        assert_eq!(report.error_list.sheets().len(), 1);
        assert_eq!(report.error_list.sheets()["1"].error_count(), "0");
        assert_eq!(report.error_list.total_error_count(), "1");
    }

    #[test]
    fn test_empty_findings_is_clean() {
        let report = assemble(Findings::default(), &AssembleOptions::default()).unwrap();
        assert!(report.is_clean());
        assert!(report.correlated_data.is_empty());
    }

    #[test]
    fn test_load_findings_by_extension() {
        let dir = tempdir().unwrap();
        let json = dir.path().join("f.json");
        fs::write(
            &json,
            r#"{"sheets":[{"number":"1","name":"A","errors":[{"column":"2","row":"3","error":"5"}]}]}"#,
        )
        .unwrap();
        let f = load_findings(&json).unwrap();
        assert_eq!(f.sheets[0].errors[0].column(), "2");

        let yaml = dir.path().join("f.yaml");
        fs::write(
            &yaml,
            "sheets:\n  - number: \"2\"\n    name: B\n",
        )
        .unwrap();
        let f = load_findings(&yaml).unwrap();
        assert_eq!(f.sheets[0].number, "2");
        assert!(f.sheets[0].errors.is_empty());

        let toml_path = dir.path().join("f.toml");
        fs::write(
            &toml_path,
            "[[sheets]]\nnumber = \"3\"\nname = \"C\"\n[[sheets.errors]]\ncolumn = \"1\"\nrow = \"0\"\nerror = \"9\"\n",
        )
        .unwrap();
        let f = load_findings(&toml_path).unwrap();
        assert_eq!(f.sheets[0].errors[0].row(), "0");

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{").unwrap();
        assert!(matches!(load_findings(&broken), Err(AssembleError::Json(_))));
        assert!(matches!(
            load_findings(&dir.path().join("missing.json")),
            Err(AssembleError::Io { .. })
        ));
    }
}
