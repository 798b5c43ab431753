//! Upload pre-checks for candidate ODS/CSV files.
//!
//! Checks run in a fixed order and the first failure is reported:
//! invalid characters, name length, extension, size, then (CSV only)
//! duplicate names among the checked files.

use glob::glob;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

const MB: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Ods,
    Csv,
}

impl FileKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ods" => Some(FileKind::Ods),
            "csv" => Some(FileKind::Csv),
            _ => None,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            FileKind::Ods => "ods",
            FileKind::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Message language.
pub enum Lang {
    #[default]
    En,
    Cy,
}

impl Lang {
    /// Unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("cy") {
            Lang::Cy
        } else {
            Lang::En
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub ods_max_bytes: u64,
    pub csv_max_bytes: u64,
    pub max_filename_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            ods_max_bytes: 10 * MB,
            csv_max_bytes: 100 * MB,
            max_filename_length: 240,
        }
    }
}

impl Limits {
    fn max_bytes(&self, kind: FileKind) -> u64 {
        match kind {
            FileKind::Ods => self.ods_max_bytes,
            FileKind::Csv => self.csv_max_bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    InvalidChars,
    NameTooLong,
    WrongExtension,
    TooLarge,
    Duplicate,
}

#[derive(Debug, Clone, Serialize)]
/// Outcome of checking one file.
pub struct FileCheck {
    pub file: String,
    pub kind: FileKind,
    pub ok: bool,
    pub message: Option<String>,
}

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).expect("static regex"))
}

fn message(fail: Failure, kind: FileKind, lang: Lang, limits: &Limits) -> String {
    let template = match (lang, kind, fail) {
        (Lang::En, _, Failure::InvalidChars) => {
            "Choose a different file – the file's name can't contain invalid characters"
        }
        (Lang::En, FileKind::Csv, Failure::NameTooLong) => {
            "The filename must contain {0} characters or less"
        }
        (Lang::En, FileKind::Ods, Failure::NameTooLong) => {
            "Choose a different file – the file's name must be {0} characters or less"
        }
        // No Welsh wording exists for the extension checks
        (_, FileKind::Csv, Failure::WrongExtension) => {
            "Choose a different file – it must be a CSV file"
        }
        (_, FileKind::Ods, Failure::WrongExtension) => {
            "Choose a different file – it must be an ODS file"
        }
        (Lang::En, FileKind::Csv, Failure::TooLarge) => {
            "Check this file (you can only upload files that are {0}MB or less)"
        }
        (Lang::En, FileKind::Ods, Failure::TooLarge) => {
            "The attached file is too large. We only accept files less than {0}MB"
        }
        (Lang::En, _, Failure::Duplicate) => {
            "Choose a different file – you've already chosen one with this name"
        }
        (Lang::Cy, _, Failure::InvalidChars) => {
            "Dewiswch ffeil wahanol – na all enw’r ffeil gynnwys cymeriadau annilys"
        }
        (Lang::Cy, FileKind::Csv, Failure::NameTooLong) => {
            "Mae’n rhaid i enw’r ffeil gynnwys {0} o gymeriadau neu lai"
        }
        (Lang::Cy, FileKind::Ods, Failure::NameTooLong) => {
            "Dewiswch ffeil wahanol – rhaid i enw’r ffeil fod yn {0} o gymeriadau neu lai"
        }
        (Lang::Cy, FileKind::Csv, Failure::TooLarge) => {
            "Gwiriwch y ffeil hon (gallwch ond uwchlwytho ffeiliau sy’n {0}MB neu lai)"
        }
        (Lang::Cy, FileKind::Ods, Failure::TooLarge) => {
            "Mae’r ffeil a atodwyd yn rhy fawr. Rydym dim ond yn derbyn ffeiliau sy’n llai na {0}MB"
        }
        (Lang::Cy, _, Failure::Duplicate) => {
            "Dewiswch ffeil wahanol – rydych eisoes wedi dewis un gyda’r enw hwn"
        }
    };
    let arg = match fail {
        Failure::NameTooLong => limits.max_filename_length.to_string(),
        Failure::TooLarge => format_mb(limits.max_bytes(kind)),
        _ => String::new(),
    };
    template.replace("{0}", &arg)
}

/// Size limit in MB, fractional when not a whole number ("1.5", "10").
fn format_mb(bytes: u64) -> String {
    format!("{}", bytes as f64 / MB as f64)
}

fn extension_of(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => name.to_ascii_lowercase(),
    }
}

/// Name, extension and size checks for a single file.
fn check_one(name: &str, size: u64, kind: FileKind, limits: &Limits) -> Option<Failure> {
    if invalid_chars().is_match(name) {
        return Some(Failure::InvalidChars);
    }
    if name.chars().count() > limits.max_filename_length {
        return Some(Failure::NameTooLong);
    }
    if extension_of(name) != kind.extension() {
        return Some(Failure::WrongExtension);
    }
    if size > limits.max_bytes(kind) {
        return Some(Failure::TooLarge);
    }
    None
}

/// Expand `patterns` relative to `root`. Entries without glob metacharacters
/// are kept even when they do not exist so that they get reported. A path
/// named twice stays twice so the duplicate-name check can see it.
fn expand(root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for pat in patterns {
        let abs = root.join(pat);
        if !pat.contains(&['*', '?', '['][..]) {
            out.push(abs);
            continue;
        }
        match glob(&abs.to_string_lossy()) {
            Ok(paths) => out.extend(paths.flatten()),
            Err(e) => debug!(pattern = %pat, error = %e, "skipping bad glob pattern"),
        }
    }
    out.sort();
    out
}

fn display_path(root: &Path, p: &Path) -> String {
    pathdiff::diff_paths(p, root)
        .filter(|rel| !rel.starts_with(".."))
        .unwrap_or_else(|| p.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// Check every file matched by `patterns`. Results are ordered by path.
pub fn check_files(
    root: &Path,
    patterns: &[String],
    kind: FileKind,
    limits: &Limits,
    lang: Lang,
) -> Vec<FileCheck> {
    let targets = expand(root, patterns);
    debug!(count = targets.len(), ?kind, "checking files");

    let mut results: Vec<(String, FileCheck)> = targets
        .par_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let file = display_path(root, path);
            let check = match fs::metadata(path) {
                Ok(meta) => {
                    let fail = check_one(&name, meta.len(), kind, limits);
                    FileCheck {
                        file,
                        kind,
                        ok: fail.is_none(),
                        message: fail.map(|f| message(f, kind, lang, limits)),
                    }
                }
                Err(e) => FileCheck {
                    file,
                    kind,
                    ok: false,
                    message: Some(format!("cannot read file: {}", e)),
                },
            };
            (name, check)
        })
        .collect();

    if kind == FileKind::Csv {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (name, _) in &results {
            *seen.entry(name.clone()).or_insert(0) += 1;
        }
        for (name, check) in results.iter_mut() {
            if check.ok && seen.get(name.as_str()).copied().unwrap_or(0) > 1 {
                check.ok = false;
                check.message = Some(message(Failure::Duplicate, kind, lang, limits));
            }
        }
    }

    results.sort_by(|a, b| a.1.file.cmp(&b.1.file));
    results.into_iter().map(|(_, c)| c).collect()
}
