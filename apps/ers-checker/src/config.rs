//! Configuration discovery and effective settings resolution.
//!
//! ers-checker reads `ers-checker.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `output`: `human`
//! - `lang`: `en`
//! - `report.sortByColumn`: false
//! - `limits.odsMaxBytes`: 10 MB, `limits.csvMaxBytes`: 100 MB
//! - `limits.maxFilenameLength`: 240
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::precheck::{Lang, Limits};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_TOML: &str = "ers-checker.toml";
const CONFIG_YAML: [&str; 2] = ["ers-checker.yaml", "ers-checker.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Report section under `[report]`.
pub struct ReportCfg {
    #[serde(rename = "sortByColumn")]
    pub sort_by_column: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Upload limits under `[limits]`.
pub struct LimitsCfg {
    #[serde(rename = "odsMaxBytes")]
    pub ods_max_bytes: Option<u64>,
    #[serde(rename = "csvMaxBytes")]
    pub csv_max_bytes: Option<u64>,
    #[serde(rename = "maxFilenameLength")]
    pub max_filename_length: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `ers-checker.toml|yaml`.
pub struct CheckerConfig {
    pub output: Option<String>,
    pub lang: Option<String>,
    #[serde(default)]
    pub report: Option<ReportCfg>,
    #[serde(default)]
    pub limits: Option<LimitsCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_found: bool,
    pub output: String,
    pub lang: Lang,
    pub sort_by_column: bool,
    pub limits: Limits,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when an `ers-checker.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join(CONFIG_TOML).exists() || CONFIG_YAML.iter().any(|y| cur.join(y).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `CheckerConfig` if present. Unreadable or invalid files count as absent.
pub fn load_config(root: &Path) -> Option<CheckerConfig> {
    let toml_path = root.join(CONFIG_TOML);
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        return match toml::from_str(&s) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                debug!(path = %toml_path.display(), error = %e, "ignoring invalid config");
                None
            }
        };
    }
    for yml in CONFIG_YAML {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            return match serde_yaml::from_str(&s) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    debug!(path = %p.display(), error = %e, "ignoring invalid config");
                    None
                }
            };
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_lang: Option<&str>,
    cli_sort_by_column: Option<bool>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root);
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();
    debug!(root = %repo_root.display(), config_found, "resolved repository root");

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let lang = cli_lang
        .map(|s| s.to_string())
        .or(cfg.lang)
        .map(|s| Lang::from_code(&s))
        .unwrap_or_default();

    let sort_by_column = cli_sort_by_column
        .or_else(|| cfg.report.as_ref().and_then(|r| r.sort_by_column))
        .unwrap_or(false);

    let defaults = Limits::default();
    let lim = cfg.limits.unwrap_or_default();
    let limits = Limits {
        ods_max_bytes: lim.ods_max_bytes.unwrap_or(defaults.ods_max_bytes),
        csv_max_bytes: lim.csv_max_bytes.unwrap_or(defaults.csv_max_bytes),
        max_filename_length: lim
            .max_filename_length
            .unwrap_or(defaults.max_filename_length),
    };

    Effective {
        repo_root,
        config_found,
        output,
        lang,
        sort_by_column,
        limits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join(CONFIG_TOML)).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"
lang = "cy"
[report]
sortByColumn = true
[limits]
odsMaxBytes = 2048
    "#
        )
        .unwrap();

        // Resolve using explicit repo_root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, None);
        assert!(eff.config_found);
        assert_eq!(eff.output, "json");
        assert_eq!(eff.lang, Lang::Cy);
        assert!(eff.sort_by_column);
        assert_eq!(eff.limits.ods_max_bytes, 2048);
        assert_eq!(eff.limits.csv_max_bytes, 100_000_000);
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("ers-checker.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output: human
limits:
  maxFilenameLength: 100
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None);
        assert_eq!(eff.output, "human");
        assert_eq!(eff.lang, Lang::En);
        assert!(!eff.sort_by_column);
        assert_eq!(eff.limits.max_filename_length, 100);
        assert_eq!(eff.limits.ods_max_bytes, 10_000_000);
    }

    #[test]
    fn test_cli_precedence_over_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join(CONFIG_TOML),
            "output = \"json\"\n[report]\nsortByColumn = true\n",
        )
        .unwrap();
        let eff = resolve_effective(root.to_str(), Some("human"), Some("cy"), Some(false));
        assert_eq!(eff.output, "human");
        assert_eq!(eff.lang, Lang::Cy);
        assert!(!eff.sort_by_column);
    }

    #[test]
    fn test_invalid_config_treated_as_absent() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(CONFIG_TOML), "output = [").unwrap();
        assert!(load_config(root).is_none());
        let eff = resolve_effective(root.to_str(), None, None, None);
        assert!(!eff.config_found);
        assert_eq!(eff.output, "human");
    }

    #[test]
    fn test_detect_repo_root_walks_up_to_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(CONFIG_TOML), "").unwrap();
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(detect_repo_root(&nested), root.to_path_buf());
    }
}
