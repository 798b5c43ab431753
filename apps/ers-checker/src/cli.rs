//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ers-checker",
    version,
    about = "ERS spreadsheet error reports and upload checks",
    long_about = "ers-checker — assemble per-sheet error reports from validation findings and pre-check ODS/CSV uploads.\n\nConfiguration precedence: CLI > ers-checker.toml > defaults.",
    after_help = "Examples:\n  ers-checker report --input findings.json\n  ers-checker report --input findings.yaml --output json --sort-by-column\n  ers-checker check-file 'uploads/*.csv' --kind csv --lang cy",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current ers-checker version.")]
    Version,
    /// Build an error report from findings
    #[command(
        about = "Assemble an error report",
        long_about = "Read validation findings (JSON, YAML or TOML) and print the per-sheet error list and error type counts. Exits 1 when any error was reported.",
        after_help = "Examples:\n  ers-checker report --input findings.json\n  ers-checker report --input findings.json --output json"
    )]
    Report {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Findings file, relative to the repository root")]
        input: String,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Sort cell errors by numeric column")]
        sort_by_column: bool,
    },
    /// Pre-check upload candidates
    #[command(
        about = "Check upload files",
        long_about = "Validate file names, extensions and sizes of ODS/CSV upload candidates. CSV checks also reject duplicate names.",
        after_help = "Examples:\n  ers-checker check-file return.ods --kind ods\n  ers-checker check-file 'csv/*.csv' --kind csv --output json"
    )]
    CheckFile {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(required = true, help = "Files or glob patterns to check")]
        paths: Vec<String>,
        #[arg(long, help = "Expected file kind: ods|csv")]
        kind: String,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Message language: en|cy (default: en)")]
        lang: Option<String>,
    },
}
