//! ers-checker CLI binary entry point.
//! Delegates to library modules and prints results.

use clap::Parser;
use ers_checker::assemble::{self, AssembleOptions};
use ers_checker::cli::{Cli, Commands};
use ers_checker::precheck::{self, FileKind};
use ers_checker::{config, output, utils};
use tracing::debug;

fn main() {
    utils::init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Report {
            repo_root,
            input,
            output,
            sort_by_column,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                output.as_deref(),
                None,
                if sort_by_column { Some(true) } else { None },
            );
            if !eff.config_found {
                debug!("no ers-checker config found; using defaults");
            }
            let path = eff.repo_root.join(&input);
            let opts = AssembleOptions {
                sort_by_column: eff.sort_by_column,
            };
            let report = match assemble::load_findings(&path)
                .and_then(|findings| assemble::assemble(findings, &opts))
            {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            output::print_report(&report, &eff.output);
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Commands::CheckFile {
            repo_root,
            paths,
            kind,
            output,
            lang,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                output.as_deref(),
                lang.as_deref(),
                None,
            );
            let Some(kind) = FileKind::parse(&kind) else {
                eprintln!(
                    "{} unknown file kind '{}' (expected ods or csv)",
                    utils::error_prefix(),
                    kind
                );
                std::process::exit(2);
            };
            let results =
                precheck::check_files(&eff.repo_root, &paths, kind, &eff.limits, eff.lang);
            if results.is_empty() {
                eprintln!("{} no files matched", utils::note_prefix());
            }
            output::print_checks(&results, &eff.output);
            if results.iter().any(|r| !r.ok) {
                std::process::exit(1);
            }
        }
    }
}
