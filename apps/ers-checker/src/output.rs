//! Output rendering for report and check-file commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form of a report is
//! the serialized `Report`; file checks add a top-level summary.

use crate::assemble::Report;
use crate::precheck::FileCheck;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn paint_bold(s: &str, color: bool) -> String {
    if color {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

/// Print an assembled report in the requested format.
pub fn print_report(report: &Report, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report)).unwrap_or_default()
        ),
        _ => {
            let color = use_colors(output);
            for sheet in report.error_list.sheets_in_numeric_order() {
                let head = format!("Sheet {} ❲{}❳", sheet.number(), sheet.name());
                println!(
                    "{} — {} error(s)",
                    paint_bold(&head, color),
                    sheet.error_count()
                );
                for e in sheet.errors() {
                    let icon = if color {
                        "✖".red().to_string()
                    } else {
                        "✖".to_string()
                    };
                    println!(
                        "  {} column {} row {} ⟦{}⟧",
                        icon,
                        e.column(),
                        e.row(),
                        e.error()
                    );
                }
            }
            if !report.correlated_data.is_empty() {
                println!("{}", paint_bold("Error types:", color));
                for c in report.correlated_data.all() {
                    println!("  ◆ {} × {}", c.error_code(), c.error_count());
                }
            }
            let summary = format!(
                "— Summary — errors={} sheets={} types={}",
                report.error_list.total_error_count(),
                report.error_list.sheets().len(),
                report.correlated_data.len()
            );
            println!("{}", paint_bold(&summary, color));
        }
    }
}

/// Print file pre-check results.
pub fn print_checks(results: &[FileCheck], output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_checks_json(results)).unwrap_or_default()
        ),
        _ => {
            let color = use_colors(output);
            for r in results {
                if r.ok {
                    if color {
                        println!("{} {}", "✔ ok:".green().bold(), r.file.bold());
                    } else {
                        println!("✔ ok: {}", r.file);
                    }
                } else {
                    let msg = r.message.as_deref().unwrap_or_default();
                    if color {
                        println!("{} {} — {}", "✖ failed:".red().bold(), r.file.bold(), msg);
                    } else {
                        println!("✖ failed: {} — {}", r.file, msg);
                    }
                }
            }
            let failed = results.iter().filter(|r| !r.ok).count();
            let summary = format!(
                "— Summary — ok={} failed={} total={}",
                results.len() - failed,
                failed,
                results.len()
            );
            println!("{}", paint_bold(&summary, color));
        }
    }
}

/// Compose report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report) -> JsonVal {
    serde_json::to_value(report).unwrap_or(JsonVal::Null)
}

/// Compose check-file JSON object (pure) for testing/snapshot purposes.
pub fn compose_checks_json(results: &[FileCheck]) -> JsonVal {
    let failed = results.iter().filter(|r| !r.ok).count();
    let summary = json!({
        "ok": results.len() - failed,
        "failed": failed,
        "total": results.len(),
    });
    json!({"results": results, "summary": summary})
}
