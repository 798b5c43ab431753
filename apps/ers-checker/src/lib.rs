//! ers-checker core library.
//!
//! This crate models spreadsheet validation errors for JSON transport and
//! exposes programmatic APIs to assemble error reports and pre-check uploads.
//!
//! High-level modules:
//! - `models`: Cell errors, sheets, error type counts and the error list.
//! - `assemble`: Builds reports from validation engine findings.
//! - `precheck`: File name, extension and size checks for ODS/CSV uploads.
//! - `config`: Discovery and effective configuration resolution.
//! - `output`: Human/JSON printers.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `utils`: Diagnostic prefixes and logging setup.
pub mod assemble;
pub mod cli;
pub mod config;
pub mod models;
pub mod output;
pub mod precheck;
pub mod utils;
