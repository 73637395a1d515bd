//! Command-line entry point.
//!
//! Usage: `folio-statement <input-file>...`
//!
//! Inputs may be CSVs named after the canonical documents or Excel
//! workbooks whose sheets carry those names. The statement is written to
//! `portfolio_reports/portfolio_report.pdf`.

use folio_statement::compose::{self, DEFAULT_CONVERTED_DIR, DEFAULT_OUTPUT_DIR};
use folio_statement::ingest::{excel, UploadSelection};
use log::error;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: folio-statement <input-file>...");
        eprintln!("       accepts .xlsx, .xls, .xlsm, and .csv inputs");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(path) => {
            println!("Statement written to {}", path);
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(args: &[String]) -> folio_statement::Result<String> {
    let selection = UploadSelection::from_paths(args)?;

    let converted_dir = Path::new(DEFAULT_CONVERTED_DIR);
    for entry in selection.workbooks() {
        excel::expand_workbook(&entry.path, converted_dir)?;
    }

    let report = compose::generate_report(
        &selection,
        converted_dir,
        Path::new("."),
        Path::new(DEFAULT_OUTPUT_DIR),
    )?;
    Ok(report.display().to_string())
}
