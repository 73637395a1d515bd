//! End-to-end statement assembly.
//!
//! Resolves inputs, runs the aggregates, renders the fixed page
//! sequence, and writes the finished document in a single filesystem
//! write so a failed run never leaves a partial statement behind.

use crate::aggregate;
use crate::error::Result;
use crate::ingest::{self, UploadSelection};
use crate::pdf::{PdfWriter, PdfWriterConfig};
use crate::render::{pages, Branding};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Output file name inside the report directory.
pub const OUTPUT_FILE: &str = "portfolio_report.pdf";
/// Default report directory.
pub const DEFAULT_OUTPUT_DIR: &str = "portfolio_reports";
/// Default cache directory for expanded workbook sheets.
pub const DEFAULT_CONVERTED_DIR: &str = "converted_files";

/// Generate the complete statement.
///
/// Branding images are looked up in `branding_dir` and are optional.
/// Returns the path of the written PDF.
pub fn generate_report(
    selection: &UploadSelection,
    converted_dir: &Path,
    branding_dir: &Path,
    out_dir: &Path,
) -> Result<PathBuf> {
    let tables = ingest::load_tables(selection, converted_dir)?;

    let details = aggregate::customer_details([&tables.holding])?;
    let allocation = aggregate::portfolio_allocation(&tables.portfolio_value)?;
    let investments = aggregate::investment_summary(&tables.holding);
    let xirr = aggregate::headline_xirr(&tables.xirr);
    let equity = aggregate::subcategory_rollups(&tables.equity, &aggregate::EQUITY_SUBCATEGORIES)?;
    let debt = aggregate::subcategory_rollups(&tables.debt, &aggregate::DEBT_SUBCATEGORIES)?;
    let fno = aggregate::fno_summary(&tables.fno)?;
    let profits = aggregate::realized_gains(&tables.profits);
    let gains = aggregate::unrealized_gains(&tables.holding);

    let branding = Branding::load(branding_dir);

    // Fixed page order of the statement.
    let rendered = [
        pages::cover(&details, &branding),
        pages::summary(&allocation, &investments, xirr, &branding),
        pages::holdings("Equity", &equity, &branding),
        pages::holdings("Debt", &debt, &branding),
        pages::fno(&fno, &branding),
        pages::realized(&profits, &branding),
        pages::unrealized(&gains, &branding),
        pages::disclaimer(&branding),
    ];

    let mut writer = PdfWriter::new(PdfWriterConfig {
        compress: true,
        title: Some(format!("Portfolio Statement - {}", details.name)),
    });
    for page in &rendered {
        writer.add_page(page.width, page.height, &page.elements)?;
    }
    let bytes = writer.finish()?;

    fs::create_dir_all(out_dir)?;
    let out_path = out_dir.join(OUTPUT_FILE);
    fs::write(&out_path, &bytes)?;
    info!(
        "wrote {} ({} pages, {} bytes) for {}",
        out_path.display(),
        rendered.len(),
        bytes.len(),
        details.name
    );
    Ok(out_path)
}
