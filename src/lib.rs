//! Portfolio statement generation from brokerage spreadsheet exports.
//!
//! The pipeline ingests seven canonical documents (Portfolio Value,
//! Holding, XIRR, Equity, Debt, FNO, Profits) as CSVs or Excel
//! workbooks, normalizes them into string tables, computes the
//! statement aggregates, and renders a multi-page PDF: cover, summary
//! with allocation pie, holdings per category, FNO history with a
//! cumulative profit line, realized gains, an unrealized-gains donut,
//! and the closing notes.
//!
//! ```no_run
//! use folio_statement::compose;
//! use folio_statement::ingest::UploadSelection;
//! use std::path::Path;
//!
//! # fn main() -> folio_statement::Result<()> {
//! let selection = UploadSelection::from_paths(&["exports/statement.xlsx"])?;
//! for entry in selection.workbooks() {
//!     folio_statement::ingest::excel::expand_workbook(&entry.path, "converted_files")?;
//! }
//! let report = compose::generate_report(
//!     &selection,
//!     Path::new("converted_files"),
//!     Path::new("."),
//!     Path::new("portfolio_reports"),
//! )?;
//! println!("{}", report.display());
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod compose;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod ingest;
pub mod pdf;
pub mod render;
pub mod table;

pub use error::{Error, Result};
pub use table::{Numeric, SectionRule, Table};
