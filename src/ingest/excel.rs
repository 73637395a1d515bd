//! Workbook expansion.
//!
//! Excel inputs are expanded into one CSV per sheet, named `<sheet>.csv`
//! in the converted-file cache. The canonical documents are then resolved
//! by sheet name exactly like directly-uploaded CSVs.
//!
//! Uses the calamine crate for reading Excel files.

use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Data, Reader};
use log::info;
use std::path::{Path, PathBuf};

/// Expand a workbook into one CSV file per sheet.
///
/// The output directory is created if absent and same-named files are
/// overwritten. Returns the paths written, in sheet order.
pub fn expand_workbook(path: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let out_dir = out_dir.as_ref();

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::Spreadsheet(format!("failed to open {}: {}", path.display(), e)))?;

    std::fs::create_dir_all(out_dir)?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut written = Vec::with_capacity(sheet_names.len());

    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| Error::Spreadsheet(format!("failed to read sheet '{}': {}", name, e)))?;

        let out_path = out_dir.join(format!("{}.csv", name));
        let mut writer = csv::Writer::from_path(&out_path)?;
        for row in range.rows() {
            writer.write_record(row.iter().map(cell_to_string))?;
        }
        writer.flush()?;

        info!("expanded sheet '{}' to {}", name, out_path.display());
        written.push(out_path);
    }

    Ok(written)
}

/// Convert a cell value to a string.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Remove trailing zeros for whole numbers
            if f.fract() == 0.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        },
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}
