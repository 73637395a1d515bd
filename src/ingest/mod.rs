//! Input resolution.
//!
//! The pipeline consumes seven canonical documents exported by the
//! brokerage back office. Each is resolved by exact file name, first
//! against the caller's upload selection and then against the
//! converted-CSV cache produced by workbook expansion. Any unresolved
//! document aborts the run before anything is rendered.

pub mod csv;
pub mod excel;

use crate::error::{Error, Result};
use crate::table::Table;
use log::debug;
use std::path::{Path, PathBuf};

/// The seven canonical documents, in resolution order.
pub const REQUIRED_TABLES: [&str; 7] = [
    "Portfolio Value",
    "Holding",
    "XIRR",
    "Equity",
    "Debt",
    "FNO",
    "Profits",
];

/// Accepted upload extensions.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "xlsm", "csv"];

/// Check that a path carries an accepted extension.
pub fn validate_file_type(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(Error::UnsupportedFileType(path.display().to_string()))
    }
}

/// A single uploaded file.
#[derive(Debug, Clone)]
pub struct UploadEntry {
    /// Display name (file name component)
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Location on disk
    pub path: PathBuf,
}

/// Immutable snapshot of the caller's selected input files.
///
/// The selection is a value passed through the pipeline; nothing mutates
/// it and no global state mirrors it.
#[derive(Debug, Clone, Default)]
pub struct UploadSelection {
    entries: Vec<UploadEntry>,
}

impl UploadSelection {
    /// Build a selection from paths, validating each extension.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            validate_file_type(path)?;
            let size = std::fs::metadata(path)?.len();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            entries.push(UploadEntry {
                name,
                size,
                path: path.to_path_buf(),
            });
        }
        Ok(Self { entries })
    }

    /// Entries in upload order.
    pub fn entries(&self) -> &[UploadEntry] {
        &self.entries
    }

    /// Find an entry by exact file name.
    pub fn find(&self, file_name: &str) -> Option<&UploadEntry> {
        self.entries.iter().find(|e| e.name == file_name)
    }

    /// Entries that need workbook expansion (everything not already CSV).
    pub fn workbooks(&self) -> impl Iterator<Item = &UploadEntry> {
        self.entries.iter().filter(|e| {
            e.path
                .extension()
                .and_then(|x| x.to_str())
                .map(|x| !x.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
    }
}

/// The seven resolved canonical tables.
#[derive(Debug, Clone)]
pub struct TableSet {
    /// Portfolio component values
    pub portfolio_value: Table,
    /// Holdings with sentinel-delimited product sections
    pub holding: Table,
    /// Money-weighted return figures
    pub xirr: Table,
    /// Equity holdings detail
    pub equity: Table,
    /// Debt holdings detail
    pub debt: Table,
    /// Futures and options profit history
    pub fno: Table,
    /// Realized profit detail
    pub profits: Table,
}

/// Resolve and load all seven canonical tables.
///
/// Each document `<name>` resolves to `<name>.csv`, preferring an exact
/// match in the upload selection over the converted cache. Every missing
/// document is collected so the error names the full shortfall at once.
pub fn load_tables(selection: &UploadSelection, converted_dir: &Path) -> Result<TableSet> {
    let mut resolved: Vec<PathBuf> = Vec::with_capacity(REQUIRED_TABLES.len());
    let mut missing: Vec<String> = Vec::new();

    for name in REQUIRED_TABLES {
        let file_name = format!("{}.csv", name);
        if let Some(entry) = selection.find(&file_name) {
            debug!("resolved '{}' from upload selection", file_name);
            resolved.push(entry.path.clone());
            continue;
        }
        let candidate = converted_dir.join(&file_name);
        if candidate.is_file() {
            debug!("resolved '{}' from converted cache", file_name);
            resolved.push(candidate);
        } else {
            missing.push(file_name);
        }
    }

    if !missing.is_empty() {
        return Err(Error::MissingInput(missing));
    }

    // resolved holds exactly one path per entry of REQUIRED_TABLES.
    Ok(TableSet {
        portfolio_value: csv::load_table(&resolved[0], REQUIRED_TABLES[0])?,
        holding: csv::load_table(&resolved[1], REQUIRED_TABLES[1])?,
        xirr: csv::load_table(&resolved[2], REQUIRED_TABLES[2])?,
        equity: csv::load_table(&resolved[3], REQUIRED_TABLES[3])?,
        debt: csv::load_table(&resolved[4], REQUIRED_TABLES[4])?,
        fno: csv::load_table(&resolved[5], REQUIRED_TABLES[5])?,
        profits: csv::load_table(&resolved[6], REQUIRED_TABLES[6])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_validate_file_type() {
        assert!(validate_file_type(Path::new("Holding.csv")).is_ok());
        assert!(validate_file_type(Path::new("report.XLSX")).is_ok());
        assert!(validate_file_type(Path::new("macro.xlsm")).is_ok());
        assert!(validate_file_type(Path::new("notes.txt")).is_err());
        assert!(validate_file_type(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_selection_rejects_bad_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "x").unwrap();
        assert!(matches!(
            UploadSelection::from_paths(&[&path]),
            Err(Error::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn test_selection_find_and_workbooks() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("Holding.csv");
        let xlsx_path = dir.path().join("export.xlsx");
        fs::write(&csv_path, "a,b\n").unwrap();
        fs::write(&xlsx_path, "fake").unwrap();

        let selection = UploadSelection::from_paths(&[&csv_path, &xlsx_path]).unwrap();
        assert!(selection.find("Holding.csv").is_some());
        assert!(selection.find("Other.csv").is_none());
        let workbooks: Vec<_> = selection.workbooks().map(|e| e.name.clone()).collect();
        assert_eq!(workbooks, vec!["export.xlsx"]);
    }

    #[test]
    fn test_load_tables_reports_all_missing() {
        let dir = tempfile::tempdir().unwrap();
        let selection = UploadSelection::default();
        let err = load_tables(&selection, dir.path()).unwrap_err();
        match err {
            Error::MissingInput(names) => {
                assert_eq!(names.len(), REQUIRED_TABLES.len());
                assert!(names.contains(&"Portfolio Value.csv".to_string()));
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_tables_prefers_upload_over_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("converted");
        fs::create_dir_all(&cache).unwrap();

        // Same file name in both places with different content.
        let uploaded = dir.path().join("Holding.csv");
        fs::write(&uploaded, "Source\nupload\n").unwrap();
        fs::write(cache.join("Holding.csv"), "Source\ncache\n").unwrap();
        for name in REQUIRED_TABLES {
            if name != "Holding" {
                fs::write(cache.join(format!("{}.csv", name)), "A\n1\n").unwrap();
            }
        }

        let selection = UploadSelection::from_paths(&[&uploaded]).unwrap();
        let tables = load_tables(&selection, &cache).unwrap();
        assert_eq!(tables.holding.cell(0, 0), "upload");
    }
}
