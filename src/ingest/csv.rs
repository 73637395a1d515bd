//! CSV to table loading.

use crate::error::{Error, Result};
use crate::table::Table;
use std::path::Path;

/// Load a CSV file into a [`Table`].
///
/// The first record is the header; empty header cells receive positional
/// `Unnamed: N` names. Ragged rows are accepted because report exports
/// widen mid-file when an un-headered section begins.
pub fn load_table(path: impl AsRef<Path>, name: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut records = reader.records();
    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|s| s.to_string()).collect(),
        None => return Err(Error::EmptyTable(name.to_string())),
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in records {
        rows.push(record?.iter().map(|s| s.to_string()).collect());
    }

    Ok(Table::new(name, header, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_table_with_header() {
        let file = write_csv("Name,Value\nCash,100\nDebt,200\n");
        let table = load_table(file.path(), "Portfolio Value").unwrap();
        assert_eq!(table.columns(), &["Name", "Value"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, 0), "Debt");
    }

    #[test]
    fn test_load_ragged_rows() {
        let file = write_csv("A,B\nx\ny,1,2,3\n");
        let table = load_table(file.path(), "t").unwrap();
        assert_eq!(table.columns().len(), 4);
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(1, 3), "3");
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let file = write_csv("");
        assert!(matches!(load_table(file.path(), "t"), Err(Error::EmptyTable(_))));
    }
}
