//! Error types for the statement pipeline.
//!
//! Only the fatal categories surface here. Unparsable numeric cells,
//! missing branding images, and absent `Total:` rows are absorbed at the
//! point of use with a diagnostic instead of an error.

/// Result type alias for statement pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can abort report generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more of the seven required documents could not be resolved
    #[error("Missing required input files: {}", .0.join(", "))]
    MissingInput(Vec<String>),

    /// File extension outside the allowed set
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Client identity cell did not split into code/ucid/name
    #[error("Malformed client information: expected 'code/ucid/name', found '{0}'")]
    MalformedClientInfo(String),

    /// No row carrying the client identity label was found
    #[error("Client information row not found in input tables")]
    ClientInfoNotFound,

    /// A required section sentinel is absent
    #[error("Section marker not found: '{0}'")]
    MarkerNotFound(String),

    /// A named column is absent from a table
    #[error("Column not found in '{table}': '{column}'")]
    ColumnNotFound {
        /// Table the lookup ran against
        table: String,
        /// Missing column name
        column: String,
    },

    /// A table resolved but held no usable rows
    #[error("Table '{0}' is empty")]
    EmptyTable(String),

    /// Workbook could not be opened or a sheet could not be read
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Image could not be decoded
    #[error("Image error: {0}")]
    Image(String),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_lists_files() {
        let err = Error::MissingInput(vec!["FNO.csv".to_string(), "Profits.csv".to_string()]);
        let msg = format!("{}", err);
        assert!(msg.contains("FNO.csv"));
        assert!(msg.contains("Profits.csv"));
    }

    #[test]
    fn test_malformed_client_info() {
        let err = Error::MalformedClientInfo("AB123/only-two".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("code/ucid/name"));
        assert!(msg.contains("AB123/only-two"));
    }

    #[test]
    fn test_column_not_found() {
        let err = Error::ColumnNotFound {
            table: "Equity".to_string(),
            column: "Market Value".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Equity"));
        assert!(msg.contains("Market Value"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
