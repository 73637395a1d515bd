//! Canonical in-memory table.
//!
//! Every input document is normalized into a [`Table`]: ordered column
//! names over row-major string cells. Header cells that arrive empty are
//! named `Unnamed: N` by position; downstream code addresses un-headered
//! report sections through those positional names, so the naming scheme
//! is a contract, not a cosmetic default.

use crate::error::{Error, Result};
use log::debug;
use std::ops::Range;

/// Outcome of coercing a cell to a number.
///
/// Report exports mix numbers with captions, blanks, and sentinel text in
/// the same column. Coercion never fails; it records whether the value
/// was parsed or substituted so callers (and tests) can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// The cell parsed as a number
    Parsed(f64),
    /// The cell was empty or unparsable; treated as zero
    Defaulted,
}

impl Numeric {
    /// Best-effort parse of a cell.
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Numeric::Defaulted;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Numeric::Parsed(v),
            Err(_) => {
                debug!("treating unparsable cell '{}' as zero", trimmed);
                Numeric::Defaulted
            },
        }
    }

    /// Collapse to a value, defaulting to zero.
    pub fn value(self) -> f64 {
        match self {
            Numeric::Parsed(v) => v,
            Numeric::Defaulted => 0.0,
        }
    }

    /// Whether the zero came from a substitution.
    pub fn is_defaulted(self) -> bool {
        matches!(self, Numeric::Defaulted)
    }
}

/// Declarative description of a sentinel-delimited section.
///
/// Sections are located by scanning column 0 top-to-bottom for the first
/// row equal to `start_marker`; data begins `header_offset` rows below
/// the marker and runs to the `end_marker` row (exclusive) or the end of
/// the table.
#[derive(Debug, Clone, Copy)]
pub struct SectionRule<'a> {
    /// Sentinel text opening the section (e.g. `Equity:-`)
    pub start_marker: &'a str,
    /// Optional sentinel closing the section
    pub end_marker: Option<&'a str>,
    /// Rows between the marker and the first data row
    pub header_offset: usize,
}

/// A named grid of string cells with an ordered header.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from a header record and data rows.
    ///
    /// Empty header cells become `Unnamed: N`. The header is extended to
    /// the widest row so that positional columns in un-headered sections
    /// stay addressable, and short rows are padded with empty cells.
    pub fn new(name: impl Into<String>, header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = rows
            .iter()
            .map(|r| r.len())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let mut columns: Vec<String> = Vec::with_capacity(width);
        for i in 0..width {
            let cell = header.get(i).map(|s| s.trim()).unwrap_or("");
            if cell.is_empty() {
                columns.push(format!("Unnamed: {}", i));
            } else {
                columns.push(cell.to_string());
            }
        }

        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Table name (the canonical document name it was loaded as).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a named column, or a fatal error.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::ColumnNotFound {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    /// Cell text at (row, col); empty for out-of-range positions.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Best-effort numeric value of a cell.
    pub fn numeric(&self, row: usize, col: usize) -> Numeric {
        Numeric::parse(self.cell(row, col))
    }

    /// Sum of a column over a row range, defaulting unparsable cells to zero.
    pub fn sum_column(&self, col: usize, rows: Range<usize>) -> f64 {
        rows.filter_map(|r| {
            if r < self.rows.len() {
                Some(self.numeric(r, col).value())
            } else {
                None
            }
        })
        .sum()
    }

    /// First row at or after `from` whose column 0 equals `marker`.
    pub fn find_marker_from(&self, from: usize, marker: &str) -> Option<usize> {
        (from..self.rows.len()).find(|&r| self.cell(r, 0).trim() == marker)
    }

    /// Resolve a section rule to a data row range.
    pub fn section(&self, rule: &SectionRule) -> Result<Range<usize>> {
        let marker = self
            .find_marker_from(0, rule.start_marker)
            .ok_or_else(|| Error::MarkerNotFound(rule.start_marker.to_string()))?;
        let start = (marker + rule.header_offset).min(self.rows.len());
        let end = match rule.end_marker {
            Some(end_marker) => self
                .find_marker_from(start, end_marker)
                .ok_or_else(|| Error::MarkerNotFound(end_marker.to_string()))?,
            None => self.rows.len(),
        };
        Ok(start..end)
    }
}
