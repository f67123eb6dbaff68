//! Column/row consistency checks shared by every tabular structure.
//!
//! Query results, generated tables and table groupings all hold a column set
//! plus rows of named cells. They are validated here, through one routine:
//!
//! 1. at least one column,
//! 2. column names unique (case-insensitive, surrounding whitespace ignored),
//! 3. every row has exactly one cell per column,
//! 4. every column has a matching cell in every row.

use thiserror::Error;

/// Result type for structural validation.
pub type StructureResult<T> = Result<T, StructureError>;

/// Malformed tabular data. Never recoverable for the item involved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructureError {
    #[error("at least one column is required to populate the data")]
    NoColumns,

    #[error("the column name '{0}' can only be used once")]
    DuplicateColumn(String),

    #[error("row {row}: {expected} cells were expected, but {found} were found")]
    CellCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: no data was found for the column '{column}'")]
    MissingCell { row: usize, column: String },

    #[error("no cell matches the column '{0}'")]
    UnknownColumn(String),
}

/// A row whose cells are addressed by column name.
pub trait CellSet {
    fn cell_count(&self) -> usize;

    /// Whether a cell exists for `column` (case-insensitive).
    fn has_cell(&self, column: &str) -> bool;
}

/// Compare two column names the way every lookup in the crate does.
pub fn same_name(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Check that the column set is non-empty and free of duplicates.
pub fn validate_columns(names: &[&str]) -> StructureResult<()> {
    if names.is_empty() {
        return Err(StructureError::NoColumns);
    }

    for (idx, name) in names.iter().enumerate() {
        if names[..idx].iter().any(|earlier| same_name(earlier, name)) {
            return Err(StructureError::DuplicateColumn(name.to_string()));
        }
    }

    Ok(())
}

/// Check that every row carries exactly the declared columns.
pub fn validate_rows<R: CellSet>(names: &[&str], rows: &[R]) -> StructureResult<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        let found = row.cell_count();
        if found != names.len() {
            return Err(StructureError::CellCountMismatch {
                row: row_idx,
                expected: names.len(),
                found,
            });
        }

        if let Some(missing) = names.iter().find(|name| !row.has_cell(name)) {
            return Err(StructureError::MissingCell {
                row: row_idx,
                column: missing.to_string(),
            });
        }
    }

    Ok(())
}

/// Full structural validation: columns first, then rows.
pub fn validate_structure<R: CellSet>(names: &[&str], rows: &[R]) -> StructureResult<()> {
    validate_columns(names)?;
    validate_rows(names, rows)
}
