// 📂 Table Reader - CSV → ordered rows with named columns
// Replaces the live workbook: everything the matcher needs is loaded up front

use crate::config::ColumnConfig;
use crate::matcher::{Identity, TextRecord};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Schema problems in an input table
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("column '{column}' not found in {table} (available: {available})")]
    MissingColumn {
        table: String,
        column: String,
        available: String,
    },

    #[error("column '{column}' appears more than once in {table}")]
    DuplicateColumn { table: String, column: String },
}

// ============================================================================
// TABLE
// ============================================================================

/// In-memory table. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Where the rows came from, for error messages
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Table {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    /// Read a CSV file with a header row
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv");

        let table = Self::from_reader(name, file)?;
        info!(
            file = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "loaded table"
        );

        Ok(table)
    }

    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header row of {}", name))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for (line_num, result) in reader.records().enumerate() {
            let record = result.with_context(|| {
                format!("Failed to parse CSV line {} in {}", line_num + 2, name)
            })?;

            // Short rows are padded, long rows keep only the named columns
            let row = (0..headers.len())
                .map(|i| record.get(i).filter(|v| !v.is_empty()).map(str::to_string))
                .collect();
            rows.push(row);
        }

        Ok(Table::new(name, headers, rows))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, by exact header name
    pub fn column_index(&self, column: &str) -> Result<usize, TableError> {
        let mut positions = self
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.as_str() == column)
            .map(|(i, _)| i);

        let first = positions.next().ok_or_else(|| TableError::MissingColumn {
            table: self.name.clone(),
            column: column.to_string(),
            available: self.headers.join(", "),
        })?;

        if positions.next().is_some() {
            return Err(TableError::DuplicateColumn {
                table: self.name.clone(),
                column: column.to_string(),
            });
        }

        Ok(first)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

/// One `TextRecord` per row, text taken from `column`
pub fn text_records(table: &Table, column: &str) -> Result<Vec<TextRecord>, TableError> {
    let text_col = table.column_index(column)?;

    Ok((0..table.len())
        .map(|row| TextRecord::new(row, table.cell(row, text_col).map(str::to_string)))
        .collect())
}

/// One `Identity` per roster row
pub fn identities(table: &Table, columns: &ColumnConfig) -> Result<Vec<Identity>, TableError> {
    let [id, email, first_last, last_first] = columns.identity_columns();
    let id_col = table.column_index(id)?;
    let email_col = table.column_index(email)?;
    let first_last_col = table.column_index(first_last)?;
    let last_first_col = table.column_index(last_first)?;

    let field = |row: usize, col: usize| table.cell(row, col).map(str::to_string);

    Ok((0..table.len())
        .map(|row| Identity {
            id: field(row, id_col),
            email: field(row, email_col),
            name_first_last: field(row, first_last_col),
            name_last_first: field(row, last_first_col),
        })
        .collect())
}

// ============================================================================
// TESTS
// ============================================================================
