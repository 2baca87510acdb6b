mod sheet;

use super::table::{CellValue, Table, TableError};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// The two upload kinds the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Spreadsheet,
    WordProcessing,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spreadsheet => "spreadsheet",
            Self::WordProcessing => "word-processing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

/// An uploaded office document after the external binary codec has decoded
/// it. The codecs themselves live outside this crate; everything from here on
/// operates on this neutral form.
#[derive(Debug, Clone, PartialEq)]
pub enum TabularDocument {
    Spreadsheet { sheets: Vec<Worksheet> },
    WordProcessing { tables: Vec<Vec<Vec<String>>> },
}

impl TabularDocument {
    pub const fn kind(&self) -> DocumentKind {
        match self {
            Self::Spreadsheet { .. } => DocumentKind::Spreadsheet,
            Self::WordProcessing { .. } => DocumentKind::WordProcessing,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("spreadsheet upload contains no worksheets")]
    NoWorksheet,
    #[error("word-processing upload contains no embedded table")]
    NoEmbeddedTable,
    #[error("upload could not be decoded as tabular data: {0}")]
    Csv(#[from] csv::Error),
    #[error("upload is not a rectangular table: {0}")]
    Table(#[from] TableError),
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts the header-plus-rows table a report is built from.
pub struct TableSource;

impl TableSource {
    /// Spreadsheet kind: the first worksheet, its first row as the header.
    /// Word-processing kind: the first embedded table, row 0 as the header,
    /// all cell text trimmed.
    pub fn from_document(document: &TabularDocument) -> Result<Table, FormatError> {
        match document {
            TabularDocument::Spreadsheet { sheets } => {
                let sheet = sheets.first().ok_or(FormatError::NoWorksheet)?;
                Self::from_sheet_rows(&sheet.rows)
            }
            TabularDocument::WordProcessing { tables } => {
                let grid = tables.first().ok_or(FormatError::NoEmbeddedTable)?;
                Self::from_word_table(grid)
            }
        }
    }

    /// CSV transport for spreadsheet exports: decoded into a single worksheet
    /// and extracted the same way a native sheet would be.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Table, FormatError> {
        let sheet = sheet::decode_csv(reader)?;
        Self::from_sheet_rows(&sheet.rows)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Table, FormatError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    fn from_sheet_rows(rows: &[Vec<CellValue>]) -> Result<Table, FormatError> {
        let Some((header, data)) = rows.split_first() else {
            // A present-but-blank worksheet is an empty table, not a failure.
            return Ok(Table::empty());
        };

        let columns = header.iter().map(CellValue::to_text).collect();
        Ok(Table::new(columns, data.to_vec())?)
    }

    fn from_word_table(grid: &[Vec<String>]) -> Result<Table, FormatError> {
        let Some((header, data)) = grid.split_first() else {
            return Err(FormatError::NoEmbeddedTable);
        };

        let columns = header.iter().map(|cell| cell.trim().to_string()).collect();
        let rows = data
            .iter()
            .map(|row| row.iter().map(|cell| CellValue::from_text(cell.trim())).collect())
            .collect();
        Ok(Table::new(columns, rows)?)
    }
}
