use chrono::NaiveDate;
use std::fmt;

/// Column names the pipeline recognizes. Matching is exact and
/// case-sensitive; a missing column disables the features that need it.
pub const STATUS_COLUMN: &str = "Status";
pub const RISK_LEVEL_COLUMN: &str = "Risk Level";
pub const DUE_DATE_COLUMN: &str = "Due Date";
pub const TOPIC_COLUMN: &str = "Topic";

/// A single cell of an action-plan table.
///
/// The `Display` impl is the one canonical cell-to-text rendering; the
/// summary, timeline, narrative and both exporters all go through it so a
/// value formats the same everywhere it appears.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    /// Builds a text cell, folding the empty string into `Empty` so padded
    /// cells and blank uploads compare equal.
    pub fn from_text(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Date(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Number(value) if value.fract() == 0.0 && value.is_finite() => {
                write!(f, "{}", *value as i64)
            }
            Self::Number(value) => write!(f, "{}", value),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
    #[error("no column named '{0}'")]
    UnknownColumn(String),
    #[error("row index {index} is out of bounds ({rows} rows)")]
    RowOutOfBounds { index: usize, rows: usize },
}

/// Typed handle to a resolved column, so "column absent" is decided once at
/// lookup time instead of surfacing as a key error mid-iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnHandle(usize);

impl ColumnHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Rectangular action-plan table: ordered unique column names plus rows that
/// each hold exactly one cell per declared column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, TableError> {
        for (position, name) in columns.iter().enumerate() {
            if columns[..position].contains(name) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }

        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|row| aligned_row(row, width))
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Internal constructor for callers that already hold a valid column set
    /// (filtering, concatenation).
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Schema-aware lookup; exact, case-sensitive name match.
    pub fn column(&self, name: &str) -> Option<ColumnHandle> {
        self.columns
            .iter()
            .position(|column| column == name)
            .map(ColumnHandle)
    }

    pub fn cell(&self, row: usize, column: ColumnHandle) -> Option<&CellValue> {
        self.rows.get(row).map(|cells| &cells[column.index()])
    }

    /// The whole body rendered through the canonical cell-to-text function.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(CellValue::to_text).collect())
            .collect()
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        let width = self.columns.len();
        self.rows.push(aligned_row(row, width));
    }

    pub fn remove_row(&mut self, index: usize) -> Result<(), TableError> {
        if index >= self.rows.len() {
            return Err(TableError::RowOutOfBounds {
                index,
                rows: self.rows.len(),
            });
        }
        self.rows.remove(index);
        Ok(())
    }

    pub fn set_cell(
        &mut self,
        row: usize,
        column_name: &str,
        value: CellValue,
    ) -> Result<(), TableError> {
        let column = self
            .column(column_name)
            .ok_or_else(|| TableError::UnknownColumn(column_name.to_string()))?;
        let rows = self.rows.len();
        let cells = self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfBounds { index: row, rows })?;
        cells[column.index()] = value;
        Ok(())
    }

    /// Row-wise union of two tables. The column set is the insertion-ordered
    /// union; cells a source row does not carry come through as `Empty`.
    pub fn concat(&self, other: &Table) -> Table {
        let mut columns = self.columns.clone();
        for name in &other.columns {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }

        let mut rows = Vec::with_capacity(self.rows.len() + other.rows.len());
        for source in [self, other] {
            for row in &source.rows {
                let cells = columns
                    .iter()
                    .map(|name| match source.column(name) {
                        Some(column) => row[column.index()].clone(),
                        None => CellValue::Empty,
                    })
                    .collect();
                rows.push(cells);
            }
        }

        Table { columns, rows }
    }
}

fn aligned_row(mut row: Vec<CellValue>, width: usize) -> Vec<CellValue> {
    row.truncate(width);
    row.resize(width, CellValue::Empty);
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(
            vec!["Topic".to_string(), "Status".to_string()],
            vec![
                vec![
                    CellValue::Text("Noise".to_string()),
                    CellValue::Text("Completed".to_string()),
                ],
                vec![CellValue::Text("Dust".to_string())],
            ],
        )
        .expect("valid table")
    }

    #[test]
    fn new_rejects_duplicate_columns() {
        let error = Table::new(
            vec!["Status".to_string(), "Status".to_string()],
            Vec::new(),
        )
        .expect_err("duplicate columns rejected");
        assert_eq!(error, TableError::DuplicateColumn("Status".to_string()));
    }

    #[test]
    fn short_rows_pad_with_empty_cells() {
        let table = sample_table();
        let handle = table.column("Status").expect("status column");
        assert_eq!(table.cell(1, handle), Some(&CellValue::Empty));
    }

    #[test]
    fn column_lookup_is_case_sensitive() {
        let table = sample_table();
        assert!(table.column("Status").is_some());
        assert!(table.column("status").is_none());
    }

    #[test]
    fn set_cell_rejects_unknown_column_and_bad_row() {
        let mut table = sample_table();
        assert_eq!(
            table.set_cell(0, "Owner", CellValue::Empty),
            Err(TableError::UnknownColumn("Owner".to_string()))
        );
        assert_eq!(
            table.set_cell(9, "Status", CellValue::Empty),
            Err(TableError::RowOutOfBounds { index: 9, rows: 2 })
        );
    }

    #[test]
    fn concat_unions_columns_in_order() {
        let left = sample_table();
        let right = Table::new(
            vec!["Status".to_string(), "Risk Level".to_string()],
            vec![vec![
                CellValue::Text("Pending".to_string()),
                CellValue::Text("High".to_string()),
            ]],
        )
        .expect("valid table");

        let combined = left.concat(&right);
        assert_eq!(combined.columns(), ["Topic", "Status", "Risk Level"]);
        assert_eq!(combined.row_count(), 3);

        let risk = combined.column("Risk Level").expect("risk column");
        assert_eq!(combined.cell(0, risk), Some(&CellValue::Empty));
        assert_eq!(
            combined.cell(2, risk),
            Some(&CellValue::Text("High".to_string()))
        );
        let topic = combined.column("Topic").expect("topic column");
        assert_eq!(combined.cell(2, topic), Some(&CellValue::Empty));
    }

    #[test]
    fn cell_text_is_canonical() {
        assert_eq!(CellValue::Empty.to_text(), "");
        assert_eq!(CellValue::Number(12.0).to_text(), "12");
        assert_eq!(CellValue::Number(2.5).to_text(), "2.5");
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date");
        assert_eq!(CellValue::Date(date).to_text(), "2025-03-14");
    }
}
