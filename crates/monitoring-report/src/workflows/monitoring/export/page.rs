use super::ExportError;
use crate::workflows::monitoring::table::Table;
use std::fmt::Debug;

/// Usable width of the single page, in layout units.
pub const PAGE_CONTENT_WIDTH: f32 = 180.0;
pub const PAGE_ROW_HEIGHT: f32 = 10.0;
/// Shading behind the header row.
pub const HEADER_FILL_RGB: (u8, u8, u8) = (200, 220, 255);

/// Single-page encoding: centered bold title over a bordered grid whose
/// columns all share the same width, `content width / column count`. Long
/// values may truncate visually; the equal split is the defined behavior,
/// not something writers adapt per column.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub column_width: f32,
    pub row_height: f32,
    pub header_fill: (u8, u8, u8),
}

impl PageLayout {
    pub fn from_table(table: &Table, title: &str) -> Self {
        let columns = table.column_count();
        let column_width = if columns == 0 {
            0.0
        } else {
            PAGE_CONTENT_WIDTH / columns as f32
        };

        Self {
            title: title.to_string(),
            header: table.columns().to_vec(),
            rows: table.text_rows(),
            column_width,
            row_height: PAGE_ROW_HEIGHT,
            header_fill: HEADER_FILL_RGB,
        }
    }
}

/// Narrow seam for the external page encoder.
pub trait PageWriter: Debug + Send + Sync {
    fn write_page(&self, layout: &PageLayout) -> Result<Vec<u8>, ExportError>;
    fn file_extension(&self) -> &'static str;
    fn content_type(&self) -> &'static str;
}

/// Built-in writer rendering the page as monospace text: centered title,
/// `+-|` borders, equal character columns.
#[derive(Debug, Clone, Copy)]
pub struct PlainTextPageWriter {
    text_width: usize,
}

impl PlainTextPageWriter {
    pub fn new(text_width: usize) -> Self {
        Self {
            text_width: text_width.max(8),
        }
    }
}

impl Default for PlainTextPageWriter {
    fn default() -> Self {
        Self::new(96)
    }
}

impl PageWriter for PlainTextPageWriter {
    fn write_page(&self, layout: &PageLayout) -> Result<Vec<u8>, ExportError> {
        let mut page = String::new();
        page.push_str(&center(&layout.title, self.text_width));
        page.push('\n');

        let columns = layout.header.len();
        if columns > 0 {
            let cell_width = (self.text_width / columns).saturating_sub(1).max(1);
            let border = border_line(columns, cell_width);

            page.push_str(&border);
            page.push_str(&grid_line(&layout.header, columns, cell_width));
            page.push_str(&border);
            for row in &layout.rows {
                page.push_str(&grid_line(row, columns, cell_width));
                page.push_str(&border);
            }
        }

        Ok(page.into_bytes())
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }
}

fn center(text: &str, width: usize) -> String {
    let length = text.chars().count();
    if length >= width {
        return text.to_string();
    }
    let padding = (width - length) / 2;
    format!("{}{}", " ".repeat(padding), text)
}

fn border_line(columns: usize, cell_width: usize) -> String {
    let mut line = String::new();
    for _ in 0..columns {
        line.push('+');
        line.push_str(&"-".repeat(cell_width));
    }
    line.push_str("+\n");
    line
}

fn grid_line(cells: &[String], columns: usize, cell_width: usize) -> String {
    let empty = String::new();
    let mut line = String::new();
    for index in 0..columns {
        let cell = cells.get(index).unwrap_or(&empty);
        line.push('|');
        line.push_str(&fit(cell, cell_width));
    }
    line.push_str("|\n");
    line
}

fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    let padding = width - truncated.chars().count();
    format!("{}{}", truncated, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::monitoring::table::CellValue;

    fn plan_table() -> Table {
        Table::new(
            vec![
                "Topic".to_string(),
                "Status".to_string(),
                "Risk Level".to_string(),
            ],
            vec![vec![
                CellValue::Text("Erosion control along the northern perimeter".to_string()),
                CellValue::Text("Pending".to_string()),
                CellValue::Text("High".to_string()),
            ]],
        )
        .expect("valid table")
    }

    #[test]
    fn columns_split_the_content_width_equally() {
        let layout = PageLayout::from_table(&plan_table(), "CAP");
        assert_eq!(layout.column_width, PAGE_CONTENT_WIDTH / 3.0);
        assert_eq!(layout.row_height, PAGE_ROW_HEIGHT);
        assert_eq!(layout.header_fill, HEADER_FILL_RGB);

        let empty = PageLayout::from_table(&Table::empty(), "CAP");
        assert_eq!(empty.column_width, 0.0);
    }

    #[test]
    fn text_writer_truncates_to_the_fixed_cell_width() {
        let layout = PageLayout::from_table(&plan_table(), "CAP");
        let writer = PlainTextPageWriter::new(30);
        let text = String::from_utf8(writer.write_page(&layout).expect("write succeeds"))
            .expect("utf8");

        for line in text.lines().filter(|line| line.starts_with('|')) {
            assert!(line.chars().count() <= 31, "line too wide: {line}");
        }
        assert!(text.contains("Erosion c"));
        assert!(!text.contains("northern perimeter"));
    }

    #[test]
    fn zero_column_page_is_just_the_centered_title() {
        let layout = PageLayout::from_table(&Table::empty(), "Short");
        let text = String::from_utf8(
            PlainTextPageWriter::default()
                .write_page(&layout)
                .expect("write succeeds"),
        )
        .expect("utf8");
        assert_eq!(text.trim(), "Short");
        assert!(text.starts_with(' '));
    }
}
