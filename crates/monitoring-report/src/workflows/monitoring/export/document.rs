use super::ExportError;
use crate::workflows::monitoring::table::Table;
use std::fmt::Debug;
use std::fmt::Write as _;

/// Format-neutral document encoding: a heading followed by a grid of one
/// header row plus one row per data row, every cell already coerced to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    pub title: String,
    pub grid: Vec<Vec<String>>,
}

impl DocumentLayout {
    pub fn from_table(table: &Table, title: &str) -> Self {
        let mut grid = Vec::with_capacity(table.row_count() + 1);
        if table.column_count() > 0 {
            grid.push(table.columns().to_vec());
            grid.extend(table.text_rows());
        }

        Self {
            title: title.to_string(),
            grid,
        }
    }
}

/// Narrow seam for the external document encoder: rows in, bytes out.
pub trait DocumentWriter: Debug + Send + Sync {
    fn write_document(&self, layout: &DocumentLayout) -> Result<Vec<u8>, ExportError>;
    fn file_extension(&self) -> &'static str;
    fn content_type(&self) -> &'static str;
}

/// Built-in writer rendering the heading-plus-grid layout as an HTML page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDocumentWriter;

impl DocumentWriter for HtmlDocumentWriter {
    fn write_document(&self, layout: &DocumentLayout) -> Result<Vec<u8>, ExportError> {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<body>\n");
        writeln!(html, "<h1>{}</h1>", escape_html(&layout.title)).expect("write heading");

        if let Some((header, body)) = layout.grid.split_first() {
            html.push_str("<table border=\"1\">\n<tr>");
            for name in header {
                write!(html, "<th>{}</th>", escape_html(name)).expect("write header cell");
            }
            html.push_str("</tr>\n");
            for row in body {
                html.push_str("<tr>");
                for cell in row {
                    write!(html, "<td>{}</td>", escape_html(cell)).expect("write cell");
                }
                html.push_str("</tr>\n");
            }
            html.push_str("</table>\n");
        }

        html.push_str("</body>\n</html>\n");
        Ok(html.into_bytes())
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }

    fn content_type(&self) -> &'static str {
        "text/html; charset=utf-8"
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
