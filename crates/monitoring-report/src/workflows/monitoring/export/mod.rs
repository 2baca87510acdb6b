mod document;
mod page;

pub use document::{DocumentLayout, DocumentWriter, HtmlDocumentWriter};
pub use page::{
    PageLayout, PageWriter, PlainTextPageWriter, HEADER_FILL_RGB, PAGE_CONTENT_WIDTH,
    PAGE_ROW_HEIGHT,
};

use super::table::Table;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("document encoder failed: {0}")]
    Document(String),
    #[error("page encoder failed: {0}")]
    Page(String),
}

/// A finished download: fully materialized bytes plus the metadata the
/// transport needs to hand it to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serializes an edited table into the two output encodings. The binary
/// encoders stay behind the writer seams; this type owns the layout rules.
#[derive(Debug)]
pub struct TableExporter {
    document_writer: Box<dyn DocumentWriter>,
    page_writer: Box<dyn PageWriter>,
}

impl TableExporter {
    pub fn new(document_writer: Box<dyn DocumentWriter>, page_writer: Box<dyn PageWriter>) -> Self {
        Self {
            document_writer,
            page_writer,
        }
    }

    pub fn export_document(
        &self,
        table: &Table,
        title: &str,
        basename: &str,
    ) -> Result<ExportArtifact, ExportError> {
        let layout = DocumentLayout::from_table(table, title);
        let bytes = self.document_writer.write_document(&layout)?;
        Ok(self.artifact(basename, self.document_writer.file_extension(), self.document_writer.content_type(), bytes))
    }

    pub fn export_page(
        &self,
        table: &Table,
        title: &str,
        basename: &str,
    ) -> Result<ExportArtifact, ExportError> {
        let layout = PageLayout::from_table(table, title);
        let bytes = self.page_writer.write_page(&layout)?;
        Ok(self.artifact(basename, self.page_writer.file_extension(), self.page_writer.content_type(), bytes))
    }

    fn artifact(
        &self,
        basename: &str,
        extension: &str,
        content_type: &'static str,
        bytes: Vec<u8>,
    ) -> ExportArtifact {
        ExportArtifact {
            filename: format!("{basename}.{extension}"),
            content_type,
            bytes,
        }
    }
}

impl Default for TableExporter {
    fn default() -> Self {
        Self::new(
            Box::new(HtmlDocumentWriter),
            Box::new(PlainTextPageWriter::default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::monitoring::table::CellValue;

    fn action_table() -> Table {
        Table::new(
            vec!["Topic".to_string(), "Status".to_string()],
            vec![vec![
                CellValue::Text("Noise".to_string()),
                CellValue::Text("Completed".to_string()),
            ]],
        )
        .expect("valid table")
    }

    #[test]
    fn document_export_names_the_file_after_the_basename() {
        let exporter = TableExporter::default();
        let artifact = exporter
            .export_document(&action_table(), "Corrective Action Plan (CAP)", "CAP_Report")
            .expect("export succeeds");
        assert_eq!(artifact.filename, "CAP_Report.html");
        assert!(!artifact.bytes.is_empty());
    }

    #[test]
    fn empty_table_exports_succeed_in_both_encodings() {
        let exporter = TableExporter::default();
        let empty = Table::empty();

        let document = exporter
            .export_document(&empty, "Corrective Action Plan (CAP)", "CAP_Report")
            .expect("document export succeeds");
        let page = exporter
            .export_page(&empty, "Corrective Action Plan (CAP)", "CAP_Report")
            .expect("page export succeeds");

        let html = String::from_utf8(document.bytes).expect("utf8");
        assert!(html.contains("Corrective Action Plan (CAP)"));
        let text = String::from_utf8(page.bytes).expect("utf8");
        assert!(text.contains("Corrective Action Plan (CAP)"));
    }
}
