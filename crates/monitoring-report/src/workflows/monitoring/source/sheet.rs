use super::Worksheet;
use crate::workflows::monitoring::table::CellValue;
use std::io::Read;

/// Decodes a CSV byte stream into a single worksheet, header row included.
/// Ragged records are tolerated here; the table model squares them off
/// against the header when the worksheet is extracted.
pub(crate) fn decode_csv<R: Read>(reader: R) -> Result<Worksheet, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    Ok(Worksheet {
        name: "Sheet1".to_string(),
        rows,
    })
}
