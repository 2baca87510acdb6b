use super::table::{Table, RISK_LEVEL_COLUMN};

/// Risk levels present in the table, first-seen order. This is the default
/// selection offered to the user after an upload.
pub fn observed_risk_levels(table: &Table) -> Vec<String> {
    let Some(risk) = table.column(RISK_LEVEL_COLUMN) else {
        return Vec::new();
    };

    let mut seen = Vec::new();
    for row in table.rows() {
        let level = row[risk.index()].to_text();
        if !seen.contains(&level) {
            seen.push(level);
        }
    }
    seen
}

/// Narrows the table to rows whose risk level exactly matches one of the
/// selected values. Selection is case-sensitive over the extracted cell
/// text. A table without the risk column passes through unchanged.
pub fn retain_risk_levels(table: &Table, selection: &[String]) -> Table {
    let Some(risk) = table.column(RISK_LEVEL_COLUMN) else {
        return table.clone();
    };

    let rows = table
        .rows()
        .iter()
        .filter(|row| {
            let level = row[risk.index()].to_text();
            selection.iter().any(|selected| *selected == level)
        })
        .cloned()
        .collect();

    Table::from_parts(table.columns().to_vec(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::monitoring::table::CellValue;

    fn risk_table() -> Table {
        Table::new(
            vec!["Topic".to_string(), "Risk Level".to_string()],
            vec![
                vec![
                    CellValue::Text("Noise".to_string()),
                    CellValue::Text("High".to_string()),
                ],
                vec![
                    CellValue::Text("Dust".to_string()),
                    CellValue::Text("Medium".to_string()),
                ],
                vec![
                    CellValue::Text("Water".to_string()),
                    CellValue::Text("High".to_string()),
                ],
            ],
        )
        .expect("valid table")
    }

    #[test]
    fn observed_levels_deduplicate_in_first_seen_order() {
        assert_eq!(observed_risk_levels(&risk_table()), ["High", "Medium"]);
        assert!(observed_risk_levels(&Table::empty()).is_empty());
    }

    #[test]
    fn full_selection_is_a_no_op_on_rows() {
        let table = risk_table();
        let filtered = retain_risk_levels(&table, &observed_risk_levels(&table));
        assert_eq!(filtered, table);
    }

    #[test]
    fn selection_match_is_case_sensitive() {
        let table = risk_table();
        let filtered = retain_risk_levels(&table, &["high".to_string()]);
        assert_eq!(filtered.row_count(), 0);

        let filtered = retain_risk_levels(&table, &["High".to_string()]);
        assert_eq!(filtered.row_count(), 2);
    }

    #[test]
    fn missing_risk_column_passes_through_unchanged() {
        let table = Table::new(
            vec!["Topic".to_string()],
            vec![vec![CellValue::Text("Noise".to_string())]],
        )
        .expect("valid table");
        let filtered = retain_risk_levels(&table, &[]);
        assert_eq!(filtered, table);
    }
}
