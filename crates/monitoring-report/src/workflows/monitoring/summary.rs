use super::table::{CellValue, Table, STATUS_COLUMN};
use serde::Serialize;

/// Completion counts for one action plan. `pending` absorbs every row that
/// is not literally completed, blank and unrecognized statuses included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub progress_pct: f64,
}

impl CompletionSummary {
    /// The two-slice proportion a pie/donut rendering consumes.
    pub fn slices(&self) -> CompletionSlices {
        CompletionSlices {
            completed: self.completed,
            pending: self.pending,
        }
    }

    pub fn progress_label(&self) -> String {
        format!(
            "{}/{} completed ({:.1}%)",
            self.completed, self.total, self.progress_pct
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionSlices {
    pub completed: usize,
    pub pending: usize,
}

/// Counts completed rows by case-insensitive comparison of the status text
/// against "completed". An absent status column counts nothing as done.
/// Never fails; an empty table reports 0.0% rather than dividing by zero.
pub fn completion_summary(table: &Table) -> CompletionSummary {
    let total = table.row_count();
    let completed = match table.column(STATUS_COLUMN) {
        Some(status) => table
            .rows()
            .iter()
            .filter(|row| is_completed(&row[status.index()]))
            .count(),
        None => 0,
    };
    let pending = total - completed;
    let progress_pct = if total == 0 {
        0.0
    } else {
        (completed as f64 * 1000.0 / total as f64).round() / 10.0
    };

    CompletionSummary {
        total,
        completed,
        pending,
        progress_pct,
    }
}

pub(crate) fn is_completed(cell: &CellValue) -> bool {
    cell.to_text().trim().eq_ignore_ascii_case("completed")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_table(statuses: &[&str]) -> Table {
        Table::new(
            vec!["Status".to_string()],
            statuses
                .iter()
                .map(|status| vec![CellValue::from_text(status)])
                .collect(),
        )
        .expect("valid table")
    }

    #[test]
    fn counts_completed_case_insensitively() {
        let summary = completion_summary(&status_table(&["Completed", "COMPLETED", "pending"]));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.progress_pct, 66.7);
        assert_eq!(summary.progress_label(), "2/3 completed (66.7%)");
    }

    #[test]
    fn blank_and_unknown_statuses_count_as_pending() {
        let summary = completion_summary(&status_table(&["", "in progress", "done"]));
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.pending, 3);
    }

    #[test]
    fn empty_table_reports_zero_percent() {
        let summary = completion_summary(&Table::empty());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pending, 0);
        assert_eq!(summary.progress_pct, 0.0);
    }

    #[test]
    fn missing_status_column_counts_everything_pending() {
        let table = Table::new(
            vec!["Topic".to_string()],
            vec![
                vec![CellValue::Text("Noise".to_string())],
                vec![CellValue::Text("Dust".to_string())],
            ],
        )
        .expect("valid table");
        let summary = completion_summary(&table);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.pending, 2);
    }

    #[test]
    fn completed_plus_pending_equals_total() {
        for statuses in [
            &["Completed", "pending", ""][..],
            &[][..],
            &["completed"][..],
        ] {
            let summary = completion_summary(&status_table(statuses));
            assert_eq!(summary.completed + summary.pending, summary.total);
        }
    }
}
