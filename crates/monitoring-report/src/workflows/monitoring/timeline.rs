use super::table::{CellValue, Table, DUE_DATE_COLUMN, TOPIC_COLUMN};
use chrono::{DateTime, Datelike, NaiveDate};
use serde::Serialize;

/// One bar of the chronological rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub topic: String,
    pub due_date: NaiveDate,
}

impl TimelineEntry {
    /// Days-from-CE ordinal, the x-axis value for horizontal bars.
    pub fn date_ordinal(&self) -> i32 {
        self.due_date.num_days_from_ce()
    }
}

/// Chronological projection of a plan table. Not an error channel: a table
/// without the due-date or topic column simply has no timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineProjection {
    NotApplicable,
    Schedule {
        /// Ascending by due date; equal dates keep table order.
        entries: Vec<TimelineEntry>,
        /// Rows dropped because their due date was missing or unparsable.
        /// Surfaced as one aggregate figure, never per row.
        excluded_rows: usize,
    },
}

/// Sorts the rows that carry a parsable due date; the rest are excluded from
/// the projection only, the table itself is untouched.
pub fn project_timeline(table: &Table) -> TimelineProjection {
    let (Some(due), Some(topic)) = (table.column(DUE_DATE_COLUMN), table.column(TOPIC_COLUMN))
    else {
        return TimelineProjection::NotApplicable;
    };

    let mut entries = Vec::new();
    let mut excluded_rows = 0usize;
    for row in table.rows() {
        match parse_due_date(&row[due.index()]) {
            Some(due_date) => entries.push(TimelineEntry {
                topic: row[topic.index()].to_text(),
                due_date,
            }),
            None => excluded_rows += 1,
        }
    }

    entries.sort_by_key(|entry| entry.due_date);

    TimelineProjection::Schedule {
        entries,
        excluded_rows,
    }
}

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

pub fn parse_due_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(date) => Some(*date),
        CellValue::Text(raw) => parse_date_text(raw),
        CellValue::Empty | CellValue::Number(_) => None,
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_table(rows: &[(&str, &str)]) -> Table {
        Table::new(
            vec!["Topic".to_string(), "Due Date".to_string()],
            rows.iter()
                .map(|(topic, due)| {
                    vec![CellValue::from_text(topic), CellValue::from_text(due)]
                })
                .collect(),
        )
        .expect("valid table")
    }

    #[test]
    fn missing_columns_mean_not_applicable() {
        let table = Table::new(
            vec!["Topic".to_string()],
            vec![vec![CellValue::Text("Noise".to_string())]],
        )
        .expect("valid table");
        assert_eq!(project_timeline(&table), TimelineProjection::NotApplicable);
    }

    #[test]
    fn unparsable_dates_are_excluded_and_counted() {
        let table = plan_table(&[
            ("Waste", "2025-06-01"),
            ("Noise", "not a date"),
            ("Dust", ""),
            ("Water", "2025-02-15"),
        ]);

        match project_timeline(&table) {
            TimelineProjection::Schedule {
                entries,
                excluded_rows,
            } => {
                assert_eq!(excluded_rows, 2);
                let topics: Vec<&str> =
                    entries.iter().map(|entry| entry.topic.as_str()).collect();
                assert_eq!(topics, ["Water", "Waste"]);
                assert!(entries.windows(2).all(|pair| pair[0].due_date <= pair[1].due_date));
            }
            TimelineProjection::NotApplicable => panic!("projection should apply"),
        }
    }

    #[test]
    fn equal_dates_keep_table_order() {
        let table = plan_table(&[("Second", "2025-01-01"), ("First", "2025-01-01")]);
        match project_timeline(&table) {
            TimelineProjection::Schedule { entries, .. } => {
                assert_eq!(entries[0].topic, "Second");
                assert_eq!(entries[1].topic, "First");
            }
            TimelineProjection::NotApplicable => panic!("projection should apply"),
        }
    }

    #[test]
    fn parses_the_common_date_spellings() {
        for raw in [
            "2025-04-30",
            "04/30/2025",
            "30.04.2025",
            "April 30, 2025",
            "30 April 2025",
            "2025-04-30T08:00:00Z",
        ] {
            let parsed = parse_due_date(&CellValue::Text(raw.to_string()));
            assert_eq!(
                parsed,
                NaiveDate::from_ymd_opt(2025, 4, 30),
                "failed on {raw}"
            );
        }
        assert_eq!(parse_due_date(&CellValue::Number(45000.0)), None);
    }

    #[test]
    fn date_cells_pass_through() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date");
        assert_eq!(parse_due_date(&CellValue::Date(date)), Some(date));
        let entry = TimelineEntry {
            topic: "Audit".to_string(),
            due_date: date,
        };
        assert_eq!(entry.date_ordinal(), date.num_days_from_ce());
    }
}
