use super::session::{ActionPlanKind, NarrativeReport};
use super::summary::{CompletionSlices, CompletionSummary};
use super::table::Table;
use super::timeline::TimelineProjection;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
}

impl TableView {
    pub fn from_table(table: &Table) -> Self {
        Self {
            columns: table.columns().to_vec(),
            rows: table.text_rows(),
            row_count: table.row_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub plan: ActionPlanKind,
    pub plan_label: &'static str,
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub progress_pct: f64,
    pub progress_label: String,
    pub slices: CompletionSlices,
}

impl SummaryView {
    pub fn new(plan: ActionPlanKind, summary: &CompletionSummary) -> Self {
        Self {
            plan,
            plan_label: plan.label(),
            total: summary.total,
            completed: summary.completed,
            pending: summary.pending,
            progress_pct: summary.progress_pct,
            progress_label: summary.progress_label(),
            slices: summary.slices(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntryView {
    pub topic: String,
    pub due_date: NaiveDate,
    pub date_ordinal: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineView {
    pub plan: ActionPlanKind,
    pub applicable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<TimelineEntryView>,
    pub excluded_rows: usize,
}

impl TimelineView {
    pub fn new(plan: ActionPlanKind, projection: &TimelineProjection) -> Self {
        match projection {
            TimelineProjection::NotApplicable => Self {
                plan,
                applicable: false,
                entries: Vec::new(),
                excluded_rows: 0,
            },
            TimelineProjection::Schedule {
                entries,
                excluded_rows,
            } => Self {
                plan,
                applicable: true,
                entries: entries
                    .iter()
                    .map(|entry| TimelineEntryView {
                        topic: entry.topic.clone(),
                        due_date: entry.due_date,
                        date_ordinal: entry.date_ordinal(),
                    })
                    .collect(),
                excluded_rows: *excluded_rows,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NarrativeView {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<String>,
    pub risk_analysis_available: bool,
    /// Bullet texts, or the single placeholder line when risk analysis was
    /// not possible. Empty while the narrative itself is unavailable.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl NarrativeView {
    pub fn from_report(report: Option<&NarrativeReport>) -> Self {
        match report {
            None => Self {
                available: false,
                executive_summary: None,
                risk_analysis_available: false,
                recommendations: Vec::new(),
            },
            Some(report) => {
                let bullets = report.recommendations.bullets();
                let risk_analysis_available = !bullets.is_empty();
                let recommendations = if risk_analysis_available {
                    bullets.to_vec()
                } else {
                    vec![report.recommendations.render()]
                };
                Self {
                    available: true,
                    executive_summary: Some(report.executive_summary.clone()),
                    risk_analysis_available,
                    recommendations,
                }
            }
        }
    }
}
