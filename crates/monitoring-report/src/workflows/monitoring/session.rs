use super::export::{ExportArtifact, ExportError, TableExporter};
use super::filter;
use super::narrative::{self, Recommendations};
use super::source::{FormatError, TableSource, TabularDocument};
use super::summary::{completion_summary, CompletionSummary};
use super::table::{CellValue, Table, TableError};
use super::timeline::{project_timeline, TimelineProjection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use tracing::warn;

/// The two tracked action-item tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPlanKind {
    Cap,
    Esap,
}

impl ActionPlanKind {
    pub const fn ordered() -> [Self; 2] {
        [Self::Cap, Self::Esap]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cap => "CAP",
            Self::Esap => "ESAP",
        }
    }

    pub const fn document_title(self) -> &'static str {
        match self {
            Self::Cap => "Corrective Action Plan (CAP)",
            Self::Esap => "Environmental and Social Action Plan (ESAP)",
        }
    }

    /// Fixed download basename; the writer contributes the extension.
    pub const fn export_basename(self) -> &'static str {
        match self {
            Self::Cap => "CAP_Report",
            Self::Esap => "ESAP_Report",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "cap" => Some(Self::Cap),
            "esap" => Some(Self::Esap),
            _ => None,
        }
    }
}

impl fmt::Display for ActionPlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no {0} table has been uploaded")]
    PlanNotLoaded(ActionPlanKind),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What an upload left behind, surfaced to the user. A parse failure is a
/// warning here, never an abort: the plan continues with an empty table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadOutcome {
    pub plan: ActionPlanKind,
    pub columns: usize,
    pub rows: usize,
    pub risk_levels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Default)]
struct PlanState {
    table: Option<Table>,
    selected_risks: Vec<String>,
}

/// Per-session context carrying both plan tables and their risk selections.
/// Held in memory for the life of the session only; every interaction
/// recomputes the affected stage from the current tables.
#[derive(Debug, Default)]
pub struct MonitoringSession {
    cap: PlanState,
    esap: PlanState,
}

/// Combined narrative over both plans, produced once both carry data.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeReport {
    pub executive_summary: String,
    pub recommendations: Recommendations,
}

impl MonitoringSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_document(
        &mut self,
        plan: ActionPlanKind,
        document: &TabularDocument,
    ) -> UploadOutcome {
        self.apply_upload(plan, TableSource::from_document(document))
    }

    pub fn upload_csv<R: Read>(&mut self, plan: ActionPlanKind, reader: R) -> UploadOutcome {
        self.apply_upload(plan, TableSource::from_csv_reader(reader))
    }

    fn apply_upload(
        &mut self,
        plan: ActionPlanKind,
        parsed: Result<Table, FormatError>,
    ) -> UploadOutcome {
        let (table, warning) = match parsed {
            Ok(table) => (table, None),
            Err(error) => {
                warn!(%plan, %error, "upload could not be parsed; continuing with an empty table");
                (Table::empty(), Some(error.to_string()))
            }
        };

        let risk_levels = filter::observed_risk_levels(&table);
        let outcome = UploadOutcome {
            plan,
            columns: table.column_count(),
            rows: table.row_count(),
            risk_levels: risk_levels.clone(),
            warning,
        };

        let state = self.state_mut(plan);
        state.selected_risks = risk_levels;
        state.table = Some(table);
        outcome
    }

    /// The working table: what the user uploaded plus any edits.
    pub fn table(&self, plan: ActionPlanKind) -> Option<&Table> {
        self.state(plan).table.as_ref()
    }

    /// The working table narrowed to the selected risk levels. Every
    /// downstream stage consumes this view.
    pub fn filtered_table(&self, plan: ActionPlanKind) -> Option<Table> {
        let state = self.state(plan);
        state
            .table
            .as_ref()
            .map(|table| filter::retain_risk_levels(table, &state.selected_risks))
    }

    pub fn risk_selection(&self, plan: ActionPlanKind) -> &[String] {
        &self.state(plan).selected_risks
    }

    pub fn observed_risk_levels(&self, plan: ActionPlanKind) -> Vec<String> {
        self.state(plan)
            .table
            .as_ref()
            .map(filter::observed_risk_levels)
            .unwrap_or_default()
    }

    pub fn set_risk_selection(
        &mut self,
        plan: ActionPlanKind,
        selection: Vec<String>,
    ) -> Result<(), SessionError> {
        let state = self.state_mut(plan);
        if state.table.is_none() {
            return Err(SessionError::PlanNotLoaded(plan));
        }
        state.selected_risks = selection;
        Ok(())
    }

    pub fn append_row(
        &mut self,
        plan: ActionPlanKind,
        cells: Vec<CellValue>,
    ) -> Result<(), SessionError> {
        self.table_mut(plan)?.push_row(cells);
        Ok(())
    }

    pub fn remove_row(&mut self, plan: ActionPlanKind, row: usize) -> Result<(), SessionError> {
        self.table_mut(plan)?.remove_row(row)?;
        Ok(())
    }

    pub fn set_cell(
        &mut self,
        plan: ActionPlanKind,
        row: usize,
        column: &str,
        value: CellValue,
    ) -> Result<(), SessionError> {
        self.table_mut(plan)?.set_cell(row, column, value)?;
        Ok(())
    }

    /// Completion stats over the filtered view; a plan with no upload yet
    /// degrades to the all-zero summary.
    pub fn summary(&self, plan: ActionPlanKind) -> CompletionSummary {
        match self.filtered_table(plan) {
            Some(table) => completion_summary(&table),
            None => completion_summary(&Table::empty()),
        }
    }

    pub fn timeline(&self, plan: ActionPlanKind) -> TimelineProjection {
        match self.filtered_table(plan) {
            Some(table) => project_timeline(&table),
            None => TimelineProjection::NotApplicable,
        }
    }

    /// Available once both plans hold at least one row after filtering. The
    /// recommendations run over the row-wise union of the two views.
    pub fn narrative(&self) -> Option<NarrativeReport> {
        let cap = self.filtered_table(ActionPlanKind::Cap)?;
        let esap = self.filtered_table(ActionPlanKind::Esap)?;
        if cap.is_empty() || esap.is_empty() {
            return None;
        }

        let executive_summary =
            narrative::executive_summary(&completion_summary(&cap), &completion_summary(&esap));
        let combined = cap.concat(&esap);

        Some(NarrativeReport {
            executive_summary,
            recommendations: narrative::recommendations(&combined),
        })
    }

    pub fn export_document(
        &self,
        plan: ActionPlanKind,
        exporter: &TableExporter,
    ) -> Result<ExportArtifact, SessionError> {
        let table = self
            .filtered_table(plan)
            .ok_or(SessionError::PlanNotLoaded(plan))?;
        Ok(exporter.export_document(&table, plan.document_title(), plan.export_basename())?)
    }

    pub fn export_page(
        &self,
        plan: ActionPlanKind,
        exporter: &TableExporter,
    ) -> Result<ExportArtifact, SessionError> {
        let table = self
            .filtered_table(plan)
            .ok_or(SessionError::PlanNotLoaded(plan))?;
        Ok(exporter.export_page(&table, plan.document_title(), plan.export_basename())?)
    }

    fn state(&self, plan: ActionPlanKind) -> &PlanState {
        match plan {
            ActionPlanKind::Cap => &self.cap,
            ActionPlanKind::Esap => &self.esap,
        }
    }

    fn state_mut(&mut self, plan: ActionPlanKind) -> &mut PlanState {
        match plan {
            ActionPlanKind::Cap => &mut self.cap,
            ActionPlanKind::Esap => &mut self.esap,
        }
    }

    fn table_mut(&mut self, plan: ActionPlanKind) -> Result<&mut Table, SessionError> {
        self.state_mut(plan)
            .table
            .as_mut()
            .ok_or(SessionError::PlanNotLoaded(plan))
    }
}
