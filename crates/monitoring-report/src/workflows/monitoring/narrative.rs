use super::summary::{is_completed, CompletionSummary};
use super::table::{Table, RISK_LEVEL_COLUMN, STATUS_COLUMN};

pub const RECOMMENDATIONS_HEADING: &str = "Conclusions and Recommendations:";

/// Shown whenever the table lacks the columns risk analysis needs.
pub const RISK_COLUMNS_PLACEHOLDER: &str = "Risk analysis and recommendations will appear here \
once 'Status' and 'Risk Level' columns are available.";

/// Fixed reporting sentence covering both plans. A pure function of the two
/// summaries; empty plans report 0.0% rather than failing.
pub fn executive_summary(cap: &CompletionSummary, esap: &CompletionSummary) -> String {
    format!(
        "During this reporting period, progress was observed in both the Corrective Action Plan \
(CAP) and the Environmental and Social Action Plan (ESAP). For the CAP, {} of {} actions \
({:.1}%) have been completed. The ESAP recorded {} out of {} ({:.1}%) actions completed. \
Continuous monitoring and strategic coordination remain essential to address the remaining gaps.",
        cap.completed, cap.total, cap.progress_pct, esap.completed, esap.total, esap.progress_pct
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendations {
    /// The table is missing `Status` or `Risk Level`; no analysis attempted.
    RiskColumnsUnavailable,
    /// One bullet per nonzero risk category, or the single all-clear bullet.
    Bullets(Vec<String>),
}

impl Recommendations {
    pub fn bullets(&self) -> &[String] {
        match self {
            Self::RiskColumnsUnavailable => &[],
            Self::Bullets(bullets) => bullets,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::RiskColumnsUnavailable => RISK_COLUMNS_PLACEHOLDER.to_string(),
            Self::Bullets(bullets) => {
                let mut text = RECOMMENDATIONS_HEADING.to_string();
                for bullet in bullets {
                    text.push_str("\n- ");
                    text.push_str(bullet);
                }
                text
            }
        }
    }
}

/// Risk-driven follow-up guidance for a (possibly combined) plan table.
pub fn recommendations(table: &Table) -> Recommendations {
    let Some((high_pending, medium_pending)) = pending_risk_counts(table) else {
        return Recommendations::RiskColumnsUnavailable;
    };

    let mut bullets = Vec::new();
    if high_pending > 0 {
        bullets.push(format!(
            "There are {high_pending} high-risk actions still pending. These must be prioritized \
and closed promptly to avoid potential compliance gaps or operational risks."
        ));
    }
    if medium_pending > 0 {
        bullets.push(format!(
            "There are {medium_pending} medium-risk actions pending. These should be addressed in \
the upcoming period through adequate resource allocation and oversight."
        ));
    }
    if bullets.is_empty() {
        bullets.push(
            "No high or medium risk items remain open. Maintain current monitoring and reporting \
cadence."
                .to_string(),
        );
    }

    Recommendations::Bullets(bullets)
}

/// `(high, medium)` counts of rows that are both not completed and carry the
/// matching risk level, case-insensitively. `None` when either column is
/// absent, so the caller can fall back to the placeholder.
fn pending_risk_counts(table: &Table) -> Option<(usize, usize)> {
    let status = table.column(STATUS_COLUMN)?;
    let risk = table.column(RISK_LEVEL_COLUMN)?;

    let mut high = 0usize;
    let mut medium = 0usize;
    for row in table.rows() {
        if is_completed(&row[status.index()]) {
            continue;
        }
        let level = row[risk.index()].to_text();
        let level = level.trim();
        if level.eq_ignore_ascii_case("high") {
            high += 1;
        } else if level.eq_ignore_ascii_case("medium") {
            medium += 1;
        }
    }

    Some((high, medium))
}
