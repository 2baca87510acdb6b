use clap::Args;
use monitoring_report::error::AppError;
use monitoring_report::workflows::monitoring::export::TableExporter;
use monitoring_report::workflows::monitoring::timeline::TimelineProjection;
use monitoring_report::workflows::monitoring::{ActionPlanKind, MonitoringSession};
use std::io::Cursor;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// CAP export in CSV form
    #[arg(long)]
    pub(crate) cap: Option<PathBuf>,
    /// ESAP export in CSV form
    #[arg(long)]
    pub(crate) esap: Option<PathBuf>,
    /// Restrict both plans to these risk levels (repeatable)
    #[arg(long = "risk-level")]
    pub(crate) risk_levels: Vec<String>,
    /// Also print the due-date timeline per plan
    #[arg(long)]
    pub(crate) timeline: bool,
    /// Write the document and page exports into this directory
    #[arg(long)]
    pub(crate) out_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Also print the due-date timeline per plan
    #[arg(long)]
    pub(crate) timeline: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        cap,
        esap,
        risk_levels,
        timeline,
        out_dir,
    } = args;

    let mut session = MonitoringSession::new();
    let mut loaded = Vec::new();

    for (plan, path) in [(ActionPlanKind::Cap, cap), (ActionPlanKind::Esap, esap)] {
        let Some(path) = path else {
            println!("No {plan} file supplied; skipping.");
            continue;
        };
        let file = std::fs::File::open(&path)?;
        let outcome = session.upload_csv(plan, file);
        if let Some(warning) = &outcome.warning {
            println!("Could not parse the {plan} upload: {warning}");
        }
        if !risk_levels.is_empty() {
            session.set_risk_selection(plan, risk_levels.clone())?;
        }
        loaded.push(plan);
    }

    render_report(&session, &loaded, timeline);
    write_exports(&session, &loaded, out_dir.as_deref())?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    const SAMPLE_CAP: &str = "Topic,Status,Risk Level,Due Date\n\
Update spill response plan,Completed,High,2025-02-15\n\
Install perimeter noise barriers,Pending,High,2025-04-30\n\
Refresher training for contractors,Pending,Medium,2025-05-20\n\
Quarterly groundwater sampling,Completed,Medium,2025-03-10\n";
    const SAMPLE_ESAP: &str = "Topic,Status,Risk Level,Due Date\n\
Publish grievance mechanism,Completed,High,2025-01-31\n\
Stakeholder engagement round,Pending,Medium,2025-06-15\n\
Update resettlement audit,Pending,Low,2025-07-01\n";

    let mut session = MonitoringSession::new();
    session.upload_csv(ActionPlanKind::Cap, Cursor::new(SAMPLE_CAP));
    session.upload_csv(ActionPlanKind::Esap, Cursor::new(SAMPLE_ESAP));

    println!("Sample plans loaded.\n");
    let plans = ActionPlanKind::ordered();
    render_report(&session, &plans, args.timeline);

    // Same edit a reviewer would make in the table editor before download.
    session.set_cell(
        ActionPlanKind::Cap,
        1,
        "Status",
        monitoring_report::workflows::monitoring::CellValue::Text("Completed".to_string()),
    )?;
    println!("\nAfter closing the noise-barrier action:");
    print_summary(&session, ActionPlanKind::Cap);
    Ok(())
}

fn render_report(session: &MonitoringSession, plans: &[ActionPlanKind], timeline: bool) {
    for &plan in plans {
        print_summary(session, plan);
        if timeline {
            print_timeline(session, plan);
        }
    }

    match session.narrative() {
        Some(narrative) => {
            println!("\nExecutive Summary:\n{}", narrative.executive_summary);
            println!("\n{}", narrative.recommendations.render());
        }
        None => println!("\nUpload both plans to generate the combined narrative."),
    }
}

fn print_summary(session: &MonitoringSession, plan: ActionPlanKind) {
    let summary = session.summary(plan);
    println!("{} Summary:", plan.label());
    println!("- Total Items: {}", summary.total);
    println!("- Completed: {}", summary.completed);
    println!("- Pending: {}", summary.pending);
    println!("- Progress: {}", summary.progress_label());
}

fn print_timeline(session: &MonitoringSession, plan: ActionPlanKind) {
    match session.timeline(plan) {
        TimelineProjection::NotApplicable => {
            println!("{} timeline: not applicable (needs 'Due Date' and 'Topic').", plan.label());
        }
        TimelineProjection::Schedule {
            entries,
            excluded_rows,
        } => {
            println!("{} timeline by due date:", plan.label());
            for entry in &entries {
                println!("  {}  {}", entry.due_date, entry.topic);
            }
            if excluded_rows > 0 {
                println!("  ({excluded_rows} row(s) without a parsable due date omitted)");
            }
        }
    }
}

fn write_exports(
    session: &MonitoringSession,
    plans: &[ActionPlanKind],
    out_dir: Option<&std::path::Path>,
) -> Result<(), AppError> {
    let Some(out_dir) = out_dir else {
        return Ok(());
    };

    std::fs::create_dir_all(out_dir)?;
    let exporter = TableExporter::default();
    for &plan in plans {
        for artifact in [
            session.export_document(plan, &exporter)?,
            session.export_page(plan, &exporter)?,
        ] {
            let path = out_dir.join(&artifact.filename);
            std::fs::write(&path, &artifact.bytes)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
