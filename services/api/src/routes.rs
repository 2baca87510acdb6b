use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use monitoring_report::auth::Credentials;
use monitoring_report::error::AppError;
use monitoring_report::workflows::monitoring::source::{TabularDocument, Worksheet};
use monitoring_report::workflows::monitoring::views::{
    NarrativeView, SummaryView, TableView, TimelineView,
};
use monitoring_report::workflows::monitoring::{
    ActionPlanKind, CellValue, MonitoringSession, UploadOutcome,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use uuid::Uuid;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:session_id", delete(close_session))
        .route(
            "/api/v1/sessions/:session_id/plans/:plan/upload",
            post(upload_plan),
        )
        .route(
            "/api/v1/sessions/:session_id/plans/:plan/table",
            get(plan_table),
        )
        .route(
            "/api/v1/sessions/:session_id/plans/:plan/risk-selection",
            put(set_risk_selection),
        )
        .route(
            "/api/v1/sessions/:session_id/plans/:plan/rows",
            post(append_row),
        )
        .route(
            "/api/v1/sessions/:session_id/plans/:plan/rows/:row",
            put(edit_cell).delete(remove_row),
        )
        .route(
            "/api/v1/sessions/:session_id/plans/:plan/summary",
            get(plan_summary),
        )
        .route(
            "/api/v1/sessions/:session_id/plans/:plan/timeline",
            get(plan_timeline),
        )
        .route(
            "/api/v1/sessions/:session_id/narrative",
            get(session_narrative),
        )
        .route(
            "/api/v1/sessions/:session_id/plans/:plan/exports/document",
            get(export_document),
        )
        .route(
            "/api/v1/sessions/:session_id/plans/:plan/exports/page",
            get(export_page),
        )
        .with_state(state)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSessionRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionResponse {
    pub(crate) session_id: Uuid,
}

/// The credential gate sits here: a session id is only issued after the
/// injected gate accepts the supplied pair, and every other route requires
/// a live session id.
async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let credentials = Credentials {
        username: payload.username,
        password: payload.password,
    };
    if !state.gate.authenticate(&credentials) {
        return Err(AppError::Unauthorized);
    }

    let session_id = state.sessions.create();
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse { session_id }),
    ))
}

async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::UnknownSession(session_id.to_string()))
    }
}

/// Upload payloads carry the already-decoded document; the CSV variant is
/// the transport for spreadsheet exports.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", tag = "format")]
pub(crate) enum UploadRequest {
    Csv { data: String },
    Spreadsheet { sheets: Vec<SheetPayload> },
    WordProcessing { tables: Vec<Vec<Vec<String>>> },
}

#[derive(Debug, Deserialize)]
pub(crate) struct SheetPayload {
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) rows: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    #[serde(flatten)]
    pub(crate) outcome: UploadOutcome,
    pub(crate) table: TableView,
}

async fn upload_plan(
    State(state): State<AppState>,
    Path((session_id, plan)): Path<(Uuid, String)>,
    Json(payload): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let plan = plan_from_slug(&plan)?;

    let response = in_session(&state, session_id, |session| {
        let outcome = match payload {
            UploadRequest::Csv { data } => {
                session.upload_csv(plan, Cursor::new(data.into_bytes()))
            }
            UploadRequest::Spreadsheet { sheets } => {
                let document = TabularDocument::Spreadsheet {
                    sheets: sheets
                        .into_iter()
                        .map(|sheet| Worksheet {
                            name: sheet.name,
                            rows: sheet
                                .rows
                                .into_iter()
                                .map(|row| {
                                    row.iter().map(|cell| CellValue::from_text(cell)).collect()
                                })
                                .collect(),
                        })
                        .collect(),
                };
                session.upload_document(plan, &document)
            }
            UploadRequest::WordProcessing { tables } => {
                session.upload_document(plan, &TabularDocument::WordProcessing { tables })
            }
        };

        let table = table_view(session, plan);
        Ok(UploadResponse { outcome, table })
    })?;

    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub(crate) struct PlanTableResponse {
    pub(crate) plan: ActionPlanKind,
    pub(crate) table: TableView,
    pub(crate) filtered: TableView,
    pub(crate) observed_risk_levels: Vec<String>,
    pub(crate) selected_risk_levels: Vec<String>,
}

async fn plan_table(
    State(state): State<AppState>,
    Path((session_id, plan)): Path<(Uuid, String)>,
) -> Result<Json<PlanTableResponse>, AppError> {
    let plan = plan_from_slug(&plan)?;
    let response = in_session(&state, session_id, |session| {
        Ok(plan_table_response(session, plan))
    })?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RiskSelectionRequest {
    pub(crate) selected: Vec<String>,
}

async fn set_risk_selection(
    State(state): State<AppState>,
    Path((session_id, plan)): Path<(Uuid, String)>,
    Json(payload): Json<RiskSelectionRequest>,
) -> Result<Json<PlanTableResponse>, AppError> {
    let plan = plan_from_slug(&plan)?;
    let response = in_session(&state, session_id, |session| {
        session.set_risk_selection(plan, payload.selected)?;
        Ok(plan_table_response(session, plan))
    })?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppendRowRequest {
    pub(crate) cells: Vec<String>,
}

async fn append_row(
    State(state): State<AppState>,
    Path((session_id, plan)): Path<(Uuid, String)>,
    Json(payload): Json<AppendRowRequest>,
) -> Result<Json<PlanTableResponse>, AppError> {
    let plan = plan_from_slug(&plan)?;
    let response = in_session(&state, session_id, |session| {
        let cells = payload
            .cells
            .iter()
            .map(|cell| CellValue::from_text(cell))
            .collect();
        session.append_row(plan, cells)?;
        Ok(plan_table_response(session, plan))
    })?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub(crate) struct EditCellRequest {
    pub(crate) column: String,
    pub(crate) value: String,
}

async fn edit_cell(
    State(state): State<AppState>,
    Path((session_id, plan, row)): Path<(Uuid, String, usize)>,
    Json(payload): Json<EditCellRequest>,
) -> Result<Json<PlanTableResponse>, AppError> {
    let plan = plan_from_slug(&plan)?;
    let response = in_session(&state, session_id, |session| {
        session.set_cell(
            plan,
            row,
            &payload.column,
            CellValue::from_text(&payload.value),
        )?;
        Ok(plan_table_response(session, plan))
    })?;
    Ok(Json(response))
}

async fn remove_row(
    State(state): State<AppState>,
    Path((session_id, plan, row)): Path<(Uuid, String, usize)>,
) -> Result<Json<PlanTableResponse>, AppError> {
    let plan = plan_from_slug(&plan)?;
    let response = in_session(&state, session_id, |session| {
        session.remove_row(plan, row)?;
        Ok(plan_table_response(session, plan))
    })?;
    Ok(Json(response))
}

async fn plan_summary(
    State(state): State<AppState>,
    Path((session_id, plan)): Path<(Uuid, String)>,
) -> Result<Json<SummaryView>, AppError> {
    let plan = plan_from_slug(&plan)?;
    let view = in_session(&state, session_id, |session| {
        Ok(SummaryView::new(plan, &session.summary(plan)))
    })?;
    Ok(Json(view))
}

async fn plan_timeline(
    State(state): State<AppState>,
    Path((session_id, plan)): Path<(Uuid, String)>,
) -> Result<Json<TimelineView>, AppError> {
    let plan = plan_from_slug(&plan)?;
    let view = in_session(&state, session_id, |session| {
        Ok(TimelineView::new(plan, &session.timeline(plan)))
    })?;
    Ok(Json(view))
}

async fn session_narrative(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<NarrativeView>, AppError> {
    let view = in_session(&state, session_id, |session| {
        Ok(NarrativeView::from_report(session.narrative().as_ref()))
    })?;
    Ok(Json(view))
}

async fn export_document(
    State(state): State<AppState>,
    Path((session_id, plan)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let plan = plan_from_slug(&plan)?;
    let artifact = in_session(&state, session_id, |session| {
        Ok(session.export_document(plan, &state.exporter)?)
    })?;
    Ok(download_response(artifact))
}

async fn export_page(
    State(state): State<AppState>,
    Path((session_id, plan)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let plan = plan_from_slug(&plan)?;
    let artifact = in_session(&state, session_id, |session| {
        Ok(session.export_page(plan, &state.exporter)?)
    })?;
    Ok(download_response(artifact))
}

fn download_response(
    artifact: monitoring_report::workflows::monitoring::export::ExportArtifact,
) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.bytes,
    )
        .into_response()
}

fn plan_from_slug(raw: &str) -> Result<ActionPlanKind, AppError> {
    ActionPlanKind::from_slug(raw).ok_or_else(|| AppError::UnknownPlan(raw.to_string()))
}

fn in_session<T>(
    state: &AppState,
    session_id: Uuid,
    operation: impl FnOnce(&mut MonitoringSession) -> Result<T, AppError>,
) -> Result<T, AppError> {
    state
        .sessions
        .with_session(&session_id, operation)
        .ok_or_else(|| AppError::UnknownSession(session_id.to_string()))?
}

fn plan_table_response(session: &MonitoringSession, plan: ActionPlanKind) -> PlanTableResponse {
    PlanTableResponse {
        plan,
        table: table_view(session, plan),
        filtered: session
            .filtered_table(plan)
            .map(|table| TableView::from_table(&table))
            .unwrap_or_else(empty_table_view),
        observed_risk_levels: session.observed_risk_levels(plan),
        selected_risk_levels: session.risk_selection(plan).to_vec(),
    }
}

fn table_view(session: &MonitoringSession, plan: ActionPlanKind) -> TableView {
    session
        .table(plan)
        .map(TableView::from_table)
        .unwrap_or_else(empty_table_view)
}

fn empty_table_view() -> TableView {
    TableView::from_table(&monitoring_report::workflows::monitoring::Table::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use monitoring_report::auth::ConfiguredCredentialGate;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let gate = Arc::new(ConfiguredCredentialGate::new("reviewer", "monitoring"));
        router(AppState::new(gate, None))
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    async fn open_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/sessions",
                json!({ "username": "reviewer", "password": "monitoring" }),
            ))
            .await
            .expect("request routes");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        body["session_id"].as_str().expect("session id").to_string()
    }

    #[tokio::test]
    async fn rejected_credentials_never_issue_a_session() {
        let app = test_router();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/sessions",
                json!({ "username": "reviewer", "password": "wrong" }),
            ))
            .await
            .expect("request routes");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_session_ids_are_not_found() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!(
                        "/api/v1/sessions/{}/plans/cap/summary",
                        Uuid::new_v4()
                    ))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request routes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn upload_summary_and_narrative_flow() {
        let app = test_router();
        let session_id = open_session(&app).await;

        let cap_csv = "Topic,Status,Risk Level,Due Date\n\
Noise,Completed,High,2025-03-01\n\
Dust,Pending,High,2025-04-01\n\
Water,Completed,Medium,2025-05-01\n";
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/sessions/{session_id}/plans/cap/upload"),
                json!({ "format": "csv", "data": cap_csv }),
            ))
            .await
            .expect("request routes");
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["rows"], 3);
        assert_eq!(body["risk_levels"], json!(["High", "Medium"]));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/sessions/{session_id}/plans/esap/upload"),
                json!({
                    "format": "word_processing",
                    "tables": [[
                        ["Topic", "Status", "Risk Level"],
                        [" Training ", "Pending", "Medium"]
                    ]]
                }),
            ))
            .await
            .expect("request routes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/sessions/{session_id}/plans/cap/summary"
                    ))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request routes");
        let summary = response_json(response).await;
        assert_eq!(summary["total"], 3);
        assert_eq!(summary["completed"], 2);
        assert_eq!(summary["progress_label"], "2/3 completed (66.7%)");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/sessions/{session_id}/narrative"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request routes");
        let narrative = response_json(response).await;
        assert_eq!(narrative["available"], true);
        let summary_text = narrative["executive_summary"]
            .as_str()
            .expect("summary text");
        assert!(summary_text.contains("For the CAP, 2 of 3 actions (66.7%)"));
    }

    #[tokio::test]
    async fn malformed_upload_degrades_to_an_empty_table_with_a_warning() {
        let app = test_router();
        let session_id = open_session(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/sessions/{session_id}/plans/cap/upload"),
                json!({ "format": "word_processing", "tables": [] }),
            ))
            .await
            .expect("request routes");
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["rows"], 0);
        assert!(body["warning"].as_str().expect("warning").contains("no embedded table"));
    }

    #[tokio::test]
    async fn document_download_carries_the_fixed_filename() {
        let app = test_router();
        let session_id = open_session(&app).await;

        app.clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/sessions/{session_id}/plans/cap/upload"),
                json!({ "format": "csv", "data": "Topic,Status\nNoise,Completed\n" }),
            ))
            .await
            .expect("request routes");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/sessions/{session_id}/plans/cap/exports/document"
                    ))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request routes");
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .expect("disposition header")
            .to_str()
            .expect("ascii header");
        assert!(disposition.contains("CAP_Report.html"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let html = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(html.contains("Corrective Action Plan (CAP)"));
        assert!(html.contains("Noise"));
    }

    #[tokio::test]
    async fn unknown_plan_slug_is_a_bad_request() {
        let app = test_router();
        let session_id = open_session(&app).await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/v1/sessions/{session_id}/plans/other/summary"
                    ))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request routes");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
