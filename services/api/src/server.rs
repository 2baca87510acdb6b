use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes;
use axum_prometheus::PrometheusMetricLayer;
use monitoring_report::auth::{ConfiguredCredentialGate, CredentialGate};
use monitoring_report::config::AppConfig;
use monitoring_report::error::AppError;
use monitoring_report::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let gate: Arc<dyn CredentialGate> =
        Arc::new(ConfiguredCredentialGate::from_config(&config.auth));
    let state = AppState::new(gate, Some(Arc::new(prometheus_handle)));
    let readiness = state.readiness.clone();

    let app = routes::router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "monitoring report service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
