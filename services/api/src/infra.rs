use metrics_exporter_prometheus::PrometheusHandle;
use monitoring_report::auth::CredentialGate;
use monitoring_report::workflows::monitoring::export::TableExporter;
use monitoring_report::workflows::monitoring::MonitoringSession;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Option<Arc<PrometheusHandle>>,
    pub(crate) sessions: SessionStore,
    pub(crate) gate: Arc<dyn CredentialGate>,
    pub(crate) exporter: Arc<TableExporter>,
}

impl AppState {
    pub(crate) fn new(
        gate: Arc<dyn CredentialGate>,
        metrics: Option<Arc<PrometheusHandle>>,
    ) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics,
            sessions: SessionStore::default(),
            gate,
            exporter: Arc::new(TableExporter::default()),
        }
    }
}

/// In-memory session registry. Sessions hold their tables for the life of
/// the entry and vanish with it; nothing is persisted.
#[derive(Clone, Default)]
pub(crate) struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, MonitoringSession>>>,
}

impl SessionStore {
    pub(crate) fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(id, MonitoringSession::new());
        id
    }

    pub(crate) fn remove(&self, id: &Uuid) -> bool {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.remove(id).is_some()
    }

    /// Runs a closure against one session while the store lock is held;
    /// `None` when the id is unknown (expired or never issued).
    pub(crate) fn with_session<T>(
        &self,
        id: &Uuid,
        operation: impl FnOnce(&mut MonitoringSession) -> T,
    ) -> Option<T> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.get_mut(id).map(operation)
    }
}
