pub mod export;
pub mod filter;
pub mod narrative;
pub mod session;
pub mod source;
pub mod summary;
pub mod table;
pub mod timeline;
pub mod views;

pub use session::{ActionPlanKind, MonitoringSession, NarrativeReport, SessionError, UploadOutcome};
pub use table::{CellValue, Table, TableError};
