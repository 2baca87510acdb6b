use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::monitoring::export::ExportError;
use crate::workflows::monitoring::source::FormatError;
use crate::workflows::monitoring::SessionError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Format(FormatError),
    Session(SessionError),
    Export(ExportError),
    UnknownSession(String),
    UnknownPlan(String),
    Unauthorized,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Format(err) => write!(f, "upload error: {}", err),
            AppError::Session(err) => write!(f, "report session error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::UnknownSession(id) => write!(f, "no active session with id {}", id),
            AppError::UnknownPlan(slug) => {
                write!(f, "unknown action plan '{}', expected cap or esap", slug)
            }
            AppError::Unauthorized => write!(f, "invalid credentials"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Format(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::UnknownSession(_) | AppError::UnknownPlan(_) | AppError::Unauthorized => {
                None
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::UnknownSession(_) => StatusCode::NOT_FOUND,
            AppError::Format(_) | AppError::UnknownPlan(_) => StatusCode::BAD_REQUEST,
            AppError::Session(SessionError::Export(_)) | AppError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Session(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<FormatError> for AppError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
