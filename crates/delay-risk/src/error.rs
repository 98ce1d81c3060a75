use crate::artifacts::{ArtifactError, ArtifactFailure};
use crate::config::ConfigError;
use crate::risk::{EstimationError, InputError};
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
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
    Server(axum::Error),
    Artifact(ArtifactError),
    Unavailable(ArtifactFailure),
    Estimation(EstimationError),
    Request(JsonRejection),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Artifact(err) => write!(f, "artifact error: {}", err),
            AppError::Unavailable(failure) => write!(f, "artifact unavailable: {}", failure),
            AppError::Estimation(err) => write!(f, "{}", err),
            AppError::Request(rejection) => {
                write!(f, "invalid request: {}", rejection.body_text())
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Artifact(err) => Some(err),
            AppError::Unavailable(_) => None,
            AppError::Estimation(err) => Some(err),
            AppError::Request(rejection) => Some(rejection),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            AppError::Estimation(EstimationError::Input(error)) => {
                let body = Json(json!({
                    "error": message,
                    "field": input_field(&error),
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            AppError::Unavailable(failure) => {
                let body = Json(json!({
                    "error": message,
                    "artifact": failure.kind,
                }));
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
            AppError::Request(rejection) => {
                let body = Json(json!({ "error": message }));
                (rejection.status(), body).into_response()
            }
            AppError::Artifact(_) => {
                let body = Json(json!({ "error": message }));
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
            AppError::Estimation(EstimationError::Model(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => {
                let body = Json(json!({ "error": message }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

fn input_field(error: &InputError) -> serde_json::Value {
    serde_json::to_value(error.field()).unwrap_or(serde_json::Value::Null)
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

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ArtifactError> for AppError {
    fn from(value: ArtifactError) -> Self {
        Self::Artifact(value)
    }
}

impl From<ArtifactFailure> for AppError {
    fn from(value: ArtifactFailure) -> Self {
        Self::Unavailable(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Request(value)
    }
}

impl From<EstimationError> for AppError {
    fn from(value: EstimationError) -> Self {
        Self::Estimation(value)
    }
}
