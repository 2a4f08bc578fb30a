use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use outreach_core::error::{self, ApiError};
use outreach_core::recommendations::InvalidSetting;

use crate::providers::ProviderError;

/// Internal error type that converts to structured API responses
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed caller input (400), raised before any upstream call
    Validation {
        message: String,
        field: Option<String>,
        received: Option<serde_json::Value>,
        docs_hint: Option<String>,
    },
    /// A required credential is not configured (500)
    Configuration { missing: String },
    /// Upstream failure on a mandatory path. Status is the upstream one when known.
    Upstream { message: String, status: Option<u16> },
    /// No linked LinkedIn account to act through (404)
    NoAccountFound,
    /// Internal error (500)
    Internal(String),
}

impl AppError {
    pub fn missing_field(field: &str) -> Self {
        AppError::Validation {
            message: format!("{field} is required"),
            field: Some(field.to_string()),
            received: None,
            docs_hint: None,
        }
    }

    /// Convert a provider failure, keeping configuration problems distinct
    /// from upstream ones. `context` is the user-facing message.
    pub fn from_provider(context: &str, err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured { provider, missing } => {
                AppError::Configuration {
                    missing: format!("{provider}: {missing}"),
                }
            }
            other => {
                tracing::error!(error = %other, "{context}");
                AppError::Upstream {
                    message: context.to_string(),
                    status: other.status(),
                }
            }
        }
    }

    /// HTTP status for an upstream failure: the upstream's own error status
    /// when it has one, otherwise 502.
    fn upstream_status(status: Option<u16>) -> StatusCode {
        status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .filter(|code| code.is_client_error() || code.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY)
    }
}

impl From<InvalidSetting> for AppError {
    fn from(err: InvalidSetting) -> Self {
        AppError::Validation {
            message: err.to_string(),
            field: Some(err.field.to_string()),
            received: Some(serde_json::json!(err.received)),
            docs_hint: Some(format!(
                "Use an integer from {} to {} for {}.",
                err.min, err.max, err.field
            )),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation { message, .. } => write!(f, "validation failed: {message}"),
            AppError::Configuration { missing } => write!(f, "not configured: {missing}"),
            AppError::Upstream { message, status } => match status {
                Some(status) => write!(f, "{message} (upstream status {status})"),
                None => write!(f, "{message}"),
            },
            AppError::NoAccountFound => write!(f, "No LinkedIn account found"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                received,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: error::codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    received,
                    request_id,
                    docs_hint,
                },
            ),
            AppError::Configuration { missing } => {
                tracing::error!(missing = %missing, "Provider credentials not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::CONFIGURATION_ERROR.to_string(),
                        message: "The service is not configured for this operation".to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
            AppError::Upstream { message, status } => (
                AppError::upstream_status(status),
                ApiError {
                    error: error::codes::UPSTREAM_ERROR.to_string(),
                    message,
                    field: None,
                    received: None,
                    request_id,
                    docs_hint: None,
                },
            ),
            AppError::NoAccountFound => (
                StatusCode::NOT_FOUND,
                ApiError {
                    error: error::codes::NOT_FOUND.to_string(),
                    message: "No LinkedIn account found".to_string(),
                    field: Some("account_id".to_string()),
                    received: None,
                    request_id,
                    docs_hint: Some(
                        "Link a LinkedIn account with the messaging provider, or pass account_id explicitly."
                            .to_string(),
                    ),
                },
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::INTERNAL_ERROR.to_string(),
                        message: "An internal error occurred".to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}
