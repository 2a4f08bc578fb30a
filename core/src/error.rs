use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structured error response returned by every failing endpoint.
/// Carries a human-readable message and never any upstream detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "upstream_error")
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value that was received (if applicable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
    /// Request ID for tracing and debugging
    pub request_id: String,
    /// Hint about what the correct usage looks like
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const CONFIGURATION_ERROR: &str = "configuration_error";
    pub const UPSTREAM_ERROR: &str = "upstream_error";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const RATE_LIMITED: &str = "rate_limited";
}
