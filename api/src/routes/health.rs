use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Provider sections without credentials
    pub unconfigured: Vec<String>,
}

/// Health check endpoint: reports whether every upstream provider is configured
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "All providers configured", body = HealthResponse),
        (status = 503, description = "At least one provider is not configured", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let unconfigured = state.config.missing_sections();
    let configured = unconfigured.is_empty();

    let status = if configured { "ok" } else { "degraded" };
    let http_status = if configured {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            unconfigured: unconfigured.into_iter().map(str::to_string).collect(),
        }),
    )
}
