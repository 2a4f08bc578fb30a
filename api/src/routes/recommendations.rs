use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use outreach_core::activity::EnrichedBundle;
use outreach_core::error::ApiError;
use outreach_core::recommendations::{MessageSettings, RecommendationOutput};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::services::composer::Composer;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/recommendations", post(compose_recommendations))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RecommendationRequest {
    /// Bundle returned by POST /v1/profiles/enrich
    pub bundle: EnrichedBundle,
    #[serde(default)]
    pub settings: MessageSettings,
}

/// Draft outreach messages for an enriched contact
///
/// Always answers with a complete payload once settings are valid: failed
/// steps fall back to empty summaries, canned recommendations or an empty
/// list of general messages. Message drafts carry a `{url}` placeholder.
#[utoipa::path(
    post,
    path = "/v1/recommendations",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Composed recommendations", body = RecommendationOutput),
        (status = 400, description = "Settings out of range", body = ApiError),
        (status = 429, description = "Rate limited", body = ApiError)
    ),
    tag = "recommendations"
)]
pub async fn compose_recommendations(
    State(state): State<AppState>,
    AppJson(req): AppJson<RecommendationRequest>,
) -> Result<Json<RecommendationOutput>, AppError> {
    let today = chrono::Utc::now().date_naive();
    let output = Composer::new(state.language_model.as_ref(), state.search.as_ref(), today)
        .compose(&req.bundle, &req.settings)
        .await?;
    Ok(Json(output))
}
