use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use outreach_core::activity::EnrichedBundle;
use outreach_core::error::ApiError;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/profiles/enrich", post(enrich_profile))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct EnrichRequest {
    /// Provider user id of the contact
    #[serde(default, alias = "userId", alias = "contactId")]
    pub contact_id: String,
    #[serde(default, alias = "accountId")]
    pub account_id: Option<String>,
}

/// Profile, recent activity and message history for one contact
///
/// Activity and messages are best effort: lists that fail come back empty
/// and reactions or comments whose parent post cannot be loaded are left out.
/// `chatId` is the first chat shared with the contact.
#[utoipa::path(
    post,
    path = "/v1/profiles/enrich",
    request_body = EnrichRequest,
    responses(
        (status = 200, description = "Enriched contact", body = EnrichedBundle),
        (status = 400, description = "Missing contact_id", body = ApiError),
        (status = 404, description = "No LinkedIn account found", body = ApiError),
        (status = 502, description = "Profile fetch failed", body = ApiError)
    ),
    tag = "contacts"
)]
pub async fn enrich_profile(
    State(state): State<AppState>,
    AppJson(req): AppJson<EnrichRequest>,
) -> Result<Json<EnrichedBundle>, AppError> {
    let bundle = services::enrichment::enrich(
        state.messaging.as_ref(),
        &req.contact_id,
        req.account_id.as_deref(),
    )
    .await?;
    Ok(Json(bundle))
}
