use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use outreach_core::error::ApiError;

use crate::error::AppError;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/contacts/search", get(search_contacts))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactSearchQuery {
    /// Keywords; blank returns an empty page
    #[serde(default)]
    pub q: String,
    /// Account to search through. Omitting it falls back to the first linked account.
    #[serde(default, alias = "accountId")]
    pub account_id: Option<String>,
}

/// Search LinkedIn people within 1st to 3rd degree
///
/// Items are the provider's own, each with an added `degree` label.
#[utoipa::path(
    get,
    path = "/v1/contacts/search",
    params(ContactSearchQuery),
    responses(
        (status = 200, description = "Search page with labelled items", body = serde_json::Value),
        (status = 404, description = "No LinkedIn account found", body = ApiError),
        (status = 502, description = "Messaging provider failure", body = ApiError)
    ),
    tag = "contacts"
)]
pub async fn search_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let page = services::contacts::search_contacts(
        state.messaging.as_ref(),
        &query.q,
        query.account_id.as_deref(),
    )
    .await?;
    Ok(Json(page))
}
