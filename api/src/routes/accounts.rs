use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use outreach_core::accounts::Account;
use outreach_core::error::ApiError;

use crate::error::AppError;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/accounts", get(list_accounts))
}

/// List linked LinkedIn accounts
///
/// Status is `connected` when any of the account's sources reports OK.
#[utoipa::path(
    get,
    path = "/v1/accounts",
    responses(
        (status = 200, description = "Linked accounts", body = Vec<Account>),
        (status = 500, description = "Messaging provider not configured", body = ApiError),
        (status = 502, description = "Messaging provider failure", body = ApiError)
    ),
    tag = "accounts"
)]
pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = services::accounts::list_accounts(state.messaging.as_ref()).await?;
    Ok(Json(accounts))
}
