use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use outreach_core::error::ApiError;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/messages/send", post(send_message))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SendMessageRequest {
    #[serde(default, alias = "chatId")]
    pub chat_id: String,
    /// Final text, sent as is. Placeholders must already be substituted.
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "accountId")]
    pub account_id: Option<String>,
}

/// Send a message to an existing chat
#[utoipa::path(
    post,
    path = "/v1/messages/send",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Provider acknowledgement", body = serde_json::Value),
        (status = 400, description = "Missing chat_id or text", body = ApiError),
        (status = 429, description = "Rate limited", body = ApiError),
        (status = 502, description = "Send failed", body = ApiError)
    ),
    tag = "messages"
)]
pub async fn send_message(
    State(state): State<AppState>,
    AppJson(req): AppJson<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let result = services::sender::send_message(
        state.messaging.as_ref(),
        &req.chat_id,
        &req.text,
        req.account_id.as_deref(),
    )
    .await?;
    Ok(Json(result))
}
