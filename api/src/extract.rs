//! `AppJson<T>`: the JSON body extractor used by every POST handler.
//!
//! Malformed or incomplete bodies become a 400 `validation_failed` error naming
//! the offending field, so a request missing `bundle` or `chat_id` is rejected
//! before any provider is contacted.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use crate::error::AppError;

pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| AppJson(value))
            .map_err(rejection_to_validation)
    }
}

fn rejection_to_validation(rejection: JsonRejection) -> AppError {
    let detail = rejection.body_text();
    let field = extract_field_from_serde_message(&detail).unwrap_or_else(|| "body".to_string());

    AppError::Validation {
        message: format!("Invalid request body: {detail}"),
        field: Some(field),
        received: None,
        docs_hint: Some(
            "Check the request body against the endpoint's schema (GET /api-doc/openapi.json)."
                .to_string(),
        ),
    }
}

/// Field named in a serde "missing field" or "unknown field" message.
fn extract_field_from_serde_message(msg: &str) -> Option<String> {
    for pattern in ["missing field `", "unknown field `"] {
        if let Some(start) = msg.find(pattern) {
            let after = &msg[start + pattern.len()..];
            if let Some(end) = after.find('`') {
                return Some(after[..end].to_string());
            }
        }
    }
    None
}
