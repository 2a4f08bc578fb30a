use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use outreach_core::error::ApiError;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::services::generation::{self, GenerateRequest, GenerateResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/ai/generate", post(generate))
}

/// Styled free-form generation
///
/// The system message carries the tone and length guides for the requested
/// levels. With `format: json` the reply must parse as JSON.
#[utoipa::path(
    post,
    path = "/v1/ai/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated result", body = GenerateResponse),
        (status = 400, description = "Missing prompt or level out of range", body = ApiError),
        (status = 429, description = "Rate limited", body = ApiError),
        (status = 500, description = "Language model not configured", body = ApiError),
        (status = 502, description = "Language model failure or invalid JSON", body = ApiError)
    ),
    tag = "ai"
)]
pub async fn generate(
    State(state): State<AppState>,
    AppJson(req): AppJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let response = generation::generate(state.language_model.as_ref(), &req).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::fake::FakeModel;
    use crate::routes::test_support::{Fakes, json_body, post_json};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn json_result_is_embedded() {
        let fakes = Fakes {
            model: Arc::new(FakeModel::new().answering("ideas", r#"["a", "b"]"#)),
            ..Default::default()
        };
        let response = router()
            .with_state(fakes.state())
            .oneshot(post_json(
                "/v1/ai/generate",
                json!({"prompt": "three ideas", "format": "json", "language": "ITA"}),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"result": ["a", "b"]}));
        assert!(fakes.model.requests()[0].system.contains("Respond ONLY in Italian"));
    }

    #[tokio::test]
    async fn invalid_json_reply_is_bad_gateway() {
        let fakes = Fakes {
            model: Arc::new(FakeModel::new().answering("ideas", "here are some ideas")),
            ..Default::default()
        };
        let response = router()
            .with_state(fakes.state())
            .oneshot(post_json(
                "/v1/ai/generate",
                json!({"prompt": "ideas", "format": "json"}),
            ))
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["message"], "Invalid JSON in AI response");
    }
}
