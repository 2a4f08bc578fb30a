//! Inbound per-IP rate limits for the routes that spend upstream quota.

use axum::Json;
use axum::body::Body;
use axum::http::{HeaderValue, Response, StatusCode};
use axum::response::IntoResponse;
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder,
    key_extractor::SmartIpKeyExtractor,
};

use outreach_core::error::{ApiError, codes};

pub type RateLimitLayer =
    GovernorLayer<SmartIpKeyExtractor, governor::middleware::NoOpMiddleware, Body>;

/// Rate limit for model-backed routes (recommendations, generation):
/// 10 requests per minute per IP.
pub fn generation_layer() -> Option<RateLimitLayer> {
    let config = GovernorConfigBuilder::default()
        .per_second(6)
        .burst_size(10)
        .key_extractor(SmartIpKeyExtractor)
        .finish()?;
    Some(GovernorLayer::new(config).error_handler(json_error_handler))
}

/// Rate limit for POST /v1/messages/send: 20 requests per minute per IP.
pub fn send_layer() -> Option<RateLimitLayer> {
    let config = GovernorConfigBuilder::default()
        .per_second(3)
        .burst_size(20)
        .key_extractor(SmartIpKeyExtractor)
        .finish()?;
    Some(GovernorLayer::new(config).error_handler(json_error_handler))
}

/// JSON error in ApiError format, with Retry-After when the limiter knows it.
fn json_error_handler(err: GovernorError) -> Response<Body> {
    let (status, retry_after, message) = match err {
        GovernorError::TooManyRequests { wait_time, .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            Some(wait_time),
            format!("Too many requests. Retry after {wait_time} seconds."),
        ),
        GovernorError::UnableToExtractKey => (
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
            "Unable to determine client identity for rate limiting".to_string(),
        ),
        GovernorError::Other { code, msg, .. } => (code, None, msg.unwrap_or_default()),
    };

    let body = ApiError {
        error: codes::RATE_LIMITED.to_string(),
        message,
        field: None,
        received: None,
        request_id: uuid::Uuid::now_v7().to_string(),
        docs_hint: None,
    };
    let mut response = (status, Json(body)).into_response();

    if let Some(value) = retry_after.and_then(|secs| HeaderValue::from_str(&secs.to_string()).ok())
    {
        response.headers_mut().insert("retry-after", value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_build() {
        assert!(generation_layer().is_some());
        assert!(send_layer().is_some());
    }

    #[tokio::test]
    async fn too_many_requests_is_json_with_retry_after() {
        let response = json_error_handler(GovernorError::TooManyRequests {
            wait_time: 4,
            headers: None,
        });
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response
                .headers()
                .get("retry-after")
                .expect("retry-after header should exist"),
            "4"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let body: ApiError = serde_json::from_slice(&bytes).expect("body should be ApiError");
        assert_eq!(body.error, codes::RATE_LIMITED);
    }
}
