use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer;

/// Build a CORS layer for the configured browser origins.
///
/// - Methods: GET, POST, OPTIONS
/// - Headers: Content-Type
/// - Max age: 3600s
///
/// Origins that are not valid header values are skipped.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin_values(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([HeaderName::from_static("content-type")])
        .max_age(std::time::Duration::from_secs(3600))
}

fn origin_values(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    #[test]
    fn invalid_origins_are_skipped() {
        let values = origin_values(&[
            "http://localhost:3000".to_string(),
            "bad\norigin".to_string(),
        ]);
        assert_eq!(values, vec![HeaderValue::from_static("http://localhost:3000")]);
    }

    #[tokio::test]
    async fn allowed_origin_is_echoed() {
        let app = Router::new()
            .route("/health", get(|| async { StatusCode::OK }))
            .layer(build_cors_layer(&["https://app.example".to_string()]));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "https://app.example")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .expect("allow-origin header should exist"),
            "https://app.example"
        );
    }
}
