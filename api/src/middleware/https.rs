use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

const HSTS: &str = "max-age=63072000; includeSubDomains";

/// Enforce HTTPS behind a TLS-terminating proxy.
///
/// `X-Forwarded-Proto: http` gets a 301 to the HTTPS equivalent; a missing
/// header is treated as HTTPS. Every response carries HSTS.
pub async fn require_https(req: Request, next: Next) -> Response {
    if let Some(uri) = https_redirect(&req) {
        let mut response =
            (StatusCode::MOVED_PERMANENTLY, [("location", uri.to_string())]).into_response();
        add_hsts_header(&mut response);
        return response;
    }

    let mut response = next.run(req).await;
    add_hsts_header(&mut response);
    response
}

fn https_redirect(req: &Request) -> Option<Uri> {
    let headers = req.headers();
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");
    if proto != "http" {
        return None;
    }

    let host = headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    format!("https://{host}{path_and_query}").parse().ok()
}

fn add_hsts_header(response: &mut Response) {
    response
        .headers_mut()
        .insert("strict-transport-security", HeaderValue::from_static(HSTS));
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::{Router, middleware};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/v1/accounts", get(|| async { StatusCode::OK }))
            .layer(middleware::from_fn(super::require_https))
    }

    #[tokio::test]
    async fn plain_http_is_redirected() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/v1/accounts?x=1")
                    .header("host", "outreach.example")
                    .header("x-forwarded-proto", "http")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response
                .headers()
                .get("location")
                .expect("location header should exist"),
            "https://outreach.example/v1/accounts?x=1"
        );
    }

    #[tokio::test]
    async fn https_passes_through_with_hsts() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/v1/accounts")
                    .header("x-forwarded-proto", "https")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("strict-transport-security"));
    }
}
