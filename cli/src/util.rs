use std::io::Read;

use serde_json::{Value, json};
use url::Url;

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Print a CLI-side error and exit with the usage error code (4).
pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!("{}", render(&err));
    std::process::exit(4);
}

pub fn print_json(value: &Value) {
    println!("{}", render(value));
}

/// Exit code for an HTTP status: 0=2xx, 1=4xx, 2=anything else.
pub fn exit_code_for(status: u16) -> i32 {
    match status {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    }
}

/// Print a response body to stdout (success) or stderr (failure) and return
/// the matching exit code.
pub fn report(status: u16, body: &Value) -> i32 {
    let code = exit_code_for(status);
    if code == 0 {
        println!("{}", render(body));
    } else {
        eprintln!("{}", render(body));
    }
    code
}

pub fn build_url(api_url: &str, path: &str, query: &[(&str, String)]) -> Result<Url, String> {
    let mut url = Url::parse(&format!("{}{path}", api_url.trim_end_matches('/')))
        .map_err(|e| format!("Invalid URL: {api_url}{path}: {e}"))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in query {
            pairs.append_pair(k, v);
        }
    }
    Ok(url)
}

/// Outcome of a request that never reached a response.
pub enum RequestError {
    Usage(String),
    Connection(String),
}

/// Execute an API request and return status + JSON body without printing.
pub async fn raw_api_request(
    api_url: &str,
    method: reqwest::Method,
    path: &str,
    body: Option<&Value>,
    query: &[(&str, String)],
) -> Result<(u16, Value), RequestError> {
    let url = build_url(api_url, path, query).map_err(RequestError::Usage)?;
    tracing::debug!(%method, %url, "API request");

    let mut req = client().request(method, url);
    if let Some(b) = body {
        req = req.json(b);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| RequestError::Connection(e.to_string()))?;
    let status = resp.status().as_u16();
    let body: Value = resp
        .json()
        .await
        .unwrap_or_else(|e| json!({"raw_error": format!("Failed to parse response as JSON: {e}")}));

    Ok((status, body))
}

/// Execute an API request, print the response, return a structured exit code.
///
/// Exit codes: 0=success (2xx), 1=client error (4xx), 2=server error (5xx),
///             3=connection error, 4=usage error
pub async fn api_request(
    api_url: &str,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
    query: &[(&str, String)],
) -> i32 {
    match raw_api_request(api_url, method, path, body.as_ref(), query).await {
        Ok((status, body)) => report(status, &body),
        Err(err) => report_request_error(err),
    }
}

pub fn report_request_error(err: RequestError) -> i32 {
    match err {
        RequestError::Usage(message) => {
            eprintln!("{}", render(&json!({"error": "cli_error", "message": message})));
            4
        }
        RequestError::Connection(message) => {
            eprintln!(
                "{}",
                render(&json!({
                    "error": "connection_error",
                    "message": message,
                    "docs_hint": "Is the API server running? Check OUTREACH_API_URL."
                }))
            );
            3
        }
    }
}

/// Read JSON from a file path or stdin (when path is "-").
pub fn read_json_from_file(path: &str) -> Result<Value, String> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read file '{path}': {e}"))?
    };
    serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON in '{path}': {e}"))
}
