//! Unipile messaging-aggregation API client.
//!
//! Every call targets `<dsn>/api/v1/<resource>` with the key in `X-API-KEY`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::{Value, json};

use outreach_core::accounts::{RawAccount, RawAccountPage};
use outreach_core::reshape::list_items;

use super::{ActivityKind, MessagingProvider, ProviderError, read_json};
use crate::config::{MessagingConfig, SendFormat};

const PROVIDER: &str = "messaging";
const API_KEY_HEADER: &str = "X-API-KEY";

/// Network distances included in people search: 1st, 2nd and 3rd+.
const SEARCH_NETWORK_DISTANCE: [u8; 3] = [1, 2, 3];

pub struct UnipileClient {
    http: Client,
    config: Option<MessagingConfig>,
}

impl UnipileClient {
    pub fn new(http: Client, config: Option<MessagingConfig>) -> Self {
        Self { http, config }
    }

    fn config(&self) -> Result<&MessagingConfig, ProviderError> {
        self.config.as_ref().ok_or(ProviderError::NotConfigured {
            provider: PROVIDER,
            missing: "UNIPILE_API_KEY/UNIPILE_DSN",
        })
    }

    fn url(
        config: &MessagingConfig,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, ProviderError> {
        let invalid = |detail: String| ProviderError::InvalidAddress {
            provider: PROVIDER,
            detail,
        };
        let mut url = Url::parse(&format!("{}/api/v1", config.dsn))
            .map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("base address cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn authorized(&self, config: &MessagingConfig, request: RequestBuilder) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, &config.api_key)
            .header("accept", "application/json")
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|source| ProviderError::transport(PROVIDER, source))?;
        read_json(PROVIDER, response).await
    }

    async fn get(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Value, ProviderError> {
        let config = self.config()?;
        let url = Self::url(config, segments, query)?;
        tracing::debug!(provider = PROVIDER, path = url.path(), "GET");
        self.execute(self.authorized(config, self.http.get(url))).await
    }

    /// `POST chats/{chat_id}/messages` carrying `text` either as a JSON body
    /// or as a multipart field, per the configured send format.
    fn send_request(
        &self,
        config: &MessagingConfig,
        account_id: Option<&str>,
        chat_id: &str,
        text: &str,
    ) -> Result<reqwest::Request, ProviderError> {
        let query: Vec<(&str, &str)> = account_id.map(|id| ("account_id", id)).into_iter().collect();
        let url = Self::url(config, &["chats", chat_id, "messages"], &query)?;
        let request = match config.send_format {
            SendFormat::Json => self.http.post(url).json(&json!({ "text": text })),
            SendFormat::Multipart => self
                .http
                .post(url)
                .multipart(reqwest::multipart::Form::new().text("text", text.to_string())),
        };
        self.authorized(config, request)
            .build()
            .map_err(|source| ProviderError::transport(PROVIDER, source))
    }
}

#[async_trait]
impl MessagingProvider for UnipileClient {
    async fn list_accounts(&self) -> Result<Vec<RawAccount>, ProviderError> {
        let page = self.get(&["accounts"], &[]).await?;
        let page: RawAccountPage =
            serde_json::from_value(page).map_err(|err| ProviderError::Decode {
                provider: PROVIDER,
                detail: err.to_string(),
            })?;
        Ok(page.items)
    }

    async fn search_people(
        &self,
        account_id: &str,
        keywords: &str,
    ) -> Result<Value, ProviderError> {
        let config = self.config()?;
        let url = Self::url(config, &["linkedin", "search"], &[("account_id", account_id)])?;
        let body = json!({
            "api": "classic",
            "category": "people",
            "network_distance": SEARCH_NETWORK_DISTANCE,
            "keywords": keywords,
        });
        tracing::debug!(provider = PROVIDER, path = url.path(), "POST people search");
        self.execute(self.authorized(config, self.http.post(url).json(&body)))
            .await
    }

    async fn get_profile(&self, account_id: &str, user_id: &str) -> Result<Value, ProviderError> {
        self.get(&["users", user_id], &[("account_id", account_id)])
            .await
    }

    async fn list_activity(
        &self,
        account_id: &str,
        user_id: &str,
        kind: ActivityKind,
        limit: u32,
    ) -> Result<Vec<Value>, ProviderError> {
        let limit = limit.to_string();
        let page = self
            .get(
                &["users", user_id, kind.path_segment()],
                &[("account_id", account_id), ("limit", &limit)],
            )
            .await?;
        Ok(list_items(&page))
    }

    async fn get_post(&self, account_id: &str, post_id: &str) -> Result<Value, ProviderError> {
        self.get(&["posts", post_id], &[("account_id", account_id)])
            .await
    }

    async fn list_chats_with(
        &self,
        account_id: &str,
        attendee_id: &str,
    ) -> Result<Vec<Value>, ProviderError> {
        let page = self
            .get(
                &["chat_attendees", attendee_id, "chats"],
                &[("account_id", account_id)],
            )
            .await?;
        Ok(list_items(&page))
    }

    async fn list_chat_messages(
        &self,
        account_id: &str,
        chat_id: &str,
        limit: u32,
    ) -> Result<Vec<Value>, ProviderError> {
        let limit = limit.to_string();
        let page = self
            .get(
                &["chats", chat_id, "messages"],
                &[("account_id", account_id), ("limit", &limit)],
            )
            .await?;
        Ok(list_items(&page))
    }

    async fn send_message(
        &self,
        account_id: Option<&str>,
        chat_id: &str,
        text: &str,
    ) -> Result<Value, ProviderError> {
        let config = self.config()?;
        let request = self.send_request(config, account_id, chat_id, text)?;
        tracing::debug!(
            provider = PROVIDER,
            chat_id,
            format = ?config.send_format,
            "POST message"
        );
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| ProviderError::transport(PROVIDER, source))?;
        read_json(PROVIDER, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dsn: &str) -> MessagingConfig {
        MessagingConfig {
            api_key: "key".to_string(),
            dsn: dsn.to_string(),
            send_format: SendFormat::Json,
        }
    }

    #[test]
    fn url_joins_segments_under_api_v1() {
        let url = UnipileClient::url(
            &config("https://api1.unipile.com:13111"),
            &["users", "ACo123", "posts"],
            &[("account_id", "acct1"), ("limit", "10")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api1.unipile.com:13111/api/v1/users/ACo123/posts?account_id=acct1&limit=10"
        );
    }

    #[test]
    fn url_escapes_identifiers() {
        let url = UnipileClient::url(&config("https://x.test"), &["posts", "urn:li/1 2"], &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://x.test/api/v1/posts/urn:li%2F1%202");
    }

    #[tokio::test]
    async fn unconfigured_client_fails_before_any_request() {
        let client = UnipileClient::new(Client::new(), None);
        let err = client.list_accounts().await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured { .. }));
    }

    fn client(send_format: SendFormat, dsn: &str) -> UnipileClient {
        UnipileClient::new(
            Client::new(),
            Some(MessagingConfig {
                send_format,
                ..config(dsn)
            }),
        )
    }

    fn send_request(client: &UnipileClient, account_id: Option<&str>) -> reqwest::Request {
        let config = client.config().unwrap();
        client
            .send_request(config, account_id, "c1", "hello there")
            .unwrap()
    }

    #[test]
    fn json_send_carries_text_in_body() {
        let request = send_request(&client(SendFormat::Json, "https://x.test"), Some("acct1"));
        assert_eq!(
            request.url().as_str(),
            "https://x.test/api/v1/chats/c1/messages?account_id=acct1"
        );
        assert_eq!(request.headers()["x-api-key"], "key");
        assert_eq!(request.headers()["content-type"], "application/json");
        let body: Value =
            serde_json::from_slice(request.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(body, json!({ "text": "hello there" }));
    }

    #[test]
    fn multipart_send_is_form_data() {
        let request = send_request(&client(SendFormat::Multipart, "https://x.test"), None);
        assert_eq!(request.url().as_str(), "https://x.test/api/v1/chats/c1/messages");
        assert_eq!(request.headers()["x-api-key"], "key");
        let content_type = request.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[tokio::test]
    async fn multipart_send_delivers_text_field() {
        use std::sync::{Arc, Mutex};

        use axum::extract::State;
        use axum::http::HeaderMap;
        use axum::routing::post;

        type Captured = Arc<Mutex<Option<(HeaderMap, String)>>>;

        async fn capture(
            State(captured): State<Captured>,
            headers: HeaderMap,
            body: String,
        ) -> axum::Json<Value> {
            *captured.lock().unwrap() = Some((headers, body));
            axum::Json(json!({ "object": "MessageSent" }))
        }

        let captured: Captured = Arc::default();
        let app = axum::Router::new()
            .route("/api/v1/chats/{chat_id}/messages", post(capture))
            .with_state(captured.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let sent = client(SendFormat::Multipart, &format!("http://{addr}"))
            .send_message(Some("acct1"), "c1", "hello there")
            .await
            .unwrap();
        assert_eq!(sent["object"], "MessageSent");

        let (headers, body) = captured.lock().unwrap().take().unwrap();
        assert_eq!(headers["x-api-key"], "key");
        assert!(body.contains("name=\"text\""), "{body}");
        assert!(body.contains("hello there"), "{body}");
    }
}
