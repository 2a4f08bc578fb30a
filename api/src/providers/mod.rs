//! Upstream collaborators: the messaging provider, the web search provider
//! and the language model. Each sits behind a trait so services can be
//! exercised without network access.

use async_trait::async_trait;
use serde_json::Value;

use outreach_core::accounts::RawAccount;
use outreach_core::prompts::OutputFormat;
use outreach_core::recommendations::extract_json;

pub mod google;
pub mod openai;
pub mod unipile;

#[cfg(test)]
pub mod fake;

/// Sampling temperature used for every generation request.
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} is not configured (missing {missing})")]
    NotConfigured {
        provider: &'static str,
        missing: &'static str,
    },
    #[error("{provider} address is invalid: {detail}")]
    InvalidAddress {
        provider: &'static str,
        detail: String,
    },
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned an unreadable body: {detail}")]
    Decode {
        provider: &'static str,
        detail: String,
    },
    #[error("{provider} returned content that is not valid JSON")]
    InvalidJson { provider: &'static str },
    #[error("{provider} returned no content")]
    EmptyCompletion { provider: &'static str },
}

impl ProviderError {
    /// Transport failure with the request URL stripped, since the search
    /// key travels in the query string.
    pub fn transport(provider: &'static str, source: reqwest::Error) -> Self {
        ProviderError::Transport {
            provider,
            source: source.without_url(),
        }
    }

    /// Upstream HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Activity lists exposed per user by the messaging provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Posts,
    Reactions,
    Comments,
}

impl ActivityKind {
    pub fn path_segment(self) -> &'static str {
        match self {
            ActivityKind::Posts => "posts",
            ActivityKind::Reactions => "reactions",
            ActivityKind::Comments => "comments",
        }
    }
}

/// Messaging-aggregation provider. Every call runs in the context of one
/// linked account.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<RawAccount>, ProviderError>;

    /// Raw people-search page for `keywords`.
    async fn search_people(&self, account_id: &str, keywords: &str)
    -> Result<Value, ProviderError>;

    async fn get_profile(&self, account_id: &str, user_id: &str) -> Result<Value, ProviderError>;

    async fn list_activity(
        &self,
        account_id: &str,
        user_id: &str,
        kind: ActivityKind,
        limit: u32,
    ) -> Result<Vec<Value>, ProviderError>;

    async fn get_post(&self, account_id: &str, post_id: &str) -> Result<Value, ProviderError>;

    /// Chats the account shares with `attendee_id`, in provider order.
    async fn list_chats_with(
        &self,
        account_id: &str,
        attendee_id: &str,
    ) -> Result<Vec<Value>, ProviderError>;

    async fn list_chat_messages(
        &self,
        account_id: &str,
        chat_id: &str,
        limit: u32,
    ) -> Result<Vec<Value>, ProviderError>;

    async fn send_message(
        &self,
        account_id: Option<&str>,
        chat_id: &str,
        text: &str,
    ) -> Result<Value, ProviderError>;
}

/// Keyword web search returning the provider's raw payload.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, date_restrict: Option<&str>)
    -> Result<Value, ProviderError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub format: OutputFormat,
}

impl CompletionRequest {
    pub fn new(system: String, user: String, format: OutputFormat) -> Self {
        Self {
            system,
            user,
            temperature: TEMPERATURE,
            format,
        }
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Raw completion text for a system + user message pair.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Completion parsed as JSON. Text that does not parse fails the call.
    async fn complete_json(&self, request: &CompletionRequest) -> Result<Value, ProviderError> {
        let content = self.complete(request).await?;
        extract_json(&content).ok_or_else(|| {
            tracing::warn!(content_len = content.len(), "Model reply is not valid JSON");
            ProviderError::InvalidJson {
                provider: "language_model",
            }
        })
    }
}

/// Read a response, turning non-2xx into `Status` and the body into JSON.
/// An empty success body is `null`.
pub(crate) async fn read_json(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<Value, ProviderError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::transport(provider, source))?;

    tracing::debug!(provider, status = status.as_u16(), "Upstream response");

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|err| ProviderError::Decode {
        provider,
        detail: err.to_string(),
    })
}
