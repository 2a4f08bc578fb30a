use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionRequest, LanguageModel, ProviderError, read_json};
use crate::config::LanguageModelConfig;

const PROVIDER: &str = "language_model";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    http: Client,
    config: Option<LanguageModelConfig>,
}

impl OpenAiClient {
    pub fn new(http: Client, config: Option<LanguageModelConfig>) -> Self {
        Self { http, config }
    }
}

fn first_content(completion: ChatCompletionResponse) -> Option<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let config = self.config.as_ref().ok_or(ProviderError::NotConfigured {
            provider: PROVIDER,
            missing: "OPENAI_API_KEY",
        })?;

        let body = ChatCompletionRequest {
            model: &config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
        };
        tracing::debug!(
            provider = PROVIDER,
            model = %config.model,
            format = ?request.format,
            "Chat completion"
        );

        let response = self
            .http
            .post(&config.endpoint)
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|source| ProviderError::transport(PROVIDER, source))?;
        let payload = read_json(PROVIDER, response).await?;
        let completion: ChatCompletionResponse =
            serde_json::from_value(payload).map_err(|err| ProviderError::Decode {
                provider: PROVIDER,
                detail: err.to_string(),
            })?;

        first_content(completion).ok_or(ProviderError::EmptyCompletion { provider: PROVIDER })
    }
}
