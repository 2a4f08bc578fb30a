//! Free-form styled generation: one system message built from the tone and
//! length guides, one user prompt.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use outreach_core::prompts::{OutputFormat, styled_system_message};
use outreach_core::recommendations::Language;

use crate::error::AppError;
use crate::providers::{CompletionRequest, LanguageModel, ProviderError};

fn default_level() -> u8 {
    2
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub format: OutputFormat,
    /// 1 (ultra-brief) to 4 (detailed)
    #[serde(default = "default_level")]
    pub length: u8,
    /// 1 (super casual) to 4 (formal business)
    #[serde(default = "default_level")]
    pub formality: u8,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// Plain text, or the parsed JSON value when `format` is `json`
    #[schema(value_type = Object)]
    pub result: Value,
}

pub async fn generate(
    model: &dyn LanguageModel,
    req: &GenerateRequest,
) -> Result<GenerateResponse, AppError> {
    if req.prompt.trim().is_empty() {
        return Err(AppError::missing_field("prompt"));
    }
    let system = styled_system_message(req.formality, req.length, req.language, req.format)?;
    let request = CompletionRequest::new(system, req.prompt.clone(), req.format);

    let result = match req.format {
        OutputFormat::Json => model.complete_json(&request).await,
        OutputFormat::Text => model.complete(&request).await.map(Value::String),
    }
    .map_err(generation_error)?;

    Ok(GenerateResponse { result })
}

fn generation_error(err: ProviderError) -> AppError {
    let context = match &err {
        ProviderError::InvalidJson { .. } => "Invalid JSON in AI response",
        ProviderError::EmptyCompletion { .. } => "No content in AI response",
        _ => "Error processing AI request",
    };
    AppError::from_provider(context, err)
}
