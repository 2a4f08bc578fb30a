use serde_json::Value;

use crate::error::AppError;
use crate::providers::MessagingProvider;

/// Post `text` verbatim to a chat. Both fields must be non-blank; the
/// account id is forwarded only when the caller supplied one.
pub async fn send_message(
    provider: &dyn MessagingProvider,
    chat_id: &str,
    text: &str,
    account_id: Option<&str>,
) -> Result<Value, AppError> {
    let chat_id = chat_id.trim();
    if chat_id.is_empty() {
        return Err(AppError::missing_field("chat_id"));
    }
    if text.trim().is_empty() {
        return Err(AppError::missing_field("text"));
    }
    let account_id = account_id.map(str::trim).filter(|id| !id.is_empty());

    let result = provider
        .send_message(account_id, chat_id, text)
        .await
        .map_err(|err| AppError::from_provider("Failed to send message", err))?;
    tracing::info!(chat_id, chars = text.chars().count(), "Message sent");
    Ok(result)
}
