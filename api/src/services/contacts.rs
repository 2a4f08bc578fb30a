use serde_json::{Value, json};

use outreach_core::reshape::label_search_page;

use super::accounts::resolve_account_id;
use crate::error::AppError;
use crate::providers::MessagingProvider;

/// People search scoped to 1st-3rd degree connections. Items are passed
/// through with an added `degree` label. A blank query short-circuits to an
/// empty page without touching the provider.
pub async fn search_contacts(
    provider: &dyn MessagingProvider,
    query: &str,
    account_id: Option<&str>,
) -> Result<Value, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(json!({ "items": [] }));
    }

    let account_id = resolve_account_id(provider, account_id).await?;
    let page = provider
        .search_people(&account_id, query)
        .await
        .map_err(|err| AppError::from_provider("Failed to search LinkedIn contacts", err))?;

    Ok(label_search_page(page))
}
