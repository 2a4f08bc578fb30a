use outreach_core::accounts::{Account, linkedin_accounts};

use crate::error::AppError;
use crate::providers::MessagingProvider;

/// Linked LinkedIn accounts with their connection status.
pub async fn list_accounts(provider: &dyn MessagingProvider) -> Result<Vec<Account>, AppError> {
    let raw = provider
        .list_accounts()
        .await
        .map_err(|err| AppError::from_provider("Failed to fetch accounts", err))?;
    let accounts = linkedin_accounts(raw);
    tracing::debug!(count = accounts.len(), "Listed linked accounts");
    Ok(accounts)
}

/// The caller's account id, or the first linked LinkedIn account when none
/// was given. The fallback exists for older clients only.
pub async fn resolve_account_id(
    provider: &dyn MessagingProvider,
    requested: Option<&str>,
) -> Result<String, AppError> {
    if let Some(id) = requested.map(str::trim).filter(|id| !id.is_empty()) {
        return Ok(id.to_string());
    }

    let raw = provider
        .list_accounts()
        .await
        .map_err(|err| AppError::from_provider("Failed to fetch accounts", err))?;
    let account = raw
        .into_iter()
        .find(|account| account.is_linkedin())
        .ok_or(AppError::NoAccountFound)?;
    tracing::warn!(
        account_id = %account.id,
        "No account_id supplied, falling back to first LinkedIn account"
    );
    Ok(account.id)
}
