use serde_json::Value;

use outreach_core::search::article_query;

use crate::error::AppError;
use crate::providers::WebSearch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Query forwarded as given.
    Web,
    /// Query restricted to the article allow-list.
    Articles,
}

/// Pass-through web search returning the provider's raw payload.
pub async fn search(
    provider: &dyn WebSearch,
    mode: SearchMode,
    query: Option<&str>,
    date_restrict: Option<&str>,
) -> Result<Value, AppError> {
    let query = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation {
            message: "Missing query parameter".to_string(),
            field: Some("q".to_string()),
            received: None,
            docs_hint: Some("Pass the search terms as ?q=...".to_string()),
        })?;
    let date_restrict = date_restrict.map(str::trim).filter(|d| !d.is_empty());

    let query = match mode {
        SearchMode::Web => query.to_string(),
        SearchMode::Articles => article_query(query),
    };
    provider
        .search(&query, date_restrict)
        .await
        .map_err(|err| AppError::from_provider("Failed to fetch search results", err))
}
