use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use super::{ProviderError, WebSearch, read_json};
use crate::config::SearchConfig;

const PROVIDER: &str = "search";

/// Google Custom Search JSON API client.
pub struct GoogleSearchClient {
    http: Client,
    config: Option<SearchConfig>,
}

impl GoogleSearchClient {
    pub fn new(http: Client, config: Option<SearchConfig>) -> Self {
        Self { http, config }
    }

    fn url(config: &SearchConfig, query: &str, date_restrict: Option<&str>) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&config.endpoint).map_err(|err| ProviderError::InvalidAddress {
            provider: PROVIDER,
            detail: err.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("key", &config.api_key)
                .append_pair("cx", &config.engine_id)
                .append_pair("q", query);
            if let Some(restrict) = date_restrict {
                pairs.append_pair("dateRestrict", restrict);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl WebSearch for GoogleSearchClient {
    async fn search(
        &self,
        query: &str,
        date_restrict: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let config = self.config.as_ref().ok_or(ProviderError::NotConfigured {
            provider: PROVIDER,
            missing: "GOOGLE_SEARCH_API_KEY/GOOGLE_SEARCH_ENGINE_ID",
        })?;
        let url = Self::url(config, query, date_restrict)?;
        tracing::debug!(provider = PROVIDER, query, date_restrict = ?date_restrict, "Web search");

        let response = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|source| ProviderError::transport(PROVIDER, source))?;
        read_json(PROVIDER, response).await
    }
}
