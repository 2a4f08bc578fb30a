use std::sync::Arc;

use crate::config::Config;
use crate::providers::google::GoogleSearchClient;
use crate::providers::openai::OpenAiClient;
use crate::providers::unipile::UnipileClient;
use crate::providers::{LanguageModel, MessagingProvider, WebSearch};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub messaging: Arc<dyn MessagingProvider>,
    pub search: Arc<dyn WebSearch>,
    pub language_model: Arc<dyn LanguageModel>,
}

impl AppState {
    /// Wire the HTTP-backed providers from configuration. All three share
    /// one connection pool.
    pub fn from_config(config: Config) -> Self {
        let http = reqwest::Client::new();
        Self {
            messaging: Arc::new(UnipileClient::new(http.clone(), config.messaging.clone())),
            search: Arc::new(GoogleSearchClient::new(http.clone(), config.search.clone())),
            language_model: Arc::new(OpenAiClient::new(http, config.language_model.clone())),
            config: Arc::new(config),
        }
    }
}
