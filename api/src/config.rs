//! Process configuration, resolved once at startup.
//!
//! Each upstream provider gets an optional section. A missing section does
//! not stop the server from starting; operations that need it fail with a
//! configuration error instead of attempting the call.

use std::collections::HashMap;

pub const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Body encoding for the send-message call. The provider accepts both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SendFormat {
    #[default]
    Json,
    Multipart,
}

impl SendFormat {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_lowercase()).as_deref() {
            Some("multipart") | Some("form") => Self::Multipart,
            _ => Self::Json,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessagingConfig {
    pub api_key: String,
    /// Deployment base address, without the `/api/v1` suffix
    pub dsn: String,
    pub send_format: SendFormat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub api_key: String,
    pub engine_id: String,
    pub endpoint: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageModelConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
}

/// Listener settings. Always present, with defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Redirect plain-HTTP requests (per `X-Forwarded-Proto`) and send HSTS
    pub require_https: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            require_https: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub messaging: Option<MessagingConfig>,
    pub search: Option<SearchConfig>,
    pub language_model: Option<LanguageModelConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let messaging = match (get("UNIPILE_API_KEY"), get("UNIPILE_DSN")) {
            (Some(api_key), Some(dsn)) => Some(MessagingConfig {
                api_key,
                dsn: normalize_dsn(&dsn),
                send_format: SendFormat::parse(get("UNIPILE_SEND_FORMAT").as_deref()),
            }),
            _ => None,
        };

        let search = match (get("GOOGLE_SEARCH_API_KEY"), get("GOOGLE_SEARCH_ENGINE_ID")) {
            (Some(api_key), Some(engine_id)) => Some(SearchConfig {
                api_key,
                engine_id,
                endpoint: get("GOOGLE_SEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            }),
            _ => None,
        };

        let language_model = get("OPENAI_API_KEY").map(|api_key| LanguageModelConfig {
            api_key,
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            endpoint: get("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
        });

        let defaults = ServerConfig::default();
        let server = ServerConfig {
            port: get("PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: get("OUTREACH_CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            require_https: get("OUTREACH_REQUIRE_HTTPS").is_some_and(|v| v == "true"),
        };

        Self {
            server,
            messaging,
            search,
            language_model,
        }
    }

    /// Names of provider sections that are not configured.
    pub fn missing_sections(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.messaging.is_none() {
            missing.push("messaging");
        }
        if self.search.is_none() {
            missing.push("search");
        }
        if self.language_model.is_none() {
            missing.push("language_model");
        }
        missing
    }
}

/// Accept DSNs with or without scheme and trailing slash.
fn normalize_dsn(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
