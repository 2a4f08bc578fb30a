use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::styles::{MAX_FORMALITY, MIN_FORMALITY, MIN_LENGTH};

/// Token embedded in drafted messages, replaced with the real link at render time.
pub const URL_PLACEHOLDER: &str = "{url}";

/// Highest length level accepted for recommendation settings.
pub const MAX_RECOMMENDATION_LENGTH: u8 = 3;

/// Formality level from which drafts use the professional register.
const PROFESSIONAL_FROM: u8 = 3;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    #[default]
    Eng,
    Ita,
}

impl Language {
    pub fn name(self) -> &'static str {
        match self {
            Self::Eng => "English",
            Self::Ita => "Italian",
        }
    }
}

/// Style dials chosen by the user before drafting.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MessageSettings {
    /// 1 (super casual) to 4 (formal business)
    #[serde(alias = "professional")]
    pub formality: u8,
    /// 1 (ultra-brief) to 3 (balanced)
    pub length: u8,
    #[serde(default)]
    pub purposes: Vec<String>,
    #[serde(default)]
    pub language: Language,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            formality: 2,
            length: 2,
            purposes: Vec::new(),
            language: Language::Eng,
        }
    }
}

/// A settings field outside its allowed range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSetting {
    pub field: &'static str,
    pub received: u8,
    pub min: u8,
    pub max: u8,
}

impl fmt::Display for InvalidSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} must be between {} and {}, got {}",
            self.field, self.min, self.max, self.received
        )
    }
}

pub fn check_level(field: &'static str, received: u8, min: u8, max: u8) -> Result<u8, InvalidSetting> {
    if (min..=max).contains(&received) {
        Ok(received)
    } else {
        Err(InvalidSetting {
            field,
            received,
            min,
            max,
        })
    }
}

impl MessageSettings {
    pub fn validate(&self) -> Result<(), InvalidSetting> {
        check_level("formality", self.formality, MIN_FORMALITY, MAX_FORMALITY)?;
        check_level("length", self.length, MIN_LENGTH, MAX_RECOMMENDATION_LENGTH)?;
        Ok(())
    }

    pub fn is_professional(&self) -> bool {
        self.formality >= PROFESSIONAL_FROM
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub communities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub viewpoints: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub current_needs: Vec<String>,
}

/// Models sometimes answer `null` for a category they found nothing for.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// An article or podcast episode with a drafted message pointing at it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LinkRecommendation {
    pub title: String,
    pub url: String,
    pub summary: String,
    /// Draft containing the `{url}` placeholder
    pub message: String,
}

impl LinkRecommendation {
    /// Message with the placeholder replaced by the real link.
    pub fn rendered_message(&self) -> String {
        render_message(&self.message, &self.url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GeneralMessage {
    pub text: String,
    pub context: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutput {
    pub person_summary: PersonSummary,
    pub article_recommendation: LinkRecommendation,
    pub podcast_recommendation: LinkRecommendation,
    pub general_messages: Vec<GeneralMessage>,
}

/// Append the placeholder on its own line when the draft forgot it.
pub fn ensure_url_placeholder(message: &str) -> String {
    if message.contains(URL_PLACEHOLDER) {
        message.to_string()
    } else {
        format!("{message}\n\n{URL_PLACEHOLDER}")
    }
}

pub fn render_message(message: &str, url: &str) -> String {
    message.replace(URL_PLACEHOLDER, url)
}

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```(?:json|JSON)?\s*(.*?)\s*```\s*$").expect("valid fence pattern")
});

/// Parse a model completion as JSON, tolerating a surrounding markdown fence.
pub fn extract_json(text: &str) -> Option<Value> {
    let body = FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text.trim(), |m| m.as_str());
    serde_json::from_str(body).ok()
}

/// Summary object with string arrays; anything else is rejected.
pub fn parse_person_summary(value: Value) -> Option<PersonSummary> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Array of `{text, context}` objects. A lone object counts as a
/// one-element array. One malformed entry rejects the whole reply.
pub fn parse_general_messages(value: Value) -> Option<Vec<GeneralMessage>> {
    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => return None,
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value::<GeneralMessage>(item).ok())
        .collect()
}

/// Array of message strings, or a single string. Blank entries are skipped.
pub fn parse_message_drafts(value: Value) -> Option<Vec<String>> {
    let drafts = match value {
        Value::String(text) => vec![text],
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?,
        _ => return None,
    };
    let drafts: Vec<String> = drafts
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();
    (!drafts.is_empty()).then_some(drafts)
}

pub fn default_article(settings: &MessageSettings) -> LinkRecommendation {
    let message = match (settings.language, settings.is_professional()) {
        (Language::Eng, true) => "I thought you might find this analysis of emerging technology trends relevant to your work. The insights on AI workflows in {url} are particularly noteworthy.",
        (Language::Eng, false) => "Been reading about emerging tech - some really cool stuff about AI workflows! Check it out: {url}",
        (Language::Ita, true) => "Ho pensato che questa analisi sulle tendenze tecnologiche emergenti potesse essere rilevante per il tuo lavoro. Le riflessioni sui flussi di lavoro con l'IA in {url} sono particolarmente interessanti.",
        (Language::Ita, false) => "Sto leggendo un po' di cose sulle nuove tecnologie, roba davvero interessante sui flussi di lavoro con l'IA! Dai un'occhiata: {url}",
    };
    LinkRecommendation {
        title: "Default Article".to_string(),
        url: "https://example.com".to_string(),
        summary: "Article about technology trends".to_string(),
        message: message.to_string(),
    }
}

pub fn default_podcast(settings: &MessageSettings) -> LinkRecommendation {
    let message = match (settings.language, settings.is_professional()) {
        (Language::Eng, true) => "I came across a thoughtful discussion on emerging technology trends. The segment on AI implementation strategies seemed particularly relevant. {url}",
        (Language::Eng, false) => "Found this great discussion about emerging tech trends. The part about AI implementation strategies is particularly relevant. {url}",
        (Language::Ita, true) => "Ho ascoltato una discussione approfondita sulle tendenze tecnologiche emergenti. La parte sulle strategie di adozione dell'IA mi è sembrata particolarmente pertinente. {url}",
        (Language::Ita, false) => "Ho trovato una bella chiacchierata sulle nuove tendenze tech. La parte sulle strategie per l'IA è proprio azzeccata. {url}",
    };
    LinkRecommendation {
        title: "Default Podcast".to_string(),
        url: "https://example.com/podcast".to_string(),
        summary: "Podcast about industry insights".to_string(),
        message: message.to_string(),
    }
}
