//! Recommendation composer.
//!
//! A person summary is drafted first; the article, podcast and general
//! message steps then run concurrently and each degrades on its own. Only
//! invalid settings fail the composition.

use chrono::NaiveDate;

use outreach_core::activity::EnrichedBundle;
use outreach_core::prompts::{
    OutputFormat, article_brief, general_messages_prompt, message_sequence_prompt,
    person_summary_prompt, podcast_brief, styled_system_message,
};
use outreach_core::recommendations::{
    GeneralMessage, LinkRecommendation, MessageSettings, PersonSummary, RecommendationOutput,
    default_article, default_podcast, ensure_url_placeholder, parse_general_messages,
    parse_message_drafts, parse_person_summary,
};
use outreach_core::search::{
    ARTICLE_SITES, PODCAST_SITES, RECENT_DATE_RESTRICT, SearchHit, first_hit,
    recommendation_query,
};

use crate::error::AppError;
use crate::providers::{CompletionRequest, LanguageModel, WebSearch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Article,
    Podcast,
}

impl LinkKind {
    fn label(self) -> &'static str {
        match self {
            LinkKind::Article => "article",
            LinkKind::Podcast => "podcast",
        }
    }

    fn sites(self) -> &'static [&'static str] {
        match self {
            LinkKind::Article => ARTICLE_SITES,
            LinkKind::Podcast => PODCAST_SITES,
        }
    }

    fn brief(self, first_name: &str, hit: &SearchHit, settings: &MessageSettings) -> String {
        match self {
            LinkKind::Article => article_brief(first_name, hit, settings.is_professional()),
            LinkKind::Podcast => podcast_brief(first_name, hit),
        }
    }

    fn fallback(self, settings: &MessageSettings) -> LinkRecommendation {
        match self {
            LinkKind::Article => default_article(settings),
            LinkKind::Podcast => default_podcast(settings),
        }
    }
}

pub struct Composer<'a> {
    model: &'a dyn LanguageModel,
    search: &'a dyn WebSearch,
    today: NaiveDate,
}

impl<'a> Composer<'a> {
    /// `today` anchors the six-month search window.
    pub fn new(model: &'a dyn LanguageModel, search: &'a dyn WebSearch, today: NaiveDate) -> Self {
        Self {
            model,
            search,
            today,
        }
    }

    pub async fn compose(
        &self,
        bundle: &EnrichedBundle,
        settings: &MessageSettings,
    ) -> Result<RecommendationOutput, AppError> {
        settings.validate()?;
        let system = styled_system_message(
            settings.formality,
            settings.length,
            settings.language,
            OutputFormat::Json,
        )?;

        let person_summary = self.summarize(bundle, &system).await;

        let (article, podcast, general_messages) = tokio::join!(
            self.link_recommendation(LinkKind::Article, bundle, &person_summary, settings, &system),
            self.link_recommendation(LinkKind::Podcast, bundle, &person_summary, settings, &system),
            self.general_messages(bundle, &person_summary, settings, &system),
        );

        tracing::info!(
            contact_id = %bundle.profile.id,
            interests = person_summary.interests.len(),
            general_messages = general_messages.len(),
            "Recommendations composed"
        );

        Ok(RecommendationOutput {
            person_summary,
            article_recommendation: article,
            podcast_recommendation: podcast,
            general_messages,
        })
    }

    async fn summarize(&self, bundle: &EnrichedBundle, system: &str) -> PersonSummary {
        let request = CompletionRequest::new(
            system.to_string(),
            person_summary_prompt(bundle),
            OutputFormat::Json,
        );
        let summary = match self.model.complete_json(&request).await {
            Ok(value) => parse_person_summary(value),
            Err(err) => {
                tracing::warn!(error = %err, "Person summary generation failed");
                return PersonSummary::default();
            }
        };
        summary.unwrap_or_else(|| {
            tracing::warn!("Person summary reply has an unexpected shape");
            PersonSummary::default()
        })
    }

    async fn link_recommendation(
        &self,
        kind: LinkKind,
        bundle: &EnrichedBundle,
        summary: &PersonSummary,
        settings: &MessageSettings,
        system: &str,
    ) -> LinkRecommendation {
        match self.draft_link(kind, bundle, summary, settings, system).await {
            Some(recommendation) => recommendation,
            None => {
                tracing::warn!(kind = kind.label(), "Using default recommendation");
                kind.fallback(settings)
            }
        }
    }

    async fn draft_link(
        &self,
        kind: LinkKind,
        bundle: &EnrichedBundle,
        summary: &PersonSummary,
        settings: &MessageSettings,
        system: &str,
    ) -> Option<LinkRecommendation> {
        let query = recommendation_query(kind.sites(), &summary.interests, self.today);
        let results = self
            .search
            .search(&query, Some(RECENT_DATE_RESTRICT))
            .await
            .inspect_err(|err| tracing::warn!(kind = kind.label(), error = %err, "Search failed"))
            .ok()?;
        let hit = first_hit(&results)?;

        let first_name = bundle.profile.first_name();
        let brief = kind.brief(first_name, &hit, settings);
        let request = CompletionRequest::new(
            system.to_string(),
            message_sequence_prompt(first_name, &brief, 1),
            OutputFormat::Json,
        );
        let reply = self
            .model
            .complete_json(&request)
            .await
            .inspect_err(|err| {
                tracing::warn!(kind = kind.label(), error = %err, "Draft generation failed")
            })
            .ok()?;
        let draft = parse_message_drafts(reply)?.into_iter().next()?;

        Some(LinkRecommendation {
            title: hit.title,
            url: hit.link,
            summary: hit.snippet,
            message: ensure_url_placeholder(&draft),
        })
    }

    async fn general_messages(
        &self,
        bundle: &EnrichedBundle,
        summary: &PersonSummary,
        settings: &MessageSettings,
        system: &str,
    ) -> Vec<GeneralMessage> {
        let request = CompletionRequest::new(
            system.to_string(),
            general_messages_prompt(bundle, summary, settings),
            OutputFormat::Json,
        );
        let messages = match self.model.complete_json(&request).await {
            Ok(value) => parse_general_messages(value),
            Err(err) => {
                tracing::warn!(error = %err, "General message generation failed");
                return Vec::new();
            }
        };
        messages.unwrap_or_else(|| {
            tracing::warn!("General messages reply has an unexpected shape");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::fake::{FakeModel, FakeSearch};
    use outreach_core::activity::Profile;
    use outreach_core::recommendations::{Language, URL_PLACEHOLDER};
    use serde_json::json;

    const SUMMARY: &str = "Analyze this LinkedIn user's activity";
    const ARTICLE_DRAFT: &str = "Article Title:";
    const PODCAST_DRAFT: &str = "Episode Title:";
    const GENERAL: &str = "separate conversation starter";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn bundle() -> EnrichedBundle {
        EnrichedBundle {
            profile: Profile {
                id: "user123".to_string(),
                name: "Ada Lovelace".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn search_hits() -> FakeSearch {
        FakeSearch::new()
            .answering(
                "medium.com",
                json!({"items": [{"title": "Rust at scale", "link": "https://medium.com/rust", "snippet": "notes"}]}),
            )
            .answering(
                "anchor.fm",
                json!({"items": [{"title": "Ep 12", "link": "https://anchor.fm/ep12", "snippet": "talk"}]}),
            )
    }

    #[tokio::test]
    async fn missing_placeholder_is_backfilled() {
        let model = FakeModel::new()
            .answering(SUMMARY, r#"{"interests": ["rust"]}"#)
            .answering(ARTICLE_DRAFT, r#"["You'd like this one"]"#)
            .answering(PODCAST_DRAFT, r#"```json
["Give it a listen: {url}"]
```"#)
            .answering(GENERAL, r#"[{"text": "Hi Ada", "context": "intro"}]"#);
        let search = search_hits();
        let output = Composer::new(&model, &search, today())
            .compose(&bundle(), &MessageSettings::default())
            .await
            .unwrap();

        let article = &output.article_recommendation;
        assert_eq!(article.url, "https://medium.com/rust");
        assert_eq!(article.message, "You'd like this one\n\n{url}");
        assert_eq!(article.rendered_message(), "You'd like this one\n\nhttps://medium.com/rust");
        assert_eq!(output.podcast_recommendation.message, "Give it a listen: {url}");
        assert_eq!(output.general_messages.len(), 1);
        assert_eq!(output.person_summary.interests, vec!["rust"]);
    }

    #[tokio::test]
    async fn summary_failure_still_returns_full_output() {
        let model = FakeModel::new()
            .failing(SUMMARY)
            .answering(ARTICLE_DRAFT, r#"["Read {url}"]"#)
            .answering(PODCAST_DRAFT, r#""Listen {url}""#)
            .answering(GENERAL, r#"[{"text": "Hey", "context": "opener"}]"#);
        let search = search_hits();
        let output = Composer::new(&model, &search, today())
            .compose(&bundle(), &MessageSettings::default())
            .await
            .unwrap();

        assert_eq!(output.person_summary, PersonSummary::default());
        assert_eq!(output.article_recommendation.title, "Rust at scale");
        assert_eq!(output.podcast_recommendation.title, "Ep 12");
        assert_eq!(output.general_messages[0].text, "Hey");
    }

    #[tokio::test]
    async fn failures_fall_back_to_defaults_per_field() {
        let model = FakeModel::new().answering(SUMMARY, "not json at all");
        let search = FakeSearch::new().failing("medium.com", 500);
        let settings = MessageSettings {
            formality: 4,
            ..Default::default()
        };
        let output = Composer::new(&model, &search, today())
            .compose(&bundle(), &settings)
            .await
            .unwrap();

        assert_eq!(output.article_recommendation, default_article(&settings));
        assert_eq!(output.podcast_recommendation, default_podcast(&settings));
        assert!(output.general_messages.is_empty());
        for rec in [&output.article_recommendation, &output.podcast_recommendation] {
            assert!(rec.message.contains(URL_PLACEHOLDER));
        }
    }

    #[tokio::test]
    async fn malformed_general_messages_fail_closed() {
        let model = FakeModel::new().answering(GENERAL, r#"[{"text": "no context"}]"#);
        let search = FakeSearch::new();
        let output = Composer::new(&model, &search, today())
            .compose(&bundle(), &MessageSettings::default())
            .await
            .unwrap();
        assert!(output.general_messages.is_empty());
    }

    #[tokio::test]
    async fn search_queries_use_interests_and_recent_window() {
        let model = FakeModel::new().answering(SUMMARY, r#"{"interests": ["rust", "wasm"]}"#);
        let search = FakeSearch::new();
        Composer::new(&model, &search, today())
            .compose(&bundle(), &MessageSettings::default())
            .await
            .unwrap();

        let queries = search.queries();
        assert_eq!(queries.len(), 2);
        for (query, restrict) in &queries {
            assert!(query.contains("(rust OR wasm)"), "{query}");
            assert!(query.ends_with("after:2024-01-03"), "{query}");
            assert_eq!(restrict.as_deref(), Some("m6"));
        }
        assert!(queries.iter().any(|(q, _)| q.starts_with("(site:substack.com")));
        assert!(queries.iter().any(|(q, _)| q.starts_with("(site:podcasts.apple.com")));
    }

    #[tokio::test]
    async fn settings_shape_every_model_call() {
        let model = FakeModel::new();
        let search = search_hits();
        let settings = MessageSettings {
            formality: 1,
            length: 1,
            purposes: vec!["hiring".to_string()],
            language: Language::Ita,
        };
        Composer::new(&model, &search, today())
            .compose(&bundle(), &settings)
            .await
            .unwrap();

        let requests = model.requests();
        assert!(!requests.is_empty());
        for request in &requests {
            assert!(request.system.contains("Respond ONLY in Italian"));
            assert!(request.system.contains("Super casual"));
            assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        }
        assert!(
            requests
                .iter()
                .any(|r| r.user.contains("Conversation purposes: hiring"))
        );
        assert!(requests.iter().any(|r| r.user.contains("\"Ada\"")));
    }

    #[tokio::test]
    async fn invalid_settings_fail_before_any_call() {
        let model = FakeModel::new();
        let search = FakeSearch::new();
        let settings = MessageSettings {
            length: 4,
            ..Default::default()
        };
        let err = Composer::new(&model, &search, today())
            .compose(&bundle(), &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(model.requests().is_empty());
        assert!(search.queries().is_empty());
    }
}
