//! Prompt construction for the language model.
//!
//! Everything here is plain string templating over the bundle, the style
//! tables and the search hit. No I/O.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::activity::EnrichedBundle;
use crate::recommendations::{InvalidSetting, Language, MessageSettings, PersonSummary};
use crate::search::SearchHit;
use crate::styles::{
    MAX_FORMALITY, MAX_LENGTH, MIN_FORMALITY, MIN_LENGTH, MessageStyle, formality_style,
    length_style,
};

/// How many items of each activity kind feed the interest analysis.
pub const SUMMARY_ACTIVITY_LIMIT: usize = 5;
/// How many items of each activity kind feed the general messages.
pub const GENERAL_ACTIVITY_LIMIT: usize = 2;
pub const GENERAL_MESSAGE_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const ITALIAN_GUIDELINES: &str = "Additional Italian Language Guidelines:
1. Use proper Italian grammar and punctuation
2. Maintain natural Italian expressions and idioms
3. Adapt formality levels to Italian cultural norms
4. Use appropriate Italian business language when needed
5. Keep regional variations neutral (standard Italian)";

fn bullet_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn numbered_quotes(items: &[&str]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. \"{item}\"", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// System message carrying the tone and length guides for one request.
pub fn system_message(
    tone: &MessageStyle,
    length: &MessageStyle,
    language: Language,
    format: OutputFormat,
) -> String {
    let format_rule = match format {
        OutputFormat::Json => "Always respond with valid JSON",
        OutputFormat::Text => "Write natural, conversational messages",
    };
    let language_rule = match language {
        Language::Ita => "Respond ONLY in Italian, maintaining a natural and native-sounding tone",
        Language::Eng => "Respond in English",
    };
    let italian = match language {
        Language::Ita => ITALIAN_GUIDELINES,
        Language::Eng => "",
    };

    format!(
        "You are a helpful assistant that generates {tone_desc} messages in {language}.

Key Style Guidelines:
Length: {length_desc}
{length_guidelines}

Tone: {tone_desc}
{tone_guidelines}

Critical Rules:
1. NEVER directly reference seeing their posts/activity/profile
2. Instead, allude to topics naturally as if from shared knowledge
3. Make connections feel organic and conversational
4. Avoid phrases like \"I noticed\", \"I saw\", \"your post about\", etc.
5. When including URLs, use {{url}} as a placeholder
6. Format numbers as strings if they appear in JSON
7. {format_rule}
8. {language_rule}

Examples of good style for this level:
{length_examples}

Examples of appropriate tone:
{tone_examples}

{italian}",
        tone_desc = tone.description,
        language = language.name(),
        length_desc = length.description,
        length_guidelines = bullet_list(length.guidelines),
        tone_guidelines = bullet_list(tone.guidelines),
        length_examples = numbered_quotes(length.examples),
        tone_examples = numbered_quotes(tone.examples),
    )
    .trim_end()
    .to_string()
}

/// System message for numeric style levels. Levels without a guide are
/// rejected.
pub fn styled_system_message(
    formality: u8,
    length: u8,
    language: Language,
    format: OutputFormat,
) -> Result<String, InvalidSetting> {
    let tone = formality_style(formality).ok_or(InvalidSetting {
        field: "formality",
        received: formality,
        min: MIN_FORMALITY,
        max: MAX_FORMALITY,
    })?;
    let size = length_style(length).ok_or(InvalidSetting {
        field: "length",
        received: length,
        min: MIN_LENGTH,
        max: MAX_LENGTH,
    })?;
    Ok(system_message(tone, size, language, format))
}

pub fn person_summary_prompt(bundle: &EnrichedBundle) -> String {
    let activity = &bundle.activity;
    format!(
        "Analyze this LinkedIn user's activity and generate insights about their interests, communities, viewpoints, and current needs. Focus on recent patterns and explicit interests.

Profile Info:
{profile}

Recent Posts:
{posts}

Recent Comments:
{comments}

Recent Reactions:
{reactions}

Format the response as a JSON object with these arrays:
{{
  \"interests\": [],
  \"communities\": [],
  \"viewpoints\": [],
  \"currentNeeds\": []
}}",
        profile = pretty(&bundle.profile),
        posts = pretty(head(&activity.posts, SUMMARY_ACTIVITY_LIMIT)),
        comments = pretty(head(&activity.comments, SUMMARY_ACTIVITY_LIMIT)),
        reactions = pretty(head(&activity.reactions, SUMMARY_ACTIVITY_LIMIT)),
    )
}

fn head<T>(items: &[T], limit: usize) -> &[T] {
    &items[..items.len().min(limit)]
}

/// Wraps a drafting brief so the model answers with a JSON array of messages.
pub fn message_sequence_prompt(first_name: &str, brief: &str, count: usize) -> String {
    format!(
        "Generate {count} natural, conversational messages as part of a sequence. Use their first name \"{first_name}\" naturally and casually in the conversation, but don't overuse it. The messages should flow naturally as if sent over time (minutes or hours apart).

Original context: {brief}

Format the response as a JSON array of strings, where each string is a complete message.
Make sure the messages build on each other naturally and maintain context.
Keep the tone casual and friendly - write as if messaging a colleague you know well."
    )
}

const PROFESSIONAL_ARTICLE_GUIDELINES: &str = "- Maintain a polite, professional tone
- Use proper grammar and punctuation
- Avoid colloquialisms and slang
- Reference specific business value or professional insights
- Keep the tone warm but businesslike";

const CASUAL_ARTICLE_GUIDELINES: &str = "- Write like you're texting a friend
- Keep it super casual and natural
- Use conversational language
- Add personal anecdotes or experiences
- Keep it friendly and relatable";

pub fn article_brief(first_name: &str, article: &SearchHit, professional: bool) -> String {
    let (register, guidelines, example) = if professional {
        (
            "professional",
            PROFESSIONAL_ARTICLE_GUIDELINES,
            "\"I came across an insightful analysis of [specific aspect] that aligns with our previous discussion about [topic]. The perspective on [specific point] in {url} offers some valuable considerations.\"",
        )
    } else {
        (
            "casual",
            CASUAL_ARTICLE_GUIDELINES,
            "\"Just read about [specific aspect] - totally changed how I think about [topic]! The part about [specific point] in {url} really got me thinking.\"",
        )
    };
    format!(
        "Write a {register} message to {first_name} sharing an interesting article.

Article Title: {title}
Article Summary: {snippet}

Key guidelines:
{guidelines}
- Include {{url}} as the article link
- Reference something specific from the article
- Keep it focused and concise

Example tone (but write your own):
{example}",
        title = article.title,
        snippet = article.snippet,
    )
}

pub fn podcast_brief(first_name: &str, episode: &SearchHit) -> String {
    format!(
        "Write a message to {first_name} recommending a podcast episode.

Episode Title: {title}
Episode Summary: {snippet}

Key guidelines:
- Write in the same style as the article recommendation
- Use {{url}} as a placeholder for the episode link
- Reference something specific from the episode
- Keep it focused and concise
- Don't directly reference their profile/posts
- Make the connection feel natural and organic

Example:
\"This discussion about [specific topic] reminded me of some challenges we've been tackling. The insights about [specific point] in {{url}} really resonated. Curious to hear your thoughts on their approach.\"",
        title = episode.title,
        snippet = episode.snippet,
    )
}

const PROFESSIONAL_GENERAL_GUIDELINES: &str = "- Maintain a polite, professional tone
- Use proper grammar and punctuation
- Avoid colloquialisms and slang
- Focus on professional insights and business value
- Keep questions focused on professional context
- Reference specific industry trends or developments";

const CASUAL_GENERAL_GUIDELINES: &str = "- Write like you're texting a friend
- Keep it super casual and natural
- Use conversational language
- Add personal anecdotes or experiences
- Keep questions specific and timely
- Make it friendly and relatable";

pub fn general_messages_prompt(
    bundle: &EnrichedBundle,
    summary: &PersonSummary,
    settings: &MessageSettings,
) -> String {
    let activity = &bundle.activity;
    let recent = serde_json::json!({
        "posts": head(&activity.posts, GENERAL_ACTIVITY_LIMIT),
        "comments": head(&activity.comments, GENERAL_ACTIVITY_LIMIT),
        "reactions": head(&activity.reactions, GENERAL_ACTIVITY_LIMIT),
    });
    let (register, guidelines, example) = if settings.is_professional() {
        (
            "professional",
            PROFESSIONAL_GENERAL_GUIDELINES,
            "\"Your insights on optimizing API performance were quite interesting. Have you considered implementing a caching layer to address the rate limiting challenges?\"",
        )
    } else {
        (
            "casual",
            CASUAL_GENERAL_GUIDELINES,
            "\"That productivity hack you mentioned saved me hours yesterday! Using it for my side project now 😄\"",
        )
    };
    let purposes = if settings.purposes.is_empty() {
        String::new()
    } else {
        format!(
            "\nConversation purposes: {}\n",
            settings.purposes.join(", ")
        )
    };

    format!(
        "Write {count} {register} messages to {first_name}. Each message should be a separate conversation starter.

Recent Activity:
{recent}

Their Interests: {interests}
{purposes}
Key guidelines:
{guidelines}
- Reference specific details from their activity
- Each message should be a single, focused thought
- Vary the topics and approaches

Example tones (but write your own):
{example}

Format as JSON array:
[
  {{
    \"text\": \"the message text\",
    \"context\": \"brief context about why this message is relevant\"
  }}
]",
        count = GENERAL_MESSAGE_COUNT,
        first_name = bundle.profile.first_name(),
        recent = pretty(&recent),
        interests = summary.interests.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{Post, Profile};

    fn hit() -> SearchHit {
        SearchHit {
            title: "Scaling Rust services".to_string(),
            link: "https://medium.com/scaling".to_string(),
            snippet: "Lessons from production".to_string(),
        }
    }

    #[test]
    fn system_message_embeds_style_guides() {
        let tone = formality_style(4).unwrap();
        let length = length_style(1).unwrap();
        let message = system_message(tone, length, Language::Eng, OutputFormat::Json);
        assert!(message.starts_with("You are a helpful assistant that generates Formal business messages in English."));
        assert!(message.contains("- Keep it under 2 sentences"));
        assert!(message.contains("- Maintain professional distance"));
        assert!(message.contains("use {url} as a placeholder"));
        assert!(message.contains("Always respond with valid JSON"));
        assert!(!message.contains("Italian Language Guidelines"));
    }

    #[test]
    fn italian_system_message_adds_language_rules() {
        let tone = formality_style(2).unwrap();
        let length = length_style(2).unwrap();
        let message = system_message(tone, length, Language::Ita, OutputFormat::Text);
        assert!(message.contains("messages in Italian"));
        assert!(message.contains("Respond ONLY in Italian"));
        assert!(message.contains("Keep regional variations neutral"));
    }

    #[test]
    fn styled_system_message_rejects_unknown_levels() {
        assert!(styled_system_message(4, 4, Language::Eng, OutputFormat::Text).is_ok());
        let err = styled_system_message(0, 2, Language::Eng, OutputFormat::Text).unwrap_err();
        assert_eq!(err.field, "formality");
        let err = styled_system_message(2, 5, Language::Eng, OutputFormat::Text).unwrap_err();
        assert_eq!(err.field, "length");
        assert_eq!(err.max, MAX_LENGTH);
    }

    #[test]
    fn summary_prompt_caps_activity() {
        let mut bundle = EnrichedBundle::default();
        bundle.activity.posts = (0..8)
            .map(|i| Post {
                text: format!("post-{i}"),
                ..Default::default()
            })
            .collect();
        let prompt = person_summary_prompt(&bundle);
        assert!(prompt.contains("post-4"));
        assert!(!prompt.contains("post-5"));
        assert!(prompt.contains("\"currentNeeds\": []"));
    }

    #[test]
    fn article_brief_switches_register() {
        let professional = article_brief("Ada", &hit(), true);
        assert!(professional.starts_with("Write a professional message to Ada"));
        assert!(professional.contains("Article Title: Scaling Rust services"));
        let casual = article_brief("Ada", &hit(), false);
        assert!(casual.contains("Write like you're texting a friend"));
        assert!(casual.contains("Include {url} as the article link"));
    }

    #[test]
    fn general_prompt_mentions_interests_and_purposes() {
        let bundle = EnrichedBundle {
            profile: Profile {
                name: "Grace Hopper".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let summary = PersonSummary {
            interests: vec!["compilers".to_string(), "navy".to_string()],
            ..Default::default()
        };
        let settings = MessageSettings {
            formality: 1,
            purposes: vec!["reconnect".to_string()],
            ..Default::default()
        };
        let prompt = general_messages_prompt(&bundle, &summary, &settings);
        assert!(prompt.starts_with("Write 6 casual messages to Grace."));
        assert!(prompt.contains("Their Interests: compilers, navy"));
        assert!(prompt.contains("Conversation purposes: reconnect"));
    }

    #[test]
    fn sequence_prompt_names_contact() {
        let prompt = message_sequence_prompt("there", "brief", 1);
        assert!(prompt.starts_with("Generate 1 natural"));
        assert!(prompt.contains("\"there\""));
        assert!(prompt.contains("Original context: brief"));
    }
}
