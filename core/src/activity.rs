//! Profile, activity and message-history types that make up an enrichment bundle.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Connection distance between the account owner and a contact.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum NetworkDegree {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd+")]
    ThirdPlus,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl NetworkDegree {
    /// Map a provider distance code to a degree. Total over all inputs:
    /// anything unrecognised is `Unknown`.
    pub fn from_distance(code: &str) -> Self {
        match code {
            "DISTANCE_1" | "FIRST_DEGREE" => Self::First,
            "DISTANCE_2" | "SECOND_DEGREE" => Self::Second,
            "DISTANCE_3" | "DISTANCE_3_PLUS" | "THIRD_DEGREE" => Self::ThirdPlus,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::First => "1st",
            Self::Second => "2nd",
            Self::ThirdPlus => "3rd+",
            Self::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub profile_picture_url: String,
    #[serde(default)]
    pub degree: NetworkDegree,
    /// Primary chat with the contact, if any chat exists
    #[serde(rename = "chatId", default)]
    pub chat_id: Option<String>,
}

impl Profile {
    /// First word of the display name, "there" when the name is unknown.
    pub fn first_name(&self) -> &str {
        self.name
            .split_whitespace()
            .next()
            .unwrap_or("there")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Post {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub reaction_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
}

/// A reaction by the contact, resolved to the post it was left on.
/// Counts belong to the parent post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Reaction {
    #[serde(rename = "type", default)]
    pub reaction_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub post_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    #[serde(default)]
    pub reaction_count: u64,
    #[serde(default)]
    pub comment_count: u64,
}

/// A comment by the contact, resolved to the post it was left on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Comment {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub reaction_count: u64,
    #[serde(default)]
    pub post_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_reaction_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_comment_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Message {
    #[serde(default)]
    pub sender_id: String,
    #[serde(rename = "is_sender", default)]
    pub is_from_account_owner: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub chat_id: String,
}

impl Message {
    fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

/// Newest first. Unparseable timestamps sort after every dated message;
/// ties keep their fetch order.
pub fn sort_newest_first(messages: &mut [Message]) {
    messages.sort_by(|a, b| match (a.parsed_timestamp(), b.parsed_timestamp()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Activity {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Merged profile, activity and message history for one contact.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct EnrichedBundle {
    pub profile: Profile,
    #[serde(default)]
    pub activity: Activity,
    /// Newest first
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(rename = "chatId", default)]
    pub chat_id: Option<String>,
}

impl EnrichedBundle {
    /// Message history oldest first, for display. Undated messages go last
    /// and ties keep fetch order.
    pub fn chronological_messages(&self) -> Vec<&Message> {
        let mut messages: Vec<&Message> = self.messages.iter().collect();
        messages.sort_by(|a, b| match (a.parsed_timestamp(), b.parsed_timestamp()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        messages
    }
}
