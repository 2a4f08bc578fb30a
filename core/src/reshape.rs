//! Reshaping of raw provider payloads into display types.
//!
//! The messaging provider is not consistent about field names across API
//! versions. Every display field that has more than one possible source is
//! read through an ordered fallback chain defined here, so call sites never
//! dig through raw JSON themselves.

use serde_json::Value;

use crate::activity::{Comment, Message, NetworkDegree, Post, Profile, Reaction};

pub const HEADLINE_FIELDS: &[&str] = &["headline", "occupation"];
pub const PICTURE_FIELDS: &[&str] = &["profile_picture_url", "picture_url"];
pub const DISTANCE_FIELDS: &[&str] = &["network_distance"];
pub const REACTION_COUNT_FIELDS: &[&str] = &["reaction_counter", "reaction_count"];
pub const COMMENT_COUNT_FIELDS: &[&str] = &["comment_counter", "comment_count"];

/// First non-empty string among `fields`.
pub fn first_string(raw: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| {
        raw.get(*field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// First count among `fields`; accepts JSON numbers and numeric strings.
pub fn first_count(raw: &Value, fields: &[&str]) -> Option<u64> {
    fields.iter().find_map(|field| match raw.get(*field)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// "first last" when both parts exist, otherwise the single `name` field.
pub fn display_name(raw: &Value) -> String {
    match (
        first_string(raw, &["first_name"]),
        first_string(raw, &["last_name"]),
    ) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        _ => first_string(raw, &["name"]).unwrap_or_default(),
    }
}

pub fn network_degree(raw: &Value) -> NetworkDegree {
    first_string(raw, DISTANCE_FIELDS)
        .map(|code| NetworkDegree::from_distance(&code))
        .unwrap_or_default()
}

pub fn profile_from_raw(contact_id: &str, raw: &Value, chat_id: Option<String>) -> Profile {
    Profile {
        id: contact_id.to_string(),
        name: display_name(raw),
        headline: first_string(raw, HEADLINE_FIELDS).unwrap_or_default(),
        profile_picture_url: first_string(raw, PICTURE_FIELDS).unwrap_or_default(),
        degree: network_degree(raw),
        chat_id,
    }
}

pub fn post_from_raw(raw: &Value) -> Post {
    Post {
        text: first_string(raw, &["text"]).unwrap_or_default(),
        date: first_string(raw, &["date"]),
        reaction_count: first_count(raw, REACTION_COUNT_FIELDS).unwrap_or(0),
        comment_count: first_count(raw, COMMENT_COUNT_FIELDS).unwrap_or(0),
        share_url: first_string(raw, &["share_url"]),
    }
}

/// Id of the post a reaction or comment was left on.
pub fn parent_post_id(raw: &Value) -> Option<String> {
    first_string(raw, &["post_id"])
}

pub fn reaction_from_raw(raw: &Value, parent: &Value) -> Reaction {
    let post = post_from_raw(parent);
    Reaction {
        reaction_type: first_string(raw, &["value", "type"]).unwrap_or_default(),
        date: first_string(raw, &["date"]),
        post_text: post.text,
        share_url: post.share_url,
        reaction_count: post.reaction_count,
        comment_count: post.comment_count,
    }
}

pub fn comment_from_raw(raw: &Value, parent: &Value) -> Comment {
    let post = post_from_raw(parent);
    Comment {
        text: first_string(raw, &["text"]).unwrap_or_default(),
        date: first_string(raw, &["date"]),
        reaction_count: first_count(raw, REACTION_COUNT_FIELDS).unwrap_or(0),
        post_text: post.text,
        share_url: post.share_url,
        post_reaction_count: first_count(parent, REACTION_COUNT_FIELDS),
        post_comment_count: first_count(parent, COMMENT_COUNT_FIELDS),
    }
}

/// The provider flags outgoing messages with `is_sender`, as 1/0 or a bool.
fn is_sender(raw: &Value) -> bool {
    match raw.get("is_sender") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

pub fn message_from_raw(raw: &Value, chat_id: &str) -> Message {
    Message {
        sender_id: first_string(raw, &["sender_id"]).unwrap_or_default(),
        is_from_account_owner: is_sender(raw),
        text: first_string(raw, &["text"]).unwrap_or_default(),
        timestamp: first_string(raw, &["timestamp"]).unwrap_or_default(),
        chat_id: chat_id.to_string(),
    }
}

/// `items` of a provider list page; missing or malformed means empty.
pub fn list_items(page: &Value) -> Vec<Value> {
    page.get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Attach a `degree` label to every people-search item, keeping every other
/// page field untouched.
pub fn label_search_page(mut page: Value) -> Value {
    if !page.is_object() {
        page = Value::Object(Default::default());
    }
    let items: Vec<Value> = list_items(&page)
        .into_iter()
        .map(|mut item| {
            let degree = network_degree(&item);
            if let Some(fields) = item.as_object_mut() {
                fields.insert("degree".to_string(), Value::from(degree.label()));
            }
            item
        })
        .collect();
    page["items"] = Value::Array(items);
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_name_prefers_first_and_last() {
        assert_eq!(
            display_name(&json!({"first_name": "Ada", "last_name": "Lovelace", "name": "A. L."})),
            "Ada Lovelace"
        );
        assert_eq!(
            display_name(&json!({"first_name": "Ada", "name": "Ada L."})),
            "Ada L."
        );
        assert_eq!(display_name(&json!({})), "");
    }

    #[test]
    fn headline_and_picture_follow_fallback_chain() {
        let legacy = json!({"occupation": "Engineer", "picture_url": "https://img/legacy"});
        let profile = profile_from_raw("u1", &legacy, None);
        assert_eq!(profile.headline, "Engineer");
        assert_eq!(profile.profile_picture_url, "https://img/legacy");

        let current = json!({
            "headline": "CTO",
            "occupation": "Engineer",
            "profile_picture_url": "https://img/new",
            "picture_url": "https://img/legacy",
            "network_distance": "SECOND_DEGREE"
        });
        let profile = profile_from_raw("u1", &current, Some("c1".to_string()));
        assert_eq!(profile.headline, "CTO");
        assert_eq!(profile.profile_picture_url, "https://img/new");
        assert_eq!(profile.degree, NetworkDegree::Second);
        assert_eq!(profile.chat_id.as_deref(), Some("c1"));
    }

    #[test]
    fn empty_strings_do_not_stop_the_chain() {
        let raw = json!({"headline": "  ", "occupation": "Founder"});
        assert_eq!(first_string(&raw, HEADLINE_FIELDS).as_deref(), Some("Founder"));
    }

    #[test]
    fn counts_accept_numbers_and_strings() {
        assert_eq!(first_count(&json!({"reaction_counter": 12}), REACTION_COUNT_FIELDS), Some(12));
        assert_eq!(first_count(&json!({"reaction_count": "7"}), REACTION_COUNT_FIELDS), Some(7));
        assert_eq!(first_count(&json!({"reaction_counter": null}), REACTION_COUNT_FIELDS), None);
    }

    #[test]
    fn reaction_takes_counts_from_parent_post() {
        let reaction = reaction_from_raw(
            &json!({"value": "LIKE", "date": "2024-01-02", "post_id": "p1"}),
            &json!({"text": "Parent", "share_url": "https://post", "reaction_counter": 40, "comment_counter": 3}),
        );
        assert_eq!(reaction.reaction_type, "LIKE");
        assert_eq!(reaction.post_text, "Parent");
        assert_eq!(reaction.reaction_count, 40);
        assert_eq!(reaction.comment_count, 3);
    }

    #[test]
    fn comment_keeps_own_and_parent_counts() {
        let comment = comment_from_raw(
            &json!({"text": "Great point", "reaction_counter": 2}),
            &json!({"text": "Parent", "reaction_counter": 40, "comment_counter": 3}),
        );
        assert_eq!(comment.reaction_count, 2);
        assert_eq!(comment.post_reaction_count, Some(40));
        assert_eq!(comment.post_comment_count, Some(3));
    }

    #[test]
    fn message_sender_flag_accepts_int_and_bool() {
        assert!(message_from_raw(&json!({"is_sender": 1}), "c1").is_from_account_owner);
        assert!(message_from_raw(&json!({"is_sender": true}), "c1").is_from_account_owner);
        assert!(!message_from_raw(&json!({"is_sender": 0}), "c1").is_from_account_owner);
        assert_eq!(message_from_raw(&json!({}), "c9").chat_id, "c9");
    }

    #[test]
    fn search_page_gets_degree_labels_and_keeps_cursor() {
        let page = label_search_page(json!({
            "object": "LinkedinSearch",
            "cursor": "abc",
            "items": [
                {"id": "1", "network_distance": "DISTANCE_1"},
                {"id": "2", "network_distance": "DISTANCE_3_PLUS"},
                {"id": "3"}
            ]
        }));
        assert_eq!(page["cursor"], "abc");
        assert_eq!(page["items"][0]["degree"], "1st");
        assert_eq!(page["items"][1]["degree"], "3rd+");
        assert_eq!(page["items"][2]["degree"], "");
    }

    #[test]
    fn search_page_without_items_becomes_empty_list() {
        let page = label_search_page(json!({"object": "LinkedinSearch"}));
        assert_eq!(page["items"], json!([]));
    }
}
