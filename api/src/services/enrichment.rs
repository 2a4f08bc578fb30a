//! Profile enrichment: profile, recent activity and message history for one
//! contact, merged into a single bundle.
//!
//! Account resolution and the profile fetch are mandatory and abort the
//! whole operation. Everything after that is best effort: failed lists
//! become empty, and reactions/comments whose parent post cannot be loaded
//! are dropped.

use serde_json::Value;

use outreach_core::activity::{
    Activity, Comment, EnrichedBundle, Message, Reaction, sort_newest_first,
};
use outreach_core::reshape::{
    comment_from_raw, first_string, message_from_raw, parent_post_id, post_from_raw,
    profile_from_raw, reaction_from_raw,
};

use super::accounts::resolve_account_id;
use crate::error::AppError;
use crate::providers::{ActivityKind, MessagingProvider, ProviderError};

pub const ACTIVITY_LIMIT: u32 = 10;
pub const MESSAGE_LIMIT: u32 = 50;

pub async fn enrich(
    provider: &dyn MessagingProvider,
    contact_id: &str,
    account_id: Option<&str>,
) -> Result<EnrichedBundle, AppError> {
    let contact_id = contact_id.trim();
    if contact_id.is_empty() {
        return Err(AppError::missing_field("contact_id"));
    }

    let account_id = resolve_account_id(provider, account_id).await?;
    let account_id = account_id.as_str();

    let raw_profile = provider
        .get_profile(account_id, contact_id)
        .await
        .map_err(|err| AppError::from_provider("Failed to fetch profile", err))?;

    let (posts, reactions, comments) = tokio::join!(
        provider.list_activity(account_id, contact_id, ActivityKind::Posts, ACTIVITY_LIMIT),
        provider.list_activity(account_id, contact_id, ActivityKind::Reactions, ACTIVITY_LIMIT),
        provider.list_activity(account_id, contact_id, ActivityKind::Comments, ACTIVITY_LIMIT),
    );
    let posts = or_empty(posts, ActivityKind::Posts);
    let reactions = or_empty(reactions, ActivityKind::Reactions);
    let comments = or_empty(comments, ActivityKind::Comments);

    let activity = Activity {
        posts: posts.iter().map(post_from_raw).collect(),
        reactions: resolve_reactions(provider, account_id, &reactions).await,
        comments: resolve_comments(provider, account_id, &comments).await,
    };

    let (messages, chat_id) = message_history(provider, account_id, contact_id).await;

    tracing::info!(
        contact_id,
        posts = activity.posts.len(),
        reactions = activity.reactions.len(),
        comments = activity.comments.len(),
        messages = messages.len(),
        has_chat = chat_id.is_some(),
        "Profile enriched"
    );

    Ok(EnrichedBundle {
        profile: profile_from_raw(contact_id, &raw_profile, chat_id.clone()),
        activity,
        messages,
        chat_id,
    })
}

fn or_empty(result: Result<Vec<Value>, ProviderError>, kind: ActivityKind) -> Vec<Value> {
    result.unwrap_or_else(|err| {
        tracing::warn!(kind = kind.path_segment(), error = %err, "Activity list unavailable");
        Vec::new()
    })
}

/// Parent post of a reaction or comment; `None` when it cannot be loaded.
async fn parent_post(
    provider: &dyn MessagingProvider,
    account_id: &str,
    item: &Value,
) -> Option<Value> {
    let post_id = parent_post_id(item)?;
    match provider.get_post(account_id, &post_id).await {
        Ok(post) => Some(post),
        Err(err) => {
            tracing::warn!(post_id = %post_id, error = %err, "Dropping item with unresolvable parent post");
            None
        }
    }
}

async fn resolve_reactions(
    provider: &dyn MessagingProvider,
    account_id: &str,
    raw: &[Value],
) -> Vec<Reaction> {
    let mut reactions = Vec::with_capacity(raw.len());
    for item in raw {
        if let Some(post) = parent_post(provider, account_id, item).await {
            reactions.push(reaction_from_raw(item, &post));
        }
    }
    reactions
}

async fn resolve_comments(
    provider: &dyn MessagingProvider,
    account_id: &str,
    raw: &[Value],
) -> Vec<Comment> {
    let mut comments = Vec::with_capacity(raw.len());
    for item in raw {
        if let Some(post) = parent_post(provider, account_id, item).await {
            comments.push(comment_from_raw(item, &post));
        }
    }
    comments
}

/// Messages across every chat with the contact, newest first, plus the id
/// of the first chat in provider order.
async fn message_history(
    provider: &dyn MessagingProvider,
    account_id: &str,
    contact_id: &str,
) -> (Vec<Message>, Option<String>) {
    let chats = match provider.list_chats_with(account_id, contact_id).await {
        Ok(chats) => chats,
        Err(err) => {
            tracing::warn!(error = %err, "Chat list unavailable");
            return (Vec::new(), None);
        }
    };
    let primary_chat = chats.first().and_then(|chat| first_string(chat, &["id"]));

    let mut messages = Vec::new();
    for chat_id in chats.iter().filter_map(|chat| first_string(chat, &["id"])) {
        match provider
            .list_chat_messages(account_id, &chat_id, MESSAGE_LIMIT)
            .await
        {
            Ok(items) => messages.extend(items.iter().map(|raw| message_from_raw(raw, &chat_id))),
            Err(err) => {
                tracing::warn!(chat_id = %chat_id, error = %err, "Skipping chat with unavailable messages")
            }
        }
    }
    sort_newest_first(&mut messages);

    (messages, primary_chat)
}
