use clap::Subcommand;
use serde_json::{Value, json};

use outreach_core::activity::EnrichedBundle;

use crate::session::Session;
use crate::util::{exit_error, print_json, raw_api_request, report, report_request_error};

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Fetch profile, activity and message history for a contact
    Enrich {
        /// Contact (provider user) id from `contacts search`
        #[arg(long)]
        contact_id: String,
        /// Account to fetch through (defaults to the selected account)
        #[arg(long)]
        account_id: Option<String>,
    },
    /// Print the cached contact's conversation, oldest message first
    History,
}

pub async fn run(api_url: &str, command: ProfileCommands) -> i32 {
    match command {
        ProfileCommands::Enrich {
            contact_id,
            account_id,
        } => enrich(api_url, &contact_id, account_id).await,
        ProfileCommands::History => {
            let Some(bundle) = Session::load().bundle else {
                exit_error(
                    "No enriched bundle cached",
                    Some("Run `outreach profile enrich --contact-id <id>` first."),
                );
            };
            print_json(&history(&bundle));
            0
        }
    }
}

/// Conversation view for reading top to bottom.
pub fn history(bundle: &EnrichedBundle) -> Value {
    let messages: Vec<Value> = bundle
        .chronological_messages()
        .into_iter()
        .map(|m| {
            json!({
                "from": if m.is_from_account_owner { "me" } else { m.sender_id.as_str() },
                "timestamp": m.timestamp,
                "text": m.text,
            })
        })
        .collect();
    json!({
        "contact": bundle.profile.name,
        "chatId": bundle.chat_id,
        "messages": messages,
    })
}

async fn enrich(api_url: &str, contact_id: &str, account_id: Option<String>) -> i32 {
    let mut session = Session::load();
    let mut body = json!({ "contact_id": contact_id });
    if let Some(account_id) = account_id.or_else(|| session.account_id.clone()) {
        body["account_id"] = Value::String(account_id);
    }

    let (status, body) = match raw_api_request(
        api_url,
        reqwest::Method::POST,
        "/v1/profiles/enrich",
        Some(&body),
        &[],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => return report_request_error(err),
    };

    if (200..300).contains(&status) {
        match serde_json::from_value::<EnrichedBundle>(body.clone()) {
            Ok(bundle) => {
                session.set_bundle(bundle);
                if let Err(e) = session.save() {
                    exit_error(&e, None);
                }
            }
            Err(e) => tracing::warn!(error = %e, "Enriched bundle not cached"),
        }
    }
    report(status, &body)
}
