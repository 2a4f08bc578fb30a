use std::str::FromStr;

use clap::Subcommand;
use serde_json::{Value, json};

use outreach_core::recommendations::RecommendationOutput;

use crate::session::Session;
use crate::util::{api_request, exit_error, print_json};

/// Which drafted message to use, as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Article,
    Podcast,
    /// 1-based index into the general messages
    General(usize),
}

impl FromStr for Pick {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "podcast" => Ok(Self::Podcast),
            other => {
                let index = other
                    .strip_prefix("general:")
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        format!("Invalid pick '{s}': expected article, podcast or general:<n>")
                    })?;
                Ok(Self::General(index))
            }
        }
    }
}

/// Final text for a pick, with `{url}` replaced by the recommended link.
pub fn render(pick: Pick, output: &RecommendationOutput) -> Result<String, String> {
    match pick {
        Pick::Article => Ok(output.article_recommendation.rendered_message()),
        Pick::Podcast => Ok(output.podcast_recommendation.rendered_message()),
        Pick::General(n) => output
            .general_messages
            .get(n - 1)
            .map(|m| m.text.clone())
            .ok_or_else(|| {
                format!(
                    "general:{n} is out of range ({} general messages)",
                    output.general_messages.len()
                )
            }),
    }
}

#[derive(Subcommand)]
pub enum MessageCommands {
    /// Print a drafted message ready to send
    Render {
        /// article, podcast or general:<n>
        #[arg(long)]
        pick: Pick,
    },
    /// Send a message into a chat
    Send {
        /// Target chat (defaults to the cached bundle's chatId)
        #[arg(long)]
        chat_id: Option<String>,
        /// Literal message text
        #[arg(long, conflicts_with = "pick", required_unless_present = "pick")]
        text: Option<String>,
        /// Send a cached draft instead: article, podcast or general:<n>
        #[arg(long)]
        pick: Option<Pick>,
    },
}

fn picked_text(session: &Session, pick: Pick) -> String {
    let Some(output) = session.recommendations.as_ref() else {
        exit_error(
            "No recommendations cached",
            Some("Run `outreach recommend` first."),
        );
    };
    render(pick, output).unwrap_or_else(|e| exit_error(&e, None))
}

pub async fn run(api_url: &str, command: MessageCommands) -> i32 {
    let session = Session::load();
    match command {
        MessageCommands::Render { pick } => {
            print_json(&json!({ "text": picked_text(&session, pick) }));
            0
        }
        MessageCommands::Send {
            chat_id,
            text,
            pick,
        } => {
            let text = match (text, pick) {
                (Some(text), _) => text,
                (None, Some(pick)) => picked_text(&session, pick),
                (None, None) => exit_error("Provide --text or --pick", None),
            };
            let chat_id = chat_id
                .or_else(|| session.bundle.as_ref().and_then(|b| b.chat_id.clone()))
                .unwrap_or_else(|| {
                    exit_error(
                        "No chat id given and none cached",
                        Some("Pass --chat-id, or enrich a contact you already have a conversation with."),
                    )
                });

            let mut body = json!({ "chat_id": chat_id, "text": text });
            if let Some(account_id) = session.account_id {
                body["account_id"] = Value::String(account_id);
            }
            api_request(
                api_url,
                reqwest::Method::POST,
                "/v1/messages/send",
                Some(body),
                &[],
            )
            .await
        }
    }
}
