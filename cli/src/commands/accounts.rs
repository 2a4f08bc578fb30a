use clap::Subcommand;
use serde_json::json;

use crate::session::Session;
use crate::util::{api_request, exit_error, print_json};

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// List linked LinkedIn accounts
    List,
    /// Remember an account for later contact searches and sends
    Select {
        /// Provider account id (the `id` field from `accounts list`)
        #[arg(long)]
        account_id: String,
    },
}

pub async fn run(api_url: &str, command: AccountsCommands) -> i32 {
    match command {
        AccountsCommands::List => {
            api_request(api_url, reqwest::Method::GET, "/v1/accounts", None, &[]).await
        }
        AccountsCommands::Select { account_id } => select(&account_id),
    }
}

fn select(account_id: &str) -> i32 {
    let account_id = account_id.trim();
    if account_id.is_empty() {
        exit_error("account_id must not be empty", Some("Pick an id from `outreach accounts list`."));
    }
    let mut session = Session::load();
    session.account_id = Some(account_id.to_string());
    if let Err(e) = session.save() {
        exit_error(&e, None);
    }
    print_json(&json!({ "selected_account_id": account_id }));
    0
}
