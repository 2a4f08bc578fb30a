use clap::Subcommand;

use crate::session::Session;
use crate::util::api_request;

#[derive(Subcommand)]
pub enum ContactsCommands {
    /// Search the selected account's network by keyword
    Search {
        /// Keywords (name, company, role)
        #[arg(long)]
        query: String,
        /// Account to search through (defaults to the selected account)
        #[arg(long)]
        account_id: Option<String>,
    },
}

pub async fn run(api_url: &str, command: ContactsCommands) -> i32 {
    match command {
        ContactsCommands::Search { query, account_id } => {
            let mut params = vec![("q", query)];
            if let Some(account_id) = account_id.or_else(|| Session::load().account_id) {
                params.push(("account_id", account_id));
            }
            api_request(
                api_url,
                reqwest::Method::GET,
                "/v1/contacts/search",
                None,
                &params,
            )
            .await
        }
    }
}
