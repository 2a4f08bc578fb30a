use clap::Subcommand;

use crate::util::api_request;

#[derive(Subcommand)]
pub enum SearchCommands {
    /// Plain web search
    Web {
        #[arg(long)]
        query: String,
        /// Recency window, e.g. "m6" for the last six months
        #[arg(long)]
        date_restrict: Option<String>,
    },
    /// Web search restricted to article sites
    Articles {
        #[arg(long)]
        query: String,
        #[arg(long)]
        date_restrict: Option<String>,
    },
}

pub async fn run(api_url: &str, command: SearchCommands) -> i32 {
    let (path, query, date_restrict) = match command {
        SearchCommands::Web {
            query,
            date_restrict,
        } => ("/v1/search", query, date_restrict),
        SearchCommands::Articles {
            query,
            date_restrict,
        } => ("/v1/search/articles", query, date_restrict),
    };
    let mut params = vec![("q", query)];
    if let Some(window) = date_restrict {
        params.push(("dateRestrict", window));
    }
    api_request(api_url, reqwest::Method::GET, path, None, &params).await
}
