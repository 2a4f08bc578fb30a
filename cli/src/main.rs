use clap::{Parser, Subcommand};

mod commands;
mod session;
mod util;

use commands::accounts::AccountsCommands;
use commands::contacts::ContactsCommands;
use commands::message::MessageCommands;
use commands::profile::ProfileCommands;
use commands::recommend::RecommendArgs;
use commands::search::SearchCommands;
use commands::session::SessionCommands;

#[derive(Parser)]
#[command(
    name = "outreach",
    version,
    about = "LinkedIn outreach assistant CLI: find a contact, draft messages, review and send"
)]
struct Cli {
    /// API base URL
    #[arg(long, env = "OUTREACH_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Linked accounts
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Contact search
    Contacts {
        #[command(subcommand)]
        command: ContactsCommands,
    },
    /// Contact profile enrichment
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Draft recommendations for the cached (or given) bundle
    Recommend(RecommendArgs),
    /// Render or send drafted messages
    Message {
        #[command(subcommand)]
        command: MessageCommands,
    },
    /// Web and article search
    Search {
        #[command(subcommand)]
        command: SearchCommands,
    },
    /// Local session cache
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Diagnostics go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outreach=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_url = cli.api_url.as_str();

    let code = match cli.command {
        Commands::Health => commands::health::run(api_url).await,
        Commands::Accounts { command } => commands::accounts::run(api_url, command).await,
        Commands::Contacts { command } => commands::contacts::run(api_url, command).await,
        Commands::Profile { command } => commands::profile::run(api_url, command).await,
        Commands::Recommend(args) => commands::recommend::run(api_url, args).await,
        Commands::Message { command } => commands::message::run(api_url, command).await,
        Commands::Search { command } => commands::search::run(api_url, command).await,
        Commands::Session { command } => commands::session::run(command),
    };

    std::process::exit(code);
}
