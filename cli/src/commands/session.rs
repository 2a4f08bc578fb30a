use clap::Subcommand;
use serde_json::json;

use crate::session::{Session, session_path};
use crate::util::{exit_error, print_json};

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Print the cached account, bundle and recommendations
    Show,
    /// Forget everything cached
    Clear,
}

pub fn run(command: SessionCommands) -> i32 {
    let path = session_path();
    match command {
        SessionCommands::Show => {
            let session = Session::load_from(&path);
            match serde_json::to_value(&session) {
                Ok(value) => print_json(&json!({
                    "path": path.display().to_string(),
                    "session": value
                })),
                Err(e) => exit_error(&format!("Failed to encode session: {e}"), None),
            }
            0
        }
        SessionCommands::Clear => {
            if let Err(e) = Session::clear_at(&path) {
                exit_error(&e, None);
            }
            print_json(&json!({ "cleared": path.display().to_string() }));
            0
        }
    }
}
