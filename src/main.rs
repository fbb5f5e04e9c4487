//! repojira - link local repositories to Jira projects.

mod cli;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is best effort; commands still work without a log directory.
    let _guard = match repojira::logging::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            eprintln!("error: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("hint: {}", action);
            } else if e.is_recoverable() {
                eprintln!("hint: this may be temporary, try again in a moment");
            }
            ExitCode::FAILURE
        }
    }
}
