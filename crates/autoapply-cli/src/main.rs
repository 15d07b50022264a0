use autoapply_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Credentials may come from a .env file next to the binary's working dir.
    let _ = dotenvy::dotenv();

    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable ({err:#}), logging to stderr");
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("autoapply error: {:#}", err);
        std::process::exit(1);
    }
}
