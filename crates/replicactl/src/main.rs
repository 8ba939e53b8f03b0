//! replicactl entry point
//!
//! Parses arguments, sets up logging, dispatches, and exits with the code
//! matching the outcome.

use clap::Parser;
use replicactl::cli::Cli;
use replicactl::{commands, errors, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let code = match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            errors::exit_code_for_error(&e)
        }
    };
    std::process::exit(code);
}
