use clap::Parser;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

use vicon::cli::{execute_command, get_log_level, Cli};

/// Overrides the verbosity-derived filter when set.
const LOG_ENV: &str = "VICON_LOG";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(get_log_level(cli.verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("vicon started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = execute_command(cli).await {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
