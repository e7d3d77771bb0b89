//! Command routing and execution

use anyhow::Result;

use crate::cli::args::{Cli, Commands};
use crate::cli::commands::*;
use crate::cli::help::{print_banner, ready_message};

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Setup {
            provider,
            account_id,
            api_token,
            model,
        }) => {
            run_setup(SetupCommand {
                provider,
                account_id,
                api_token,
                model,
            })
            .await
        }
        Some(Commands::Teardown { auto_accept }) => run_teardown(auto_accept).await,
        None if cli.request.is_empty() => {
            print_banner();
            println!("{}", ready_message());
            Ok(())
        }
        None => {
            run_convert(ConvertCommand {
                request: cli.request,
                provider: cli.provider,
                auto_accept: cli.auto_accept,
                dry_run: cli.dry_run,
            })
            .await
        }
    }
}
