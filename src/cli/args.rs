//! CLI argument structures

use clap::{Parser, Subcommand};

use crate::config::Provider;

/// Convert media files by describing what you want
#[derive(Parser)]
#[command(name = "vicon")]
#[command(about = "vicon - AI-assisted media conversion with ffmpeg and ImageMagick", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// AI provider to use for this request, overriding the configured one
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Run the generated commands without asking for confirmation
    #[arg(short = 'y', long = "yes")]
    pub auto_accept: bool,

    /// Print the generated commands without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// What to convert, in plain words (e.g. "convert all mov files to mp4")
    #[arg(value_name = "REQUEST")]
    pub request: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure the AI provider and its credentials
    Setup {
        /// Provider to configure
        #[arg(long, value_enum)]
        provider: Option<Provider>,

        /// Cloudflare account ID
        #[arg(long)]
        account_id: Option<String>,

        /// Cloudflare API token
        #[arg(long)]
        api_token: Option<String>,

        /// Cloudflare Workers AI model
        #[arg(long)]
        model: Option<String>,
    },

    /// Delete the stored configuration
    Teardown {
        /// Delete without confirmation
        #[arg(short = 'y', long = "yes")]
        auto_accept: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_request_words() {
        let cli = Cli::try_parse_from(["vicon", "-y", "convert", "all", "mov", "files"]).unwrap();
        assert!(cli.auto_accept);
        assert!(!cli.dry_run);
        assert_eq!(cli.request, vec!["convert", "all", "mov", "files"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_provider_override() {
        let cli = Cli::try_parse_from(["vicon", "--provider", "claude", "-n", "a.mov to mp4"])
            .unwrap();
        assert_eq!(cli.provider, Some(Provider::Claude));
        assert!(cli.dry_run);
        assert_eq!(cli.request, vec!["a.mov to mp4"]);
    }

    #[test]
    fn test_parse_setup() {
        let cli = Cli::try_parse_from([
            "vicon",
            "setup",
            "--provider",
            "cloudflare",
            "--account-id",
            "acct",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Setup {
                provider,
                account_id,
                api_token,
                model,
            }) => {
                assert_eq!(provider, Some(Provider::Cloudflare));
                assert_eq!(account_id.as_deref(), Some("acct"));
                assert_eq!(api_token, None);
                assert_eq!(model, None);
            }
            _ => panic!("expected setup"),
        }
        assert!(cli.request.is_empty());
    }

    #[test]
    fn test_parse_teardown_and_verbosity() {
        let cli = Cli::try_parse_from(["vicon", "-vv", "teardown", "--yes"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Some(Commands::Teardown { auto_accept: true })
        ));
    }

    #[test]
    fn test_bare_invocation() {
        let cli = Cli::try_parse_from(["vicon"]).unwrap();
        assert!(cli.request.is_empty());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_request_starting_with_help_word() {
        let cli = Cli::try_parse_from(["vicon", "help", "me", "convert", "a.mov"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.request, vec!["help", "me", "convert", "a.mov"]);
    }
}
