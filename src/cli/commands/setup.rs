//! `vicon setup`

use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::ai::ClaudeCli;
use crate::cli::help::print_banner;
use crate::cli::prompt::{ask, ask_from};
use crate::config::{
    CloudflareConfig, ConfigStore, Provider, ViconConfig, DEFAULT_CLOUDFLARE_MODEL,
};
use crate::subprocess::SubprocessManager;

#[derive(Debug, Clone, Default)]
pub struct SetupCommand {
    pub provider: Option<Provider>,
    pub account_id: Option<String>,
    pub api_token: Option<String>,
    pub model: Option<String>,
}

pub async fn run_setup(command: SetupCommand) -> Result<()> {
    print_banner();

    let store = ConfigStore::from_env()?;
    let existing = store.load()?;

    let provider = match command.provider {
        Some(provider) => provider,
        None => {
            let current = existing
                .as_ref()
                .map_or(Provider::Cloudflare, |config| config.default_provider);
            ask("Provider (cloudflare/claude)", Some(&current.to_string()))?
                .parse::<Provider>()?
        }
    };

    let cloudflare = match provider {
        Provider::Claude => {
            let claude = ClaudeCli::new(SubprocessManager::production().runner());
            if !claude.check_availability().await? {
                bail!(
                    "claude CLI not found. Install it from https://claude.ai/code and re-run setup."
                );
            }
            existing.and_then(|config| config.cloudflare)
        }
        Provider::Cloudflare => {
            let current = existing.and_then(|config| config.cloudflare);
            let stdin = io::stdin();
            Some(collect_cloudflare(
                &mut stdin.lock(),
                &mut io::stdout(),
                command,
                current.as_ref(),
            )?)
        }
    };

    let config = ViconConfig {
        default_provider: provider,
        cloudflare,
    };
    store.save(&config)?;
    debug!("Stored provider {}", provider);

    println!("Saved {} configuration to {}", provider, store.path().display());
    Ok(())
}

/// Fill in the Cloudflare fields not given on the command line. The stored
/// API token is never echoed; an empty answer keeps it.
fn collect_cloudflare<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    command: SetupCommand,
    current: Option<&CloudflareConfig>,
) -> Result<CloudflareConfig> {
    let account_id = match command.account_id {
        Some(account_id) => account_id,
        None => ask_from(
            input,
            output,
            "Cloudflare account ID",
            current.map(|c| c.account_id.as_str()),
        )?,
    };
    let api_token = match command.api_token {
        Some(api_token) => api_token,
        None => {
            let question = match current {
                Some(_) => "Cloudflare API token [keep current]",
                None => "Cloudflare API token",
            };
            let answer = ask_from(input, output, question, None)?;
            match current {
                Some(current) if answer.is_empty() => current.api_token.clone(),
                _ => answer,
            }
        }
    };
    let model = match command.model {
        Some(model) => model,
        None => ask_from(
            input,
            output,
            "Workers AI model",
            Some(current.map_or(DEFAULT_CLOUDFLARE_MODEL, |c| c.model())),
        )?,
    };

    cloudflare_config(account_id, api_token, model)
}

fn cloudflare_config(
    account_id: String,
    api_token: String,
    model: String,
) -> Result<CloudflareConfig> {
    let account_id = account_id.trim().to_string();
    let api_token = api_token.trim().to_string();
    if account_id.is_empty() {
        bail!("Cloudflare account ID is required");
    }
    if api_token.is_empty() {
        bail!("Cloudflare API token is required");
    }

    let model = model.trim();
    let model =
        (!model.is_empty() && model != DEFAULT_CLOUDFLARE_MODEL).then(|| model.to_string());

    Ok(CloudflareConfig {
        account_id,
        api_token,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_cloudflare_config_requires_credentials() {
        let err = cloudflare_config(" ".into(), "t".into(), String::new()).unwrap_err();
        assert_eq!(err.to_string(), "Cloudflare account ID is required");

        let err = cloudflare_config("a".into(), String::new(), String::new()).unwrap_err();
        assert_eq!(err.to_string(), "Cloudflare API token is required");
    }

    #[test]
    fn test_cloudflare_config_keeps_custom_model_only() {
        let config =
            cloudflare_config(" acct ".into(), "tok".into(), DEFAULT_CLOUDFLARE_MODEL.into())
                .unwrap();
        assert_eq!(config.account_id, "acct");
        assert_eq!(config.model, None);

        let config =
            cloudflare_config("acct".into(), "tok".into(), "@cf/qwen/qwen2.5-coder".into())
                .unwrap();
        assert_eq!(config.model(), "@cf/qwen/qwen2.5-coder");
    }

    #[test]
    fn test_collect_cloudflare_uses_flags_without_prompting() {
        let command = SetupCommand {
            provider: Some(Provider::Cloudflare),
            account_id: Some("acct".into()),
            api_token: Some("tok".into()),
            model: Some("@cf/custom".into()),
        };
        let mut output = Vec::new();
        let config = collect_cloudflare(&mut Cursor::new(""), &mut output, command, None).unwrap();
        assert_eq!(config.api_token, "tok");
        assert_eq!(config.model.as_deref(), Some("@cf/custom"));
        assert!(output.is_empty());
    }

    #[test]
    fn test_collect_cloudflare_never_shows_stored_token() {
        let stored = CloudflareConfig {
            account_id: "acct".into(),
            api_token: "SUPERSECRET-TOKEN".into(),
            model: None,
        };
        let mut output = Vec::new();
        let config = collect_cloudflare(
            &mut Cursor::new("\n\n\n"),
            &mut output,
            SetupCommand::default(),
            Some(&stored),
        )
        .unwrap();

        let shown = String::from_utf8(output).unwrap();
        assert!(!shown.contains("SUPERSECRET-TOKEN"));
        assert!(shown.contains("Cloudflare API token [keep current]: "));
        assert_eq!(config, stored);
    }

    #[test]
    fn test_collect_cloudflare_replaces_token() {
        let stored = CloudflareConfig {
            account_id: "acct".into(),
            api_token: "old".into(),
            model: None,
        };
        let mut output = Vec::new();
        let config = collect_cloudflare(
            &mut Cursor::new("\nnew-token\n\n"),
            &mut output,
            SetupCommand::default(),
            Some(&stored),
        )
        .unwrap();

        assert_eq!(config.account_id, "acct");
        assert_eq!(config.api_token, "new-token");
    }
}
