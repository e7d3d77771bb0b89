//! Persistent provider configuration.
//!
//! Stored as TOML in the platform config directory
//! (`VICON_CONFIG_DIR` overrides it), then overlaid with `VICON_*`
//! environment variables.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

pub const CONFIG_DIR_ENV: &str = "VICON_CONFIG_DIR";
pub const DEFAULT_CLOUDFLARE_MODEL: &str = "@cf/meta/llama-3.3-70b-instruct-fp8-fast";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Cloudflare Workers AI
    Cloudflare,
    /// Local Claude Code CLI
    Claude,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Cloudflare => write!(f, "cloudflare"),
            Provider::Claude => write!(f, "claude"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cloudflare" => Ok(Provider::Cloudflare),
            "claude" => Ok(Provider::Claude),
            other => Err(Error::Config(format!("Unknown provider '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudflareConfig {
    pub account_id: String,
    pub api_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CloudflareConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_CLOUDFLARE_MODEL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViconConfig {
    pub default_provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudflare: Option<CloudflareConfig>,
}

impl ViconConfig {
    pub fn new(default_provider: Provider) -> Self {
        Self {
            default_provider,
            cloudflare: None,
        }
    }

    /// Overlay `VICON_*` environment variables.
    pub fn merge_env_vars(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup("VICON_PROVIDER").and_then(|p| p.parse().ok()) {
            self.default_provider = provider;
        }

        let account_id = lookup("VICON_CLOUDFLARE_ACCOUNT_ID");
        let api_token = lookup("VICON_CLOUDFLARE_API_TOKEN");
        let model = lookup("VICON_CLOUDFLARE_MODEL");

        if let Some(cloudflare) = self.cloudflare.as_mut() {
            if let Some(account_id) = account_id {
                cloudflare.account_id = account_id;
            }
            if let Some(api_token) = api_token {
                cloudflare.api_token = api_token;
            }
        } else if let (Some(account_id), Some(api_token)) = (account_id, api_token) {
            self.cloudflare = Some(CloudflareConfig {
                account_id,
                api_token,
                model: None,
            });
        }

        if let (Some(cloudflare), Some(model)) = (self.cloudflare.as_mut(), model) {
            cloudflare.model = Some(model);
        }
    }

    /// Check that the selected provider has what it needs to run.
    pub fn validate(&self) -> Result<()> {
        if self.default_provider == Provider::Cloudflare && self.cloudflare.is_none() {
            return Err(Error::Config(
                "Cloudflare credentials missing. Run: vicon setup".to_string(),
            ));
        }
        Ok(())
    }
}

/// Apply a `--provider` override. Without a stored config, the override
/// alone becomes the config.
pub fn with_provider_override(
    config: Option<ViconConfig>,
    provider: Option<Provider>,
) -> Option<ViconConfig> {
    match (config, provider) {
        (Some(mut config), Some(provider)) => {
            config.default_provider = provider;
            Some(config)
        }
        (None, Some(provider)) => Some(ViconConfig::new(provider)),
        (config, None) => config,
    }
}

/// Reads and writes `config.toml` in a single directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The store in `VICON_CONFIG_DIR`, or the platform config directory.
    pub fn from_env() -> Result<Self> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(Self::new(PathBuf::from(dir)));
        }
        ProjectDirs::from("com", "vicon", "vicon")
            .map(|dirs| Self::new(dirs.config_dir().to_path_buf()))
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join("config.toml")
    }

    /// The stored config, `None` if nothing has been saved.
    pub fn load(&self) -> Result<Option<ViconConfig>> {
        let path = self.path();
        if !path.exists() {
            debug!("No config at {}", path.display());
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let config: ViconConfig = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(Some(config))
    }

    /// The stored config with environment overrides applied.
    pub fn load_with_env(&self) -> Result<Option<ViconConfig>> {
        let config = match self.load()? {
            Some(mut config) => {
                config.merge_env_vars();
                Some(config)
            }
            None => std::env::var("VICON_PROVIDER")
                .ok()
                .and_then(|p| p.parse().ok())
                .map(|provider| {
                    let mut config = ViconConfig::new(provider);
                    config.merge_env_vars();
                    config
                }),
        };
        Ok(config)
    }

    pub fn save(&self, config: &ViconConfig) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        let path = self.path();
        let content = toml::to_string_pretty(config)?;
        fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        restrict_permissions(&path)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Remove the stored config. Returns whether anything was deleted.
    pub fn delete(&self) -> Result<bool> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&path, e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
