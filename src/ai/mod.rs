//! AI provider integration: prompt construction, provider clients and
//! decoding of the reply into an [`AiResult`](crate::plan::AiResult).

pub mod claude;
pub mod cloudflare;
pub mod prompt;
pub mod response;

pub use claude::ClaudeCli;
pub use cloudflare::CloudflareClient;
pub use prompt::{build_system_prompt, build_user_prompt};
pub use response::parse_ai_response;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Provider, ViconConfig};
use crate::error::{Error, Result};
use crate::plan::AiResult;
use crate::subprocess::ProcessRunner;

#[async_trait]
pub trait AiProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw reply text for a system and user prompt.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// The provider selected by `config`.
pub fn provider_for(
    config: &ViconConfig,
    runner: Arc<dyn ProcessRunner>,
) -> Result<Box<dyn AiProvider>> {
    match config.default_provider {
        Provider::Cloudflare => {
            let cloudflare = config.cloudflare.as_ref().ok_or_else(|| {
                Error::Config("Cloudflare credentials missing. Run: vicon setup".to_string())
            })?;
            Ok(Box::new(CloudflareClient::new(cloudflare)?))
        }
        Provider::Claude => Ok(Box::new(ClaudeCli::new(runner))),
    }
}

/// Ask `provider` for a conversion and decode the reply.
pub async fn generate(provider: &dyn AiProvider, system: &str, user: &str) -> Result<AiResult> {
    let reply = provider.complete(system, user).await?;
    parse_ai_response(&reply)
}
