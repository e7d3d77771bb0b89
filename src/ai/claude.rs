//! Claude Code CLI provider (`claude -p`).

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::AiProvider;
use crate::error::{Error, Result};
use crate::subprocess::{ProcessCommandBuilder, ProcessError, ProcessRunner};

const CLAUDE_TIMEOUT: Duration = Duration::from_secs(300);

pub struct ClaudeCli {
    runner: Arc<dyn ProcessRunner>,
}

impl ClaudeCli {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Whether `claude --version` runs successfully.
    pub async fn check_availability(&self) -> Result<bool> {
        let result = self
            .runner
            .run(ProcessCommandBuilder::new("claude").arg("--version").build())
            .await;

        match result {
            Ok(output) => Ok(output.status.success()),
            Err(ProcessError::CommandNotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl AiProvider for ClaudeCli {
    fn name(&self) -> &'static str {
        "Claude Code CLI"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let command = ProcessCommandBuilder::new("claude")
            .args(["-p", "--output-format", "text", "--system-prompt", system])
            .stdin(user.to_string())
            .timeout(CLAUDE_TIMEOUT)
            .build();

        let output = self.runner.run(command).await.map_err(|e| match e {
            ProcessError::CommandNotFound(_) => Error::Provider(
                "claude CLI not found. Install it from https://claude.ai/code and re-run setup."
                    .to_string(),
            ),
            other => other.into(),
        })?;

        if !output.status.success() {
            let stderr = output.stderr.trim();
            return Err(Error::Provider(format!(
                "claude exited with {:?}{}",
                output.status,
                if stderr.is_empty() {
                    String::new()
                } else {
                    format!(": {stderr}")
                }
            )));
        }

        debug!("claude replied in {:?}", output.duration);
        Ok(output.stdout)
    }
}
