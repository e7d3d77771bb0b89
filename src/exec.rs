//! Runs an [`ExecutionPlan`] through the shell.
//!
//! Single-file plans stop at the first failing command. Batch plans stop the
//! failing file's remaining commands and continue with the next file.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::Result;
use crate::plan::{flatten, ExecutionPlan};
use crate::subprocess::{ExitStatus, ProcessCommandBuilder, ProcessRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCommand {
    /// Input file the command belonged to; `None` in single-file mode.
    pub file: Option<String>,
    pub command: String,
    pub status: ExitStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: Vec<FailedCommand>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Executor {
    runner: Arc<dyn ProcessRunner>,
    inherit_output: bool,
}

impl Executor {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            inherit_output: true,
        }
    }

    /// Capture command output instead of passing it through to the terminal.
    pub fn capture_output(mut self) -> Self {
        self.inherit_output = false;
        self
    }

    pub async fn execute(&self, plan: &ExecutionPlan) -> Result<ExecutionReport> {
        let mut report = ExecutionReport::default();

        match plan {
            ExecutionPlan::SingleFile { commands } => {
                for (index, command) in commands.iter().enumerate() {
                    if !self.run_one(None, command, &mut report).await? {
                        report.skipped += commands.len() - index - 1;
                        break;
                    }
                }
            }
            ExecutionPlan::Batch { plans } => {
                let mut failed_file: Option<String> = None;
                for (file, command) in flatten(plans) {
                    if failed_file.as_deref() == Some(file.as_str()) {
                        report.skipped += 1;
                        continue;
                    }
                    debug!("Processing {}", file);
                    if !self.run_one(Some(&file), &command, &mut report).await? {
                        failed_file = Some(file);
                    }
                }
            }
        }

        Ok(report)
    }

    /// Run one command and record its outcome. Returns whether it succeeded.
    async fn run_one(
        &self,
        file: Option<&str>,
        command: &str,
        report: &mut ExecutionReport,
    ) -> Result<bool> {
        let mut builder = ProcessCommandBuilder::shell(command);
        if self.inherit_output {
            builder = builder.inherit_output();
        }

        let output = self.runner.run(builder.build()).await?;
        if output.status.success() {
            report.succeeded += 1;
            return Ok(true);
        }

        warn!("Command failed with {:?}: {}", output.status, command);
        report.failed.push(FailedCommand {
            file: file.map(str::to_string),
            command: command.to_string(),
            status: output.status,
        });
        Ok(false)
    }
}
