//! The default command: turn a plain-language request into commands and run them.

use anyhow::{bail, Result};
use std::fmt::Write as _;
use tracing::{debug, info};

use crate::ai::{build_system_prompt, build_user_prompt, generate, provider_for};
use crate::cli::prompt::confirm;
use crate::config::{with_provider_override, ConfigStore, Provider};
use crate::error::Error;
use crate::exec::{ExecutionReport, Executor};
use crate::plan::{route, ExecutionPlan, GlobExpander};
use crate::subprocess::SubprocessManager;
use crate::tools::ToolDetector;

#[derive(Debug, Clone)]
pub struct ConvertCommand {
    pub request: Vec<String>,
    pub provider: Option<Provider>,
    pub auto_accept: bool,
    pub dry_run: bool,
}

pub async fn run_convert(command: ConvertCommand) -> Result<()> {
    let store = ConfigStore::from_env()?;
    let config = with_provider_override(store.load_with_env()?, command.provider).ok_or_else(
        || Error::Config("No provider configured. Run: vicon setup".to_string()),
    )?;
    config.validate()?;

    let subprocess = SubprocessManager::production();
    let provider = provider_for(&config, subprocess.runner())?;

    let tools = ToolDetector::new(subprocess.runner()).detect().await;
    let system_prompt = build_system_prompt(&tools);
    let user_prompt = build_user_prompt(&command.request);
    debug!("User prompt: {}", user_prompt);

    info!("Asking {}...", provider.name());
    let result = generate(provider.as_ref(), &system_prompt, &user_prompt).await?;

    let plan = route(&result, &GlobExpander::new())?;
    print!("{}", render_plan(result.explanation(), &plan));
    plan.ensure_resolved()?;

    if plan.is_empty() || command.dry_run {
        return Ok(());
    }

    if !command.auto_accept && !confirm(&confirmation_question(&plan))? {
        println!("Cancelled.");
        return Ok(());
    }

    let report = Executor::new(subprocess.runner()).execute(&plan).await?;
    println!("{}", summarize(&report));

    if !report.is_success() {
        bail!("{} command(s) failed", report.failed.len());
    }
    Ok(())
}

/// Explanation followed by the commands, grouped per file in batch mode.
pub fn render_plan(explanation: &str, plan: &ExecutionPlan) -> String {
    let mut out = String::new();
    let explanation = explanation.trim();
    if !explanation.is_empty() {
        let _ = writeln!(out, "{explanation}");
    }
    if plan.is_empty() {
        return out;
    }

    let _ = writeln!(out);
    match plan {
        ExecutionPlan::SingleFile { commands } => {
            for command in commands {
                let _ = writeln!(out, "  $ {command}");
            }
        }
        ExecutionPlan::Batch { plans } => {
            for file_plan in plans {
                let _ = writeln!(out, "  {}", file_plan.file);
                for command in &file_plan.commands {
                    let _ = writeln!(out, "    $ {command}");
                }
            }
        }
    }
    let _ = writeln!(out);
    out
}

fn confirmation_question(plan: &ExecutionPlan) -> String {
    match plan {
        ExecutionPlan::SingleFile { commands } => format!("Run {} command(s)?", commands.len()),
        ExecutionPlan::Batch { plans } => format!(
            "Run {} command(s) on {} file(s)?",
            plan.commands().len(),
            plans.len()
        ),
    }
}

pub fn summarize(report: &ExecutionReport) -> String {
    let mut out = format!("{} command(s) succeeded", report.succeeded);
    if !report.failed.is_empty() {
        let _ = write!(out, ", {} failed", report.failed.len());
    }
    if report.skipped > 0 {
        let _ = write!(out, ", {} skipped", report.skipped);
    }
    for failure in &report.failed {
        let code = failure
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |code| code.to_string());
        match &failure.file {
            Some(file) => {
                let _ = write!(out, "\n  {file}: exit {code}: {}", failure.command);
            }
            None => {
                let _ = write!(out, "\n  exit {code}: {}", failure.command);
            }
        }
    }
    out
}
