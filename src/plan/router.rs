//! Routing of a decoded AI result into an execution plan.
//!
//! A single-file result already carries concrete commands. A batch result
//! carries glob patterns and templates that are expanded here into one
//! command list per matched file.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::builder::{build_batch_plan, FileCommandPlan};
use super::glob::GlobExpander;
use super::template::unresolved_placeholders;
use crate::error::{Error, Result};

/// Concrete commands for explicitly named files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleFileResult {
    pub commands: Vec<String>,
    pub explanation: String,
}

/// Templates to apply to every file matched by `glob`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub glob: Vec<String>,
    pub commands: Vec<String>,
    pub output_template: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiResult {
    SingleFile(SingleFileResult),
    Batch(BatchResult),
}

/// Loosely typed wire shape; every field is checked before an `AiResult` is built.
#[derive(Debug, Deserialize)]
struct RawAiResult {
    #[serde(default, alias = "multiFile")]
    multi_file: Option<bool>,
    commands: Option<Vec<String>>,
    explanation: Option<String>,
    glob: Option<Vec<String>>,
    #[serde(alias = "outputTemplate")]
    output_template: Option<String>,
}

fn require<T>(field: Option<T>, name: &str, shape: &str) -> Result<T> {
    field.ok_or_else(|| Error::SchemaMismatch(format!("{shape} result is missing '{name}'")))
}

impl TryFrom<RawAiResult> for AiResult {
    type Error = Error;

    fn try_from(raw: RawAiResult) -> Result<Self> {
        if raw.multi_file == Some(true) {
            Ok(AiResult::Batch(BatchResult {
                glob: require(raw.glob, "glob", "batch")?,
                commands: require(raw.commands, "commands", "batch")?,
                output_template: require(raw.output_template, "output_template", "batch")?,
                explanation: require(raw.explanation, "explanation", "batch")?,
            }))
        } else {
            Ok(AiResult::SingleFile(SingleFileResult {
                commands: require(raw.commands, "commands", "single-file")?,
                explanation: require(raw.explanation, "explanation", "single-file")?,
            }))
        }
    }
}

impl AiResult {
    /// Check a decoded JSON value against the two known result shapes.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::SchemaMismatch(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        let raw: RawAiResult =
            serde_json::from_value(value).map_err(|e| Error::SchemaMismatch(e.to_string()))?;
        AiResult::try_from(raw)
    }

    pub fn explanation(&self) -> &str {
        match self {
            AiResult::SingleFile(result) => &result.explanation,
            AiResult::Batch(result) => &result.explanation,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What to hand to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionPlan {
    SingleFile { commands: Vec<String> },
    Batch { plans: Vec<FileCommandPlan> },
}

impl ExecutionPlan {
    /// Every concrete command in execution order.
    pub fn commands(&self) -> Vec<&str> {
        match self {
            ExecutionPlan::SingleFile { commands } => commands.iter().map(String::as_str).collect(),
            ExecutionPlan::Batch { plans } => plans
                .iter()
                .flat_map(|plan| plan.commands.iter().map(String::as_str))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands().is_empty()
    }

    /// Placeholder names that survived template resolution, deduplicated in
    /// order of first appearance.
    pub fn unresolved_placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self
            .commands()
            .into_iter()
            .flat_map(unresolved_placeholders)
        {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Fail when any command still contains a `{{name}}` placeholder.
    pub fn ensure_resolved(&self) -> Result<()> {
        let placeholders = self.unresolved_placeholders();
        if placeholders.is_empty() {
            Ok(())
        } else {
            Err(Error::UnresolvedPlaceholders {
                placeholders: placeholders
                    .into_iter()
                    .map(|name| format!("{{{{{name}}}}}"))
                    .collect(),
            })
        }
    }
}

/// Flatten per-file plans into `(file, command)` pairs, keeping file order
/// and each file's command order.
pub fn flatten(plans: &[FileCommandPlan]) -> Vec<(String, String)> {
    plans
        .iter()
        .flat_map(|plan| {
            plan.commands
                .iter()
                .map(move |command| (plan.file.clone(), command.clone()))
        })
        .collect()
}

/// Dispatch on the result shape. Batch results are expanded with `expander`;
/// an expansion that matches nothing is reported as [`Error::NoFilesMatched`].
pub fn route(result: &AiResult, expander: &GlobExpander) -> Result<ExecutionPlan> {
    match result {
        AiResult::SingleFile(single) => {
            debug!("Single-file result with {} command(s)", single.commands.len());
            Ok(ExecutionPlan::SingleFile {
                commands: single.commands.clone(),
            })
        }
        AiResult::Batch(batch) => {
            let files = expander.expand(&batch.glob)?;
            if files.is_empty() {
                return Err(Error::NoFilesMatched(batch.glob.clone()));
            }
            debug!(
                "Batch result: {} file(s) x {} template(s)",
                files.len(),
                batch.commands.len()
            );
            Ok(ExecutionPlan::Batch {
                plans: build_batch_plan(&files, &batch.commands, &batch.output_template),
            })
        }
    }
}
