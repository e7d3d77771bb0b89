//! Turns a batch specification into concrete per-file command lists.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::path::decompose;
use super::template::resolve;

/// Template variables available to batch commands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileVariables {
    pub input: String,
    pub dir: String,
    pub stem: String,
    pub output: String,
}

impl FileVariables {
    /// Variables for `file` with `output` still empty.
    pub fn for_file(file: &str) -> Self {
        let parts = decompose(file);
        Self {
            input: file.to_string(),
            dir: parts.dir,
            stem: parts.stem,
            output: String::new(),
        }
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = output;
        self
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("input".to_string(), self.input.clone()),
            ("dir".to_string(), self.dir.clone()),
            ("stem".to_string(), self.stem.clone()),
            ("output".to_string(), self.output.clone()),
        ])
    }
}

/// The concrete commands to run for one matched file, in template order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCommandPlan {
    pub file: String,
    pub commands: Vec<String>,
}

/// Render the commands for a single file.
///
/// The output template is rendered first with `output` bound to the empty
/// string; the result is then bound to `output` for the command templates.
pub fn build_file_commands(
    file: &str,
    command_templates: &[String],
    output_template: &str,
) -> Vec<String> {
    let base = FileVariables::for_file(file);
    let output = resolve(output_template, &base.to_map());
    let vars = base.with_output(output).to_map();

    command_templates
        .iter()
        .map(|template| resolve(template, &vars))
        .collect()
}

/// Render the commands for every file, preserving file order.
///
/// ```
/// use vicon::plan::build_batch_plan;
///
/// let plans = build_batch_plan(
///     &["clips/a.mov".to_string()],
///     &["ffmpeg -i {{input}} {{output}}".to_string()],
///     "{{dir}}/{{stem}}_converted.mp4",
/// );
/// assert_eq!(plans[0].commands, vec!["ffmpeg -i clips/a.mov clips/a_converted.mp4"]);
/// ```
pub fn build_batch_plan(
    files: &[String],
    command_templates: &[String],
    output_template: &str,
) -> Vec<FileCommandPlan> {
    files
        .iter()
        .map(|file| FileCommandPlan {
            file: file.clone(),
            commands: build_file_commands(file, command_templates, output_template),
        })
        .collect()
}
