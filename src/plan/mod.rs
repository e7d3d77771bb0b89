//! Conversion plan resolution.
//!
//! Takes the structured result of an AI provider and turns it into the
//! ordered list of concrete commands to run:
//!
//! - `glob` - expand batch patterns into a sorted, deduplicated file list
//! - `path` - split an input path into `dir` and `stem`
//! - `template` - substitute `{{name}}` placeholders
//! - `builder` - render the per-file command lists of a batch
//! - `router` - dispatch on the result shape
//!
//! Everything except glob expansion is pure.

pub mod builder;
pub mod glob;
pub mod path;
pub mod router;
pub mod template;

pub use builder::{build_batch_plan, build_file_commands, FileCommandPlan, FileVariables};
pub use glob::GlobExpander;
pub use path::{decompose, PathParts};
pub use router::{flatten, route, AiResult, BatchResult, ExecutionPlan, SingleFileResult};
pub use template::{resolve, unresolved_placeholders};
