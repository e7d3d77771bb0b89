//! # vicon
//!
//! Media conversion from plain-language requests. An AI provider turns the
//! request into ffmpeg / ImageMagick commands; the plan engine turns its
//! answer into concrete, per-file command lists.
//!
//! ## Usage
//!
//! ```bash
//! vicon [--provider cloudflare|claude] [-y] [-n] <REQUEST>...
//! vicon setup
//! vicon teardown
//! ```
//!
//! ## Modules
//!
//! - `ai` - Prompt construction, provider clients and reply decoding
//! - `cli` - Argument parsing and command handlers
//! - `config` - Provider configuration stored as TOML
//! - `exec` - Running a resolved plan through the shell
//! - `plan` - Glob expansion, path decomposition, templating and routing
//! - `subprocess` - Process execution behind a mockable trait
//! - `tools` - ffmpeg and ImageMagick capability detection
pub mod ai;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod plan;
pub mod subprocess;
pub mod tools;

pub use error::{Error, Result};
