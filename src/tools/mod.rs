//! Detection of the installed media tools.
//!
//! Produces the capability snapshot that is rendered into the system prompt.
//! A tool that cannot be run is reported as not installed; probing never fails.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::subprocess::{ProcessCommandBuilder, ProcessRunner};

const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FfmpegInfo {
    pub installed: bool,
    pub version: Option<String>,
    pub codecs: Vec<String>,
    pub filters: Vec<String>,
    pub bitstream_filters: Vec<String>,
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagickInfo {
    pub installed: bool,
    pub version: Option<String>,
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContext {
    pub ffmpeg: FfmpegInfo,
    pub magick: MagickInfo,
}

pub struct ToolDetector {
    runner: Arc<dyn ProcessRunner>,
}

impl ToolDetector {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    pub async fn detect(&self) -> ToolContext {
        let (ffmpeg, magick) = tokio::join!(self.detect_ffmpeg(), self.detect_magick());
        debug!(
            "Detected tools: ffmpeg={} magick={}",
            ffmpeg.installed, magick.installed
        );
        ToolContext { ffmpeg, magick }
    }

    pub async fn detect_ffmpeg(&self) -> FfmpegInfo {
        let Some(version_output) = self.query("ffmpeg", &["-hide_banner", "-version"]).await else {
            return FfmpegInfo::default();
        };

        let (codecs, filters, bsfs, formats) = tokio::join!(
            self.query("ffmpeg", &["-hide_banner", "-codecs"]),
            self.query("ffmpeg", &["-hide_banner", "-filters"]),
            self.query("ffmpeg", &["-hide_banner", "-bsfs"]),
            self.query("ffmpeg", &["-hide_banner", "-formats"]),
        );

        FfmpegInfo {
            installed: true,
            version: parse_version(&version_output),
            codecs: codecs.as_deref().map(parse_table).unwrap_or_default(),
            filters: filters.as_deref().map(parse_filters).unwrap_or_default(),
            bitstream_filters: bsfs.as_deref().map(parse_bsfs).unwrap_or_default(),
            formats: formats.as_deref().map(parse_table).unwrap_or_default(),
        }
    }

    pub async fn detect_magick(&self) -> MagickInfo {
        let Some(version_output) = self.query("magick", &["-version"]).await else {
            return MagickInfo::default();
        };

        let formats = self.query("magick", &["-list", "format"]).await;

        MagickInfo {
            installed: true,
            version: parse_version(&version_output),
            formats: formats.as_deref().map(parse_magick_formats).unwrap_or_default(),
        }
    }

    /// Stdout of a successful run, `None` for anything else.
    async fn query(&self, program: &str, args: &[&str]) -> Option<String> {
        let command = ProcessCommandBuilder::new(program)
            .args(args)
            .timeout(QUERY_TIMEOUT)
            .build();

        match self.runner.run(command).await {
            Ok(output) if output.status.success() => Some(output.stdout),
            Ok(output) => {
                debug!(
                    "{} {} exited with {:?}",
                    program,
                    args.join(" "),
                    output.status
                );
                None
            }
            Err(e) => {
                debug!("{} {} could not run: {}", program, args.join(" "), e);
                None
            }
        }
    }
}

/// Third word of the first line: `ffmpeg version 7.0.1 ...`,
/// `Version: ImageMagick 7.1.1-29 ...`.
pub fn parse_version(output: &str) -> Option<String> {
    output
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(2))
        .map(str::to_string)
}

/// Names from `ffmpeg -codecs` / `ffmpeg -formats`: the second column of
/// every row after the ` --` separator line.
pub fn parse_table(output: &str) -> Vec<String> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("--"))
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

/// Names from `ffmpeg -filters`: rows look like ` TSC name  A->A  description`.
pub fn parse_filters(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let flags = columns.next()?;
            let name = columns.next()?;
            let io = columns.next()?;
            let is_flags = flags.len() == 3 && flags.chars().all(|c| "TSC.".contains(c));
            (is_flags && io.contains("->")).then(|| name.to_string())
        })
        .collect()
}

/// Names from `ffmpeg -bsfs`: one per line after the header.
pub fn parse_bsfs(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names from `magick -list format`: rows after the dashed separator whose
/// third column is a mode such as `rw+`.
pub fn parse_magick_formats(output: &str) -> Vec<String> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("---"))
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            let mode = columns.get(2)?;
            let is_mode = mode.len() == 3 && mode.chars().all(|c| "rw+-".contains(c));
            is_mode.then(|| columns[0].trim_end_matches('*').to_string())
        })
        .collect()
}
