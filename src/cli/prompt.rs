//! Line-based questions on stdin.

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Ask a y/N question. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    confirm_from(&mut stdin.lock(), &mut io::stdout(), question)
}

/// Ask for a value, falling back to `default` on an empty answer.
pub fn ask(question: &str, default: Option<&str>) -> Result<String> {
    let stdin = io::stdin();
    ask_from(&mut stdin.lock(), &mut io::stdout(), question, default)
}

pub fn confirm_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<bool> {
    write!(output, "{question} (y/N): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn ask_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: Option<&str>,
) -> Result<String> {
    match default {
        Some(default) => write!(output, "{question} [{default}]: ")?,
        None => write!(output, "{question}: ")?,
    }
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();

    if answer.is_empty() {
        Ok(default.unwrap_or_default().to_string())
    } else {
        Ok(answer.to_string())
    }
}
