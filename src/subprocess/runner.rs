use async_trait::async_trait;
use std::time::Duration;

use super::error::ProcessError;

#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
    pub stdin: Option<String>,
    pub inherit_output: bool,
}

impl ProcessCommand {
    pub fn display(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Success => Some(0),
            ExitStatus::Error(code) => Some(*code),
            ExitStatus::Signal(_) => None,
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError>;
}

pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Log command execution details
    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!("Executing subprocess: {}", command.display());

        if let Some(ref stdin) = command.stdin {
            tracing::trace!("Stdin provided: {} bytes", stdin.len());
        }
    }

    /// Configure the command with its arguments and stdio
    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);

        // The child must not outlive a cancelled or timed out wait.
        cmd.kill_on_drop(true);

        Self::configure_stdio(&mut cmd, command);
        cmd
    }

    /// Configure stdio pipes for the process
    fn configure_stdio(cmd: &mut tokio::process::Command, command: &ProcessCommand) {
        if command.stdin.is_some() {
            cmd.stdin(std::process::Stdio::piped());
        } else {
            cmd.stdin(std::process::Stdio::null());
        }

        if command.inherit_output {
            cmd.stdout(std::process::Stdio::inherit());
            cmd.stderr(std::process::Stdio::inherit());
        } else {
            cmd.stdout(std::process::Stdio::piped());
            cmd.stderr(std::process::Stdio::piped());
        }
    }

    /// Write stdin data to the child process
    async fn write_stdin(
        child: &mut tokio::process::Child,
        stdin_data: &str,
    ) -> Result<(), ProcessError> {
        if let Some(mut stdin) = child.stdin.take() {
            use tokio::io::AsyncWriteExt;
            stdin.write_all(stdin_data.as_bytes()).await?;
            stdin.shutdown().await?;
        }
        Ok(())
    }

    /// Wait for process with optional timeout
    async fn wait_with_timeout(
        child: tokio::process::Child,
        timeout: Option<Duration>,
    ) -> Result<std::process::Output, ProcessError> {
        match timeout {
            Some(duration) => {
                match tokio::time::timeout(duration, child.wait_with_output()).await {
                    Ok(result) => result.map_err(ProcessError::Io),
                    Err(_) => Err(ProcessError::Timeout(duration)),
                }
            }
            None => child.wait_with_output().await.map_err(ProcessError::Io),
        }
    }

    /// Convert process exit status to our ExitStatus enum
    fn parse_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        match status.signal() {
            Some(signal) => ExitStatus::Signal(signal),
            None => ExitStatus::Error(1),
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(1)
    }

    /// Log the process execution result
    fn log_result(result: &ProcessOutput, command: &ProcessCommand) {
        match &result.status {
            ExitStatus::Success => {
                tracing::debug!(
                    "Subprocess completed successfully in {:?}: {}",
                    result.duration,
                    command.display()
                );
                tracing::trace!("Stdout length: {} bytes", result.stdout.len());
            }
            ExitStatus::Error(code) => {
                tracing::debug!(
                    "Subprocess failed with exit code {} in {:?}: {}",
                    code,
                    result.duration,
                    command.display()
                );
                if !result.stderr.is_empty() {
                    tracing::trace!("Stderr: {}", result.stderr);
                }
            }
            ExitStatus::Signal(signal) => {
                tracing::warn!(
                    "Subprocess terminated by signal {} in {:?}: {}",
                    signal,
                    result.duration,
                    command.display()
                );
            }
        }
    }

    /// Map spawn error to ProcessError
    fn map_spawn_error(error: std::io::Error, program: &str) -> ProcessError {
        if error.kind() == std::io::ErrorKind::NotFound {
            ProcessError::CommandNotFound(program.to_string())
        } else {
            ProcessError::Io(error)
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        let start = std::time::Instant::now();
        Self::log_command_start(&command);

        let mut child = Self::configure_command(&command)
            .spawn()
            .map_err(|e| Self::map_spawn_error(e, &command.program))?;

        if let Some(stdin_data) = &command.stdin {
            Self::write_stdin(&mut child, stdin_data).await?;
        }

        let output = Self::wait_with_timeout(child, command.timeout).await?;

        let result = ProcessOutput {
            status: Self::parse_exit_status(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration: start.elapsed(),
        };

        Self::log_result(&result, &command);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subprocess::ProcessCommandBuilder;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let output = TokioProcessRunner
            .run(ProcessCommandBuilder::new("echo").arg("hello world").build())
            .await
            .unwrap();

        assert!(output.status.success());
        assert_eq!(output.stdout.trim(), "hello world");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_failure_exit_code() {
        let output = TokioProcessRunner
            .run(ProcessCommandBuilder::new("false").build())
            .await
            .unwrap();

        assert!(!output.status.success());
        assert_eq!(output.status.code(), Some(1));
    }

    #[tokio::test]
    async fn test_run_command_not_found() {
        let result = TokioProcessRunner
            .run(ProcessCommandBuilder::new("nonexistent-command-12345").build())
            .await;

        assert!(matches!(result, Err(ProcessError::CommandNotFound(_))));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let result = TokioProcessRunner
            .run(
                ProcessCommandBuilder::new("sleep")
                    .arg("5")
                    .timeout(Duration::from_millis(100))
                    .build(),
            )
            .await;

        assert!(matches!(result, Err(ProcessError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_run_with_stdin() {
        let output = TokioProcessRunner
            .run(
                ProcessCommandBuilder::new("cat")
                    .stdin("test input".to_string())
                    .build(),
            )
            .await
            .unwrap();

        assert_eq!(output.stdout, "test input");
    }

    #[tokio::test]
    async fn test_run_shell_command() {
        let output = TokioProcessRunner
            .run(ProcessCommandBuilder::shell("echo one && echo two >&2; exit 3").build())
            .await
            .unwrap();

        assert_eq!(output.status, ExitStatus::Error(3));
        assert_eq!(output.stdout, "one\n");
        assert_eq!(output.stderr, "two\n");
    }

    #[test]
    fn test_exit_status_code() {
        assert_eq!(ExitStatus::Success.code(), Some(0));
        assert_eq!(ExitStatus::Error(2).code(), Some(2));
        assert_eq!(ExitStatus::Signal(9).code(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_exit_status() {
        use std::os::unix::process::ExitStatusExt;

        let status = std::process::ExitStatus::from_raw(0);
        assert_eq!(TokioProcessRunner::parse_exit_status(status), ExitStatus::Success);

        let status = std::process::ExitStatus::from_raw(256);
        assert_eq!(TokioProcessRunner::parse_exit_status(status), ExitStatus::Error(1));

        let status = std::process::ExitStatus::from_raw(9);
        assert_eq!(TokioProcessRunner::parse_exit_status(status), ExitStatus::Signal(9));
    }
}
