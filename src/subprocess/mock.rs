use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

/// Scripted [`ProcessRunner`] for tests. Expectations are matched in the
/// order they were registered; every call is recorded.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    call_history: Arc<Mutex<Vec<ProcessCommand>>>,
}

struct MockExpectation {
    program: String,
    #[allow(clippy::type_complexity)]
    args_matcher: Option<Box<dyn Fn(&[String]) -> bool + Send + Sync>>,
    response: Result<ProcessOutput, String>,
}

pub struct MockCommandConfig {
    runner: MockProcessRunner,
    expectation: MockExpectation,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_command(&self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: MockExpectation {
                program: program.to_string(),
                args_matcher: None,
                response: Ok(ProcessOutput {
                    status: ExitStatus::Success,
                    stdout: String::new(),
                    stderr: String::new(),
                    duration: Duration::from_millis(10),
                }),
            },
        }
    }

    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        let history = self.call_history.lock().unwrap();
        history.iter().filter(|cmd| cmd.program == program).count() == times
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        self.call_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        self.call_history.lock().unwrap().push(command.clone());

        let expectations = self.expectations.lock().unwrap();
        let matched = expectations.iter().find(|expectation| {
            expectation.program == command.program
                && expectation
                    .args_matcher
                    .as_ref()
                    .map_or(true, |matcher| matcher(&command.args))
        });

        match matched {
            Some(expectation) => match &expectation.response {
                Ok(output) => Ok(output.clone()),
                Err(program) => Err(ProcessError::CommandNotFound(program.clone())),
            },
            None => Err(ProcessError::MockExpectationNotMet(format!(
                "No expectation found for command: {}",
                command.display()
            ))),
        }
    }
}

impl MockCommandConfig {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.expectation.args_matcher = Some(Box::new(matcher));
        self
    }

    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        if let Ok(output) = &mut self.expectation.response {
            output.stdout = stdout.to_string();
        }
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        if let Ok(output) = &mut self.expectation.response {
            output.stderr = stderr.to_string();
        }
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        if let Ok(output) = &mut self.expectation.response {
            output.status = if code == 0 {
                ExitStatus::Success
            } else {
                ExitStatus::Error(code)
            };
        }
        self
    }

    /// Behave as if the program is not installed.
    pub fn returns_not_found(mut self) -> Self {
        self.expectation.response = Err(self.expectation.program.clone());
        self
    }

    pub fn finish(self) {
        self.runner
            .expectations
            .lock()
            .unwrap()
            .push(self.expectation);
    }
}
