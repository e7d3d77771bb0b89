use std::time::Duration;

use crate::subprocess::ProcessCommand;

pub struct ProcessCommandBuilder {
    command: ProcessCommand,
}

impl ProcessCommandBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            command: ProcessCommand {
                program: program.to_string(),
                args: Vec::new(),
                timeout: None,
                stdin: None,
                inherit_output: false,
            },
        }
    }

    /// Run `command` through `sh -c`.
    pub fn shell(command: &str) -> Self {
        Self::new("sh").arg("-c").arg(command)
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.command.args.push(arg.to_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.command
            .args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.command.timeout = Some(timeout);
        self
    }

    pub fn stdin(mut self, input: String) -> Self {
        self.command.stdin = Some(input);
        self
    }

    /// Let the child write straight to the terminal instead of capturing output.
    pub fn inherit_output(mut self) -> Self {
        self.command.inherit_output = true;
        self
    }

    pub fn build(self) -> ProcessCommand {
        self.command
    }
}
