//! Shell command execution

use std::path::PathBuf;
use std::process::Command;

use super::ImportError;

/// Exit code and captured standard output of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
}

impl CommandOutput {
    pub fn new(code: i32, stdout: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Turn a non-zero exit into [`ImportError::CommandFailed`]
    pub fn into_result(self) -> Result<Self, ImportError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ImportError::CommandFailed {
                code: self.code,
                stdout: self.stdout,
            })
        }
    }
}

/// Runs a complete command line and reports how it finished
pub trait CommandRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, ImportError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &str) -> Result<CommandOutput, ImportError> {
        (**self).run(command)
    }
}

/// Runs commands through `bash -c`, capturing stdout silently
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    shell: PathBuf,
}

impl Default for ShellCommandRunner {
    fn default() -> Self {
        Self {
            shell: PathBuf::from("/bin/bash"),
        }
    }
}

impl ShellCommandRunner {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, ImportError> {
        let output = Command::new(&self.shell).arg("-c").arg(command).output()?;
        // Killed by a signal: no exit code
        let code = output.status.code().unwrap_or(-1);
        Ok(CommandOutput {
            code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Wrap a value in double quotes for the shell, escaping what bash expands
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}
