//! Subprocess execution.
//!
//! Every external command (git, pm2 and user-declared steps) goes through a
//! [`CommandRunner`], so the update procedure can be driven by a recording
//! fake in tests.

use crate::error::Error;
use anyhow::Context;
use colored::Colorize;
use std::process::{Command, Stdio};

/// Callback invoked with each command line right before it runs.
pub type CommandLogger = fn(&str);

pub fn verbose_logger(command: &str) {
    eprintln!("  {} {}", "$".dimmed(), command.dimmed());
}

pub fn no_op_logger(_command: &str) {}

/// What the core needs to know about a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured stdout; empty when output was shown live.
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "a signal".to_string(),
        }
    }
}

pub trait CommandRunner {
    /// Runs a shell command line in the current working directory.
    ///
    /// With `show_output` the child inherits stdout/stderr; otherwise both
    /// are captured. An `Err` means the command could not be started at all.
    fn run(&self, command: &str, show_output: bool) -> anyhow::Result<CommandOutput>;
}

/// Runs commands through the platform shell.
#[derive(Debug, Clone, Copy)]
pub struct ShellRunner {
    logger: CommandLogger,
}

impl ShellRunner {
    pub fn new(logger: CommandLogger) -> Self {
        Self { logger }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(no_op_logger)
    }
}

fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, show_output: bool) -> anyhow::Result<CommandOutput> {
        (self.logger)(command);
        log::debug!("running `{}` (show_output={})", command, show_output);

        let mut cmd = shell_command(command);
        if show_output {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .with_context(|| format!("Failed to execute `{}`", command))?;
            return Ok(CommandOutput {
                code: status.code(),
                ..CommandOutput::default()
            });
        }

        let output = cmd
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute `{}`", command))?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs `command` and turns a non-zero exit into [`Error::CommandFailed`].
pub fn run_checked(
    runner: &dyn CommandRunner,
    command: &str,
    show_output: bool,
) -> anyhow::Result<CommandOutput> {
    let output = runner.run(command, show_output)?;
    if output.is_success() {
        Ok(output)
    } else {
        Err(Error::CommandFailed {
            command: command.to_string(),
            status: output.status_text(),
            stderr: output.stderr.trim().to_string(),
        }
        .into())
    }
}

/// Quotes `args` into one command line and runs it with output captured,
/// returning trimmed stdout.
pub fn run_args(runner: &dyn CommandRunner, args: &[&str]) -> anyhow::Result<String> {
    let command = shell_words::join(args);
    let output = run_checked(runner, &command, false)?;
    Ok(output.stdout.trim().to_string())
}
