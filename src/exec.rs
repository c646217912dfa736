use std::io::Write as _;
use std::process::{Command, Output, Stdio};

use anyhow::{Context as _, Result};

use crate::error::TransferError;

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over external command execution.
///
/// All collaborator tools (gpg, flatpak, dconf, package managers) are
/// invoked through this seam so orchestration logic can be unit-tested
/// with a mock executor instead of real subprocesses. The production
/// implementation is [`SystemExecutor`].
pub trait Executor: Send + Sync {
    /// Run a command and return its output. Fails if the command exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command, allowing failure (returns result without bailing).
    ///
    /// # Errors
    ///
    /// Returns an error only if the program cannot be spawned at all.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with the given text piped to its stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned, stdin cannot be
    /// written, or the command exits non-zero.
    fn run_with_stdin(&self, program: &str, args: &[&str], input: &str) -> Result<ExecResult>;

    /// Check if a program is available on PATH.
    fn which(&self, program: &str) -> bool;
}

/// Production [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default)]
pub struct SystemExecutor;

/// Execute a prepared command, bailing on non-zero exit.
fn execute_checked(mut cmd: Command, label: &str) -> Result<ExecResult> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to execute: {label}"))?;
    let result = ExecResult::from(output);
    if !result.success {
        return Err(TransferError::Subprocess {
            command: label.to_string(),
            code: result.code.unwrap_or(-1),
            stderr: result.stderr.trim().to_string(),
        }
        .into());
    }
    Ok(result)
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, program)
    }

    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn run_with_stdin(&self, program: &str, args: &[&str], input: &str) -> Result<ExecResult> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to execute: {program}"))?;

        // Feed stdin from a separate thread while draining the output
        // pipes; writing it all up front deadlocks once the child fills
        // a pipe buffer with output of its own.
        let writer = child.stdin.take().map(|mut stdin| {
            let payload = input.to_string();
            std::thread::spawn(move || stdin.write_all(payload.as_bytes()))
        });

        let output = child
            .wait_with_output()
            .with_context(|| format!("failed to wait for {program}"))?;

        if let Some(writer) = writer {
            let written = writer
                .join()
                .map_err(|_| anyhow::anyhow!("stdin writer thread panicked"))?;
            match written {
                Ok(()) => {}
                // The child may exit without draining its stdin; its own
                // exit status decides whether the run failed.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to write stdin of {program}"))
                }
            }
        }
        let result = ExecResult::from(output);
        if !result.success {
            return Err(TransferError::Subprocess {
                command: program.to_string(),
                code: result.code.unwrap_or(-1),
                stderr: result.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(result)
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
