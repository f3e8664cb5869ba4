// NetCommand - Command Execution
// SPDX-License-Identifier: MIT

//! External command execution.
//!
//! Every privileged network operation in this tool shells out to an OS
//! command (`netsh`, `ipconfig`, `ping`, `powershell`). This module runs
//! those commands with a bounded timeout, captures their full output, and
//! reports failures as values instead of errors: callers inspect the
//! [`CommandOutput`] and decide what a non-zero exit means for them.

use std::process::Stdio;
use std::time::Duration;

use tracing::{debug, warn};

/// Default upper bound on how long a spawned command may run.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// A command invocation: program name plus arguments.
///
/// Built as a plain value so command construction can be tested without
/// spawning anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    pub program: String,
    pub args: Vec<String>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Single-line rendering for logs and status messages.
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// How a spawned command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    /// The process ran to completion with this exit code.
    Exited(i32),
    /// The process exceeded the timeout and was killed.
    TimedOut,
    /// The process could not be spawned at all.
    SpawnFailed,
}

/// Captured result of one command invocation. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitDisposition,
}

impl CommandOutput {
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: ExitDisposition::Exited(code),
        }
    }

    fn timed_out(cmd: &Cmd, timeout: Duration) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!(
                "command '{}' killed after {}s timeout",
                cmd.display_line(),
                timeout.as_secs()
            ),
            status: ExitDisposition::TimedOut,
        }
    }

    fn spawn_failed(cmd: &Cmd, error: &std::io::Error) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("failed to spawn '{}': {}", cmd.program, error),
            status: ExitDisposition::SpawnFailed,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self.status, ExitDisposition::Exited(0))
    }

    /// Exit code with -1 standing in for killed or unspawnable commands.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            ExitDisposition::Exited(code) => code,
            ExitDisposition::TimedOut | ExitDisposition::SpawnFailed => -1,
        }
    }

    /// Best human-readable explanation of a failure: stderr when the
    /// command wrote one, otherwise whatever it printed to stdout.
    pub fn failure_reason(&self) -> String {
        if !self.stderr.is_empty() {
            self.stderr.clone()
        } else {
            self.stdout.clone()
        }
    }
}

/// Seam between command construction and command execution.
///
/// Services are generic over this trait so their command sequencing can be
/// verified against a scripted runner without touching the host.
pub trait Execute: Send + Sync {
    fn run(&self, cmd: Cmd) -> impl std::future::Future<Output = CommandOutput> + Send;
}

impl<T: Execute> Execute for std::sync::Arc<T> {
    fn run(&self, cmd: Cmd) -> impl std::future::Future<Output = CommandOutput> + Send {
        (**self).run(cmd)
    }
}

/// Runs commands via the OS, one child process per call.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl CommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Execute for CommandRunner {
    async fn run(&self, cmd: Cmd) -> CommandOutput {
        debug!("Running: {}", cmd.display_line());

        let mut command = tokio::process::Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // If the timeout fires, dropping the output future must take
            // the child down with it.
            .kill_on_drop(true);

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        // `output()` drains stdout and stderr to EOF, so a chatty child
        // cannot deadlock on a full pipe buffer.
        match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_elapsed) => {
                warn!(
                    "Command '{}' exceeded {}s timeout, killed",
                    cmd.display_line(),
                    self.timeout.as_secs()
                );
                CommandOutput::timed_out(&cmd, self.timeout)
            }
            Ok(Err(e)) => {
                warn!("Failed to spawn '{}': {}", cmd.program, e);
                CommandOutput::spawn_failed(&cmd, &e)
            }
            Ok(Ok(output)) => {
                let code = output.status.code().unwrap_or(-1);
                if code != 0 {
                    debug!("Command '{}' exited with {}", cmd.display_line(), code);
                }
                CommandOutput::exited(
                    code,
                    String::from_utf8_lossy(&output.stdout).trim().to_string(),
                    String::from_utf8_lossy(&output.stderr).trim().to_string(),
                )
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmd_builder_and_display() {
        let cmd = Cmd::new("netsh")
            .args(["interface", "ip"])
            .arg("set");
        assert_eq!(cmd.program, "netsh");
        assert_eq!(cmd.args, vec!["interface", "ip", "set"]);
        assert_eq!(cmd.display_line(), "netsh interface ip set");
    }

    #[test]
    fn failure_reason_prefers_stderr() {
        let out = CommandOutput::exited(1, "partial output", "real error");
        assert_eq!(out.failure_reason(), "real error");

        let out = CommandOutput::exited(1, "only stdout", "");
        assert_eq!(out.failure_reason(), "only stdout");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_exit_code_and_output() {
        let runner = CommandRunner::default();
        let out = runner
            .run(Cmd::new("sh").args(["-c", "echo hello; echo oops >&2; exit 3"]))
            .await;
        assert_eq!(out.status, ExitDisposition::Exited(3));
        assert_eq!(out.exit_code(), 3);
        assert_eq!(out.stdout, "hello");
        assert_eq!(out.stderr, "oops");
        assert!(!out.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn zero_exit_is_success() {
        let runner = CommandRunner::default();
        let out = runner.run(Cmd::new("sh").args(["-c", "exit 0"])).await;
        assert!(out.success());
        assert_eq!(out.exit_code(), 0);
    }

    #[tokio::test]
    async fn unspawnable_command_reports_spawn_failure() {
        let runner = CommandRunner::default();
        let out = runner
            .run(Cmd::new("netcommand-test-no-such-program-71f3"))
            .await;
        assert_eq!(out.status, ExitDisposition::SpawnFailed);
        assert_eq!(out.exit_code(), -1);
        assert!(!out.stderr.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn long_running_command_is_killed() {
        let runner = CommandRunner::new(Duration::from_millis(100));
        let out = runner.run(Cmd::new("sleep").arg("10")).await;
        assert_eq!(out.status, ExitDisposition::TimedOut);
        assert_eq!(out.exit_code(), -1);
        assert!(out.stderr.contains("timeout"));
    }
}
