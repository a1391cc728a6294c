//! External command execution capability
//!
//! The build/test step runs toolchain commands inside a directory full of
//! generated, AI-influenced code. `HostExecutor` runs them with the same
//! privileges as this process and NO sandboxing: install scripts and build
//! plugins can do anything the host user can. That is a trust boundary
//! violation by construction. Real deployments should substitute an
//! implementation of `CommandExecutor` that runs inside an isolated
//! environment (container/VM/dedicated user with no host secrets and
//! restricted egress); the rest of the pipeline only sees this trait.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Captured streams and exit status of one command run
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout.lines().map(str::to_string).collect()
    }

    pub fn stderr_lines(&self) -> Vec<String> {
        self.stderr.lines().map(str::to_string).collect()
    }
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Command timed out after {seconds}s: {command}")]
    Timeout { command: String, seconds: u64 },

    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Capability to run an external command and capture its output
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run `program args..` in `cwd`, bounded by `timeout`
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<CommandOutput, ExecError>;

    fn name(&self) -> &str;
}

/// Runs commands directly on the host — see the module docs for why this is
/// only acceptable for local development
#[derive(Debug, Default, Clone, Copy)]
pub struct HostExecutor;

#[async_trait]
impl CommandExecutor for HostExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<CommandOutput, ExecError> {
        let rendered = render(program, args);
        info!(command = %rendered, cwd = %cwd.display(), "Running external command");

        let child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                warn!(command = %rendered, error = %source, "Command failed to start");
                return Err(ExecError::Spawn {
                    command: rendered,
                    source,
                });
            }
            Err(_) => {
                warn!(command = %rendered, timeout_secs = timeout.as_secs(), "Command timed out");
                return Err(ExecError::Timeout {
                    command: rendered,
                    seconds: timeout.as_secs(),
                });
            }
        };

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            command = %rendered,
            exit_code = ?result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "Command finished"
        );

        Ok(result)
    }

    fn name(&self) -> &str {
        "host"
    }
}

fn render(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Executor with a scripted queue of responses, for tests
///
/// Responses are consumed FIFO; every invocation's rendered command line is
/// recorded for assertions. An empty queue is an error so tests notice
/// unexpected extra invocations.
pub struct ScriptedExecutor {
    responses: Mutex<VecDeque<Result<CommandOutput, ExecError>>>,
    invocations: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub fn push_success(&self, stdout: impl Into<String>) {
        self.push_output(CommandOutput {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        });
    }

    pub fn push_failure(&self, exit_code: i32, stderr: impl Into<String>) {
        self.push_output(CommandOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        });
    }

    pub fn push_output(&self, output: CommandOutput) {
        self.responses.lock().unwrap().push_back(Ok(output));
    }

    pub fn push_error(&self, error: ExecError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Rendered command lines seen so far, in order
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Default for ScriptedExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: &Path,
        _timeout: Duration,
    ) -> Result<CommandOutput, ExecError> {
        let rendered = render(program, args);
        self.invocations.lock().unwrap().push(rendered.clone());

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ExecError::Spawn {
                    command: rendered,
                    source: std::io::Error::other("ScriptedExecutor: no more responses in queue"),
                })
            })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
