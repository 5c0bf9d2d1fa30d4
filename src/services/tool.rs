use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

/// Upper bound on tool output carried into a reply note.
pub const MAX_DIAGNOSTIC_BYTES: usize = 4096;

/// A single external tool invocation: program, arguments, working directory
/// and deadline.
///
/// The child is killed if it outlives its deadline or if the future driving
/// it is dropped, e.g. when the client of the request goes away.
#[derive(Debug, Clone)]
pub struct Tool {
    label: String,
    program: String,
    args: Vec<OsString>,
    dir: Option<PathBuf>,
    timeout: Duration,
}

#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Tool {
    pub fn new(label: impl Into<String>, program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            label: label.into(),
            program: program.into(),
            args: Vec::new(),
            dir: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.dir = Some(dir.to_path_buf());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs the tool and returns its output whatever the exit status.
    pub async fn output(&self) -> AppResult<ToolOutput> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.dir {
            command.current_dir(dir);
        }

        debug!(tool = %self.label, program = %self.program, args = ?self.args, "running tool");
        let start = Instant::now();

        let child = command.spawn().map_err(|e| AppError::ToolUnavailable {
            tool: self.label.clone(),
            message: format!("{}: {}", self.program, e),
        })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| {
                AppError::internal(format!("failed waiting for {}: {}", self.label, e))
            })?,
            Err(_) => {
                warn!(
                    tool = %self.label,
                    timeout_seconds = self.timeout.as_secs(),
                    "tool exceeded its deadline and was killed"
                );
                return Err(AppError::Timeout {
                    tool: self.label.clone(),
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let output = ToolOutput {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        };

        info!(
            tool = %self.label,
            exit_code = ?output.code(),
            duration_ms = start.elapsed().as_millis() as u64,
            "tool finished"
        );

        Ok(output)
    }

    /// Runs the tool, treating any non-zero exit as fatal.
    pub async fn run(&self) -> AppResult<ToolOutput> {
        let output = self.output().await?;
        if output.success() {
            Ok(output)
        } else {
            Err(self.failure(&output))
        }
    }

    pub fn failure(&self, output: &ToolOutput) -> AppError {
        let detail = output.diagnostic();
        warn!(tool = %self.label, exit_code = ?output.code(), detail = %detail, "tool failed");
        AppError::ToolFailed {
            tool: self.label.clone(),
            code: output.code(),
            detail,
        }
    }
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Bounded summary of what the tool printed, stderr first.
    pub fn diagnostic(&self) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr);
        let stdout = String::from_utf8_lossy(&self.stdout);
        let combined = [stderr.trim(), stdout.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if combined.is_empty() {
            "no output".to_string()
        } else {
            bounded_tail(&combined, MAX_DIAGNOSTIC_BYTES)
        }
    }
}

/// Keeps the last `limit` bytes of `text`, cut on a char boundary.
pub fn bounded_tail(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut start = text.len() - limit;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &text[start..])
}
