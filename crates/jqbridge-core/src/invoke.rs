//! Subprocess executor: one spawn-write-drain-await lifecycle per call.
//!
//! The executor never classifies success or failure — it resolves with
//! whatever was captured (stdout, stderr, exit code) and leaves
//! interpretation to [`classify`]. The only error paths are a failed spawn
//! and an expired deadline.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::error::{JqError, JqResult};

/// Placeholder returned when a successful call produced no output.
pub const NULL_SENTINEL: &str = "null";

/// Placeholder returned when a conditional filter matched nothing.
pub const NO_MATCHES_SENTINEL: &str = "No matches found";

/// One interpreter invocation: an ordered argument list plus optional input.
///
/// Immutable once constructed; created fresh per call.
#[derive(Debug, Clone)]
pub struct JqRequest {
    /// Flags and bindings followed by the filter expression.
    pub args: Vec<String>,
    /// Text written to the child's stdin, if any.
    pub input: Option<String>,
}

impl JqRequest {
    /// Create a request with no input.
    pub fn new(args: Vec<String>) -> Self {
        Self { args, input: None }
    }

    /// Attach input text to be written to the child's stdin.
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

/// Captured output of one interpreter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JqOutput {
    /// Stdout text, trimmed of surrounding whitespace.
    pub stdout: String,
    /// Stderr text, trimmed of surrounding whitespace.
    pub stderr: String,
    /// Exit code. A missing code (signal death) maps to 0.
    pub code: i64,
}

impl JqOutput {
    /// True if the exit code was zero.
    pub fn ok(&self) -> bool {
        self.code == 0
    }
}

/// Runs jq invocations. Holds the binary name and the optional deadline —
/// no process-wide state, no caching of availability.
#[derive(Debug, Clone)]
pub struct JqExecutor {
    binary: String,
    timeout: Option<Duration>,
}

impl Default for JqExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl JqExecutor {
    /// Executor resolving `jq` from the search path, with no deadline.
    pub fn new() -> Self {
        Self {
            binary: "jq".to_string(),
            timeout: None,
        }
    }

    /// Use a specific binary name or path instead of `jq`.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Bound each invocation's wait. Without this, a hung child blocks the
    /// call indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The binary this executor spawns.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Spawn one child, write input, drain both output streams concurrently,
    /// and await termination.
    pub async fn invoke(&self, request: JqRequest) -> JqResult<JqOutput> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(&request.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                JqError::Unavailable
            } else {
                JqError::Spawn(e)
            }
        })?;

        // Drain both streams concurrently so neither pipe can fill and stall
        // the child while the other side waits.
        let mut stdout_pipe = child.stdout.take();
        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(pipe) = stdout_pipe.as_mut() {
                let _ = pipe.read_to_end(&mut buf).await;
            }
            buf
        });
        let mut stderr_pipe = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(pipe) = stderr_pipe.as_mut() {
                let _ = pipe.read_to_end(&mut buf).await;
            }
            buf
        });

        // Write input in full, then drop the handle to signal end-of-input.
        // jq may exit before consuming everything (e.g. `first` on a long
        // stream); the resulting broken pipe is an expected race and must not
        // fail the call. No write error fails the call — we proceed to await
        // the child either way.
        if let Some(mut stdin) = child.stdin.take() {
            if let Some(input) = &request.input {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    tracing::debug!(
                        binary = %self.binary,
                        error = %e,
                        "stdin write failed; child likely exited early"
                    );
                }
            }
            drop(stdin);
        }

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    return Err(JqError::Timeout {
                        ms: limit.as_millis() as u64,
                    });
                }
            },
            None => child.wait().await,
        };
        let status = status.map_err(JqError::Spawn)?;

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(JqOutput {
            stdout: String::from_utf8_lossy(&stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            code: status.code().map(i64::from).unwrap_or(0),
        })
    }

    /// Availability probe: run `--version` with no input.
    ///
    /// Success is exit code 0, independent of output content. Returns the
    /// version text. Called once at startup; never cached — a later call
    /// still fails on its own if jq disappears mid-session.
    pub async fn probe(&self) -> JqResult<String> {
        let output = self
            .invoke(JqRequest::new(vec!["--version".to_string()]))
            .await?;
        if output.ok() {
            Ok(output.stdout)
        } else {
            Err(JqError::Unavailable)
        }
    }
}

/// Shared post-processing contract for every jq-backed operation.
///
/// A call failed only when the exit code is non-zero AND stderr is non-empty.
/// A non-zero exit with empty stderr is success — callers depend on this for
/// operations that exit non-zero on benign conditions such as empty result
/// sets. Empty output on the success path is replaced with `empty_fallback`
/// so callers always receive non-empty text.
pub fn classify(tool: &str, output: JqOutput, empty_fallback: &str) -> JqResult<String> {
    if !output.ok() && !output.stderr.is_empty() {
        return Err(JqError::Interpreter {
            message: format!("{} failed: {}", tool, output.stderr),
            code: output.code,
            stderr: output.stderr,
        });
    }
    if output.stdout.is_empty() {
        Ok(empty_fallback.to_string())
    } else {
        Ok(output.stdout)
    }
}
