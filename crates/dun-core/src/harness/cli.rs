//! Subprocess harness for the three live CLI tools.
//!
//! Claude, Gemini, and Codex differ only in their default binary and argv
//! shape, so a single [`CliHarness`] is parameterized by a [`CliVariant`]
//! table instead of three structurally identical implementations.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::trait_def::Harness;
use super::types::{AutomationMode, HarnessConfig, HarnessError};

/// The live CLI tools this crate knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVariant {
    Claude,
    Gemini,
    Codex,
}

impl CliVariant {
    /// Registered harness name for this variant.
    pub fn name(self) -> &'static str {
        match self {
            CliVariant::Claude => "claude",
            CliVariant::Gemini => "gemini",
            CliVariant::Codex => "codex",
        }
    }

    /// Binary to invoke when the config carries no command override.
    pub fn default_command(self) -> &'static str {
        // All three CLIs install under their harness name.
        self.name()
    }

    /// Build the argv for a fully-autonomous, non-interactive run.
    ///
    /// The prompt is always an argv element, never piped via stdin.
    fn build_args(self, prompt: &str) -> Vec<String> {
        match self {
            CliVariant::Claude => vec![
                "-p".to_string(),
                prompt.to_string(),
                "--output-format".to_string(),
                "text".to_string(),
                "--dangerously-skip-permissions".to_string(),
            ],
            CliVariant::Gemini => vec![
                "-p".to_string(),
                prompt.to_string(),
                "--yolo".to_string(),
            ],
            CliVariant::Codex => vec![
                "exec".to_string(),
                "--full-auto".to_string(),
                prompt.to_string(),
            ],
        }
    }
}

/// Harness wrapping one of the live CLI tools as a subprocess.
///
/// stdout is captured verbatim as the response; stderr is captured only for
/// error construction. `config.work_dir` and `config.env` apply to the
/// child when set.
#[derive(Debug)]
pub struct CliHarness {
    variant: CliVariant,
    config: HarnessConfig,
}

impl CliHarness {
    pub fn new(variant: CliVariant, config: HarnessConfig) -> Self {
        Self { variant, config }
    }

    /// The binary this harness will invoke.
    pub fn command(&self) -> &str {
        self.config
            .command
            .as_deref()
            .unwrap_or_else(|| self.variant.default_command())
    }
}

/// Read a child pipe to EOF, lossily decoding to a String.
async fn drain<R>(pipe: Option<R>) -> String
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Sleep until the given deadline, or forever when there is none.
async fn expire_at(at: Option<tokio::time::Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

#[async_trait]
impl Harness for CliHarness {
    fn name(&self) -> &str {
        if self.config.name.is_empty() {
            self.variant.name()
        } else {
            &self.config.name
        }
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        prompt: &str,
    ) -> Result<String, HarnessError> {
        let command = self.command().to_string();
        let args = self.variant.build_args(prompt);
        // The deadline is taken before the command is built, so it bounds
        // the whole invocation even over an undeadlined caller token.
        let timeout = self.config.timeout;
        let deadline = (!timeout.is_zero()).then(|| tokio::time::Instant::now() + timeout);
        let expiry = expire_at(deadline);
        tokio::pin!(expiry);

        let mut cmd = Command::new(&command);
        cmd.args(&args);
        if let Some(dir) = &self.config.work_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.config.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!(harness = self.name(), %command, "spawning harness subprocess");

        let mut child = cmd.spawn().map_err(|e| HarnessError::Spawn {
            harness: self.name().to_string(),
            command: command.clone(),
            message: format!("{e} -- is it installed and on PATH?"),
        })?;

        // Read stdout/stderr on their own tasks so a full pipe buffer can
        // never deadlock the child while we wait on it.
        let stdout_task = tokio::spawn(drain(child.stdout.take()));
        let stderr_task = tokio::spawn(drain(child.stderr.take()));

        let status = tokio::select! {
            status = child.wait() => status,
            _ = cancel.cancelled() => {
                warn!(harness = self.name(), "execution cancelled; killing child");
                let _ = child.kill().await;
                return Err(HarnessError::Cancelled {
                    harness: self.name().to_string(),
                });
            }
            _ = &mut expiry => {
                warn!(harness = self.name(), ?timeout, "deadline exceeded; killing child");
                let _ = child.kill().await;
                return Err(HarnessError::DeadlineExceeded {
                    harness: self.name().to_string(),
                    timeout,
                });
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        match status {
            Ok(status) if status.success() => Ok(stdout),
            Ok(status) => Err(HarnessError::Execution {
                harness: self.name().to_string(),
                detail: format!("{status}: {}", stderr.trim()),
            }),
            Err(e) => Err(HarnessError::Execution {
                harness: self.name().to_string(),
                detail: format!("failed to wait on child: {e}"),
            }),
        }
    }

    /// Always true, for every mode, including yolo.
    ///
    /// The argv emitted by [`CliVariant::build_args`] is the same
    /// fully-autonomous one regardless of the requested mode; "plan" and
    /// "manual" produce no more conservative flags. This permissive behavior
    /// is deliberate and callers gate on it at their own policy layer.
    fn supports_automation(&self, _mode: AutomationMode) -> bool {
        true
    }
}
