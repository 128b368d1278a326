//! Shared value types for the harness layer.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-declared autonomy level for a harness invocation.
///
/// Each harness reports via [`super::Harness::supports_automation`] whether
/// it may run under a given mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationMode {
    /// A human drives every step.
    Manual,
    /// The harness may plan but not act.
    Plan,
    /// Unattended execution with standard guardrails.
    Auto,
    /// Unattended execution with all guardrails off.
    Yolo,
}

impl std::fmt::Display for AutomationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AutomationMode::Manual => "manual",
            AutomationMode::Plan => "plan",
            AutomationMode::Auto => "auto",
            AutomationMode::Yolo => "yolo",
        };
        f.write_str(s)
    }
}

/// Error returned when parsing an [`AutomationMode`] from a string.
#[derive(Debug, thiserror::Error)]
#[error("invalid automation mode {0:?} (expected manual, plan, auto, or yolo)")]
pub struct ParseAutomationModeError(String);

impl FromStr for AutomationMode {
    type Err = ParseAutomationModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(AutomationMode::Manual),
            "plan" => Ok(AutomationMode::Plan),
            "auto" => Ok(AutomationMode::Auto),
            "yolo" => Ok(AutomationMode::Yolo),
            other => Err(ParseAutomationModeError(other.to_string())),
        }
    }
}

/// Construction-time configuration for a harness.
///
/// Captured by value when the harness is built and immutable thereafter.
/// The registry always overwrites [`name`](Self::name) with the registered
/// name before invoking a factory.
#[derive(Debug, Clone, Default)]
pub struct HarnessConfig {
    /// Registered harness name. Set by the registry on lookup.
    pub name: String,
    /// Override for the harness binary. `None` uses the variant default.
    pub command: Option<String>,
    /// Working directory for the subprocess, when set.
    pub work_dir: Option<PathBuf>,
    /// Per-execution deadline. [`Duration::ZERO`] means no deadline.
    pub timeout: Duration,
    /// Declared autonomy level. `None` means the caller left it unset.
    pub automation: Option<AutomationMode>,
    /// Extra environment variables merged into the subprocess environment.
    pub env: HashMap<String, String>,
    /// Mock-only: the response to return.
    pub mock_response: String,
    /// Mock-only: return this error instead of a response.
    pub mock_error: Option<String>,
    /// Mock-only: simulated execution time before responding.
    pub mock_delay: Duration,
}

/// Errors from harness lookup, gating, and execution.
///
/// Variants fall into three classes: configuration errors
/// ([`UnknownHarness`](Self::UnknownHarness),
/// [`UnsupportedMode`](Self::UnsupportedMode)) surface before any subprocess
/// starts; execution errors ([`Spawn`](Self::Spawn),
/// [`Execution`](Self::Execution)) combine the process error with captured
/// stderr; cancellation errors ([`Cancelled`](Self::Cancelled),
/// [`DeadlineExceeded`](Self::DeadlineExceeded)) mean the child was killed
/// before it finished.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarnessError {
    #[error("unknown harness: {0}")]
    UnknownHarness(String),

    #[error("{harness} does not support automation mode {mode}")]
    UnsupportedMode {
        harness: String,
        mode: AutomationMode,
    },

    #[error("failed to start {harness} (command: {command}): {message}")]
    Spawn {
        harness: String,
        command: String,
        message: String,
    },

    #[error("{harness} execution failed: {detail}")]
    Execution { harness: String, detail: String },

    #[error("{harness} cancelled before completion")]
    Cancelled { harness: String },

    #[error("{harness} timed out after {timeout:?}")]
    DeadlineExceeded { harness: String, timeout: Duration },
}

/// One harness execution, success or failure.
///
/// Duration and timestamp are always populated; a failed execution mirrors
/// its error into [`error`](Self::error) with an empty response.
#[derive(Debug, Clone)]
pub struct HarnessResult {
    /// Name of the harness that produced this result.
    pub harness: String,
    /// Captured stdout, verbatim. Empty on failure.
    pub response: String,
    /// The execution error, if any.
    pub error: Option<HarnessError>,
    /// Wall-clock time spent in the execution.
    pub duration: Duration,
    /// When the execution started.
    pub timestamp: DateTime<Utc>,
}

impl HarnessResult {
    /// Whether this result carries an error.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

/// Last-known availability and liveness of one harness, as probed by a
/// diagnostics pass and persisted via [`super::HarnessCache`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarnessStatus {
    pub name: String,
    pub command: String,
    pub available: bool,
    #[serde(default)]
    pub detail: String,
    pub live: bool,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub live_detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn automation_mode_roundtrips_through_strings() {
        for mode in [
            AutomationMode::Manual,
            AutomationMode::Plan,
            AutomationMode::Auto,
            AutomationMode::Yolo,
        ] {
            let parsed: AutomationMode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn automation_mode_rejects_garbage() {
        let err = "turbo".parse::<AutomationMode>().unwrap_err();
        assert!(err.to_string().contains("turbo"), "got: {err}");
    }

    #[test]
    fn automation_mode_serde_uses_lowercase() {
        let json = serde_json::to_string(&AutomationMode::Yolo).unwrap();
        assert_eq!(json, "\"yolo\"");
        let back: AutomationMode = serde_json::from_str("\"plan\"").unwrap();
        assert_eq!(back, AutomationMode::Plan);
    }

    #[test]
    fn config_default_has_no_deadline() {
        let config = HarnessConfig::default();
        assert!(config.timeout.is_zero());
        assert!(config.automation.is_none());
        assert!(config.command.is_none());
    }

    #[test]
    fn error_messages_match_contract() {
        let err = HarnessError::UnknownHarness("missing".to_string());
        assert_eq!(err.to_string(), "unknown harness: missing");

        let err = HarnessError::UnsupportedMode {
            harness: "claude".to_string(),
            mode: AutomationMode::Yolo,
        };
        assert_eq!(
            err.to_string(),
            "claude does not support automation mode yolo"
        );
    }

    #[test]
    fn status_serde_field_names() {
        let status = HarnessStatus {
            name: "claude".to_string(),
            command: "claude".to_string(),
            available: true,
            detail: String::new(),
            live: true,
            model: "opus".to_string(),
            live_detail: String::new(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["name"], "claude");
        assert_eq!(json["live_detail"], "");
        assert_eq!(json["available"], true);
    }
}
