//! Convenience entry points combining registry lookup, automation-mode
//! gating, timing, and liveness-response parsing.

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::registry::HarnessRegistry;
use super::types::{AutomationMode, HarnessConfig, HarnessError, HarnessResult};

/// Deadline substituted by [`execute_harness`] when the caller passes no
/// timeout of its own.
pub const DEFAULT_EXECUTE_TIMEOUT: Duration = Duration::from_secs(120);

/// Deadline substituted by [`ping_harness`] when the config carries none.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed probe prompt sent by [`ping_harness`].
const PROBE_PROMPT: &str = "Health check. Reply with exactly one line of JSON \
    in the form {\"ok\":true,\"model\":\"<your model name>\"} and no other text.";

/// Outcome of one liveness probe.
///
/// `live` is true whenever the process answered at all, even when the
/// answer could not be parsed; a hard execution failure is the only thing
/// that makes it false.
#[derive(Debug, Clone, PartialEq)]
pub struct Liveness {
    pub live: bool,
    pub model: String,
    pub detail: String,
    pub duration: Duration,
}

/// Look up `name` in `registry`, gate on `mode`, execute `prompt`, and
/// return a [`HarnessResult`] with duration and timestamp populated whether
/// the execution succeeded or failed. Any error is mirrored into
/// [`HarnessResult::error`].
pub async fn execute_harness(
    cancel: &CancellationToken,
    registry: &HarnessRegistry,
    name: &str,
    prompt: &str,
    mode: AutomationMode,
    work_dir: Option<&Path>,
) -> HarnessResult {
    let config = HarnessConfig {
        automation: Some(mode),
        work_dir: work_dir.map(Path::to_path_buf),
        ..Default::default()
    };
    execute_harness_with(cancel, registry, name, prompt, config).await
}

/// Like [`execute_harness`], but with a caller-supplied [`HarnessConfig`]
/// so a command override, env vars, or a resolved timeout reach the
/// execution. A zero timeout is replaced with [`DEFAULT_EXECUTE_TIMEOUT`];
/// an unset automation mode defaults to [`AutomationMode::Auto`].
pub async fn execute_harness_with(
    cancel: &CancellationToken,
    registry: &HarnessRegistry,
    name: &str,
    prompt: &str,
    mut config: HarnessConfig,
) -> HarnessResult {
    let timestamp = Utc::now();
    let started = Instant::now();

    if config.timeout.is_zero() {
        config.timeout = DEFAULT_EXECUTE_TIMEOUT;
    }
    let mode = *config.automation.get_or_insert(AutomationMode::Auto);

    let failed = |error: HarnessError, started: Instant| HarnessResult {
        harness: name.to_string(),
        response: String::new(),
        error: Some(error),
        duration: started.elapsed(),
        timestamp,
    };

    let harness = match registry.get(name, config) {
        Ok(harness) => harness,
        Err(e) => return failed(e, started),
    };

    if !harness.supports_automation(mode) {
        return failed(
            HarnessError::UnsupportedMode {
                harness: name.to_string(),
                mode,
            },
            started,
        );
    }

    debug!(harness = name, %mode, "executing harness");
    match harness.execute(cancel, prompt).await {
        Ok(response) => HarnessResult {
            harness: name.to_string(),
            response,
            error: None,
            duration: started.elapsed(),
            timestamp,
        },
        Err(e) => failed(e, started),
    }
}

/// Probe the harness registered under `name` with a short fixed prompt and
/// report whether it is live and which model it claims to run.
///
/// `config.automation` defaults to [`AutomationMode::Auto`] and
/// `config.timeout` to [`DEFAULT_PING_TIMEOUT`] when unset. Lookup failure
/// is the only hard error; an execution failure is reported as
/// `live = false` with the error text in `detail`.
pub async fn ping_harness(
    cancel: &CancellationToken,
    registry: &HarnessRegistry,
    name: &str,
    mut config: HarnessConfig,
) -> Result<Liveness, HarnessError> {
    if config.automation.is_none() {
        config.automation = Some(AutomationMode::Auto);
    }
    if config.timeout.is_zero() {
        config.timeout = DEFAULT_PING_TIMEOUT;
    }

    let started = Instant::now();
    let harness = registry.get(name, config)?;

    match harness.execute(cancel, PROBE_PROMPT).await {
        Ok(response) => {
            let mut liveness = parse_probe_response(&response);
            liveness.duration = started.elapsed();
            Ok(liveness)
        }
        Err(e) => Ok(Liveness {
            live: false,
            model: String::new(),
            detail: e.to_string(),
            duration: started.elapsed(),
        }),
    }
}

/// Parse a liveness-probe reply, tolerating surrounding prose.
///
/// Tries, in order: the substring between the first `{` and the last `}`
/// as JSON; a `model:`/`model=` token scan; otherwise an "unexpected
/// response" with no model. All three leave `live = true` -- the process
/// answered.
fn parse_probe_response(response: &str) -> Liveness {
    let live = |model: &str, detail: &str| Liveness {
        live: true,
        model: model.to_string(),
        detail: detail.to_string(),
        duration: Duration::ZERO,
    };

    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&response[start..=end]) {
                let model = value
                    .get("model")
                    .and_then(|m| m.as_str())
                    .unwrap_or("")
                    .trim();
                let model = if model.is_empty() { "unknown" } else { model };
                return live(model, "");
            }
        }
    }

    if let Some(model) = scan_model_token(response) {
        return live(&model, "non-json response");
    }

    live("", "unexpected response")
}

/// Scan whitespace-separated tokens for `model:<name>` / `model=<name>`
/// (or the separator followed by the name in the next token) and return
/// the name trimmed of quotes and punctuation.
fn scan_model_token(response: &str) -> Option<String> {
    const TRIM: &[char] = &['"', '\'', ',', '.', ';', ':', ')', '(', '!', '?'];

    let mut tokens = response.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        let lower = token.to_ascii_lowercase();
        if !lower.starts_with("model:") && !lower.starts_with("model=") {
            continue;
        }
        let rest = &token["model:".len()..];

        let candidate = if rest.is_empty() {
            tokens.peek().copied().unwrap_or("")
        } else {
            rest
        };
        let candidate = candidate.trim_matches(TRIM);
        if !candidate.is_empty() {
            return Some(candidate.to_string());
        }
    }
    None
}
