//! The `Harness` trait -- the adapter interface for LLM-backed CLI tools.
//!
//! Each concrete harness (Claude, Gemini, Codex, the mock) implements this
//! trait. The trait is intentionally object-safe so it can be stored as
//! `Box<dyn Harness>` and produced by factories in the
//! [`super::HarnessRegistry`].

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::types::{AutomationMode, HarnessError};

/// Adapter interface wrapping an external LLM-driven CLI tool.
///
/// Implementors translate a prompt into one subprocess invocation and its
/// stdout into the response. Execution must honor the caller's cancellation
/// token: a cancelled or timed-out execution kills the child process rather
/// than abandoning it.
#[async_trait]
pub trait Harness: Send + Sync {
    /// Registered name for this harness (e.g. "claude").
    fn name(&self) -> &str;

    /// Run the harness once with the given prompt and return its stdout.
    ///
    /// The prompt is passed as a subprocess argument, never via stdin. A
    /// configured `timeout > 0` derives a deadline on top of the caller's
    /// token; the tighter of the two wins.
    async fn execute(
        &self,
        cancel: &CancellationToken,
        prompt: &str,
    ) -> Result<String, HarnessError>;

    /// Whether this harness may run under the given automation mode.
    fn supports_automation(&self, mode: AutomationMode) -> bool;
}

impl std::fmt::Debug for dyn Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness").field("name", &self.name()).finish()
    }
}

// Compile-time assertion: Harness must be object-safe.
// If this line compiles, the trait can be used as `dyn Harness`.
const _: () = {
    fn _assert_object_safe(_: &dyn Harness) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// A trivial harness that echoes its prompt, used only to prove the
    /// trait can be implemented and used as `dyn Harness`.
    struct EchoHarness;

    #[async_trait]
    impl Harness for EchoHarness {
        fn name(&self) -> &str {
            "echo"
        }

        async fn execute(
            &self,
            _cancel: &CancellationToken,
            prompt: &str,
        ) -> Result<String, HarnessError> {
            Ok(prompt.to_string())
        }

        fn supports_automation(&self, _mode: AutomationMode) -> bool {
            true
        }
    }

    #[test]
    fn harness_is_object_safe() {
        // If this compiles, the trait is object-safe.
        let harness: Box<dyn Harness> = Box::new(EchoHarness);
        assert_eq!(harness.name(), "echo");
    }

    #[tokio::test]
    async fn echo_harness_executes() {
        let harness: Box<dyn Harness> = Box::new(EchoHarness);
        let cancel = CancellationToken::new();
        let out = harness.execute(&cancel, "hello").await.unwrap();
        assert_eq!(out, "hello");
        assert!(harness.supports_automation(AutomationMode::Yolo));
    }
}
