//! Mock harness for tests and the self-test flow.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::trait_def::Harness;
use super::types::{AutomationMode, HarnessConfig, HarnessError};

/// Test double returning a configured response or error after a configured
/// delay, without spawning any subprocess.
///
/// The delay races the caller's cancellation token and the configured
/// timeout, so the mock exhibits the same cancellation and deadline
/// behavior as a live harness.
#[derive(Debug)]
pub struct MockHarness {
    config: HarnessConfig,
}

impl MockHarness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Harness for MockHarness {
    fn name(&self) -> &str {
        if self.config.name.is_empty() {
            "mock"
        } else {
            &self.config.name
        }
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        _prompt: &str,
    ) -> Result<String, HarnessError> {
        let timeout = self.config.timeout;
        let deadline = async {
            if timeout.is_zero() {
                std::future::pending::<()>().await;
            } else {
                tokio::time::sleep(timeout).await;
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(self.config.mock_delay) => {}
            _ = cancel.cancelled() => {
                return Err(HarnessError::Cancelled {
                    harness: self.name().to_string(),
                });
            }
            _ = deadline => {
                return Err(HarnessError::DeadlineExceeded {
                    harness: self.name().to_string(),
                    timeout,
                });
            }
        }

        match &self.config.mock_error {
            Some(message) => Err(HarnessError::Execution {
                harness: self.name().to_string(),
                detail: message.clone(),
            }),
            None => Ok(self.config.mock_response.clone()),
        }
    }

    fn supports_automation(&self, _mode: AutomationMode) -> bool {
        true
    }
}
