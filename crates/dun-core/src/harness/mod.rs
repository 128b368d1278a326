//! Harness abstraction: one uniform interface over heterogeneous LLM CLI
//! tools, plus lookup, execution, liveness, and availability persistence.
//!
//! # Architecture
//!
//! ```text
//! caller
//!   |
//!   v
//! execute_harness / ping_harness
//!   |
//!   v
//! HarnessRegistry --get("claude", config)--> Box<dyn Harness>
//!   |                                             |
//!   |    execute(cancel, prompt) -----------------+
//!   |         |
//!   |         v
//!   |    HarnessResult { response, error, duration, timestamp }
//!   |
//! HarnessCache <-- HarnessStatus rows from a diagnostics pass
//! ```
//!
//! The three live harnesses (claude, gemini, codex) share one
//! [`CliHarness`] implementation parameterized by a [`CliVariant`] table;
//! [`MockHarness`] is the test double used by the self-test flow.

pub mod cache;
pub mod cli;
pub mod mock;
pub mod registry;
pub mod run;
pub mod trait_def;
pub mod types;

pub use cache::{HarnessCache, cache_path};
pub use cli::{CliHarness, CliVariant};
pub use mock::MockHarness;
pub use registry::{HarnessFactory, HarnessRegistry, default_registry};
pub use run::{
    DEFAULT_EXECUTE_TIMEOUT, DEFAULT_PING_TIMEOUT, Liveness, execute_harness,
    execute_harness_with, ping_harness,
};
pub use trait_def::Harness;
pub use types::{
    AutomationMode, HarnessConfig, HarnessError, HarnessResult, HarnessStatus,
    ParseAutomationModeError,
};
