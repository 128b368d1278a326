//! Core library for `dun`: a uniform interface over heterogeneous LLM-backed
//! CLI tools ("harnesses") and the machinery to reconcile their
//! non-deterministic answers into a consensus.
//!
//! The two halves of the crate:
//!
//! - [`harness`] -- the [`harness::Harness`] trait, the concrete CLI and mock
//!   implementations, the [`harness::HarnessRegistry`], the execute/ping
//!   helpers, and the persisted availability cache.
//! - [`compare`] -- text normalization, three-tier similarity comparison,
//!   and agreement grouping over a set of harness responses.
//!
//! Execution is synchronous per call: `execute` blocks its caller until the
//! subprocess exits, fails, or the cancellation token fires. Fanning out to
//! several harnesses for later grouping is the caller's responsibility.

pub mod compare;
pub mod harness;
