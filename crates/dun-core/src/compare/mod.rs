//! Reconciling non-deterministic harness answers.
//!
//! Pipeline, leaves first: [`ResponseNormalizer`] strips cosmetic noise,
//! [`SemanticComparator`] escalates through exact / structural / semantic
//! similarity tiers, and [`group_by_agreement`] clusters a set of
//! [`crate::harness::HarnessResult`]s into [`AgreementGroup`]s so the
//! caller can read off the majority answer.

pub mod comparator;
pub mod diff;
pub mod distance;
pub mod grouping;
pub mod normalize;

pub use comparator::{Comparison, MatchLevel, SemanticComparator};
pub use diff::unified_diff;
pub use distance::{char_distance, levenshtein, similarity};
pub use grouping::{AgreementGroup, group_by_agreement};
pub use normalize::ResponseNormalizer;
