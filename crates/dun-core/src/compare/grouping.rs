//! Clustering a set of independent harness responses into agreement groups.

use super::comparator::SemanticComparator;
use crate::harness::HarnessResult;

/// A cluster of responses judged equivalent by the comparator.
///
/// Derived, never persisted. Membership over a `group_by_agreement` output
/// is a strict partition of the non-errored input results.
#[derive(Debug, Clone)]
pub struct AgreementGroup {
    pub members: Vec<HarnessResult>,
    /// Response of the group's founding member; new candidates are compared
    /// against this.
    pub canonical: String,
    /// Confidence of the comparison that most recently admitted a member.
    /// 1.0 for a singleton. Not an aggregate.
    pub confidence: f64,
}

/// Cluster `results` into agreement groups, ordered by descending member
/// count (stable on discovery order), so `groups[0]` holds the majority
/// answer. Errored results are dropped and never vote.
///
/// Each surviving result joins the first existing group whose canonical
/// response it matches, else founds a new singleton.
pub fn group_by_agreement(
    results: &[HarnessResult],
    comparator: Option<&SemanticComparator>,
) -> Vec<AgreementGroup> {
    let default;
    let comparator = match comparator {
        Some(c) => c,
        None => {
            default = SemanticComparator::default();
            &default
        }
    };

    let mut groups: Vec<AgreementGroup> = Vec::new();
    for result in results {
        if result.is_err() {
            continue;
        }

        let joined = groups.iter_mut().find_map(|group| {
            let verdict = comparator.compare(&result.response, &group.canonical);
            verdict.matched.then_some((group, verdict.confidence))
        });

        match joined {
            Some((group, confidence)) => {
                group.members.push(result.clone());
                group.confidence = confidence;
            }
            None => groups.push(AgreementGroup {
                canonical: result.response.clone(),
                members: vec![result.clone()],
                confidence: 1.0,
            }),
        }
    }

    // Stable sort keeps discovery order among equal-sized groups.
    groups.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
    groups
}
