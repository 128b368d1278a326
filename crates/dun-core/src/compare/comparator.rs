//! Three-tier similarity judgment over two normalized texts.

use super::diff::unified_diff;
use super::distance::{char_distance, levenshtein, similarity};
use super::normalize::ResponseNormalizer;

/// The tier at which a comparison was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLevel {
    /// Normalized strings are byte-equal.
    Exact,
    /// Line-level edit distance reached the threshold.
    Structural,
    /// Character-level edit distance reached (or fell short of) the
    /// threshold; also the level reported for a non-match.
    Semantic,
}

impl std::fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchLevel::Exact => "exact",
            MatchLevel::Structural => "structural",
            MatchLevel::Semantic => "semantic",
        };
        f.write_str(s)
    }
}

/// Verdict from [`SemanticComparator::compare`].
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub matched: bool,
    pub level: MatchLevel,
    /// Similarity in [0, 1]; exactly 1.0 only for post-normalization
    /// equality.
    pub confidence: f64,
    /// Unified-style line diff. Empty whenever `matched` is true.
    pub diff: String,
}

/// Escalating exact / structural / semantic comparator over normalized
/// texts. `SemanticComparator::default()` uses threshold 0.95 and the
/// default normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticComparator {
    pub normalizer: ResponseNormalizer,
    /// Minimum similarity for the structural and semantic tiers, in [0, 1].
    pub threshold: f64,
}

impl Default for SemanticComparator {
    fn default() -> Self {
        Self {
            normalizer: ResponseNormalizer::default(),
            threshold: 0.95,
        }
    }
}

impl SemanticComparator {
    /// Comparator with a custom threshold (clamped to [0, 1]) and the
    /// default normalizer.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Compare two texts, stopping at the first tier that succeeds.
    ///
    /// Two texts that both normalize to empty are an exact match, so two
    /// comment-only replies never read as a disagreement.
    pub fn compare(&self, a: &str, b: &str) -> Comparison {
        let na = self.normalizer.normalize(a);
        let nb = self.normalizer.normalize(b);

        if na == nb {
            return Comparison {
                matched: true,
                level: MatchLevel::Exact,
                confidence: 1.0,
                diff: String::new(),
            };
        }

        let lines_a = non_blank_lines(&na);
        let lines_b = non_blank_lines(&nb);
        let line_dist = levenshtein(&lines_a, &lines_b);
        let structural = similarity(line_dist, lines_a.len(), lines_b.len());
        if structural >= self.threshold {
            return Comparison {
                matched: true,
                level: MatchLevel::Structural,
                confidence: structural,
                diff: String::new(),
            };
        }

        let char_dist = char_distance(&na, &nb);
        let semantic = similarity(char_dist, na.chars().count(), nb.chars().count());
        if semantic >= self.threshold {
            return Comparison {
                matched: true,
                level: MatchLevel::Semantic,
                confidence: semantic,
                diff: String::new(),
            };
        }

        Comparison {
            matched: false,
            level: MatchLevel::Semantic,
            confidence: semantic,
            diff: unified_diff(&lines_a, &lines_b),
        }
    }
}

/// Non-blank trimmed lines, the unit of structural comparison.
fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
