//! Edit-distance primitives shared by the comparator and the diff.

/// Levenshtein distance over two slices, with insert/delete/substitute all
/// costing 1. Two-row DP, O(len_a * len_b) time and O(len_b) space.
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, item_a) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, item_b) in b.iter().enumerate() {
            let substitute = prev[j] + usize::from(item_a != item_b);
            let delete = prev[j + 1] + 1;
            let insert = curr[j] + 1;
            curr[j + 1] = substitute.min(delete).min(insert);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Levenshtein distance over Unicode codepoints, never bytes, so multi-byte
/// characters count as single edits.
pub fn char_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    levenshtein(&a, &b)
}

/// Similarity ratio `1 - distance / max(len_a, len_b, 1)`, in [0, 1].
pub fn similarity(distance: usize, len_a: usize, len_b: usize) -> f64 {
    let max = len_a.max(len_b).max(1);
    1.0 - distance as f64 / max as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs() {
        assert_eq!(char_distance("", ""), 0);
        assert_eq!(char_distance("abc", ""), 3);
        assert_eq!(char_distance("", "abc"), 3);
    }

    #[test]
    fn kitten_to_sitting_is_three() {
        assert_eq!(char_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn identical_sequences_are_zero() {
        assert_eq!(char_distance("same", "same"), 0);
        let lines = ["alpha", "beta", "gamma"];
        assert_eq!(levenshtein(&lines, &lines), 0);
    }

    #[test]
    fn line_level_distance() {
        let a = ["one", "two", "three"];
        let b = ["one", "2", "three", "four"];
        // substitute "two" -> "2", insert "four"
        assert_eq!(levenshtein(&a, &b), 2);
    }

    #[test]
    fn multibyte_characters_count_once() {
        // One codepoint substituted, regardless of UTF-8 byte width.
        assert_eq!(char_distance("héllo", "hello"), 1);
        assert_eq!(char_distance("🦀", "x"), 1);
    }

    #[test]
    fn similarity_ratio() {
        assert_eq!(similarity(0, 5, 5), 1.0);
        assert_eq!(similarity(5, 5, 5), 0.0);
        assert_eq!(similarity(1, 4, 4), 0.75);
        // Guard against division by zero on two empty inputs.
        assert_eq!(similarity(0, 0, 0), 1.0);
    }
}
