//! Unified-style line diff from the same alignment used for structural
//! comparison.

/// Render a unified-style diff of two line sequences: `--- a` / `+++ b`
/// headers, then every line prefixed ` ` (common), `-` (only in `a`), or
/// `+` (only in `b`). One whole-text hunk, no ranges.
pub fn unified_diff(a: &[&str], b: &[&str]) -> String {
    let mut out = String::from("--- a\n+++ b\n");
    for (prefix, line) in align(a, b) {
        out.push(prefix);
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Align two line sequences by backtracking the full Levenshtein DP table.
/// A substitution is rendered as a `-` line followed by its `+` replacement.
fn align<'a>(a: &[&'a str], b: &[&'a str]) -> Vec<(char, &'a str)> {
    let n = a.len();
    let m = b.len();

    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        dp[0][j] = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            dp[i][j] = (dp[i - 1][j - 1] + cost)
                .min(dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1);
        }
    }

    let mut ops: Vec<(char, &str)> = Vec::new();
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] && dp[i][j] == dp[i - 1][j - 1] {
            ops.push((' ', a[i - 1]));
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && dp[i][j] == dp[i - 1][j - 1] + 1 {
            ops.push(('+', b[j - 1]));
            ops.push(('-', a[i - 1]));
            i -= 1;
            j -= 1;
        } else if i > 0 && dp[i][j] == dp[i - 1][j] + 1 {
            ops.push(('-', a[i - 1]));
            i -= 1;
        } else {
            ops.push(('+', b[j - 1]));
            j -= 1;
        }
    }
    ops.reverse();
    ops
}
