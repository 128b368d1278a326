//! Pure text canonicalization ahead of similarity comparison.
//!
//! Removes formatting noise in a fixed stage order, each stage
//! independently toggle-able:
//! 1. Line endings: CRLF and lone CR both become LF.
//! 2. Whitespace: runs of horizontal whitespace collapse to one space,
//!    lines are trimmed, blank lines are dropped.
//! 3. Comments: `//` truncates to end of line; `/*` truncates to the first
//!    `*/`. No nested-comment handling -- the first terminator always wins.
//! 4. JSON: text that parses as JSON is re-serialized compactly with all
//!    object keys sorted; anything else passes through unchanged.

/// Stateless normalization pipeline. [`ResponseNormalizer::default`]
/// enables all four stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseNormalizer {
    pub line_endings: bool,
    pub collapse_whitespace: bool,
    pub strip_comments: bool,
    pub canonical_json: bool,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self {
            line_endings: true,
            collapse_whitespace: true,
            strip_comments: true,
            canonical_json: true,
        }
    }
}

impl ResponseNormalizer {
    /// Run the enabled stages in order. Idempotent:
    /// `normalize(normalize(s)) == normalize(s)`.
    pub fn normalize(&self, input: &str) -> String {
        let mut text = input.to_string();
        if self.line_endings {
            text = normalize_line_endings(&text);
        }
        if self.collapse_whitespace {
            text = collapse_whitespace(&text);
        }
        if self.strip_comments {
            text = strip_comments(&text);
        }
        if self.canonical_json {
            text = canonicalize_json(&text);
        }
        text
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Collapse runs of horizontal whitespace to one space, trim each line,
/// and drop blank lines.
fn collapse_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip `/* */` and `//` comments, then drop lines left empty.
fn strip_comments(text: &str) -> String {
    let text = strip_block_comments(text);
    text.lines()
        .map(|line| match line.find("//") {
            Some(i) => line[..i].trim(),
            None => line.trim(),
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove `/* ... */` spans. The first `*/` always terminates; an
/// unterminated `/*` drops the remainder of the text.
fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => {
                rest = &rest[start + 2 + end + 2..];
                // A span removed between two spaces would leave a double
                // space; keep one so the pipeline stays idempotent.
                if out.ends_with(' ') && rest.starts_with(' ') {
                    rest = &rest[1..];
                }
            }
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Re-serialize valid JSON compactly with lexicographically sorted object
/// keys at every nesting level. `serde_json::Value` keeps object members in
/// a `BTreeMap`, so parsing and re-serializing yields the sorted form.
fn canonicalize_json(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(s: &str) -> String {
        ResponseNormalizer::default().normalize(s)
    }

    #[test]
    fn crlf_and_lone_cr_become_lf() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn whitespace_runs_collapse_and_blank_lines_drop() {
        assert_eq!(normalize("  a\t\tb  \n\n   \nc"), "a b\nc");
    }

    #[test]
    fn line_comments_are_stripped() {
        assert_eq!(normalize("code // comment"), "code");
        assert_eq!(normalize("// only a comment"), "");
    }

    #[test]
    fn block_comments_are_stripped() {
        assert_eq!(normalize("before /* noise */ after"), "before after");
        assert_eq!(normalize("a /* spans\nlines */ b"), "a b");
    }

    #[test]
    fn first_block_terminator_wins() {
        // No nesting: the inner "*/" closes the comment.
        assert_eq!(normalize("a /* x /* y */ z */ b"), "a z */ b");
    }

    #[test]
    fn unterminated_block_comment_drops_the_rest() {
        assert_eq!(normalize("keep /* gone forever"), "keep");
    }

    #[test]
    fn json_keys_are_sorted_recursively() {
        let a = normalize("{\"z\": 1, \"a\": {\"y\": true, \"b\": null}}");
        let b = normalize("{\"a\": {\"b\": null, \"y\": true}, \"z\": 1}");
        assert_eq!(a, b);
        assert_eq!(a, "{\"a\":{\"b\":null,\"y\":true},\"z\":1}");
    }

    #[test]
    fn json_key_order_invariance_from_contract() {
        assert_eq!(
            normalize("{\"z\":1,\"a\":2}"),
            normalize("{\"a\":2,\"z\":1}")
        );
        assert_eq!(normalize("{\"z\":1,\"a\":2}"), "{\"a\":2,\"z\":1}");
    }

    #[test]
    fn non_json_passes_through_stage_four() {
        assert_eq!(normalize("not json at all"), "not json at all");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "",
            "plain text",
            "a\r\n  b\t c\n\n",
            "code // trailing\n/* block */ more",
            "{\"z\": 1, \"a\": [3, 2, 1]}",
            "{\"url\": \"http://example.com\"}",
            "unicode: héllo wörld 🦀",
        ];
        let normalizer = ResponseNormalizer::default();
        for input in inputs {
            let once = normalizer.normalize(input);
            let twice = normalizer.normalize(&once);
            assert_eq!(once, twice, "not idempotent for input {input:?}");
        }
    }

    #[test]
    fn stages_toggle_independently() {
        let raw = ResponseNormalizer {
            line_endings: false,
            collapse_whitespace: false,
            strip_comments: false,
            canonical_json: false,
        };
        assert_eq!(raw.normalize("a  //b\r\n"), "a  //b\r\n");

        let comments_only = ResponseNormalizer {
            strip_comments: true,
            ..raw
        };
        assert_eq!(comments_only.normalize("x // y"), "x");

        let json_only = ResponseNormalizer {
            canonical_json: true,
            ..raw
        };
        assert_eq!(json_only.normalize("{\"b\":1,\"a\":2}"), "{\"a\":2,\"b\":1}");
    }

    #[test]
    fn comment_only_reply_normalizes_to_empty() {
        assert_eq!(normalize("// nothing here\n/* nor here */"), "");
    }
}
