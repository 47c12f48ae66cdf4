// ============================================================
// Layer 4 — Question Preprocessor
// ============================================================
// Canonicalizes the trailing punctuation of a question before
// tokenization. Callers send "What color is the sky", "What
// color is the sky?", "What color is the sky??" — all three
// must tokenize identically, because the model was trained on
// questions ending in exactly one question mark.

/// Strip every literal `?`, trim surrounding whitespace, then append
/// exactly one `?`.
///
/// Idempotent: `normalize_question(normalize_question(q))` equals
/// `normalize_question(q)` for any input.
pub fn normalize_question(question: &str) -> String {
    let stripped = question.replace('?', "");
    let mut cleaned = stripped.trim().to_string();
    cleaned.push('?');
    cleaned
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_question_mark() {
        assert_eq!(normalize_question("What color is the sky"), "What color is the sky?");
    }

    #[test]
    fn test_collapses_repeated_question_marks() {
        assert_eq!(normalize_question("What color is the sky???"), "What color is the sky?");
    }

    #[test]
    fn test_strips_interior_question_marks() {
        // A '?' anywhere is removed, not just trailing ones
        assert_eq!(normalize_question("wh?at now"), "wh at now?");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize_question("  why  "), "why?");
        // Whitespace left behind by a stripped trailing '?' is trimmed too
        assert_eq!(normalize_question("why ?"), "why?");
    }

    #[test]
    fn test_idempotent() {
        for q in ["what", "what?", " what ?? ", "", "??", "a?b"] {
            let once  = normalize_question(q);
            let twice = normalize_question(&once);
            assert_eq!(once, twice, "not idempotent for {q:?}");
            assert!(once.ends_with('?'));
            assert_eq!(once.matches('?').count(), 1);
        }
    }
}
