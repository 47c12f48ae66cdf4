// ============================================================
// Layer 3 — Answer Types
// ============================================================
// Extractive Q&A never generates text — the model points at a
// SPAN inside the passage. These types carry that span from
// sub-word positions all the way back to passage byte offsets.
//
// Example:
//   Question: "What color is the sky?"
//   Passage:  "The sky is blue during a clear day."
//   Answer:   text "blue", offsets bracketing that substring
//
// Reference: Devlin et al. (2019) - BERT paper

use serde::{Deserialize, Serialize};

/// One whitespace/punctuation-level token of the original passage,
/// with the byte offset where it starts.
///
/// Produced once per passage by the tokenizer collaborator and shared
/// (read-only) by every feature window of one `find_answers` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalToken {
    /// The token text exactly as it appears in the passage
    pub text: String,

    /// Byte offset of the first character of `text` in the passage
    pub char_offset: usize,
}

impl OriginalToken {
    pub fn new(text: impl Into<String>, char_offset: usize) -> Self {
        Self { text: text.into(), char_offset }
    }
}

/// A final, user-facing answer span.
///
/// Invariant: whenever `text` is non-empty,
/// `start_index <= end_index < context.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Exact substring of the original passage, whitespace-trimmed
    pub text: String,

    /// Inclusive byte offset where the (untrimmed) span starts
    pub start_index: usize,

    /// Inclusive byte offset where the (untrimmed) span ends
    pub end_index: usize,

    /// Sum of the start and end logits — higher means more confident
    pub score: f32,

    /// The passage this answer was extracted from
    pub context: String,

    /// Opaque passthrough identifier supplied by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One ranked prediction from the decoder.
///
/// "No answer" is a distinct variant rather than an empty-string
/// `Answer` — position 0 of the model output is the classification
/// marker, the model's canonical way of signalling that the window
/// contains no answer, and conflating that with a genuinely empty
/// span at offset 0 would be ambiguous.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prediction {
    /// A concrete answer span inside the passage
    Span(Answer),

    /// The model signalled "no answer in this window"
    NoAnswer { score: f32 },
}

impl Prediction {
    /// The raw combined logit score, whichever variant this is
    pub fn score(&self) -> f32 {
        match self {
            Prediction::Span(a) => a.score,
            Prediction::NoAnswer { score } => *score,
        }
    }

    pub fn is_no_answer(&self) -> bool {
        matches!(self, Prediction::NoAnswer { .. })
    }

    /// The answer span, if this prediction has one
    pub fn as_span(&self) -> Option<&Answer> {
        match self {
            Prediction::Span(a) => Some(a),
            Prediction::NoAnswer { .. } => None,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_score_covers_both_variants() {
        let span = Prediction::Span(Answer {
            text:        "blue".to_string(),
            start_index: 11,
            end_index:   15,
            score:       12.5,
            context:     "The sky is blue.".to_string(),
            id:          None,
        });
        let none = Prediction::NoAnswer { score: 3.0 };

        assert_eq!(span.score(), 12.5);
        assert_eq!(none.score(), 3.0);
        assert!(!span.is_no_answer());
        assert!(none.is_no_answer());
    }

    #[test]
    fn test_prediction_serializes_with_kind_tag() {
        let none = Prediction::NoAnswer { score: 1.0 };
        let json = serde_json::to_string(&none).unwrap();
        assert!(json.contains("\"kind\":\"no_answer\""));

        let span = Prediction::Span(Answer {
            text:        "blue".to_string(),
            start_index: 11,
            end_index:   15,
            score:       12.5,
            context:     "The sky is blue.".to_string(),
            id:          Some("q-1".to_string()),
        });
        let json = serde_json::to_string(&span).unwrap();
        assert!(json.contains("\"kind\":\"span\""));
        assert!(json.contains("\"id\":\"q-1\""));
    }
}
