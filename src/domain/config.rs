// ============================================================
// Layer 3 — Decoding Configuration
// ============================================================
// All window sizes and thresholds live in one immutable struct
// passed to the feature builder and decoder at construction
// time. No process-wide mutable constants — unit tests can run
// with tiny windows without touching global state.

use serde::{Deserialize, Serialize};

/// Immutable configuration for feature building and answer decoding.
///
/// The defaults match the MobileBERT SQuAD export this pipeline was
/// tuned against. `no_answer_threshold` in particular is an
/// empirically derived, model-specific value — substitute a different
/// model and this number must be re-tuned, which is exactly why it is
/// configuration and not a constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QnaConfig {
    /// Fixed length of every model input sequence, including
    /// [CLS], [SEP] markers and right padding
    pub max_seq_len: usize,

    /// Maximum number of sub-word tokens allowed in the question.
    /// Longer questions are rejected, never silently truncated —
    /// truncation would change answer semantics.
    pub max_query_len: usize,

    /// Candidate spans of this many sub-words or more are discarded
    pub max_answer_len: usize,

    /// How far each sliding window advances over the passage
    /// sub-word sequence
    pub doc_stride: usize,

    /// Top-K positions considered per logits array, and the maximum
    /// number of answers returned per call
    pub predict_answer_num: usize,

    /// Combined-logit score below which the model is considered to
    /// be signalling "no answer in this window"
    pub no_answer_threshold: f32,
}

impl Default for QnaConfig {
    fn default() -> Self {
        Self {
            max_seq_len:         384,
            max_query_len:       64,
            max_answer_len:      32,
            doc_stride:          128,
            predict_answer_num:  5,
            no_answer_threshold: 4.398_076,
        }
    }
}

impl QnaConfig {
    pub fn with_max_seq_len(mut self, n: usize) -> Self {
        self.max_seq_len = n;
        self
    }

    pub fn with_doc_stride(mut self, n: usize) -> Self {
        self.doc_stride = n;
        self
    }

    pub fn with_no_answer_threshold(mut self, t: f32) -> Self {
        self.no_answer_threshold = t;
        self
    }
}
