// ============================================================
// Layer 3 — Collaborator Traits
// ============================================================
// The two external collaborators the core depends on, reduced
// to the single capability each one provides:
//
//   SubwordTokenizer → text in, sub-word ids (or original
//                      word-level tokens with offsets) out
//   ModelBackend     → three integer-id matrices in, two
//                      per-position logit matrices out
//
// Both are treated as read-only after construction, so one
// instance can safely serve concurrent `find_answers` calls.
//
// By programming against these traits, the feature builder and
// decoder are testable with a hand-rolled vocabulary and a
// scripted backend — no model download, no GPU.

use anyhow::Result;

use crate::domain::answer::OriginalToken;
use crate::domain::error::QnaError;

// ─── SubwordTokenizer ─────────────────────────────────────────────────────────
/// A word-piece / sentence-piece style tokenizer over a fixed
/// vocabulary in which the classification and separator markers are
/// reserved ids, never produced by ordinary tokenization.
pub trait SubwordTokenizer {
    /// Convert text into its sub-word id sequence.
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, QnaError>;

    /// Split text into original word-level tokens, each carrying the
    /// byte offset where it starts. This is the ground truth the
    /// decoder maps sub-word spans back onto.
    fn process_input(&self, text: &str) -> Vec<OriginalToken>;

    /// Id of the classification marker ([CLS])
    fn cls_id(&self) -> u32;

    /// Id of the separator marker ([SEP])
    fn sep_id(&self) -> u32;
}

// ─── ModelBackend ─────────────────────────────────────────────────────────────
/// One batch of model inputs: every row is one feature window,
/// already padded to the configured `max_seq_len`.
#[derive(Debug, Clone, Default)]
pub struct ModelInputs {
    pub input_ids:   Vec<Vec<u32>>,
    pub segment_ids: Vec<Vec<u32>>,
    pub input_mask:  Vec<Vec<u32>>,
}

impl ModelInputs {
    /// Number of feature windows in this batch
    pub fn batch_size(&self) -> usize {
        self.input_ids.len()
    }
}

/// Raw per-position scores returned by the model, parallel to the
/// input rows. Dropped as soon as decoding has extracted what it
/// needs — nothing tensor-shaped outlives one call.
#[derive(Debug, Clone)]
pub struct ModelOutputs {
    pub start_logits: Vec<Vec<f32>>,
    pub end_logits:   Vec<Vec<f32>>,
}

/// The inference engine. `execute` is the single suspension point of
/// a `find_answers` call: all windows of one question go through in
/// one batch, never one call per window.
#[allow(async_fn_in_trait)]
pub trait ModelBackend {
    async fn execute(&self, inputs: &ModelInputs) -> Result<ModelOutputs>;
}
