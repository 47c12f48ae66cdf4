// ============================================================
// Layer 4 — Feature Builder
// ============================================================
// Turns (question, passage) into fixed-length model-input rows.
//
// Why windows?
//   The model accepts at most `max_seq_len` sub-words, but a
//   passage may be far longer. Truncating could cut off the
//   answer, so instead we slide overlapping windows across the
//   passage sub-word sequence: an answer near one window's edge
//   is fully inside a neighbouring window.
//
// Every row is assembled as
//
//   [CLS] question.. [SEP] passage-window.. [SEP] padding..
//    seg0  seg0       seg0  seg1            seg1  0
//
// and carries `token_to_orig_map`, the only bookkeeping that
// lets the decoder turn a sub-word position back into a byte
// offset of the original passage. The map is a fixed-size array
// of optional indices — "unmapped" is an explicit None, not an
// absent hash-map key.
//
// Reference: Devlin et al. (2019) BERT paper (doc stride)

use std::sync::Arc;

use crate::data::preprocessor::normalize_question;
use crate::domain::answer::OriginalToken;
use crate::domain::config::QnaConfig;
use crate::domain::error::QnaError;
use crate::domain::traits::{ModelInputs, SubwordTokenizer};

/// Sub-word ids reserved per window for [CLS] and the two [SEP]s
const SPECIAL_TOKENS: usize = 3;

/// One fixed-length window over the passage, ready for the model.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Sub-word ids, right-padded with 0 to `max_seq_len`
    pub input_ids: Vec<u32>,

    /// 1 for every real token, 0 for padding
    pub input_mask: Vec<u32>,

    /// 0 for [CLS]/question/first [SEP], 1 for passage tokens and
    /// the trailing [SEP], 0 for padding
    pub segment_ids: Vec<u32>,

    /// The passage's word-level tokens, shared across all windows
    /// of one call
    pub orig_tokens: Arc<Vec<OriginalToken>>,

    /// For each assembled position that belongs to the passage:
    /// the index of the original token it came from. None for the
    /// question, special markers, and padding.
    pub token_to_orig_map: Vec<Option<usize>>,
}

/// Builds overlapping feature windows from a question and a passage.
pub struct FeatureBuilder {
    config: QnaConfig,
}

impl FeatureBuilder {
    pub fn new(config: QnaConfig) -> Self {
        Self { config }
    }

    /// Build one feature per sliding window, in left-to-right window
    /// order. Fails with `QuestionTooLong` if the tokenized question
    /// exceeds `max_query_len` sub-words.
    pub fn build<T: SubwordTokenizer>(
        &self,
        tokenizer: &T,
        question:  &str,
        passage:   &str,
    ) -> Result<Vec<Feature>, QnaError> {
        // ── Step 1: Normalize and tokenize the question ───────────────────────
        let question = normalize_question(question);
        let query_ids = tokenizer.tokenize(&question)?;
        if query_ids.len() > self.config.max_query_len {
            return Err(QnaError::QuestionTooLong {
                actual: query_ids.len(),
                max:    self.config.max_query_len,
            });
        }

        // ── Step 2: Tokenize the passage, keeping the word-level origin ──────
        // Each original word may expand into several sub-words;
        // tok_to_orig_index records, for every sub-word, which word
        // it came from.
        let orig_tokens = Arc::new(tokenizer.process_input(passage));

        let mut all_doc_ids:      Vec<u32>   = Vec::new();
        let mut tok_to_orig_index: Vec<usize> = Vec::new();
        for (i, token) in orig_tokens.iter().enumerate() {
            for id in tokenizer.tokenize(&token.text)? {
                all_doc_ids.push(id);
                tok_to_orig_index.push(i);
            }
        }

        // ── Step 3: Window budget ─────────────────────────────────────────────
        // One [CLS] and two [SEP]s are reserved out of max_seq_len.
        let max_context_len = self
            .config
            .max_seq_len
            .checked_sub(query_ids.len() + SPECIAL_TOKENS)
            .filter(|&n| n > 0)
            .ok_or(QnaError::QuestionTooLong {
                actual: query_ids.len(),
                max:    self.config.max_seq_len.saturating_sub(SPECIAL_TOKENS + 1),
            })?;

        // ── Step 4: Slide windows across the sub-word sequence ───────────────
        // The final window is clipped to whatever remains — we never
        // stride past the end of the sequence.
        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut offset = 0usize;
        while offset < all_doc_ids.len() {
            let len = (all_doc_ids.len() - offset).min(max_context_len);
            spans.push((offset, len));
            if offset + len == all_doc_ids.len() {
                break;
            }
            // Advance by at least one sub-word, so a zero stride can
            // never stall the loop.
            offset += len.min(self.config.doc_stride).max(1);
        }

        tracing::debug!(
            "passage: {} words, {} sub-words, {} window(s)",
            orig_tokens.len(),
            all_doc_ids.len(),
            spans.len()
        );

        // ── Step 5: Assemble one feature per window ───────────────────────────
        let features = spans
            .into_iter()
            .map(|(start, len)| {
                self.assemble(
                    &query_ids,
                    &all_doc_ids[start..start + len],
                    &tok_to_orig_index[start..start + len],
                    Arc::clone(&orig_tokens),
                    tokenizer,
                )
            })
            .collect();

        Ok(features)
    }

    /// Assemble [CLS] + question + [SEP] + window + [SEP], pad to
    /// `max_seq_len`, and record the passage-position origin map.
    fn assemble<T: SubwordTokenizer>(
        &self,
        query_ids:     &[u32],
        window_ids:    &[u32],
        window_origin: &[usize],
        orig_tokens:   Arc<Vec<OriginalToken>>,
        tokenizer:     &T,
    ) -> Feature {
        let max_seq_len = self.config.max_seq_len;

        let mut input_ids         = Vec::with_capacity(max_seq_len);
        let mut segment_ids       = Vec::with_capacity(max_seq_len);
        let mut token_to_orig_map = vec![None; max_seq_len];

        input_ids.push(tokenizer.cls_id());
        segment_ids.push(0);

        input_ids.extend_from_slice(query_ids);
        segment_ids.extend(std::iter::repeat(0).take(query_ids.len()));

        input_ids.push(tokenizer.sep_id());
        segment_ids.push(0);

        for (&id, &orig) in window_ids.iter().zip(window_origin) {
            token_to_orig_map[input_ids.len()] = Some(orig);
            input_ids.push(id);
            segment_ids.push(1);
        }

        input_ids.push(tokenizer.sep_id());
        segment_ids.push(1);

        let mut input_mask = vec![1u32; input_ids.len()];

        // Right-pad all three sequences with a neutral id / 0 / 0
        input_ids.resize(max_seq_len, 0);
        segment_ids.resize(max_seq_len, 0);
        input_mask.resize(max_seq_len, 0);

        Feature {
            input_ids,
            input_mask,
            segment_ids,
            orig_tokens,
            token_to_orig_map,
        }
    }
}

/// Stack features into one batch for a single model-execution call.
pub fn batch_inputs(features: &[Feature]) -> ModelInputs {
    ModelInputs {
        input_ids:   features.iter().map(|f| f.input_ids.clone()).collect(),
        segment_ids: features.iter().map(|f| f.segment_ids.clone()).collect(),
        input_mask:  features.iter().map(|f| f.input_mask.clone()).collect(),
    }
}
