// ============================================================
// Layer 5 — Answer Decoder
// ============================================================
// Converts one feature's start/end logit arrays into ranked,
// human-readable answer spans.
//
// The subtle part is offset arithmetic. The model's output
// position 0 corresponds to input position 1 — position 0 of
// the input is the [CLS] marker, which the output array does
// not repeat. OUTPUT_OFFSET names that shift once so every
// lookup below stays auditable.
//
// A logits position whose shifted input position is not in
// `token_to_orig_map` lies in the question, a special marker,
// or padding — such spans can never be answers and are dropped
// before scoring.

use std::sync::Arc;

use crate::data::feature::Feature;
use crate::domain::answer::{Answer, OriginalToken, Prediction};
use crate::domain::config::QnaConfig;

/// Shift between a model-output position and the corresponding
/// input position ([CLS] occupies input position 0).
pub const OUTPUT_OFFSET: usize = 1;

/// A sub-word span within one feature plus its raw combined logit
/// score. Not yet validated against the end-after-start and
/// maximum-length constraints.
#[derive(Debug, Clone, Copy)]
struct AnswerIndex {
    start: usize,
    end:   usize,
    score: f32,
}

/// Decodes per-feature logits into ranked predictions.
pub struct AnswerDecoder {
    config: QnaConfig,
}

impl AnswerDecoder {
    pub fn new(config: QnaConfig) -> Self {
        Self { config }
    }

    /// Decode one feature's logits. Returns at most
    /// `predict_answer_num` predictions, sorted by descending score,
    /// cut off at the first score below `no_answer_threshold`.
    pub fn decode(
        &self,
        start_logits: &[f32],
        end_logits:   &[f32],
        feature:      &Feature,
        passage:      &str,
        id:           Option<&str>,
    ) -> Vec<Prediction> {
        let start_indexes = self.best_indexes(start_logits);
        let end_indexes   = self.best_indexes(end_logits);

        // ── Step 1: Cross top-K starts with top-K ends, keep valid spans ─────
        let mut candidates: Vec<AnswerIndex> = Vec::new();
        for &start in &start_indexes {
            for &end in &end_indexes {
                let start_mapped = mapped(feature, start);
                let end_mapped   = mapped(feature, end);
                if start_mapped.is_none() || end_mapped.is_none() {
                    continue;
                }
                if end < start {
                    continue;
                }
                if end - start + 1 >= self.config.max_answer_len {
                    continue;
                }
                candidates.push(AnswerIndex {
                    start,
                    end,
                    score: start_logits[start] + end_logits[end],
                });
            }
        }

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        // ── Step 2: Walk the ranked list until K answers or the threshold ────
        let mut predictions = Vec::new();
        for candidate in candidates {
            if predictions.len() >= self.config.predict_answer_num {
                break;
            }
            if candidate.score < self.config.no_answer_threshold {
                // Everything below this is the model saying
                // "no answer in this window"
                break;
            }
            if candidate.start > 0 {
                if let Some((text, start_index, end_index)) =
                    convert_back(feature, candidate.start, candidate.end, passage)
                {
                    predictions.push(Prediction::Span(Answer {
                        text,
                        start_index,
                        end_index,
                        score:   candidate.score,
                        context: passage.to_string(),
                        id:      id.map(str::to_string),
                    }));
                }
            } else {
                // Position 0 is the classification marker — the
                // model's canonical "no answer" indicator
                predictions.push(Prediction::NoAnswer { score: candidate.score });
            }
        }

        predictions
    }

    /// Top-K logit positions in descending score order. The sort is
    /// stable, so equal scores keep their original position order.
    fn best_indexes(&self, logits: &[f32]) -> Vec<usize> {
        let n = logits.len().min(self.config.max_seq_len);
        let mut indexes: Vec<usize> = (0..n).collect();
        indexes.sort_by(|&a, &b| logits[b].total_cmp(&logits[a]));
        indexes.truncate(self.config.predict_answer_num);
        indexes
    }
}

/// Original-token index for a logits position, if its shifted input
/// position lies inside the passage region of the window.
fn mapped(feature: &Feature, logits_pos: usize) -> Option<usize> {
    feature
        .token_to_orig_map
        .get(logits_pos + OUTPUT_OFFSET)
        .copied()
        .flatten()
}

/// Map a validated sub-word span back to passage text and byte
/// offsets.
///
/// The end offset is the byte before the NEXT original token when one
/// exists — that pulls in the untokenized characters (whitespace,
/// stripped punctuation) between the answer's last token and the next
/// word, which the final trim removes again. For the passage's last
/// token the span simply runs to the end of that token's text.
fn convert_back(
    feature: &Feature,
    start:   usize,
    end:     usize,
    passage: &str,
) -> Option<(String, usize, usize)> {
    let orig_tokens: &Arc<Vec<OriginalToken>> = &feature.orig_tokens;

    let start_token = mapped(feature, start)?;
    let end_token   = mapped(feature, end)?;

    let start_char = orig_tokens.get(start_token)?.char_offset;
    let end_char = if end_token + 1 < orig_tokens.len() {
        orig_tokens[end_token + 1].char_offset.saturating_sub(1)
    } else {
        let last = &orig_tokens[end_token];
        last.char_offset + last.text.len()
    };
    let end_char = end_char.min(passage.len().saturating_sub(1));

    // Inclusive slice [start_char, end_char]; back off to a char
    // boundary in case the trailing byte sits inside a multi-byte
    // whitespace character
    let mut end_excl = (end_char + 1).min(passage.len());
    while end_excl > start_char && !passage.is_char_boundary(end_excl) {
        end_excl -= 1;
    }
    let text = passage.get(start_char..end_excl)?.trim().to_string();

    Some((text, start_char, end_char))
}
