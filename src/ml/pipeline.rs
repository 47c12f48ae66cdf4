// ============================================================
// Layer 5 — Question Answering Pipeline
// ============================================================
// The public find_answers operation, end to end:
//
//   validate → build features → ONE batched model call →
//   decode each window → merge into a globally ranked list
//
// One call owns all of its features, logits, and candidates;
// nothing is shared or retained across calls. The tokenizer and
// backend are read-only after construction, so a single
// pipeline can serve concurrent calls. The only await point is
// the model execution — everything else is plain CPU work.

use crate::data::feature::{batch_inputs, FeatureBuilder};
use crate::domain::answer::Prediction;
use crate::domain::config::QnaConfig;
use crate::domain::error::QnaError;
use crate::domain::traits::{ModelBackend, SubwordTokenizer};
use crate::ml::decoder::AnswerDecoder;

pub struct QnaPipeline<B, T> {
    backend:   B,
    tokenizer: T,
    builder:   FeatureBuilder,
    decoder:   AnswerDecoder,
    config:    QnaConfig,
}

impl<B: ModelBackend, T: SubwordTokenizer> QnaPipeline<B, T> {
    pub fn new(backend: B, tokenizer: T, config: QnaConfig) -> Self {
        Self {
            backend,
            tokenizer,
            builder: FeatureBuilder::new(config.clone()),
            decoder: AnswerDecoder::new(config.clone()),
            config,
        }
    }

    /// Answer `question` from `passage`. Returns at most
    /// `predict_answer_num` predictions ranked by descending score —
    /// possibly empty, never partial. `id` is echoed into every
    /// returned answer.
    ///
    /// Overlapping windows can surface the same byte span more than
    /// once; the result keeps only the highest-scored copy of each
    /// span, so a distinct lower-scored span may take the slot a
    /// duplicate would otherwise have filled.
    pub async fn find_answers(
        &self,
        question: &str,
        passage:  &str,
        id:       Option<&str>,
    ) -> Result<Vec<Prediction>, QnaError> {
        // Input validation happens before any tokenization
        if question.trim().is_empty() {
            return Err(QnaError::InvalidInput("question"));
        }
        if passage.trim().is_empty() {
            return Err(QnaError::InvalidInput("passage"));
        }

        let features = self.builder.build(&self.tokenizer, question, passage)?;
        if features.is_empty() {
            return Ok(Vec::new());
        }

        // All windows of this question go through the model in one
        // batch — the single suspension point of the call
        let predictions = {
            let inputs = batch_inputs(&features);
            tracing::debug!("executing model: batch of {} window(s)", inputs.batch_size());
            let outputs = self
                .backend
                .execute(&inputs)
                .await
                .map_err(QnaError::Backend)?;

            if outputs.start_logits.len() != features.len()
                || outputs.end_logits.len() != features.len()
            {
                return Err(QnaError::Backend(anyhow::anyhow!(
                    "expected {} logit rows, model returned {}/{}",
                    features.len(),
                    outputs.start_logits.len(),
                    outputs.end_logits.len()
                )));
            }

            let mut merged: Vec<Prediction> = Vec::new();
            for (i, feature) in features.iter().enumerate() {
                merged.extend(self.decoder.decode(
                    &outputs.start_logits[i],
                    &outputs.end_logits[i],
                    feature,
                    passage,
                    id,
                ));
            }
            merged
            // inputs and outputs drop here — batch buffers never
            // outlive the decode
        };

        Ok(self.merge(predictions))
    }

    /// Global merge across windows: rank every candidate purely by
    /// score, drop duplicate spans that overlapping windows found
    /// twice, and keep the overall top `predict_answer_num`.
    fn merge(&self, mut predictions: Vec<Prediction>) -> Vec<Prediction> {
        predictions.sort_by(|a, b| b.score().total_cmp(&a.score()));

        let mut merged: Vec<Prediction> = Vec::new();
        for prediction in predictions {
            if merged.len() >= self.config.predict_answer_num {
                break;
            }
            let duplicate = merged.iter().any(|kept| match (kept, &prediction) {
                (Prediction::Span(a), Prediction::Span(b)) => {
                    a.start_index == b.start_index && a.end_index == b.end_index
                }
                (Prediction::NoAnswer { .. }, Prediction::NoAnswer { .. }) => true,
                _ => false,
            });
            if !duplicate {
                merged.push(prediction);
            }
        }
        merged
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::answer::OriginalToken;
    use crate::domain::traits::{ModelInputs, ModelOutputs};
    use crate::test_support::{MockTokenizer, TargetBackend};

    fn small_config() -> QnaConfig {
        QnaConfig {
            max_seq_len:         32,
            max_query_len:       8,
            max_answer_len:      8,
            doc_stride:          16,
            predict_answer_num:  5,
            no_answer_threshold: 4.398_076,
        }
    }

    /// Collaborators that must never be reached — input validation
    /// happens first.
    struct UnreachableTokenizer;

    impl SubwordTokenizer for UnreachableTokenizer {
        fn tokenize(&self, _text: &str) -> Result<Vec<u32>, QnaError> {
            panic!("tokenizer must not be called for invalid input");
        }
        fn process_input(&self, _text: &str) -> Vec<OriginalToken> {
            panic!("tokenizer must not be called for invalid input");
        }
        fn cls_id(&self) -> u32 {
            101
        }
        fn sep_id(&self) -> u32 {
            102
        }
    }

    struct UnreachableBackend;

    impl ModelBackend for UnreachableBackend {
        async fn execute(&self, _inputs: &ModelInputs) -> anyhow::Result<ModelOutputs> {
            panic!("backend must not be called for invalid input");
        }
    }

    struct FailingBackend;

    impl ModelBackend for FailingBackend {
        async fn execute(&self, _inputs: &ModelInputs) -> anyhow::Result<ModelOutputs> {
            anyhow::bail!("session crashed")
        }
    }

    #[tokio::test]
    async fn test_sky_scenario_top_answer_is_blue() {
        let tokenizer = MockTokenizer::new();
        let target    = tokenizer.id_of("blue");
        let backend   = TargetBackend::single(target, 5.0);

        let pipeline = QnaPipeline::new(backend, tokenizer, small_config());
        let passage  = "The sky is blue during a clear day.";
        let out = pipeline
            .find_answers("What color is the sky", passage, Some("sky-1"))
            .await
            .unwrap();

        let top = out[0].as_span().expect("expected a span");
        assert_eq!(top.text, "blue");
        assert_eq!(passage[top.start_index..=top.end_index].trim(), "blue");
        assert_eq!(top.context, passage);
        assert_eq!(top.id.as_deref(), Some("sky-1"));
    }

    #[tokio::test]
    async fn test_missing_inputs_fail_before_any_tokenization() {
        let pipeline = QnaPipeline::new(
            UnreachableBackend,
            UnreachableTokenizer,
            small_config(),
        );

        let err = pipeline.find_answers("", "some context", None).await.unwrap_err();
        assert!(matches!(err, QnaError::InvalidInput("question")));

        let err = pipeline.find_answers("why", "   ", None).await.unwrap_err();
        assert!(matches!(err, QnaError::InvalidInput("passage")));
    }

    #[tokio::test]
    async fn test_merge_ranks_across_three_windows_by_score_only() {
        let tokenizer = MockTokenizer::new();

        // A passage long enough for several windows; plant one target
        // word in the early, middle, and late regions
        let mut words: Vec<String> = (0..60).map(|i| format!("w{i}")).collect();
        words[5]  = "alpha".to_string();
        words[30] = "bravo".to_string();
        words[55] = "charlie".to_string();
        let passage = words.join(" ");

        let backend = TargetBackend::new(vec![
            (tokenizer.id_of("alpha"), 8.0),
            (tokenizer.id_of("bravo"), 9.0),
            (tokenizer.id_of("charlie"), 7.0),
        ]);

        let pipeline = QnaPipeline::new(backend, tokenizer, small_config());
        let out = pipeline.find_answers("which word", &passage, None).await.unwrap();

        // Ranked purely by score, not by window order, and duplicate
        // spans found by overlapping windows collapse into one
        let texts: Vec<&str> = out
            .iter()
            .map(|p| p.as_span().unwrap().text.as_str())
            .collect();
        assert_eq!(texts, vec!["bravo", "alpha", "charlie"]);
        for pair in out.windows(2) {
            assert!(pair[0].score() >= pair[1].score());
        }
        assert!(out.len() <= 5);
    }

    #[tokio::test]
    async fn test_no_candidate_above_threshold_gives_empty_list() {
        let tokenizer = MockTokenizer::new();
        // Every logit stays far below the no-answer threshold
        let backend = TargetBackend::new(vec![]);

        let pipeline = QnaPipeline::new(backend, tokenizer, small_config());
        let out = pipeline
            .find_answers("what", "nothing relevant in here", None)
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_propagates_unchanged() {
        let tokenizer = MockTokenizer::new();
        let pipeline  = QnaPipeline::new(FailingBackend, tokenizer, small_config());

        let err = pipeline
            .find_answers("why", "a perfectly fine passage", None)
            .await
            .unwrap_err();
        assert!(matches!(err, QnaError::Backend(_)));
    }
}
