// ============================================================
// Layer 2 — Answer Use Case
// ============================================================
// Loads the model and tokenizer once (the slow part — possibly
// a network fetch), then answers any number of questions over
// the same passage or different ones. The pipeline itself is
// stateless across calls, so one use case instance can serve
// them all.

use anyhow::Result;

use crate::domain::answer::Prediction;
use crate::domain::config::QnaConfig;
use crate::infra::bert_backend::{BertBackend, ModelConfig};
use crate::infra::wordpiece::WordPieceTokenizer;
use crate::ml::pipeline::QnaPipeline;

pub struct AnswerUseCase {
    pipeline: QnaPipeline<BertBackend, WordPieceTokenizer>,
}

impl AnswerUseCase {
    pub fn new(model_config: &ModelConfig, qna_config: QnaConfig) -> Result<Self> {
        tracing::info!("loading model '{}'", model_config.model);
        let (backend, tokenizer) = BertBackend::load(model_config)?;
        Ok(Self {
            pipeline: QnaPipeline::new(backend, tokenizer, qna_config),
        })
    }

    pub async fn answer(
        &self,
        question: &str,
        passage:  &str,
        id:       Option<&str>,
    ) -> Result<Vec<Prediction>> {
        let predictions = self.pipeline.find_answers(question, passage, id).await?;
        tracing::info!("{} prediction(s)", predictions.len());
        Ok(predictions)
    }
}
