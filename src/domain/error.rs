// ============================================================
// Layer 3 — Error Type
// ============================================================
// One enum for everything the core can fail with. There are no
// retries anywhere: feature building and decoding are pure,
// deterministic transformations, and a model-execution failure
// propagates unchanged to the caller of `find_answers`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QnaError {
    /// The question or the passage was missing. Raised synchronously,
    /// before any tokenization happens.
    #[error("invalid input: {0} is empty — both a question and a passage are required")]
    InvalidInput(&'static str),

    /// The tokenized question exceeded `max_query_len` sub-words.
    /// Never auto-truncated: cutting the question would silently
    /// change what is being asked.
    #[error("question is {actual} sub-word tokens, the limit is {max}")]
    QuestionTooLong { actual: usize, max: usize },

    /// The tokenizer collaborator failed
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// The model-execution collaborator failed
    #[error("model execution failed")]
    Backend(#[source] anyhow::Error),
}
