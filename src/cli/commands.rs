// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// One subcommand: `ask`. clap's derive macros generate the help
// text, missing-argument errors, and string → number parsing.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::domain::config::QnaConfig;
use crate::infra::bert_backend::{ModelConfig, DEFAULT_MODEL};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about a passage
    Ask(AskArgs),
}

/// All arguments for the `ask` command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The natural language question to answer
    #[arg(long)]
    pub question: String,

    /// The passage to extract the answer from
    #[arg(long)]
    pub passage: Option<String>,

    /// Read the passage from a file instead
    #[arg(long, conflicts_with = "passage")]
    pub passage_file: Option<PathBuf>,

    /// HuggingFace repo id, or a local directory with model.onnx
    /// and tokenizer.json
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Use the full-precision export even when a quantized one exists
    #[arg(long)]
    pub full_precision: bool,

    /// Intra-op threads for the ONNX session (0 = runtime default)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Maximum number of answers to return
    #[arg(long, default_value_t = 5)]
    pub top_k: usize,

    /// Combined-logit score below which a window counts as
    /// answerless. Model-specific; the default matches the default
    /// model.
    #[arg(long, default_value_t = 4.398_076)]
    pub no_answer_threshold: f32,

    /// Opaque identifier echoed into every returned answer
    #[arg(long)]
    pub id: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskArgs {
    /// CLI args → model-loading configuration. The application layer
    /// never sees clap types.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model:            self.model.clone(),
            prefer_quantized: !self.full_precision,
            num_threads:      self.threads,
        }
    }

    /// CLI args → decoding configuration.
    pub fn qna_config(&self) -> QnaConfig {
        QnaConfig {
            predict_answer_num:  self.top_k,
            no_answer_threshold: self.no_answer_threshold,
            ..QnaConfig::default()
        }
    }
}
