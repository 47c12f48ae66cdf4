// ============================================================
// bert-qna — Extractive Question Answering Core
// ============================================================
// Given a natural-language question and a passage, this crate
// builds fixed-length model inputs (sliding windows over long
// passages) and decodes the model's start/end logits back into
// ranked answer spans with original-passage offsets.
//
// The layers, top to bottom:
//
//   cli          → clap argument parsing (binary only)
//   application  → wires tokenizer + backend into a pipeline
//   domain       → Answer/Feature types, collaborator traits,
//                  immutable decoding configuration, errors
//   data         → question normalization and feature building
//   ml           → answer decoding and the find_answers pipeline
//   infra        → concrete collaborators: HuggingFace wordpiece
//                  tokenizer, ONNX Runtime model backend
//
// Model execution itself is an external collaborator behind the
// `ModelBackend` trait — the core never touches tensors. The
// bundled ONNX implementation lives behind the `onnx` feature.
//
// Reference: Devlin et al. (2019) BERT paper, §4.2 (SQuAD)

pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;

#[cfg(feature = "onnx")]
pub mod application;

#[cfg(feature = "onnx")]
pub mod cli;

pub use domain::answer::{Answer, OriginalToken, Prediction};
pub use domain::config::QnaConfig;
pub use domain::error::QnaError;
pub use domain::traits::{ModelBackend, ModelInputs, ModelOutputs, SubwordTokenizer};
pub use ml::pipeline::QnaPipeline;

#[cfg(test)]
pub(crate) mod test_support;
