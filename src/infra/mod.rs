// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Concrete implementations of the collaborator traits:
//
//   wordpiece.rs    — SubwordTokenizer backed by a HuggingFace
//                     tokenizer.json (the same vocabulary the
//                     model was exported with), plus the
//                     word-level splitter that produces original
//                     tokens with byte offsets
//
//   bert_backend.rs — ModelBackend backed by ONNX Runtime,
//                     loading a BERT-family SQuAD export either
//                     from a local path or from the HuggingFace
//                     hub. Behind the `onnx` feature so library
//                     consumers with their own backend pull in
//                     none of it.
//
// Everything here is read-only after construction and safe to
// share across concurrent find_answers calls.

/// HuggingFace wordpiece tokenizer adapter
pub mod wordpiece;

/// ONNX Runtime model backend
#[cfg(feature = "onnx")]
pub mod bert_backend;
