// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestration only: wires the concrete collaborators (ONNX
// backend + wordpiece tokenizer) into a pipeline and exposes
// one operation per user goal. No decoding math, no printing —
// that belongs to Layer 5 and Layer 1 respectively.

// The question-answering workflow
pub mod answer_use_case;
