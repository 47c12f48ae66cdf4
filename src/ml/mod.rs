// ============================================================
// Layer 5 — ML Layer
// ============================================================
// Everything downstream of the model's raw output:
//
//   decoder.rs  — turns one feature's (start, end) logit arrays
//                 into validated, scored candidate spans and
//                 recovers original-passage byte offsets
//
//   pipeline.rs — the public find_answers operation: builds
//                 features, executes the model once for all
//                 windows, decodes each window, and merges the
//                 candidates into one globally ranked list
//
// No tensor math lives here — the model is a collaborator
// behind the ModelBackend trait, and logits arrive as plain
// Vec<f32> rows.

/// Best-index selection, span filtering, and offset recovery
pub mod decoder;

/// The end-to-end question answering pipeline
pub mod pipeline;
