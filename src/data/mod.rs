// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw (question, passage) strings and
// model-ready input rows:
//
//   question + passage
//       │
//       ▼
//   preprocessor   → canonicalizes the question ("...?" exactly once)
//       │
//       ▼
//   FeatureBuilder → tokenizes, slides fixed-length windows over
//                    the passage, assembles [CLS] Q [SEP] P [SEP]
//                    rows with the position → original-token map
//                    the decoder needs to recover byte offsets
//
// Each step is independently testable with a mock tokenizer.
//
// Reference: Devlin et al. (2019) BERT paper (sliding window
//            approach for documents longer than max_seq_len)

/// Question normalization
pub mod preprocessor;

/// Fixed-length feature windows over the passage sub-word sequence
pub mod feature;
