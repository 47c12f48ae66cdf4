// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// The heart of the crate — plain Rust types and traits that
// define what the system talks about.
//
// Rules for this layer:
//   - NO tokenizers/ort/ndarray types allowed here
//   - NO file I/O or network calls
//   - Only structs, enums, traits, and the error type
//
// Why keep this layer pure?
//   - Easy to unit test (no model download needed)
//   - The feature builder and decoder work against traits,
//     so a five-line mock stands in for a 100 MB model
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

// Answer spans, original tokens, and the no-answer variant
pub mod answer;

// Immutable decoding configuration (window sizes, thresholds)
pub mod config;

// The crate-wide error type
pub mod error;

// Collaborator traits: sub-word tokenizer and model backend
pub mod traits;
