// ============================================================
// Test Support — Mock Collaborators
// ============================================================
// A deterministic word-level tokenizer and a scripted model
// backend, so the feature builder and pipeline are testable
// without downloading a model. Compiled for tests only.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::answer::OriginalToken;
use crate::domain::error::QnaError;
use crate::domain::traits::{ModelBackend, ModelInputs, ModelOutputs, SubwordTokenizer};
use crate::infra::wordpiece::split_words;
use crate::ml::decoder::OUTPUT_OFFSET;

/// Word-level tokenizer with an interned vocabulary: the first time a
/// word is seen it gets the next free id, so ids are stable within a
/// test and never collide. Words longer than 8 characters expand into
/// one sub-word per 4-character chunk, exercising the sub-word →
/// original-token fan-out.
pub struct MockTokenizer {
    vocab: Mutex<HashMap<String, u32>>,
}

const MOCK_CLS: u32 = 101;
const MOCK_SEP: u32 = 102;
const FIRST_WORD_ID: u32 = 1000;

impl MockTokenizer {
    pub fn new() -> Self {
        Self { vocab: Mutex::new(HashMap::new()) }
    }

    /// Stable id of a (single-sub-word) word.
    pub fn id_of(&self, word: &str) -> u32 {
        self.intern(&word.to_lowercase())
    }

    fn intern(&self, piece: &str) -> u32 {
        let mut vocab = self.vocab.lock().expect("mock vocab poisoned");
        let next = FIRST_WORD_ID + vocab.len() as u32;
        *vocab.entry(piece.to_string()).or_insert(next)
    }
}

impl SubwordTokenizer for MockTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, QnaError> {
        let mut ids = Vec::new();
        for token in split_words(text) {
            let word = token.text.to_lowercase();
            if word.len() > 8 {
                for chunk in word.as_bytes().chunks(4) {
                    let piece = String::from_utf8_lossy(chunk).to_string();
                    ids.push(self.intern(&piece));
                }
            } else {
                ids.push(self.intern(&word));
            }
        }
        Ok(ids)
    }

    fn process_input(&self, text: &str) -> Vec<OriginalToken> {
        split_words(text)
    }

    fn cls_id(&self) -> u32 {
        MOCK_CLS
    }

    fn sep_id(&self) -> u32 {
        MOCK_SEP
    }
}

/// Backend that scores scripted target ids: wherever a target id sits
/// at input position `p`, both logit arrays get `score` at output
/// position `p - OUTPUT_OFFSET`; every other position scores -10.
/// A single-token span over a target therefore scores `2 * score`.
pub struct TargetBackend {
    targets: Vec<(u32, f32)>,
}

impl TargetBackend {
    pub fn new(targets: Vec<(u32, f32)>) -> Self {
        Self { targets }
    }

    pub fn single(target: u32, score: f32) -> Self {
        Self::new(vec![(target, score)])
    }
}

impl ModelBackend for TargetBackend {
    async fn execute(&self, inputs: &ModelInputs) -> anyhow::Result<ModelOutputs> {
        let mut start_logits = Vec::with_capacity(inputs.batch_size());
        let mut end_logits   = Vec::with_capacity(inputs.batch_size());

        for row in &inputs.input_ids {
            let mut start = vec![-10.0f32; row.len()];
            let mut end   = vec![-10.0f32; row.len()];
            for (pos, id) in row.iter().enumerate().skip(OUTPUT_OFFSET) {
                if let Some(&(_, score)) =
                    self.targets.iter().find(|(target, _)| target == id)
                {
                    start[pos - OUTPUT_OFFSET] = score;
                    end[pos - OUTPUT_OFFSET]   = score;
                }
            }
            start_logits.push(start);
            end_logits.push(end);
        }

        Ok(ModelOutputs { start_logits, end_logits })
    }
}
