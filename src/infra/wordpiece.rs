// ============================================================
// Layer 6 — WordPiece Tokenizer Adapter
// ============================================================
// Adapts a HuggingFace `tokenizers::Tokenizer` (loaded from the
// tokenizer.json shipped next to the model) to the
// SubwordTokenizer trait.
//
// Two views of the same text are needed:
//   - sub-word ids for the model (`tokenize`)
//   - word-level tokens with byte offsets (`process_input`),
//     the ground truth answers are mapped back onto
//
// The word splitter is ours, not the HF pre-tokenizer: the
// feature builder sub-tokenizes each word individually, so the
// split must be reproducible here regardless of which
// normalizer the tokenizer.json configures. Whitespace
// separates words; punctuation always stands alone, matching
// BERT's basic tokenizer.

use anyhow::{Context, Result};
use std::path::Path;
use tokenizers::Tokenizer;

use crate::domain::answer::OriginalToken;
use crate::domain::error::QnaError;
use crate::domain::traits::SubwordTokenizer;

pub struct WordPieceTokenizer {
    inner:  Tokenizer,
    cls_id: u32,
    sep_id: u32,
}

impl WordPieceTokenizer {
    /// Load from a HuggingFace tokenizer.json. Fails if the
    /// vocabulary does not carry the [CLS]/[SEP] markers this
    /// pipeline assembles inputs with.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = Tokenizer::from_file(path)
            .map_err(|e| anyhow::anyhow!("cannot load tokenizer from '{}': {e}", path.display()))?;
        Self::from_tokenizer(inner)
    }

    pub fn from_tokenizer(inner: Tokenizer) -> Result<Self> {
        let cls_id = inner
            .token_to_id("[CLS]")
            .context("tokenizer vocabulary has no [CLS] token")?;
        let sep_id = inner
            .token_to_id("[SEP]")
            .context("tokenizer vocabulary has no [SEP] token")?;
        tracing::debug!("tokenizer loaded: [CLS]={cls_id} [SEP]={sep_id}");
        Ok(Self { inner, cls_id, sep_id })
    }
}

impl SubwordTokenizer for WordPieceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, QnaError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| QnaError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn process_input(&self, text: &str) -> Vec<OriginalToken> {
        split_words(text)
    }

    fn cls_id(&self) -> u32 {
        self.cls_id
    }

    fn sep_id(&self) -> u32 {
        self.sep_id
    }
}

/// Split text into word-level tokens with byte offsets. Whitespace is
/// skipped; every punctuation character becomes its own token.
pub fn split_words(text: &str) -> Vec<OriginalToken> {
    let mut tokens: Vec<OriginalToken> = Vec::new();
    let mut word_start: Option<usize> = None;

    let flush = |tokens: &mut Vec<OriginalToken>, start: &mut Option<usize>, end: usize, text: &str| {
        if let Some(s) = start.take() {
            tokens.push(OriginalToken::new(&text[s..end], s));
        }
    };

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            flush(&mut tokens, &mut word_start, i, text);
        } else if is_punctuation(c) {
            flush(&mut tokens, &mut word_start, i, text);
            tokens.push(OriginalToken::new(c.to_string(), i));
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    flush(&mut tokens, &mut word_start, text.len(), text);

    tokens
}

/// Punctuation the way BERT's basic tokenizer sees it: ASCII
/// punctuation ranges plus Unicode punctuation classes.
fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(c, '\u{2000}'..='\u{206F}' | '\u{3000}'..='\u{303F}')
        || unicode_punct_class(c)
}

fn unicode_punct_class(c: char) -> bool {
    // char has no is_punctuation; cover the common general
    // categories seen in passages (dashes, quotes, brackets)
    matches!(c, '«' | '»' | '‐' | '‑' | '–' | '—' | '“' | '”' | '‘' | '’' | '…' | '·')
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_records_byte_offsets() {
        let tokens = split_words("The sky is blue.");
        let view: Vec<(&str, usize)> =
            tokens.iter().map(|t| (t.text.as_str(), t.char_offset)).collect();
        assert_eq!(
            view,
            vec![("The", 0), ("sky", 4), ("is", 8), ("blue", 11), (".", 15)]
        );
    }

    #[test]
    fn test_punctuation_stands_alone() {
        let tokens = split_words("well-known, yes?");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["well", "-", "known", ",", "yes", "?"]);
    }

    #[test]
    fn test_offsets_index_back_into_the_source() {
        let text = "  spaced   out  text ";
        for token in split_words(text) {
            assert_eq!(&text[token.char_offset..token.char_offset + token.text.len()], token.text);
        }
    }

    #[test]
    fn test_empty_and_blank_inputs() {
        assert!(split_words("").is_empty());
        assert!(split_words("   \t\n").is_empty());
    }
}
