use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use crate::error::{Error, Result};

/// Byte span of one token within the source text.
pub type Span = (usize, usize);

/// Fixed word/punctuation tokenizer.
///
/// Splits on `\w+|[^\w\s]+` and keeps byte offsets into the original text,
/// so any run of tokens maps back to an exact slice of the input.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    inner: Whitespace,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self, text: &str) -> Result<Vec<Span>> {
        let mut pretokenized = PreTokenizedString::from(text);
        self.inner
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| Error::Tokenize(e.to_string()))?;
        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(_, offsets, _)| offsets)
            .collect())
    }

    pub fn count(&self, text: &str) -> Result<usize> {
        Ok(self.spans(text)?.len())
    }
}
