//! Token-bounded sliding window chunker.
//!
//! Text is tokenized once with [`Tokenizer`]; windows of `chunk_size` tokens
//! advance by `chunk_size - overlap` and are decoded by slicing the original
//! text between the first and last token of the window. Text that already
//! fits in one window is returned untouched.

use tracing::debug;

use crate::error::{Error, Result};
use crate::tokenize::{Span, Tokenizer};

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
    tokenizer: Tokenizer,
}

impl Chunker {
    /// Errors unless `chunk_size > overlap`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 || chunk_size <= overlap {
            return Err(Error::InvalidConfig(format!(
                "chunk_size ({chunk_size}) must be greater than overlap ({overlap})"
            )));
        }
        Ok(Self { chunk_size, overlap, tokenizer: Tokenizer::new() })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    pub fn count_tokens(&self, text: &str) -> Result<usize> {
        self.tokenizer.count(text)
    }

    /// Split `text` into overlapping chunks, lazily.
    pub fn chunk<'a>(&self, text: &'a str) -> Result<Chunks<'a>> {
        if text.trim().is_empty() {
            return Ok(Chunks::empty(text));
        }
        let spans = self.tokenizer.spans(text)?;
        if spans.len() <= self.chunk_size {
            return Ok(Chunks::whole(text));
        }
        debug!(tokens = spans.len(), chunk_size = self.chunk_size, overlap = self.overlap, "windowing text");
        Ok(Chunks {
            text,
            state: State::Windows { spans, size: self.chunk_size, stride: self.stride(), start: 0 },
        })
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            tokenizer: Tokenizer::new(),
        }
    }
}

/// Iterator over the chunks of one text. Not restartable.
#[derive(Debug)]
pub struct Chunks<'a> {
    text: &'a str,
    state: State,
}

#[derive(Debug)]
enum State {
    Done,
    Whole,
    Windows { spans: Vec<Span>, size: usize, stride: usize, start: usize },
}

impl<'a> Chunks<'a> {
    fn empty(text: &'a str) -> Self {
        Self { text, state: State::Done }
    }

    fn whole(text: &'a str) -> Self {
        Self { text, state: State::Whole }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let text = self.text;
        match &mut self.state {
            State::Done => None,
            State::Whole => {
                self.state = State::Done;
                Some(text)
            }
            State::Windows { spans, size, stride, start } => {
                let first = *start;
                let last = (first + *size).min(spans.len());
                let chunk = &text[spans[first].0..spans[last - 1].1];
                // A window that reaches the final token ends the sequence.
                if last == spans.len() {
                    self.state = State::Done;
                } else {
                    *start += *stride;
                }
                Some(chunk)
            }
        }
    }
}
