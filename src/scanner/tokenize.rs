//! Whitespace tokenizer with forward-only word location.
//!
//! The window for word *i+1* starts at the end of word *i*, so repeated words
//! ("@bob hi @bob") each get their own range instead of the first occurrence.

use super::types::TextRange;

/// A whitespace-delimited word and its range in the scanned buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Word<'t> {
    pub text: &'t str,
    pub range: TextRange,
}

/// Iterator over the words of a buffer, left to right
pub struct Tokenizer<'t> {
    text: &'t str,
    cursor: usize,
}

impl<'t> Tokenizer<'t> {
    pub fn new(text: &'t str) -> Self {
        Self { text, cursor: 0 }
    }
}

impl<'t> Iterator for Tokenizer<'t> {
    type Item = Word<'t>;

    fn next(&mut self) -> Option<Word<'t>> {
        let window = &self.text[self.cursor..];

        let start = self.cursor + window.find(|c: char| !c.is_whitespace())?;
        let rest = &self.text[start..];
        let end = start + rest.find(char::is_whitespace).unwrap_or(rest.len());

        self.cursor = end;
        Some(Word {
            text: &self.text[start..end],
            range: TextRange::from_bounds(start, end),
        })
    }
}

/// Collect every word of `text` with its range
pub fn tokenize(text: &str) -> Vec<Word<'_>> {
    Tokenizer::new(text).collect()
}
