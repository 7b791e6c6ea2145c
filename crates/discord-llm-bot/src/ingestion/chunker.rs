//! Token-aware text splitting

use crate::error::{Error, Result};

use super::tokenizer::TokenEncoder;

/// Splits text into windows of at most `chunk_size` tokens
///
/// Consecutive windows share `chunk_overlap` tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TokenSplitter {
    /// Create a new splitter
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(Error::Config(format!(
                "invalid chunking: size {} overlap {}",
                chunk_size, chunk_overlap
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Split `text` and decode each window back to text
    pub fn split(&self, encoder: &dyn TokenEncoder, text: &str) -> Result<Vec<String>> {
        let ids = encoder.encode(text)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if ids.len() <= self.chunk_size {
            return Ok(vec![text.to_string()]);
        }
        self.windows(ids.len())
            .map(|(start, end)| encoder.decode(&ids[start..end]))
            .collect()
    }

    /// Token ranges of each window over `len` tokens
    fn windows(&self, len: usize) -> impl Iterator<Item = (usize, usize)> {
        let step = self.chunk_size - self.chunk_overlap;
        let size = self.chunk_size;
        let overlap = self.chunk_overlap;
        (0..len)
            .step_by(step)
            .map(move |start| (start, (start + size).min(len)))
            .take_while(move |&(start, _)| start == 0 || start + overlap < len)
    }
}
