/*!
 * Splitting of long input into bounded chunks.
 *
 * Chunk sizes are counted in chars. A split prefers the last whitespace
 * at or before `start + max_chars`; the whitespace itself opens the next
 * chunk, so concatenating every chunk gives back the input unchanged.
 * A run with no whitespace is hard-cut at `max_chars`.
 */

use crate::errors::TranslationError;

/// Default maximum chunk length in chars
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 1400;

/// A contiguous slice of the input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the chunk sequence
    pub index: usize,
    /// Char offset of the first char in the input
    pub offset: usize,
    /// Chunk text
    pub text: String,
}

impl Chunk {
    /// Length in chars
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the chunk carries anything worth sending to a provider
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Split `text` into chunks of at most `max_chars` chars
pub fn split_into_chunks(text: &str, max_chars: usize) -> Result<Vec<Chunk>, TranslationError> {
    if max_chars == 0 {
        return Err(TranslationError::InvalidChunkSize(max_chars));
    }

    // (byte offset, char) for every char, plus a sentinel for the end
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let total = chars.len();
    let byte_at = |i: usize| if i < total { chars[i].0 } else { text.len() };

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let end = if total - start <= max_chars {
            total
        } else {
            let limit = start + max_chars;
            (start + 1..=limit)
                .rev()
                .find(|&i| chars[i].1.is_whitespace())
                .unwrap_or(limit)
        };

        chunks.push(Chunk {
            index: chunks.len(),
            offset: start,
            text: text[byte_at(start)..byte_at(end)].to_string(),
        });
        start = end;
    }

    Ok(chunks)
}
