use thiserror::Error;

pub mod aggregate;

pub use aggregate::{ChunkTransform, MIN_INPUT_CHARS, SHORT_INPUT_NOTICE, aggregate, is_guard};

/// Size bound for a single chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkLimit {
    /// The joined chunk string stays within this many characters.
    MaxChars(usize),
    /// The chunk holds at most this many whitespace-delimited words.
    MaxWords(usize),
}

impl ChunkLimit {
    fn value(self) -> usize {
        match self {
            ChunkLimit::MaxChars(n) | ChunkLimit::MaxWords(n) => n,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("chunk limit must be at least 1")]
    InvalidLimit,
}

/// Split `text` into bounded chunks with a single greedy left-to-right pass.
///
/// Tokens are whitespace-delimited words, re-joined with single spaces; every
/// token of the input lands in exactly one chunk, in original order. A word
/// longer than a `MaxChars` limit is placed alone in its own chunk rather than
/// split mid-token, so the char bound can be exceeded for that one case.
///
/// Empty or whitespace-only input yields an empty sequence. A zero limit is a
/// precondition violation and fails before any work.
pub fn chunk(text: &str, limit: ChunkLimit) -> Result<Vec<String>, ChunkError> {
    if limit.value() == 0 {
        return Err(ChunkError::InvalidLimit);
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    // Char length of `current` joined with single spaces, tracked incrementally.
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        let fits = match limit {
            ChunkLimit::MaxWords(max) => current.len() + 1 <= max,
            ChunkLimit::MaxChars(max) => {
                let tentative = if current.is_empty() {
                    word_chars
                } else {
                    current_chars + 1 + word_chars
                };
                tentative <= max
            }
        };

        if fits {
            if !current.is_empty() {
                current_chars += 1;
            }
            current_chars += word_chars;
            current.push(word);
        } else {
            if !current.is_empty() {
                chunks.push(current.join(" "));
            }
            // Oversized single token: starts (and stays) alone in its chunk.
            current = vec![word];
            current_chars = word_chars;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    Ok(chunks)
}
