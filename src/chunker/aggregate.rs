use async_trait::async_trait;
use tracing::{debug, warn};

use super::{ChunkError, ChunkLimit, chunk};

/// Inputs shorter than this (trimmed, in chars) skip chunking entirely.
pub const MIN_INPUT_CHARS: usize = 300;

/// Sentinel returned when no meaningful result could be produced.
/// Distinguishable from legitimate content; never an empty string.
pub const SHORT_INPUT_NOTICE: &str = "⚠️ Input too short to process meaningfully.";

pub fn is_guard(s: &str) -> bool {
    s == SHORT_INPUT_NOTICE
}

/// Per-chunk transform seam. Production implementations call the model
/// endpoint; tests substitute a scripted stand-in.
#[async_trait]
pub trait ChunkTransform: Send + Sync {
    async fn apply(&self, chunk: &str) -> anyhow::Result<String>;
}

/// Chunk `text` under `limit` and drive `transform` over every admitted chunk,
/// strictly in order, joining the outputs with single spaces.
///
/// Chunks with fewer than `min_admit_words` words are never sent to the
/// transform. A failing transform contributes an inline diagnostic slot and
/// processing continues with the next chunk. If nothing was admitted (or the
/// input fails the [`MIN_INPUT_CHARS`] pre-check), the guard string is
/// returned instead of an empty result.
pub async fn aggregate(
    text: &str,
    limit: ChunkLimit,
    min_admit_words: usize,
    transform: &dyn ChunkTransform,
) -> Result<String, ChunkError> {
    if text.trim().chars().count() < MIN_INPUT_CHARS {
        return Ok(SHORT_INPUT_NOTICE.to_string());
    }

    let chunks = chunk(text, limit)?;

    let mut parts: Vec<String> = Vec::new();
    for (idx, piece) in chunks.iter().enumerate() {
        let words = piece.split_whitespace().count();
        if words < min_admit_words {
            debug!(chunk = idx + 1, words, "chunk below admission threshold, skipped");
            continue;
        }
        match transform.apply(piece).await {
            Ok(out) => {
                let out = out.trim().to_string();
                if !out.is_empty() {
                    parts.push(out);
                }
            }
            Err(err) => {
                warn!(chunk = idx + 1, error = %err, "chunk transform failed, continuing");
                parts.push(format!("[chunk {} failed: {err}]", idx + 1));
            }
        }
    }

    let joined = parts.join(" ").trim().to_string();
    if joined.is_empty() {
        return Ok(SHORT_INPUT_NOTICE.to_string());
    }
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every chunk it sees; fails on the chunk at `fail_on` (1-based).
    struct Scripted {
        fail_on: Option<usize>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(fail_on: Option<usize>) -> Self {
            Self { fail_on, calls: Mutex::new(Vec::new()) }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChunkTransform for Scripted {
        async fn apply(&self, chunk: &str) -> anyhow::Result<String> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(chunk.to_string());
            let n = calls.len();
            if self.fail_on == Some(n) {
                anyhow::bail!("scripted failure");
            }
            Ok(format!("out{n}"))
        }
    }

    // 60 words, well past the 300-char pre-check.
    fn long_text() -> String {
        (0..60).map(|i| format!("word{i:04}")).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn short_input_returns_guard_without_calls() {
        let t = Scripted::new(None);
        let got = aggregate("a b c", ChunkLimit::MaxWords(2), 0, &t).await.unwrap();
        assert!(is_guard(&got));
        assert_eq!(t.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_limit_fails_before_any_call() {
        let t = Scripted::new(None);
        let err = aggregate(&long_text(), ChunkLimit::MaxWords(0), 0, &t).await;
        assert!(matches!(err, Err(ChunkError::InvalidLimit)));
        assert_eq!(t.call_count(), 0);
    }

    #[tokio::test]
    async fn admission_filter_skips_small_chunks() {
        // 60 words in chunks of 25 -> 25, 25, 10; the tail chunk is filtered.
        let t = Scripted::new(None);
        let got = aggregate(&long_text(), ChunkLimit::MaxWords(25), 20, &t).await.unwrap();
        assert_eq!(t.call_count(), 2);
        assert_eq!(got, "out1 out2");
    }

    #[tokio::test]
    async fn all_chunks_filtered_returns_guard() {
        let t = Scripted::new(None);
        let got = aggregate(&long_text(), ChunkLimit::MaxWords(25), 40, &t).await.unwrap();
        assert!(is_guard(&got));
        assert_eq!(t.call_count(), 0);
    }

    #[tokio::test]
    async fn partial_failure_keeps_slot_order() {
        // 60 words in chunks of 20 -> three admitted chunks; the middle fails.
        let t = Scripted::new(Some(2));
        let got = aggregate(&long_text(), ChunkLimit::MaxWords(20), 10, &t).await.unwrap();
        assert_eq!(t.call_count(), 3);
        let parts: Vec<&str> = got.splitn(3, ' ').collect();
        assert_eq!(parts[0], "out1");
        assert!(got.contains("[chunk 2 failed: scripted failure]"));
        assert!(got.ends_with("out3"));
    }

    #[tokio::test]
    async fn outputs_follow_chunk_order() {
        let t = Scripted::new(None);
        let got = aggregate(&long_text(), ChunkLimit::MaxWords(20), 1, &t).await.unwrap();
        assert_eq!(got, "out1 out2 out3");
        let calls = t.calls.lock().unwrap();
        let rejoined: Vec<String> =
            calls.iter().flat_map(|c| c.split_whitespace().map(String::from)).collect();
        let original: Vec<String> = long_text().split_whitespace().map(String::from).collect();
        assert_eq!(rejoined, original);
    }
}
