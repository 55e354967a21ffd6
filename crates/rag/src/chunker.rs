//! Fixed-size Text Chunking
//!
//! Splits crawled FAQ text into overlapping character windows before
//! indexing. Window size and overlap set retrieval granularity: chunks
//! around 500 characters with 100 characters of overlap keep answers intact
//! across chunk boundaries.

use serde::{Deserialize, Serialize};

use bedding_agent_config::constants::chunking;

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Target chunk content length, in characters
    pub chunk_size: usize,
    /// Overlap carried between consecutive chunks, in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: chunking::CHUNK_SIZE,
            chunk_overlap: chunking::CHUNK_OVERLAP,
        }
    }
}

/// One chunk of a source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text
    pub text: String,
    /// Position of this chunk within the source document
    pub index: usize,
}

/// Fixed-size overlapping-window chunker
pub struct TextChunker {
    config: ChunkConfig,
}

impl TextChunker {
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Split text into overlapping windows.
    ///
    /// Windows advance by `chunk_size - chunk_overlap` characters and always
    /// cut on character boundaries, so CJK text never splits mid-character.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let size = self.config.chunk_size.max(1);
        let step = size.saturating_sub(self.config.chunk_overlap).max(1);

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + size).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            let trimmed = window.trim();

            if !trimmed.is_empty() {
                chunks.push(Chunk {
                    text: trimmed.to_string(),
                    index: chunks.len(),
                });
            }

            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(ChunkConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> TextChunker {
        TextChunker::new(ChunkConfig {
            chunk_size: size,
            chunk_overlap: overlap,
        })
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = TextChunker::default().chunk("億進寢具的品牌故事。");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
    }

    #[test]
    fn windows_respect_size_and_overlap() {
        let text: String = std::iter::repeat('字').take(25).collect();
        let chunks = chunker(10, 3).chunk(&text);

        // Steps of 7: starts at 0, 7, 14, 21
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 10));

        // Consecutive chunks share the overlap region
        let first: Vec<char> = chunks[0].text.chars().collect();
        let second: Vec<char> = chunks[1].text.chars().collect();
        assert_eq!(&first[7..], &second[..3]);
    }

    #[test]
    fn cjk_text_never_splits_mid_character() {
        let text = "寢具知識：枕頭與棉被的挑選、保養與收納須知。".repeat(40);
        let chunks = TextChunker::default().chunk(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            // Valid UTF-8 strings by construction; sanity-check lengths
            assert!(chunk.text.chars().count() <= 500);
        }
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(TextChunker::default().chunk("   ").is_empty());
    }
}
