use crate::domain::language::LanguageTag;
use crate::domain::speech::BackendKind;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+\s+|[。！？]+\s*").unwrap());

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TtsRepositoryError {
    /// Provider unreachable or credentials rejected
    #[error("{0}")]
    Connection(String),
    /// Provider rejected the request parameters
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Synthesis(String),
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (AWS Polly, Google Cloud, OpenAI)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Splitting text into batches if needed
/// - Converting provider audio into 16 kHz, 16-bit, mono PCM
#[async_trait]
pub trait TtsRepository: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Synthesize text in a given language with a specific voice
    ///
    /// Returns raw little-endian PCM in the speech format, without any container header
    ///
    /// # Errors
    /// Returns the provider failure already classified as connection, input or synthesis error
    async fn synthesize(
        &self,
        language: LanguageTag,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, TtsRepositoryError>;
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_chars` characters; text without boundaries is cut by characters.
pub fn split_into_batches(text: &str, max_chars: usize) -> Vec<String> {
    split_into_batches_by(text, max_chars, |s| s.chars().count())
}

/// Split text into batches whose `measure` stays within `max_len`.
/// `measure` must be additive over concatenation, like a character or byte count.
pub fn split_into_batches_by<F>(text: &str, max_len: usize, measure: F) -> Vec<String>
where
    F: Fn(&str) -> usize,
{
    let max_len = max_len.max(1);
    if measure(text) <= max_len {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut current_len = 0;
    let mut last_end = 0;

    let mut push_piece = |piece: &str, batches: &mut Vec<String>| {
        let piece_len = measure(piece);
        if current_len > 0 && current_len + piece_len > max_len {
            batches.push(current_batch.trim().to_string());
            current_batch.clear();
            current_len = 0;
        }

        if piece_len > max_len {
            // No boundary to cut at: fill chunks char by char
            let mut chunk = String::new();
            let mut chunk_len = 0;
            let mut buf = [0u8; 4];
            for c in piece.chars() {
                let char_len = measure(&*c.encode_utf8(&mut buf));
                if chunk_len > 0 && chunk_len + char_len > max_len {
                    batches.push(std::mem::take(&mut chunk));
                    chunk_len = 0;
                }
                chunk.push(c);
                chunk_len += char_len;
            }
            if !chunk.is_empty() {
                batches.push(chunk);
            }
        } else {
            current_batch.push_str(piece);
            current_len += piece_len;
        }
    };

    for mat in SENTENCE_END.find_iter(text) {
        push_piece(&text[last_end..mat.end()], &mut batches);
        last_end = mat.end();
    }

    // Handle remaining text after last sentence boundary
    if last_end < text.len() {
        push_piece(&text[last_end..], &mut batches);
    }

    if !current_batch.trim().is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches.retain(|batch| !batch.trim().is_empty());
    batches
}
