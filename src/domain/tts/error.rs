use crate::domain::speech::BackendKind;
use crate::error::AppError;
use crate::infrastructure::encoders::EncoderError;
use crate::infrastructure::repositories::TtsRepositoryError;
use std::time::Duration;

/// Characters of segment text kept when annotating an error
const SEGMENT_PREVIEW_CHARS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("synthesis error: {0}")]
    Synthesis(String),
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),
    #[error("synthesis timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("audio encoding failed: {0}")]
    Encoding(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TtsServiceError {
    /// Translate a backend failure, annotated with the backend and the offending segment.
    pub fn from_backend(backend: BackendKind, segment_text: &str, err: TtsRepositoryError) -> Self {
        let context = |message: String| {
            format!(
                "{}: error in segment '{}': {}",
                backend,
                preview(segment_text),
                message
            )
        };

        match err {
            TtsRepositoryError::Connection(msg) => TtsServiceError::Connection(context(msg)),
            TtsRepositoryError::InvalidInput(msg) => TtsServiceError::InvalidInput(context(msg)),
            TtsRepositoryError::Synthesis(msg) => TtsServiceError::Synthesis(context(msg)),
        }
    }
}

impl From<EncoderError> for TtsServiceError {
    fn from(err: EncoderError) -> Self {
        match err {
            EncoderError::Io(e) => TtsServiceError::Io(e),
            other => TtsServiceError::Encoding(other.to_string()),
        }
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::InvalidInput(msg) => AppError::BadRequest(msg),
            TtsServiceError::Connection(msg) => AppError::Unavailable(msg),
            TtsServiceError::Synthesis(msg) => AppError::ExternalService(msg),
            TtsServiceError::UnsupportedFormat(name) => AppError::UnsupportedFormat(name),
            TtsServiceError::Timeout(after) => {
                AppError::Timeout(format!("synthesis took longer than {}s", after.as_secs()))
            }
            TtsServiceError::Encoding(msg) => AppError::Internal(msg),
            TtsServiceError::Io(e) => AppError::Io(e),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}

/// First characters of a segment, with an ellipsis when cut
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(SEGMENT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
