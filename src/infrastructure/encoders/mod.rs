pub mod mp3;
pub mod ogg;
pub mod wav;

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("wav encoding failed: {0}")]
    Wav(#[from] hound::Error),
    #[error("mp3 encoding failed: {0}")]
    Mp3(String),
    #[error("ogg encoding failed: {0}")]
    Ogg(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
