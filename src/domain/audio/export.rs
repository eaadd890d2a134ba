use super::pcm::PcmAudio;
use crate::domain::tts::{OutputArtifact, TtsServiceError};
use crate::infrastructure::encoders::{mp3, ogg, wav, EncoderError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

type Encoder = fn(&PcmAudio) -> Result<Vec<u8>, EncoderError>;

/// Containers the assembled track can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Wav,
    Mp3,
    Ogg,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Ogg => "ogg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "audio/wav",
            OutputFormat::Mp3 => "audio/mpeg",
            OutputFormat::Ogg => "audio/ogg",
        }
    }

    pub fn is_lossless(&self) -> bool {
        matches!(self, OutputFormat::Wav)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = TtsServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "wav" => Ok(OutputFormat::Wav),
            "mp3" => Ok(OutputFormat::Mp3),
            "ogg" => Ok(OutputFormat::Ogg),
            _ => Err(TtsServiceError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Transcodes assembled PCM into a container and writes it to disk.
#[derive(Debug, Clone, Default)]
pub struct AudioExporter;

impl AudioExporter {
    pub fn new() -> Self {
        Self
    }

    /// Export using a format name. Unknown names fail before anything is encoded or written.
    pub async fn export(
        &self,
        audio: &PcmAudio,
        format: &str,
        destination: &Path,
    ) -> Result<OutputArtifact, TtsServiceError> {
        let format: OutputFormat = format.parse()?;
        self.export_as(audio, format, destination).await
    }

    pub async fn export_as(
        &self,
        audio: &PcmAudio,
        format: OutputFormat,
        destination: &Path,
    ) -> Result<OutputArtifact, TtsServiceError> {
        let bytes = self.encode(audio, format).await?;
        let size_bytes = bytes.len() as u64;
        write_atomically(destination, bytes).await?;

        tracing::info!(
            location = %destination.display(),
            format = %format,
            size_bytes,
            duration_secs = audio.duration().as_secs_f64(),
            "Audio exported"
        );

        Ok(OutputArtifact {
            location: destination.to_path_buf(),
            format,
            size_bytes,
            duration_ms: audio.duration().as_millis() as u64,
            descriptors: Vec::new(),
        })
    }

    /// Encode in memory without touching the file system
    pub async fn encode(
        &self,
        audio: &PcmAudio,
        format: OutputFormat,
    ) -> Result<Vec<u8>, TtsServiceError> {
        let bytes = match format {
            OutputFormat::Wav => encode_blocking(audio, wav::encode).await?,
            OutputFormat::Mp3 => encode_blocking(audio, mp3::encode).await?,
            OutputFormat::Ogg => ogg::encode(audio).await?,
        };
        Ok(bytes)
    }
}

/// Run a CPU-bound encoder off the async worker threads
async fn encode_blocking(audio: &PcmAudio, encode: Encoder) -> Result<Vec<u8>, TtsServiceError> {
    let audio = audio.clone();
    let bytes = tokio::task::spawn_blocking(move || encode(&audio))
        .await
        .context("encoder task did not complete")??;
    Ok(bytes)
}

/// Persist on a blocking thread. Once started the write runs to completion even if the
/// request is dropped, so the destination is either complete or absent and no temporary
/// file is left behind.
async fn write_atomically(destination: &Path, bytes: Vec<u8>) -> Result<(), TtsServiceError> {
    let destination = destination.to_path_buf();
    tokio::task::spawn_blocking(move || persist(&destination, &bytes))
        .await
        .context("file writer task did not complete")??;
    Ok(())
}

/// Write to a hidden sibling first and rename it over the destination.
fn persist(destination: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = destination.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("destination has no file name: {}", destination.display()),
        )
    })?;
    let mut temp = TempFile::new(destination.with_file_name(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        Uuid::new_v4()
    )));

    fs::write(temp.path(), bytes)?;
    fs::rename(temp.path(), destination)?;
    temp.keep();

    Ok(())
}

/// Temporary file removed on drop unless it was renamed into place
struct TempFile {
    path: PathBuf,
    persisted: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn keep(&mut self) {
        self.persisted = true;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}
