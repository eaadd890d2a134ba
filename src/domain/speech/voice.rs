use crate::domain::audio::OutputFormat;
use crate::domain::language::LanguageTag;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const POLLY_ENGLISH_VOICES: &[&str] = &["Joanna", "Matthew", "Kimberly", "Salli", "Joey"];
const POLLY_JAPANESE_VOICES: &[&str] = &["Takumi", "Kazuha", "Tomoko", "Mizuki"];
const GOOGLE_ENGLISH_VOICES: &[&str] = &["en-US-Standard-C", "en-US-Standard-A", "en-US-Standard-B"];
const GOOGLE_JAPANESE_VOICES: &[&str] = &["ja-JP-Standard-A", "ja-JP-Standard-B", "ja-JP-Standard-C"];
const OPENAI_ENGLISH_VOICES: &[&str] = &["alloy", "echo", "fable", "onyx", "nova", "shimmer"];
const OPENAI_JAPANESE_VOICES: &[&str] = &["nova", "alloy", "echo", "fable", "onyx", "shimmer"];

/// The fixed set of synthesis providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Polly,
    #[serde(rename = "google")]
    GoogleCloud,
    #[serde(rename = "openai")]
    OpenAi,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::Polly,
        BackendKind::GoogleCloud,
        BackendKind::OpenAi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Polly => "polly",
            BackendKind::GoogleCloud => "google",
            BackendKind::OpenAi => "openai",
        }
    }

    /// Known voices for a language; the first one is the default
    pub fn voices(&self, language: LanguageTag) -> &'static [&'static str] {
        match (self, language) {
            (BackendKind::Polly, LanguageTag::English) => POLLY_ENGLISH_VOICES,
            (BackendKind::Polly, LanguageTag::Japanese) => POLLY_JAPANESE_VOICES,
            (BackendKind::GoogleCloud, LanguageTag::English) => GOOGLE_ENGLISH_VOICES,
            (BackendKind::GoogleCloud, LanguageTag::Japanese) => GOOGLE_JAPANESE_VOICES,
            (BackendKind::OpenAi, LanguageTag::English) => OPENAI_ENGLISH_VOICES,
            (BackendKind::OpenAi, LanguageTag::Japanese) => OPENAI_JAPANESE_VOICES,
        }
    }

    pub fn default_voice(&self, language: LanguageTag) -> &'static str {
        self.voices(language)[0]
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "polly" | "aws_polly" | "aws-polly" => Ok(BackendKind::Polly),
            "google" | "google_cloud" | "google-cloud" => Ok(BackendKind::GoogleCloud),
            "openai" | "open_ai" => Ok(BackendKind::OpenAi),
            other => Err(format!("Invalid TTS service name: {}", other)),
        }
    }
}

/// Per-request voice selection. Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    english_voice: String,
    japanese_voice: String,
    backend: BackendKind,
    format: OutputFormat,
}

impl VoiceConfig {
    /// Catalog default voices for the backend
    pub fn new(backend: BackendKind, format: OutputFormat) -> Self {
        Self {
            english_voice: backend.default_voice(LanguageTag::English).to_string(),
            japanese_voice: backend.default_voice(LanguageTag::Japanese).to_string(),
            backend,
            format,
        }
    }

    pub fn with_voice(mut self, language: LanguageTag, voice_id: impl Into<String>) -> Self {
        match language {
            LanguageTag::English => self.english_voice = voice_id.into(),
            LanguageTag::Japanese => self.japanese_voice = voice_id.into(),
        }
        self
    }

    pub fn voice_for(&self, language: LanguageTag) -> &str {
        match language {
            LanguageTag::English => &self.english_voice,
            LanguageTag::Japanese => &self.japanese_voice,
        }
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}
