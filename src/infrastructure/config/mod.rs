use crate::domain::audio::OutputFormat;
use crate::domain::language::{DetectionMode, LanguageTag};
use crate::domain::speech::{BackendKind, VoiceConfig};
use crate::domain::text::PreprocessorOptions;
use crate::domain::tts::TtsSettings;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    pub english_voice_id: Option<String>,
    pub japanese_voice_id: Option<String>,
    pub output_format: OutputFormat,
    pub aws_region: String,
    pub google_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
    pub synthesis_concurrency: usize,
    pub synthesis_timeout: Duration,
    pub segment_silence: Duration,
    pub language_detection: DetectionMode,
    pub preserve_line_breaks: bool,
    pub strip_markup: bool,
    pub environment: Environment,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let flag = |key: &str| matches!(var(key, "false").to_lowercase().as_str(), "true" | "1");

        let config = Config {
            backend: var("TTS_BACKEND", "polly").parse()?,
            english_voice_id: optional("ENGLISH_VOICE_ID"),
            japanese_voice_id: optional("JAPANESE_VOICE_ID"),
            output_format: var("OUTPUT_FORMAT", "wav").parse()?,
            aws_region: var("AWS_REGION", "us-east-1"),
            google_api_key: optional("GOOGLE_API_KEY"),
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_tts_model: var("OPENAI_TTS_MODEL", "tts-1"),
            synthesis_concurrency: var("SYNTHESIS_CONCURRENCY", "4").parse()?,
            synthesis_timeout: Duration::from_secs(var("SYNTHESIS_TIMEOUT_SECS", "120").parse()?),
            segment_silence: Duration::from_millis(var("SEGMENT_SILENCE_MS", "500").parse()?),
            language_detection: match var("LANGUAGE_DETECTION", "script").to_lowercase().as_str() {
                "script" => DetectionMode::Script,
                "statistical" => DetectionMode::Statistical,
                other => return Err(format!("Invalid LANGUAGE_DETECTION: {}", other).into()),
            },
            preserve_line_breaks: flag("PRESERVE_LINE_BREAKS"),
            strip_markup: flag("STRIP_MARKUP"),
            environment: match var("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        if config.synthesis_concurrency == 0 {
            return Err("SYNTHESIS_CONCURRENCY must be at least 1".into());
        }
        if config.segment_silence.is_zero() {
            return Err("SEGMENT_SILENCE_MS must be at least 1".into());
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Voices for a backend. Configured voice ids only apply to the configured backend.
    pub fn voice_config_for(&self, backend: BackendKind, format: OutputFormat) -> VoiceConfig {
        let mut voice = VoiceConfig::new(backend, format);
        if backend == self.backend {
            if let Some(id) = &self.english_voice_id {
                voice = voice.with_voice(LanguageTag::English, id.clone());
            }
            if let Some(id) = &self.japanese_voice_id {
                voice = voice.with_voice(LanguageTag::Japanese, id.clone());
            }
        }
        voice
    }

    pub fn tts_settings(&self) -> TtsSettings {
        TtsSettings {
            concurrency: self.synthesis_concurrency,
            request_timeout: self.synthesis_timeout,
            segment_silence: self.segment_silence,
            detection: self.language_detection,
            preprocessor: PreprocessorOptions {
                preserve_line_breaks: self.preserve_line_breaks,
                strip_markup: self.strip_markup,
            },
            ..TtsSettings::default()
        }
    }
}
