use super::tts_repository::{split_into_batches_by, TtsRepository, TtsRepositoryError};
use crate::domain::audio::{PcmAudio, SPEECH_SAMPLE_RATE};
use crate::domain::language::LanguageTag;
use crate::domain::speech::BackendKind;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const GOOGLE_TTS_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Cloud TTS accepts up to 5000 bytes of input per request
const MAX_BATCH_BYTES: usize = 5000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    sample_rate_hertz: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Google Cloud Text-to-Speech implementation of TTS repository, over the REST API
pub struct GoogleTtsRepository {
    http_client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GoogleTtsRepository {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, GOOGLE_TTS_URL.to_string())
    }

    pub fn with_endpoint(api_key: String, endpoint: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            endpoint,
        }
    }

    /// Call Google Cloud TTS to synthesize a single text batch
    async fn call_google(
        &self,
        text: &str,
        language: LanguageTag,
        voice_name: &str,
    ) -> Result<Vec<u8>, TtsRepositoryError> {
        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: language.locale(),
                name: voice_name,
            },
            audio_config: AudioConfig {
                audio_encoding: "LINEAR16",
                sample_rate_hertz: SPEECH_SAMPLE_RATE,
            },
        };

        tracing::debug!(
            language = %language,
            voice = voice_name,
            text_length = text.len(),
            "Calling Google Cloud text:synthesize"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!(error = %e, "Google Cloud TTS request failed");
                TtsRepositoryError::Connection(format!("Google Cloud TTS request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ErrorEnvelope>(&error_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(error_text);
            tracing::error!(status = %status, error = %message, "Google Cloud TTS rejected request");
            return Err(classify_status(status, message));
        }

        let body: SynthesizeResponse = response.json().await.map_err(|e| {
            TtsRepositoryError::Synthesis(format!(
                "Failed to parse Google Cloud TTS response: {}",
                e.without_url()
            ))
        })?;

        let wav = STANDARD.decode(body.audio_content.as_bytes()).map_err(|e| {
            TtsRepositoryError::Synthesis(format!("Invalid base64 audio content: {}", e))
        })?;

        // LINEAR16 arrives wrapped in a WAV header
        let pcm = PcmAudio::from_wav_bytes(&wav).map_err(|e| {
            TtsRepositoryError::Synthesis(format!("Invalid LINEAR16 audio: {}", e))
        })?;

        Ok(pcm.into_data())
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    fn kind(&self) -> BackendKind {
        BackendKind::GoogleCloud
    }

    async fn synthesize(
        &self,
        language: LanguageTag,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, TtsRepositoryError> {
        let start_time = std::time::Instant::now();
        let batches = split_into_batches_by(text, MAX_BATCH_BYTES, str::len);

        let mut audio_data = Vec::new();
        for batch in &batches {
            audio_data.extend(self.call_google(batch, language, voice_id).await?);
        }

        tracing::info!(
            provider = "google",
            language = %language,
            voice = voice_id,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.chars().count(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}

fn classify_status(status: StatusCode, message: String) -> TtsRepositoryError {
    let detail = format!("HTTP {}: {}", status.as_u16(), message);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TtsRepositoryError::Connection(detail),
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => TtsRepositoryError::InvalidInput(detail),
        _ => TtsRepositoryError::Synthesis(detail),
    }
}
