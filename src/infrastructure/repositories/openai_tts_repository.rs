use super::tts_repository::{split_into_batches, TtsRepository, TtsRepositoryError};
use crate::domain::audio::{resample_linear, PcmAudio, PcmSpec, SPEECH_SAMPLE_RATE};
use crate::domain::language::LanguageTag;
use crate::domain::speech::BackendKind;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

/// Raw `pcm` responses are 24 kHz, 16-bit, mono
const OPENAI_PCM_SAMPLE_RATE: u32 = 24_000;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    fn parse_voice(voice: &str) -> Result<Voice, TtsRepositoryError> {
        match voice.to_lowercase().as_str() {
            "alloy" => Ok(Voice::Alloy),
            "echo" => Ok(Voice::Echo),
            "fable" => Ok(Voice::Fable),
            "onyx" => Ok(Voice::Onyx),
            "nova" => Ok(Voice::Nova),
            "shimmer" => Ok(Voice::Shimmer),
            other => Err(TtsRepositoryError::InvalidInput(format!(
                "Unknown OpenAI voice: {}",
                other
            ))),
        }
    }

    fn speech_model(&self) -> SpeechModel {
        match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    /// Call OpenAI TTS API to synthesize a single text batch
    async fn call_openai(&self, text: &str, voice: Voice) -> Result<Vec<u8>, TtsRepositoryError> {
        tracing::debug!(
            model = %self.model,
            voice = ?voice,
            text_length = text.len(),
            "Calling OpenAI TTS API"
        );

        let request = CreateSpeechRequest {
            model: self.speech_model(),
            input: text.to_string(),
            voice,
            response_format: Some(SpeechResponseFormat::Pcm),
            speed: None,
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            classify_openai_error(e)
        })?;

        let native = PcmAudio::new(
            PcmSpec {
                sample_rate: OPENAI_PCM_SAMPLE_RATE,
                ..PcmSpec::SPEECH
            },
            response.bytes.to_vec(),
        );
        let resampled = resample_linear(&native.samples(), OPENAI_PCM_SAMPLE_RATE, SPEECH_SAMPLE_RATE);

        Ok(PcmAudio::from_samples(PcmSpec::SPEECH, &resampled).into_data())
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    fn kind(&self) -> BackendKind {
        BackendKind::OpenAi
    }

    async fn synthesize(
        &self,
        language: LanguageTag,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, TtsRepositoryError> {
        let start_time = std::time::Instant::now();
        let voice = Self::parse_voice(voice_id)?;

        // Split text into batches based on OpenAI's limitations
        let batches = split_into_batches(text, MAX_BATCH_SIZE);

        let mut audio_data = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            audio_data.extend(self.call_openai(batch, voice.clone()).await?);
            tracing::debug!(
                batch_index = index,
                total_audio_size = audio_data.len(),
                "Batch synthesized and merged"
            );
        }

        tracing::info!(
            provider = "openai",
            model = %self.model,
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

fn classify_openai_error(err: OpenAIError) -> TtsRepositoryError {
    match err {
        OpenAIError::Reqwest(e) => TtsRepositoryError::Connection(e.to_string()),
        OpenAIError::ApiError(api) => classify_api_error(api.r#type.as_deref(), &api.message),
        OpenAIError::InvalidArgument(message) => TtsRepositoryError::InvalidInput(message),
        other => TtsRepositoryError::Synthesis(other.to_string()),
    }
}

/// Map an OpenAI API error type to the repository taxonomy
fn classify_api_error(error_type: Option<&str>, message: &str) -> TtsRepositoryError {
    match error_type {
        Some("invalid_request_error") => TtsRepositoryError::InvalidInput(message.to_string()),
        Some("authentication_error") | Some("permission_error") => {
            TtsRepositoryError::Connection(message.to_string())
        }
        _ if message.contains("Incorrect API key") => {
            TtsRepositoryError::Connection(message.to_string())
        }
        _ => TtsRepositoryError::Synthesis(message.to_string()),
    }
}
