use super::tts_repository::{split_into_batches, TtsRepository, TtsRepositoryError};
use crate::domain::audio::SPEECH_SAMPLE_RATE;
use crate::domain::language::LanguageTag;
use crate::domain::speech::BackendKind;
use async_trait::async_trait;
use aws_sdk_polly::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::{Engine, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// Voices with a neural engine; everything else is synthesized with the standard engine
const NEURAL_VOICES: &[&str] = &[
    "Joanna", "Matthew", "Kimberly", "Salli", "Joey", "Takumi", "Kazuha", "Tomoko",
];

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    fn engine_for(voice_id: &str) -> Engine {
        if NEURAL_VOICES.contains(&voice_id) {
            Engine::Neural
        } else {
            Engine::Standard
        }
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(
        &self,
        text: &str,
        language: LanguageTag,
        voice_name: &str,
    ) -> Result<Vec<u8>, TtsRepositoryError> {
        let engine = Self::engine_for(voice_name);

        tracing::debug!(
            language = %language,
            voice = voice_name,
            engine = ?engine,
            output_format = "Pcm",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(VoiceId::from(voice_name))
            .output_format(OutputFormat::Pcm)
            .sample_rate(SPEECH_SAMPLE_RATE.to_string())
            .engine(engine.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    language = %language,
                    voice = voice_name,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                classify_sdk_error(e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            TtsRepositoryError::Connection(format!("Failed to read audio stream: {}", e))
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(
            audio_size = audio_bytes.len(),
            "Audio stream collected successfully"
        );

        Ok(audio_bytes)
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    fn kind(&self) -> BackendKind {
        BackendKind::Polly
    }

    async fn synthesize(
        &self,
        language: LanguageTag,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, TtsRepositoryError> {
        let start_time = std::time::Instant::now();

        // Split text into batches based on Polly's limitations
        let batches = split_into_batches(text, MAX_BATCH_SIZE);

        let mut audio_data = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let pcm = self.call_polly(batch, language, voice_id).await?;
            audio_data.extend(pcm);
            tracing::debug!(
                batch_index = index,
                total_audio_size = audio_data.len(),
                "Batch synthesized and merged"
            );
        }

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "polly",
            language = %language,
            voice = voice_id,
            latency_ms = duration.as_millis(),
            characters_count = text.chars().count(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}

fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> TtsRepositoryError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) | SdkError::ResponseError(_) => {
            TtsRepositoryError::Connection(message)
        }
        SdkError::ServiceError(service_error) => {
            let code = service_error.err().code().unwrap_or_default();
            let detail = service_error.err().message().unwrap_or(message.as_str());
            classify_service_code(code, detail)
        }
        _ => TtsRepositoryError::Synthesis(message),
    }
}

/// Map a Polly error code to the repository taxonomy
fn classify_service_code(code: &str, message: &str) -> TtsRepositoryError {
    const CONNECTION: &[&str] = &[
        "AccessDenied",
        "UnrecognizedClient",
        "InvalidSignature",
        "ExpiredToken",
        "InvalidClientTokenId",
    ];
    const INVALID_INPUT: &[&str] = &[
        "Validation",
        "InvalidParameterValue",
        "TextLengthExceeded",
        "LanguageNotSupported",
        "InvalidSampleRate",
        "InvalidSsml",
        "LexiconNotFound",
    ];

    let detail = format!("{}: {}", code, message);
    if CONNECTION.iter().any(|prefix| code.starts_with(prefix)) {
        TtsRepositoryError::Connection(detail)
    } else if INVALID_INPUT.iter().any(|prefix| code.starts_with(prefix)) {
        TtsRepositoryError::InvalidInput(detail)
    } else {
        TtsRepositoryError::Synthesis(detail)
    }
}
