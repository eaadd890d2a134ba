use super::error::TtsServiceError;
use super::{OutputArtifact, SegmentDescriptor};
use crate::domain::audio::{AudioAssembler, AudioExporter, DEFAULT_SEGMENT_SILENCE};
use crate::domain::language::{DetectionMode, LanguageDetector, LanguageSegment};
use crate::domain::speech::{SynthesisDispatcher, VoiceConfig, DEFAULT_SYNTHESIS_CONCURRENCY};
use crate::domain::text::{PreprocessorOptions, SegmenterOptions, SentenceSegmenter, TextPreprocessor};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Pipeline tuning, fixed for the lifetime of the service
#[derive(Debug, Clone)]
pub struct TtsSettings {
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub segment_silence: Duration,
    pub detection: DetectionMode,
    pub preprocessor: PreprocessorOptions,
    pub segmenter: SegmenterOptions,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_SYNTHESIS_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            segment_silence: DEFAULT_SEGMENT_SILENCE,
            detection: DetectionMode::default(),
            preprocessor: PreprocessorOptions::default(),
            segmenter: SegmenterOptions::default(),
        }
    }
}

pub struct TtsService {
    preprocessor: TextPreprocessor,
    segmenter: SentenceSegmenter,
    language_detector: LanguageDetector,
    dispatcher: SynthesisDispatcher,
    assembler: AudioAssembler,
    exporter: AudioExporter,
    request_timeout: Duration,
}

impl TtsService {
    pub fn new(backends: Vec<Arc<dyn TtsRepository>>, settings: TtsSettings) -> Self {
        Self {
            preprocessor: TextPreprocessor::new(settings.preprocessor),
            segmenter: SentenceSegmenter::new(settings.segmenter),
            language_detector: LanguageDetector::new(settings.detection),
            dispatcher: SynthesisDispatcher::new(backends, settings.concurrency),
            assembler: AudioAssembler::new(settings.segment_silence),
            exporter: AudioExporter::new(),
            request_timeout: settings.request_timeout,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize mixed English/Japanese text into one audio file
    ///
    /// This operation:
    /// - Normalizes the text and splits it into sentences
    /// - Groups consecutive sentences of the same language
    /// - Synthesizes each group with the voice configured for its language
    /// - Joins the audio with silence and writes it in the requested format
    ///
    /// Nothing is written when any segment fails or the deadline passes.
    async fn synthesize(
        &self,
        text: &str,
        destination: &Path,
        voice: &VoiceConfig,
    ) -> Result<OutputArtifact, TtsServiceError>;

    /// Language segments the text would be synthesized as, without calling any backend
    fn segment(&self, text: &str) -> Vec<SegmentDescriptor>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        text: &str,
        destination: &Path,
        voice: &VoiceConfig,
    ) -> Result<OutputArtifact, TtsServiceError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("tts_request", request_id = %request_id);

        self.run(text, destination, voice).instrument(span).await
    }

    fn segment(&self, text: &str) -> Vec<SegmentDescriptor> {
        let cleaned_text = self.preprocessor.preprocess(text);
        if cleaned_text.is_empty() {
            return Vec::new();
        }

        self.language_segments(&cleaned_text)
            .iter()
            .map(SegmentDescriptor::from)
            .collect()
    }
}

impl TtsService {
    async fn run(
        &self,
        text: &str,
        destination: &Path,
        voice: &VoiceConfig,
    ) -> Result<OutputArtifact, TtsServiceError> {
        tracing::info!(
            backend = %voice.backend(),
            format = %voice.format(),
            text_length = text.len(),
            destination = %destination.display(),
            "TTS synthesis request"
        );

        // 1. Normalize
        let cleaned_text = self.preprocessor.preprocess(text);
        if cleaned_text.is_empty() {
            return Err(TtsServiceError::InvalidInput(
                "text cannot be empty".to_string(),
            ));
        }

        // 2. Segment and group by language
        let segments = self.language_segments(&cleaned_text);
        let descriptors: Vec<SegmentDescriptor> =
            segments.iter().map(SegmentDescriptor::from).collect();

        tracing::info!(
            cleaned_length = cleaned_text.len(),
            segment_count = segments.len(),
            "Text segmented by language"
        );

        // 3. Synthesize, merge and export under the request deadline
        let artifact = self
            .within_deadline(self.render(segments, destination, voice))
            .await?;

        tracing::info!(
            location = %artifact.location.display(),
            size_bytes = artifact.size_bytes,
            duration_ms = artifact.duration_ms,
            "TTS synthesis finished"
        );

        Ok(artifact.with_descriptors(descriptors))
    }

    async fn render(
        &self,
        segments: Vec<LanguageSegment>,
        destination: &Path,
        voice: &VoiceConfig,
    ) -> Result<OutputArtifact, TtsServiceError> {
        let synthesized = self.dispatcher.synthesize(segments, voice).await?;

        let merged = self
            .assembler
            .merge(synthesized.into_iter().map(|s| s.audio).collect());

        self.exporter
            .export_as(&merged, voice.format(), destination)
            .await
    }

    /// Fail with Timeout once the request deadline passes, dropping the unfinished work
    async fn within_deadline<T, F>(&self, work: F) -> Result<T, TtsServiceError>
    where
        F: Future<Output = Result<T, TtsServiceError>>,
    {
        tokio::time::timeout(self.request_timeout, work)
            .await
            .map_err(|_| {
                tracing::error!(
                    timeout_secs = self.request_timeout.as_secs_f64(),
                    "TTS synthesis timed out"
                );
                TtsServiceError::Timeout(self.request_timeout)
            })?
    }

    fn language_segments(&self, cleaned_text: &str) -> Vec<LanguageSegment> {
        let sentences = self.segmenter.segment(cleaned_text);
        let tagged = self.language_detector.tag_all(sentences);
        LanguageDetector::group(tagged)
    }
}
