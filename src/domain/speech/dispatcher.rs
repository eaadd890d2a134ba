use super::voice::{BackendKind, VoiceConfig};
use crate::domain::audio::PcmAudio;
use crate::domain::language::LanguageSegment;
use crate::domain::tts::TtsServiceError;
use crate::infrastructure::repositories::TtsRepository;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

pub const DEFAULT_SYNTHESIS_CONCURRENCY: usize = 4;

/// Audio for one language segment, tagged with its position in the request
#[derive(Debug, Clone)]
pub struct SynthesizedSegment {
    pub index: usize,
    pub segment: LanguageSegment,
    pub audio: PcmAudio,
}

/// Sends language segments to the configured backend with bounded concurrency.
pub struct SynthesisDispatcher {
    backends: Vec<Arc<dyn TtsRepository>>,
    concurrency: usize,
}

impl SynthesisDispatcher {
    pub fn new(backends: Vec<Arc<dyn TtsRepository>>, concurrency: usize) -> Self {
        Self {
            backends,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn available_backends(&self) -> Vec<BackendKind> {
        self.backends.iter().map(|backend| backend.kind()).collect()
    }

    fn backend(&self, kind: BackendKind) -> Result<Arc<dyn TtsRepository>, TtsServiceError> {
        self.backends
            .iter()
            .find(|backend| backend.kind() == kind)
            .cloned()
            .ok_or_else(|| {
                TtsServiceError::InvalidInput(format!("TTS backend '{}' is not configured", kind))
            })
    }

    /// Synthesize every segment. Results come back in segment order; the first failure aborts
    /// the request and drops the calls still in flight.
    pub async fn synthesize(
        &self,
        segments: Vec<LanguageSegment>,
        voice: &VoiceConfig,
    ) -> Result<Vec<SynthesizedSegment>, TtsServiceError> {
        let backend = self.backend(voice.backend())?;
        let backend = &backend;

        if let Some(blank) = segments.iter().position(|s| s.text.trim().is_empty()) {
            return Err(TtsServiceError::InvalidInput(format!(
                "segment {} has no text to synthesize",
                blank
            )));
        }

        tracing::info!(
            backend = %voice.backend(),
            segment_count = segments.len(),
            concurrency = self.concurrency,
            "Dispatching segments for synthesis"
        );

        stream::iter(segments.into_iter().enumerate())
            .map(|(index, segment)| async move {
                let voice_id = voice.voice_for(segment.language);
                let start_time = std::time::Instant::now();

                let pcm = backend
                    .synthesize(segment.language, &segment.text, voice_id)
                    .await
                    .map_err(|e| {
                        tracing::error!(
                            segment_index = index,
                            language = %segment.language,
                            backend = %backend.kind(),
                            error = %e,
                            "Segment synthesis failed"
                        );
                        TtsServiceError::from_backend(backend.kind(), &segment.text, e)
                    })?;

                let audio = PcmAudio::speech(pcm);
                tracing::debug!(
                    segment_index = index,
                    language = %segment.language,
                    voice = voice_id,
                    latency_ms = start_time.elapsed().as_millis(),
                    audio_size_bytes = audio.len(),
                    "Segment synthesized"
                );

                Ok::<_, TtsServiceError>(SynthesizedSegment {
                    index,
                    segment,
                    audio,
                })
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
