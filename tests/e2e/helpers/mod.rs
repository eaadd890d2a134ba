use async_trait::async_trait;
use bilingual_tts::domain::audio::{PcmAudio, PcmSpec};
use bilingual_tts::domain::language::LanguageTag;
use bilingual_tts::domain::speech::BackendKind;
use bilingual_tts::domain::tts::{TtsService, TtsSettings};
use bilingual_tts::infrastructure::repositories::{TtsRepository, TtsRepositoryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub mod aws_mocks;

/// Sample value the mock emits for English segments
pub const ENGLISH_LEVEL: i16 = 1_000;
/// Sample value the mock emits for Japanese segments
pub const JAPANESE_LEVEL: i16 = -1_000;
/// Samples of audio the mock returns per segment (100 ms)
pub const SAMPLES_PER_SEGMENT: usize = 1_600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub language: LanguageTag,
    pub text: String,
    pub voice_id: String,
}

/// In-process backend: a constant tone per language, with optional per-text delays and failures
pub struct MockTtsRepository {
    kind: BackendKind,
    delays: Vec<(String, Duration)>,
    failures: Vec<(String, TtsRepositoryError)>,
    calls: Mutex<Vec<RecordedCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl MockTtsRepository {
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            delays: Vec::new(),
            failures: Vec::new(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Delay segments whose text contains `needle`
    pub fn with_delay(mut self, needle: &str, delay: Duration) -> Self {
        self.delays.push((needle.to_string(), delay));
        self
    }

    /// Fail segments whose text contains `needle`
    pub fn failing_on(mut self, needle: &str, error: TtsRepositoryError) -> Self {
        self.failures.push((needle.to_string(), error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TtsRepository for MockTtsRepository {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn synthesize(
        &self,
        language: LanguageTag,
        text: &str,
        voice_id: &str,
    ) -> Result<Vec<u8>, TtsRepositoryError> {
        self.calls.lock().unwrap().push(RecordedCall {
            language,
            text: text.to_string(),
            voice_id: voice_id.to_string(),
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self
            .delays
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
            .map(|(_, delay)| *delay)
            .unwrap_or(Duration::from_millis(5));
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some((_, error)) = self
            .failures
            .iter()
            .find(|(needle, _)| text.contains(needle.as_str()))
        {
            return Err(error.clone());
        }

        Ok(tone(language).into_data())
    }
}

pub fn tone(language: LanguageTag) -> PcmAudio {
    let level = match language {
        LanguageTag::English => ENGLISH_LEVEL,
        LanguageTag::Japanese => JAPANESE_LEVEL,
    };
    PcmAudio::from_samples(PcmSpec::SPEECH, &vec![level; SAMPLES_PER_SEGMENT])
}

/// Service wired to a single mock backend
#[allow(dead_code)]
pub fn service_with(mock: Arc<MockTtsRepository>, settings: TtsSettings) -> TtsService {
    let backend: Arc<dyn TtsRepository> = mock;
    TtsService::new(vec![backend], settings)
}

/// Samples of a 16-bit WAV file
#[allow(dead_code)]
pub fn read_wav(path: &std::path::Path) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

/// Files in a directory, hidden temporaries included
#[allow(dead_code)]
pub fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default()
}
