use crate::helpers::{
    dir_entries, read_wav, service_with, MockTtsRepository, ENGLISH_LEVEL, JAPANESE_LEVEL,
    SAMPLES_PER_SEGMENT,
};
use bilingual_tts::domain::audio::OutputFormat;
use bilingual_tts::domain::language::{DetectionMode, LanguageTag};
use bilingual_tts::domain::speech::{BackendKind, VoiceConfig};
use bilingual_tts::domain::tts::{SegmentDescriptor, TtsServiceApi, TtsServiceError, TtsSettings};
use bilingual_tts::infrastructure::repositories::TtsRepositoryError;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

const MIXED_TEXT: &str = "Hello! こんにちは。This is a test. 私は日本語を話します。";

/// Samples of silence between segments at the default 500 ms gap
const GAP_SAMPLES: usize = 8_000;

fn polly_wav() -> VoiceConfig {
    VoiceConfig::new(BackendKind::Polly, OutputFormat::Wav)
}

fn descriptor(language: LanguageTag, text: &str) -> SegmentDescriptor {
    SegmentDescriptor {
        language,
        text: text.to_string(),
    }
}

#[tokio::test]
async fn it_should_synthesize_mixed_text_into_four_segments() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("mixed.wav");
    let mock = Arc::new(MockTtsRepository::new(BackendKind::Polly));
    let service = service_with(mock.clone(), TtsSettings::default());

    let artifact = service
        .synthesize(MIXED_TEXT, &output, &polly_wav())
        .await
        .unwrap();

    assert_eq!(
        artifact.descriptors,
        vec![
            descriptor(LanguageTag::English, "Hello!"),
            descriptor(LanguageTag::Japanese, "こんにちは。"),
            descriptor(LanguageTag::English, "This is a test."),
            descriptor(LanguageTag::Japanese, "私は日本語を話します。"),
        ]
    );
    assert_eq!(artifact.location, output);
    assert_eq!(artifact.format, OutputFormat::Wav);
    assert_eq!(artifact.duration_ms, 1_900);

    let (spec, samples) = read_wav(&output);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(samples.len(), 4 * SAMPLES_PER_SEGMENT + 3 * GAP_SAMPLES);

    let calls = mock.calls();
    assert_eq!(calls.len(), 4);
    for call in calls {
        let expected_voice = match call.language {
            LanguageTag::English => "Joanna",
            LanguageTag::Japanese => "Takumi",
        };
        assert_eq!(call.voice_id, expected_voice);
    }
}

#[tokio::test]
async fn it_should_keep_segment_order_when_later_segments_finish_first() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("ordered.wav");
    let mock = Arc::new(
        MockTtsRepository::new(BackendKind::Polly)
            .with_delay("Hello!", Duration::from_millis(200))
            .with_delay("こんにちは", Duration::from_millis(100)),
    );
    let service = service_with(mock, TtsSettings::default());

    service
        .synthesize(MIXED_TEXT, &output, &polly_wav())
        .await
        .unwrap();

    let (_, samples) = read_wav(&output);
    let segment_start = |i: usize| i * (SAMPLES_PER_SEGMENT + GAP_SAMPLES);
    assert_eq!(samples[segment_start(0)], ENGLISH_LEVEL);
    assert_eq!(samples[segment_start(1)], JAPANESE_LEVEL);
    assert_eq!(samples[segment_start(2)], ENGLISH_LEVEL);
    assert_eq!(samples[segment_start(3)], JAPANESE_LEVEL);
    assert!(samples[SAMPLES_PER_SEGMENT..segment_start(1)]
        .iter()
        .all(|&s| s == 0));
}

#[tokio::test]
async fn it_should_bound_concurrent_backend_calls() {
    let dir = tempfile::tempdir().unwrap();
    let mock = Arc::new(MockTtsRepository::new(BackendKind::Polly).with_delay("", Duration::from_millis(30)));
    let settings = TtsSettings {
        concurrency: 2,
        ..TtsSettings::default()
    };
    let service = service_with(mock.clone(), settings);

    service
        .synthesize(MIXED_TEXT, &dir.path().join("out.wav"), &polly_wav())
        .await
        .unwrap();

    assert_eq!(mock.calls().len(), 4);
    assert_eq!(mock.max_in_flight(), 2);
}

#[tokio::test]
async fn it_should_abort_and_write_nothing_when_a_segment_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("failed.wav");
    let mock = Arc::new(MockTtsRepository::new(BackendKind::Polly).failing_on(
        "This is a test.",
        TtsRepositoryError::Synthesis("boom".to_string()),
    ));
    let service = service_with(mock, TtsSettings::default());

    let err = service
        .synthesize(MIXED_TEXT, &output, &polly_wav())
        .await
        .unwrap_err();

    match err {
        TtsServiceError::Synthesis(msg) => {
            assert_eq!(msg, "polly: error in segment 'This is a test.': boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!output.exists());
    assert!(dir_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn it_should_stop_dispatching_after_the_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("failed.wav");
    let mock = Arc::new(MockTtsRepository::new(BackendKind::Polly).failing_on(
        "Hello!",
        TtsRepositoryError::Connection("AccessDeniedException: denied".to_string()),
    ));
    let settings = TtsSettings {
        concurrency: 1,
        ..TtsSettings::default()
    };
    let service = service_with(mock.clone(), settings);

    let err = service
        .synthesize(MIXED_TEXT, &output, &polly_wav())
        .await
        .unwrap_err();

    assert!(matches!(err, TtsServiceError::Connection(_)));
    assert_eq!(mock.calls().len(), 1);
    assert!(!output.exists());
}

#[tokio::test]
async fn it_should_time_out_and_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("slow.wav");
    let mock = Arc::new(MockTtsRepository::new(BackendKind::Polly).with_delay("Hello", Duration::from_secs(5)));
    let settings = TtsSettings {
        request_timeout: Duration::from_millis(50),
        ..TtsSettings::default()
    };
    let service = service_with(mock, settings);

    let err = service
        .synthesize("Hello there.", &output, &polly_wav())
        .await
        .unwrap_err();

    assert!(matches!(err, TtsServiceError::Timeout(after) if after == Duration::from_millis(50)));
    assert!(!output.exists());
}

#[tokio::test]
async fn it_should_reject_blank_text_without_calling_the_backend() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("blank.wav");
    let mock = Arc::new(MockTtsRepository::new(BackendKind::Polly));
    let service = service_with(mock.clone(), TtsSettings::default());

    let err = service
        .synthesize("   \n\t ", &output, &polly_wav())
        .await
        .unwrap_err();

    assert!(matches!(err, TtsServiceError::InvalidInput(msg) if msg == "text cannot be empty"));
    assert!(mock.calls().is_empty());
    assert!(!output.exists());
}

#[tokio::test]
async fn it_should_reject_a_backend_that_is_not_configured() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("google.wav");
    let mock = Arc::new(MockTtsRepository::new(BackendKind::Polly));
    let service = service_with(mock.clone(), TtsSettings::default());
    let voice = VoiceConfig::new(BackendKind::GoogleCloud, OutputFormat::Wav);

    let err = service
        .synthesize("Hello!", &output, &voice)
        .await
        .unwrap_err();

    assert!(matches!(err, TtsServiceError::InvalidInput(_)));
    assert!(mock.calls().is_empty());
    assert!(!output.exists());
}

#[tokio::test]
async fn it_should_pass_a_single_segment_through_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("single.wav");
    let mock = Arc::new(MockTtsRepository::new(BackendKind::Polly));
    let service = service_with(mock, TtsSettings::default());

    let artifact = service
        .synthesize("This is a single sentence.", &output, &polly_wav())
        .await
        .unwrap();

    assert_eq!(
        artifact.descriptors,
        vec![descriptor(LanguageTag::English, "This is a single sentence.")]
    );
    let (_, samples) = read_wav(&output);
    assert_eq!(samples, vec![ENGLISH_LEVEL; SAMPLES_PER_SEGMENT]);
}

#[tokio::test]
async fn it_should_use_voice_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let mock = Arc::new(MockTtsRepository::new(BackendKind::Polly));
    let service = service_with(mock.clone(), TtsSettings::default());
    let voice = polly_wav()
        .with_voice(LanguageTag::English, "Matthew")
        .with_voice(LanguageTag::Japanese, "Mizuki");

    service
        .synthesize("Hello! こんにちは。", &dir.path().join("voices.wav"), &voice)
        .await
        .unwrap();

    let mut voices: Vec<String> = mock.calls().into_iter().map(|c| c.voice_id).collect();
    voices.sort();
    assert_eq!(voices, vec!["Matthew".to_string(), "Mizuki".to_string()]);
}

#[tokio::test]
async fn it_should_keep_english_sentences_with_japanese_names_in_english_with_statistical_detection() {
    let text = "We took the night train from Osaka to visit 東京 last week. 私は日本語を話します。";
    let script = service_with(
        Arc::new(MockTtsRepository::new(BackendKind::Polly)),
        TtsSettings::default(),
    );
    let statistical = service_with(
        Arc::new(MockTtsRepository::new(BackendKind::Polly)),
        TtsSettings {
            detection: DetectionMode::Statistical,
            ..TtsSettings::default()
        },
    );

    let languages = |descriptors: Vec<SegmentDescriptor>| -> Vec<LanguageTag> {
        descriptors.into_iter().map(|d| d.language).collect()
    };

    assert_eq!(languages(script.segment(text)), vec![LanguageTag::Japanese]);
    assert_eq!(
        languages(statistical.segment(text)),
        vec![LanguageTag::English, LanguageTag::Japanese]
    );
    assert_eq!(
        languages(statistical.segment(MIXED_TEXT)),
        vec![
            LanguageTag::English,
            LanguageTag::Japanese,
            LanguageTag::English,
            LanguageTag::Japanese,
        ]
    );
}
