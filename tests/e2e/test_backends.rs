use crate::helpers::{aws_mocks, dir_entries};
use bilingual_tts::domain::audio::OutputFormat;
use bilingual_tts::domain::language::LanguageTag;
use bilingual_tts::domain::speech::{BackendKind, VoiceConfig};
use bilingual_tts::domain::tts::{TtsService, TtsServiceApi, TtsServiceError, TtsSettings};
use bilingual_tts::infrastructure::repositories::{
    GoogleTtsRepository, PollyTtsRepository, TtsRepository, TtsRepositoryError,
};
use std::sync::Arc;

#[tokio::test]
async fn it_should_report_unreachable_polly_as_connection_error() {
    let repository = PollyTtsRepository::new(Arc::new(aws_mocks::create_unreachable_polly_client()));

    let err = repository
        .synthesize(LanguageTag::English, "Hello!", "Joanna")
        .await
        .unwrap_err();

    assert!(matches!(err, TtsRepositoryError::Connection(_)), "got {err:?}");
}

#[tokio::test]
async fn it_should_report_unreachable_google_as_connection_error() {
    let repository = GoogleTtsRepository::with_endpoint(
        "google-test-key-42".to_string(),
        "http://127.0.0.1:9/v1/text:synthesize".to_string(),
    );

    let err = repository
        .synthesize(LanguageTag::Japanese, "こんにちは。", "ja-JP-Standard-A")
        .await
        .unwrap_err();

    assert!(matches!(err, TtsRepositoryError::Connection(_)), "got {err:?}");
    assert!(!err.to_string().contains("google-test-key-42"), "got {err}");
}

#[tokio::test]
async fn it_should_annotate_backend_failures_in_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.wav");
    let polly: Arc<dyn TtsRepository> =
        Arc::new(PollyTtsRepository::new(Arc::new(aws_mocks::create_unreachable_polly_client())));
    let service = TtsService::new(vec![polly], TtsSettings::default());
    let voice = VoiceConfig::new(BackendKind::Polly, OutputFormat::Wav);

    let err = service
        .synthesize("Hello there.", &output, &voice)
        .await
        .unwrap_err();

    match err {
        TtsServiceError::Connection(msg) => {
            assert!(msg.starts_with("polly: error in segment 'Hello there.'"), "got {msg}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(dir_entries(dir.path()).is_empty());
}
