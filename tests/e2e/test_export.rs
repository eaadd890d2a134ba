use crate::helpers::{dir_entries, read_wav, tone};
use bilingual_tts::domain::audio::{AudioAssembler, AudioExporter, OutputFormat};
use bilingual_tts::domain::language::LanguageTag;
use bilingual_tts::domain::tts::TtsServiceError;
use bilingual_tts::infrastructure::encoders::ogg;

fn merged_track() -> bilingual_tts::domain::audio::PcmAudio {
    AudioAssembler::default().merge(vec![
        tone(LanguageTag::English),
        tone(LanguageTag::Japanese),
    ])
}

#[tokio::test]
async fn it_should_export_wav_with_speech_header() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("track.wav");
    let audio = merged_track();

    let artifact = AudioExporter::new()
        .export(&audio, "WAV", &output)
        .await
        .unwrap();

    let (spec, samples) = read_wav(&output);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(samples, audio.samples());
    assert_eq!(artifact.size_bytes, 44 + audio.len() as u64);
}

#[tokio::test]
async fn it_should_export_mp3() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("track.mp3");

    let artifact = AudioExporter::new()
        .export(&merged_track(), "mp3", &output)
        .await
        .unwrap();

    assert_eq!(artifact.format, OutputFormat::Mp3);
    let bytes = std::fs::read(&output).unwrap();
    assert!(!bytes.is_empty());
    assert!(bytes
        .windows(2)
        .any(|pair| pair[0] == 0xFF && pair[1] & 0xE0 == 0xE0));
}

#[tokio::test]
async fn it_should_export_ogg_when_vorbis_is_available() {
    if !ogg::vorbis_encoder_available().await {
        eprintln!("skipping: ffmpeg with libvorbis not available");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("track.ogg");

    AudioExporter::new()
        .export(&merged_track(), "ogg", &output)
        .await
        .unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..4], b"OggS");
}

#[tokio::test]
async fn it_should_reject_unknown_formats_without_creating_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("track.unknown");

    let err = AudioExporter::new()
        .export(&merged_track(), "unknown", &output)
        .await
        .unwrap_err();

    assert!(matches!(err, TtsServiceError::UnsupportedFormat(name) if name == "unknown"));
    assert!(dir_entries(dir.path()).is_empty());
}

#[tokio::test]
async fn it_should_replace_an_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("track.wav");
    std::fs::write(&output, b"stale").unwrap();

    AudioExporter::new()
        .export(&merged_track(), "wav", &output)
        .await
        .unwrap();

    let (_, samples) = read_wav(&output);
    assert!(!samples.is_empty());
    assert_eq!(dir_entries(dir.path()), vec!["track.wav".to_string()]);
}
