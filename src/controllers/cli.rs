use crate::domain::audio::OutputFormat;
use crate::domain::language::LanguageTag;
use crate::domain::speech::{BackendKind, VoiceConfig};
use crate::domain::tts::{OutputArtifact, SegmentDescriptor, TtsServiceApi};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Config;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Synthesize mixed English/Japanese text into a single audio file
#[derive(Parser, Debug)]
#[command(name = "bilingual-tts", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize text and write the audio file
    Synthesize(SynthesizeCommand),

    /// Show the language segments text would be synthesized as
    Segment(SegmentCommand),

    /// List the voices each backend offers
    Voices(VoicesCommand),
}

/// Where the input text comes from. Stdin is used when neither flag is given.
#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    /// Text to synthesize
    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    /// File containing the text
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SynthesizeCommand {
    #[command(flatten)]
    pub text: TextArgs,

    /// Destination audio file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output container (wav, mp3, ogg); defaults to OUTPUT_FORMAT
    #[arg(short, long)]
    pub format: Option<String>,

    /// TTS backend (polly, google, openai); defaults to TTS_BACKEND
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Voice for English segments
    #[arg(long)]
    pub english_voice: Option<String>,

    /// Voice for Japanese segments
    #[arg(long)]
    pub japanese_voice: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SegmentCommand {
    #[command(flatten)]
    pub text: TextArgs,
}

#[derive(Parser, Debug)]
pub struct VoicesCommand {
    /// Only list this backend
    #[arg(short, long)]
    pub backend: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl TextArgs {
    pub fn source(&self) -> TextSource {
        match (&self.text, &self.input) {
            (Some(text), _) => TextSource::Inline(text.clone()),
            (None, Some(path)) => TextSource::File(path.clone()),
            (None, None) => TextSource::Stdin,
        }
    }
}

impl TextSource {
    pub async fn read(&self) -> AppResult<String> {
        match self {
            TextSource::Inline(text) => Ok(text.clone()),
            TextSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                AppError::BadRequest(format!("cannot read {}: {}", path.display(), e))
            }),
            TextSource::Stdin => {
                let mut text = String::new();
                tokio::io::stdin().read_to_string(&mut text).await?;
                Ok(text)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct VoiceListing {
    backend: BackendKind,
    language: LanguageTag,
    default_voice: &'static str,
    voices: &'static [&'static str],
}

pub struct CliController {
    tts_service: Arc<dyn TtsServiceApi>,
    config: Arc<Config>,
}

impl CliController {
    pub fn new(tts_service: Arc<dyn TtsServiceApi>, config: Arc<Config>) -> Self {
        Self {
            tts_service,
            config,
        }
    }

    /// Run one command and return what should be printed
    pub async fn run(&self, command: Commands, json: bool) -> AppResult<String> {
        match command {
            Commands::Synthesize(cmd) => self.synthesize(cmd, json).await,
            Commands::Segment(cmd) => self.segment(cmd, json).await,
            Commands::Voices(cmd) => self.voices(cmd, json),
        }
    }

    async fn synthesize(&self, cmd: SynthesizeCommand, json: bool) -> AppResult<String> {
        let voice = self.voice_config(&cmd)?;
        let text = cmd.text.source().read().await?;

        let artifact = self
            .tts_service
            .synthesize(&text, &cmd.output, &voice)
            .await?;

        if json {
            return to_json(&artifact);
        }
        Ok(render_artifact(&artifact))
    }

    async fn segment(&self, cmd: SegmentCommand, json: bool) -> AppResult<String> {
        let text = cmd.text.source().read().await?;
        let descriptors = self.tts_service.segment(&text);

        if json {
            return to_json(&descriptors);
        }
        Ok(render_descriptors(&descriptors))
    }

    fn voices(&self, cmd: VoicesCommand, json: bool) -> AppResult<String> {
        let backends = match cmd.backend {
            Some(name) => vec![parse_backend(&name)?],
            None => BackendKind::ALL.to_vec(),
        };

        let listings: Vec<VoiceListing> = backends
            .into_iter()
            .flat_map(|backend| {
                [LanguageTag::English, LanguageTag::Japanese]
                    .into_iter()
                    .map(move |language| VoiceListing {
                        backend,
                        language,
                        default_voice: backend.default_voice(language),
                        voices: backend.voices(language),
                    })
            })
            .collect();

        if json {
            return to_json(&listings);
        }

        Ok(listings
            .iter()
            .map(|l| format!("{} {}: {}", l.backend, l.language, l.voices.join(", ")))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Config defaults, then command-line overrides
    fn voice_config(&self, cmd: &SynthesizeCommand) -> AppResult<VoiceConfig> {
        let backend = match &cmd.backend {
            Some(name) => parse_backend(name)?,
            None => self.config.backend,
        };
        let format = match &cmd.format {
            Some(name) => name.parse::<OutputFormat>()?,
            None => self.config.output_format,
        };

        let mut voice = self.config.voice_config_for(backend, format);
        if let Some(id) = &cmd.english_voice {
            voice = voice.with_voice(LanguageTag::English, id.clone());
        }
        if let Some(id) = &cmd.japanese_voice {
            voice = voice.with_voice(LanguageTag::Japanese, id.clone());
        }
        Ok(voice)
    }
}

fn parse_backend(name: &str) -> AppResult<BackendKind> {
    name.parse().map_err(AppError::BadRequest)
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.to_string()))
}

fn render_artifact(artifact: &OutputArtifact) -> String {
    let mut lines = vec![format!(
        "Wrote {} ({}, {} bytes, {:.2}s)",
        artifact.location.display(),
        artifact.format,
        artifact.size_bytes,
        artifact.duration_ms as f64 / 1000.0
    )];
    lines.extend(
        artifact
            .descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| format!("  [{}] {}", i, d)),
    );
    lines.join("\n")
}

fn render_descriptors(descriptors: &[SegmentDescriptor]) -> String {
    descriptors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
