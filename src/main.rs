use async_openai::config::OpenAIConfig;
use bilingual_tts::controllers::{Cli, CliController};
use bilingual_tts::domain::tts::TtsService;
use bilingual_tts::error::AppError;
use bilingual_tts::infrastructure::config::{Config, LogFormat};
use bilingual_tts::infrastructure::repositories::{
    GoogleTtsRepository, OpenAiTtsRepository, PollyTtsRepository, TtsRepository,
};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            let err = AppError::Config(e.to_string());
            eprintln!("{}", err);
            return ExitCode::from(err.exit_code());
        }
    };

    // Initialize logging
    init_logging(&config);

    let json = cli.json;
    let result = tokio::select! {
        result = run(cli, config) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, in-flight synthesis cancelled");
            Err(AppError::Interrupted)
        }
    };

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, exit_code = err.exit_code(), "Command failed");
            if json {
                if let Ok(body) = serde_json::to_string(&err.to_response()) {
                    eprintln!("{}", body);
                }
            } else {
                eprintln!("error: {}", err);
            }
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<String, AppError> {
    tracing::info!(
        backend = %config.backend,
        output_format = %config.output_format,
        concurrency = config.synthesis_concurrency,
        "Starting bilingual-tts"
    );

    let backends = build_backends(&config).await;
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    let tts_service = Arc::new(TtsService::new(backends, config.tts_settings()));
    let controller = CliController::new(tts_service, config);

    controller.run(cli.command, cli.json).await
}

/// Every backend whose client can be built; credentials are only checked on first use
async fn build_backends(config: &Config) -> Vec<Arc<dyn TtsRepository>> {
    let mut backends: Vec<Arc<dyn TtsRepository>> = Vec::new();

    tracing::debug!(region = %config.aws_region, "Initializing AWS Polly client");
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;
    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
    backends.push(Arc::new(PollyTtsRepository::new(polly_client)));

    match &config.google_api_key {
        Some(api_key) => backends.push(Arc::new(GoogleTtsRepository::new(api_key.clone()))),
        None => tracing::debug!("GOOGLE_API_KEY not set, Google Cloud TTS disabled"),
    }

    match &config.openai_api_key {
        Some(api_key) => {
            let openai_config = OpenAIConfig::new().with_api_key(api_key.clone());
            let openai_client = Arc::new(async_openai::Client::with_config(openai_config));
            backends.push(Arc::new(OpenAiTtsRepository::new(
                openai_client,
                config.openai_tts_model.clone(),
            )));
        }
        None => tracing::debug!("OPENAI_API_KEY not set, OpenAI TTS disabled"),
    }

    backends
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "bilingual_tts=debug"
    } else {
        "bilingual_tts=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
