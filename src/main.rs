//! portrait-to-talking CLI.

mod cli;

use std::path::Path;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use portrait_to_talking::config::{self, Config};
use portrait_to_talking::context::{ServiceContext, RECORD_ENV, REPLAY_ENV};
use portrait_to_talking::params::{parse_extra, validate_dimension, validate_face_crop_ratio};
use portrait_to_talking::{GenerationConfig, GenerationError, GenerationResult, TalkingVideoClient};

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), GenerationError> {
    validate_face_crop_ratio(cli.face_crop_ratio).map_err(GenerationError::InvalidArgument)?;
    validate_dimension("height", cli.height).map_err(GenerationError::InvalidArgument)?;
    if let Some(width) = cli.width {
        validate_dimension("width", width).map_err(GenerationError::InvalidArgument)?;
    }
    let extra = parse_extra(&cli.extra).map_err(GenerationError::InvalidArgument)?;

    let config_path = config::discover_config_path(cli.config.as_deref());
    let file_config = Config::load(&config_path).map_err(GenerationError::Config)?;

    let mut settings = file_config.echomimic_settings();
    if let Some(url) = &cli.echomimic_url {
        settings = settings.with_url(url.clone());
    }
    if let Some(secs) = cli.timeout {
        settings = settings.with_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(url = %settings.url, timeout = ?settings.timeout, "EchoMimic settings");

    let replay_path = std::env::var(REPLAY_ENV).ok();
    let is_recording = std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(cassette_path) = &replay_path {
        tracing::info!(cassette = %cassette_path, "replaying");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::info!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(settings);
        (ctx, Some(session))
    } else {
        (ServiceContext::live(settings), None)
    };

    let generation_config = GenerationConfig {
        face_crop_ratio: cli.face_crop_ratio,
        height: cli.height,
        width: cli.width,
        extra,
    };

    let audio = cli.effective_audio();
    match audio {
        Some(audio) => tracing::info!(%audio, "using audio"),
        None => tracing::info!("generating silent video"),
    }

    let mut client = TalkingVideoClient::new(cli.image.clone(), ctx.provider)
        .with_config(generation_config);
    if let Some(audio) = audio {
        client = client.with_audio(audio);
    }
    if cli.verbose {
        client = client.on_complete(log_completion);
    }

    let outcome = client.generate(cli.output.as_deref()).await;
    // Releases the recorder so the session can be written.
    drop(client);

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => tracing::info!(path = %path.display(), "cassette saved"),
            Err(e) => tracing::warn!("failed to save cassette: {e}"),
        }
    }

    let result = outcome?;
    println!("Video generated successfully");
    println!("Output path: {}", result.output_path().unwrap_or_default());
    Ok(())
}

fn log_completion(result: &GenerationResult) {
    if result.is_success() {
        tracing::info!("Generation completed: {}", result.output_path().unwrap_or_default());
    } else {
        tracing::error!("Generation failed: {}", result.error().unwrap_or_default());
    }
}
