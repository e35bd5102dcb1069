//! topic-images - batch hero image generation for site topics.

mod adapters;
mod batch;
mod cassette;
mod cli;
mod config;
mod context;
mod error;
mod model;
mod output;
mod params;
mod ports;
mod topics;

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::batch::Batch;
use crate::cli::Cli;
use crate::config::Config;
use crate::context::{ServiceContext, RECORD_ENV, REPLAY_ENV};
use crate::error::GenerateError;
use crate::model::{ensure_gemini_model, resolve_model};
use crate::params::{validate_aspect_ratio, validate_size};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "topic_images=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn run(cli: Cli) -> Result<(), GenerateError> {
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(GenerateError::Config)?;
    tracing::debug!(path = %config_path.display(), "config loaded");

    let settings = config.run_settings(
        cli.model.as_deref(),
        cli.aspect_ratio.as_deref(),
        cli.size.as_deref(),
        cli.output_dir.as_deref(),
    );
    let model = resolve_model(&settings.model);
    ensure_gemini_model(&model).map_err(GenerateError::InvalidArgument)?;
    validate_aspect_ratio(&settings.aspect_ratio).map_err(GenerateError::InvalidArgument)?;
    validate_size(&settings.size).map_err(GenerateError::InvalidArgument)?;
    tracing::debug!(%model, alias = %settings.model, "model resolved");

    let all_topics = match cli.topics.as_deref() {
        Some(path) => topics::load_topics(Path::new(path))?,
        None => topics::builtin_topics(),
    };
    topics::validate_topics(&all_topics)?;
    let selected = topics::select_topics(all_topics, &cli.only)?;

    let replay_path = std::env::var(REPLAY_ENV).ok();
    let is_recording = std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::info!(cassette = %cassette_path, "replaying");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::info!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(&config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config)?, None)
    };

    let report = {
        let batch = Batch::new(ctx.generator.as_ref(), &model, &settings);
        tracing::debug!(
            topics = selected.len(),
            output_dir = %batch.output_dir().display(),
            "starting batch"
        );
        batch.run(&selected, &mut std::io::stdout()).await?
    };
    tracing::info!(
        saved = report.saved(),
        without_image = report.without_image(),
        failed = report.failed(),
        "batch finished"
    );

    // The recorder is shared with the generator until the context goes away.
    drop(ctx);
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    Ok(())
}
