//! # callscribe-api
//!
//! Callscribe service binary — wires settings, the admission controller,
//! and the HTTP ingress together.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use callscribe_pipeline::{AdmissionController, EngineCommand, Recognizer, RecognizerFactory};
use callscribe_server::AppState;
use callscribe_settings::CallscribeSettings;

/// Callscribe transcription service.
#[derive(Parser, Debug)]
#[command(name = "callscribe-api", about = "Call transcription service")]
struct Cli {
    /// Host to bind (overrides settings if specified).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings if specified).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the settings file (defaults to `~/.callscribe/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn load_settings(args: &Cli) -> Result<CallscribeSettings> {
    let mut settings = match &args.settings {
        Some(path) => callscribe_settings::load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => callscribe_settings::load_settings().context("Failed to load settings")?,
    };
    if let Some(host) = &args.host {
        settings.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    let settings = load_settings(&args)?;

    // Both working directories must exist before the first job arrives; the
    // engine will not create its own output dir.
    std::fs::create_dir_all(&settings.engine.audio_dir)
        .with_context(|| format!("Failed to create audio dir {}", settings.engine.audio_dir))?;
    std::fs::create_dir_all(&settings.engine.transcript_dir).with_context(|| {
        format!(
            "Failed to create transcript dir {}",
            settings.engine.transcript_dir
        )
    })?;

    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let engine_settings = settings.engine.clone();
    let recognizers: RecognizerFactory = Arc::new(move || {
        Box::new(EngineCommand::from_settings(&engine_settings)) as Box<dyn Recognizer>
    });
    let controller = AdmissionController::new(&settings, client, recognizers);

    let state = AppState::new(controller);
    let app = callscribe_server::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        addr = %listener.local_addr().context("Failed to read bound address")?,
        engine = %settings.engine.command,
        "callscribe listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
