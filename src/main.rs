//! # Whisper Transcription API - Main Application Entry Point
//!
//! An Actix-web HTTP server exposing a single-model audio-transcription
//! capability: clients POST an audio file to `/transcribe` and receive the
//! transcribed text back as JSON.
//!
//! ## Application Architecture:
//! - **config**: layered configuration (defaults, config.toml, environment)
//! - **state**: shared application state and the explicit model lifecycle
//! - **upload**: extension allow-list validation for uploaded files
//! - **artifact**: scoped temp files with guaranteed cleanup
//! - **transcription**: the `Transcriber` seam, Whisper backend, invoker
//! - **handlers**: the per-request orchestration pipeline
//! - **health**: readiness reporting tied to the model lifecycle
//! - **error**: the error taxonomy and its HTTP mapping
//!
//! ## Startup sequence:
//! Configuration is loaded and validated, then the Whisper model is loaded
//! synchronously. A load failure is fatal: the process exits before the
//! server ever binds, so no request traffic is served without a ready model.

mod artifact;
mod config;
mod error;
mod handlers;
mod health;
mod middleware;
mod state;
mod transcription;
mod upload;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::AppConfig;
use state::{AppState, ModelState};
use transcription::{TranscriptionService, WhisperTranscriber};

/// Global shutdown flag, set by the signal handler task.
static SHUTDOWN_SIGNAL: AtomicBool = AtomicBool::new(false);

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing()?;

    let config = AppConfig::load()?;
    config.validate()?;

    info!(
        "Starting {} v{}",
        state::SERVICE_NAME,
        env!("CARGO_PKG_VERSION")
    );

    // Load the model before binding the server. Failure here is fatal:
    // the process never reaches a serving state without a ready transcriber.
    let model = match WhisperTranscriber::load(&config.model) {
        Ok(transcriber) => ModelState::Ready(Arc::new(TranscriptionService::new(
            Arc::new(transcriber),
            config.model.language.clone(),
        ))),
        Err(err) => {
            error!("Failed to load model \"{}\": {err:#}", config.model.name);
            return Err(err);
        }
    };

    let app_state = AppState::new(config.clone(), model);
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    setup_signal_handlers();

    info!("Starting HTTP server on {}", bind_addr);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(middleware::RequestLogging)
            .route("/", web::get().to(health::health_check))
            .route("/transcribe", web::post().to(handlers::transcribe))
    })
    .bind(&bind_addr)?
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    // Race the server against the shutdown signal
    tokio::select! {
        result = server_task => {
            match result {
                Ok(server_result) => {
                    if let Err(err) = server_result {
                        error!("Server error: {}", err);
                    }
                }
                Err(err) => {
                    error!("Server task error: {}", err);
                }
            }
        }
        _ = wait_for_shutdown() => {
            info!("Shutdown signal received, stopping server...");
            server_handle.stop(true).await;
        }
    }

    info!("Server stopped gracefully");
    Ok(())
}

/// Initialize tracing with an env-filter, defaulting to debug logs for this
/// crate and info for actix when `RUST_LOG` is unset.
fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whisper_transcription_api=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

/// Install SIGTERM/SIGINT handlers that flip the shutdown flag so in-flight
/// requests can finish before the server stops.
fn setup_signal_handlers() {
    tokio::spawn(async {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");
        let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
            .expect("Failed to install SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }

        SHUTDOWN_SIGNAL.store(true, Ordering::SeqCst);
    });
}

async fn wait_for_shutdown() {
    while !SHUTDOWN_SIGNAL.load(Ordering::SeqCst) {
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }
}
