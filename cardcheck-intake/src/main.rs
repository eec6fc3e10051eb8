//! Insurance card intake service - main entry point
//!
//! HTTP microservice that accepts photos of an insurance card, extracts
//! their text through Tesseract, and classifies the plan to decide whether
//! the patient proceeds to booking or to self-pay.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardcheck_intake::config::{Args, Config};
use cardcheck_intake::services::TesseractClient;
use cardcheck_intake::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardcheck_intake=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting cardcheck intake v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::load(args).await?;

    info!("Web root: {}", config.web_root.display());
    info!("Upload ceiling: {} bytes", config.max_upload_bytes);

    // Probe the OCR engine here, before the listener opens, so a missing
    // tesseract install fails startup instead of the first submission.
    let ocr = Arc::new(
        TesseractClient::new(&config.ocr_lang, config.tessdata_dir.clone())
            .context("Failed to initialize Tesseract OCR engine")?,
    );
    info!(language = %config.ocr_lang, "OCR engine ready");

    let port = config.port;
    let state = AppState::new(config, ocr);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
