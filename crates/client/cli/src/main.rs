//! Headless preview entry point.
mod app;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::PreviewApp;
use client_bootstrap::config::PreviewConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = PreviewConfig::from_env();

    setup_logging(&config.session_id)?;

    PreviewApp::new(config).run().await
}

/// Setup logging to stderr and to a per-session file
fn setup_logging(session_id: &Option<String>) -> Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let session_id = session_id.clone().unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{timestamp}")
    });

    let session_log_dir = log_directory().join(&session_id);
    std::fs::create_dir_all(&session_log_dir)
        .with_context(|| format!("Failed to create {}", session_log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "preview.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    // stdout carries the JSON event stream
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // Keep the file writer alive for the whole process
    std::mem::forget(guard);

    tracing::info!(session = %session_id, "logging initialized");
    tracing::info!("log file: {}/preview.log", session_log_dir.display());

    Ok(())
}

fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "macrogame")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("macrogame").join("logs"))
}
