mod config;
mod errors;
mod mail;
mod models;
mod relay;
mod routes;
mod state;
mod upload;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::mail::{Mailer, SmtpMailer};
use crate::routes::{build_router, health::SERVICE_NAME};
use crate::state::AppState;
use crate::upload::{UploadStore, MAX_UPLOAD_BYTES};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {SERVICE_NAME} v{}", env!("CARGO_PKG_VERSION"));

    let uploads = UploadStore::new(config.upload_dir.clone(), MAX_UPLOAD_BYTES);
    uploads
        .ensure_dir()
        .await
        .with_context(|| format!("Cannot create upload directory {}", uploads.dir().display()))?;
    info!("Storing uploads in {}", uploads.dir().display());

    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::from_config(&config.mail)?);
    info!(
        "SMTP transport configured ({}:{} as {})",
        config.mail.host, config.mail.port, config.mail.user
    );
    spawn_readiness_check(mailer.clone());

    let state = AppState {
        mailer,
        uploads,
        config: config.clone(),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("HOST and PORT must form a valid socket address")?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Probes the SMTP account in the background. The outcome is only logged;
/// the server starts either way.
fn spawn_readiness_check(mailer: Arc<dyn Mailer>) {
    tokio::spawn(async move {
        match mailer.verify().await {
            Ok(()) => info!("SMTP ready"),
            Err(e) => error!("SMTP readiness check failed: {e}"),
        }
    });
}
