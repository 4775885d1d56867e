//! Local stand-in for the upstream temperature service.
//!
//! Serves `GET /temperature?location=<name>` with a random reading.

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sensor_service::temperature::simulator;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let host = env_or("TEMPERATURE_API_HOST", "0.0.0.0");
    let port: u16 = env_or("TEMPERATURE_API_PORT", "8081")
        .parse()
        .context("TEMPERATURE_API_PORT must be a valid port number")?;

    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Temperature simulator listening");

    axum::serve(listener, simulator::router())
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}
