use std::{future::IntoFuture, sync::Arc};

use anyhow::Result;
use tokio::{net::TcpListener, signal, sync::watch, time};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sensor_service::{
    api,
    config::Config,
    db,
    sensors::{PgSensorStore, SensorService},
    temperature::TemperatureClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env; env vars may also be set externally
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Schema is expected to exist already; see migrations/ for the DDL.
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    info!("Database pool ready");

    let temperature = TemperatureClient::new(&config.temperature_api_url)?;
    info!(url = %config.temperature_api_url, "Temperature client ready");

    let service = SensorService::new(
        Arc::new(PgSensorStore::new(pool.clone())),
        Arc::new(temperature),
    );

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, api::app(service, config.request_timeout))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .into_future();

    // In-flight requests get a bounded grace period once the listener stops.
    let grace = config.shutdown_grace;
    let grace_elapsed = async move {
        if shutdown_rx.changed().await.is_ok() {
            time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        res = server => res?,
        _ = grace_elapsed => {
            warn!(grace_secs = grace.as_secs(), "Grace period elapsed, abandoning in-flight requests");
        }
    }

    pool.close().await;
    info!("Server exited");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
