mod bootstrap;
mod health;
mod routes;
mod simulate;
mod upsert;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use autoflow_core::config::{AppConfig, LoadOptions};
use tokio::sync::Notify;
use tracing::{error, info, warn};

fn init_logging(config: &AppConfig) {
    use autoflow_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    let whatsapp_enabled = app.config.whatsapp.enabled;
    if whatsapp_enabled {
        info!(
            event_name = "system.server.whatsapp_webhook",
            correlation_id = "bootstrap",
            route = "/api/whatsapp/upsert",
            "whatsapp upsert webhook mounted"
        );
    }

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "autoflow-server listening"
    );

    let draining = Arc::new(Notify::new());
    let signal = {
        let draining = Arc::clone(&draining);
        async move {
            wait_for_shutdown().await;
            info!(
                event_name = "system.server.stopping",
                correlation_id = "shutdown",
                "autoflow-server draining connections"
            );
            draining.notify_one();
        }
    };

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    let server = axum::serve(listener, routes::router(app.engine, app.gateway, whatsapp_enabled))
        .with_graceful_shutdown(signal)
        .into_future();

    tokio::select! {
        result = server => result?,
        () = async {
            draining.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                event_name = "system.server.shutdown_timeout",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "graceful shutdown window elapsed; closing remaining connections"
            );
        }
    }

    info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "autoflow-server stopped"
    );
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(error = %error, "failed to listen for shutdown signal; running until killed");
        std::future::pending::<()>().await;
    }
}
