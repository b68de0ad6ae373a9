mod config;
mod error;
mod models;
mod pipeline;
mod sensors;
mod sink;
mod utils;
mod weather;

use log::{error, info, warn};
use time::OffsetDateTime;
use tokio::time::{interval, MissedTickBehavior};

use config::{BridgeConfig, Credentials};
use pipeline::{Poller, TickOutcome};
use sink::LoggingSink;
use weather::HttpSource;

async fn main_loop(config: BridgeConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Ambient Weather bridge");

    let source = HttpSource::new(config.http_timeout)?;
    let mut poller = Poller::new(&config, source, LoggingSink::new()).with_credential_reload(Credentials::reload);

    // Ticks are serialized: a slow request delays the next tick instead of overlapping it
    let mut ticker = interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match poller.on_tick(OffsetDateTime::now_utc()).await {
            TickOutcome::Dispatched(summary) => {
                if summary.pushed == 0 {
                    warn!("Reading contained none of the expected fields");
                }
                if summary.discovered > 0 {
                    info!("Now tracking {} sensor groups", poller.context().registry.len());
                }
            }
            TickOutcome::NotConfigured | TickOutcome::Failed(_) => {}
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match BridgeConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle Ctrl+C and SIGTERM gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = tx.send(());
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            if let Err(e) = result {
                error!("Fatal error: {}", e);
            }
        }
        _ = &mut rx => {
            info!("Shutdown requested. Exiting gracefully.");
        }
    }

    Ok(())
}
