//! Title updater worker binary.

use tracing::{error, info};

use vtitle_worker::logging::init_tracing;
use vtitle_worker::metrics::init_metrics;
use vtitle_worker::{Scheduler, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting vtitle-worker");

    let config = match WorkerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Worker config: {:?}", config);

    if let Some(port) = config.metrics_port {
        match init_metrics(port) {
            Ok(()) => info!(port, "Prometheus exporter listening"),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    let scheduler = match Scheduler::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create scheduler: {}", e);
            std::process::exit(1);
        }
    };

    // Setup signal handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal, finishing current cycle");
        let _ = shutdown_tx.send(true);
    });

    scheduler.run(shutdown_rx).await;

    let report = scheduler.report().await;
    info!(
        total_updates = report.total_updates,
        peak_engagement = report.peak_engagement,
        uptime_secs = report.uptime_secs,
        "Worker shutdown complete"
    );
}
