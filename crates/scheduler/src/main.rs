use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pilot_linkedin::{LinkedInClient, LinkedInConfig};
use pilot_scheduler::{FixedLeadCadence, Scheduler, SchedulerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pilot_scheduler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = SchedulerConfig::from_env();
    tracing::info!(
        tick_interval_secs = config.tick_interval_secs,
        "Loaded scheduler configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = pilot_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    pilot_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    pilot_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- Publisher adapter ---
    let publisher = Arc::new(LinkedInClient::new(LinkedInConfig::from_env()));

    // --- Cadence ---
    let cadence = Arc::new(FixedLeadCadence::from_minutes(config.cadence_lead_minutes));

    // --- Run until signalled ---
    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(pool, publisher, cadence, config);

    let run_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        scheduler.run(run_cancel).await;
    });

    shutdown_signal().await;
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the process shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
