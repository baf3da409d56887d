//!
//! Rackshare REST server for the peer-to-peer rental marketplace.
//! Reads configuration from environment variables.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use rackshare::application::reservations::queries::reservation_services;
use rackshare::auth::jwt::JwtConfig;
use rackshare::domain::RepositoryProvider;
use rackshare::infrastructure::database::migrator::Migrator;
use rackshare::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use rackshare::shared::clock::{Clock, SystemClock};
use rackshare::{create_api_router, init_database, Config, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Rackshare marketplace backend...");

    // ── Configuration ──────────────────────────────────────────
    let config = Config::from_env();
    let db_config = DatabaseConfig::from_env();
    let jwt_config = JwtConfig::from_env();
    info!("Database: {}", db_config.url);
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Services ───────────────────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (reservation_service, reservation_queries) = reservation_services(repos.clone(), clock);

    // ── REST API server ────────────────────────────────────────
    let router = create_api_router(
        repos,
        Arc::new(reservation_service),
        Arc::new(reservation_queries),
        jwt_config,
    );

    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    info!("REST API server listening on http://{}", config.address());
    info!("Swagger UI available at http://{}/docs/", config.address());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Rackshare shutdown complete");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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
