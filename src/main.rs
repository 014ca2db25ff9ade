use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

use mood_log_api::{
    config::Config,
    create_router,
    db::Database,
    middleware::init_tracing,
    store::SharedStore,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let allowed_origin = match config.allowed_origin_header() {
        Ok(origin) => origin,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize database connection
    let database = match Database::new(config.database.clone()).await {
        Ok(db) => {
            info!("Database connection established");
            Arc::new(db)
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // Create the mood_logs table if it is missing
    if let Err(e) = database.migrate().await {
        error!("Failed to create database schema: {}", e);
        std::process::exit(1);
    }
    info!("Database schema ready");

    let store: SharedStore = database.clone();
    let app = create_router(store, allowed_origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on http://{}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        database.close();
        std::process::exit(1);
    }

    database.close();
    info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}
