// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `farmsight serve` command implementation.
//!
//! Opens the SQLite telemetry store and runs the gateway HTTP server until
//! a shutdown signal arrives.

use std::sync::Arc;

use tracing::info;

use farmsight_config::FarmsightConfig;
use farmsight_core::FarmsightError;
use farmsight_gateway::{GatewayState, ServerConfig};
use farmsight_storage::Database;

/// Runs the `farmsight serve` command.
///
/// Opens storage, builds the gateway state, and serves until Ctrl-C. The
/// database is checkpointed and closed on the signal path.
pub async fn run_serve(config: FarmsightConfig) -> Result<(), FarmsightError> {
    init_tracing(&config.service.log_level);

    info!("starting farmsight serve");

    let db = Database::open(&config.storage.database_path, config.storage.wal_mode).await?;
    info!(
        path = config.storage.database_path.as_str(),
        wal = config.storage.wal_mode,
        "telemetry store opened"
    );

    let state = GatewayState { db: Arc::new(db) };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    tokio::select! {
        result = farmsight_gateway::start_server(&server_config, state.clone()) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            state.db.close().await?;
        }
    }

    info!("farmsight serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("farmsight={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
