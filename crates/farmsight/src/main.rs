// SPDX-FileCopyrightText: 2026 Farmsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Farmsight - telemetry collection API for farming clusters.
//!
//! This is the binary entry point for the Farmsight server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Farmsight - telemetry collection API for farming clusters.
#[derive(Parser, Debug)]
#[command(name = "farmsight", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Farmsight telemetry server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match farmsight_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            farmsight_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                tracing::error!(error = %e, "farmsight serve failed");
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("farmsight: use --help for available commands");
        }
    }
}
