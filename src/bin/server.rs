//! gatekv Server Binary
//!
//! Starts the TCP server for gatekv.

use std::sync::Arc;
use clap::Parser;
use gatekv::{Config, Engine};
use gatekv::network::Server;
use tracing_subscriber::{fmt, EnvFilter};

/// gatekv Server
#[derive(Parser, Debug)]
#[command(name = "gatekv-server")]
#[command(about = "In-memory key-value server with transactions and pub/sub")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:5678")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "100")]
    max_connections: usize,

    /// Maximum number of distinct keys
    #[arg(short = 's', long, default_value = "100")]
    store_capacity: usize,

    /// Maximum number of subscription records
    #[arg(short = 'p', long, default_value = "100")]
    subscription_capacity: usize,

    /// Read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (must be > 0)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,

    /// Keep the gate held when a transaction owner disconnects without END
    #[arg(long)]
    keep_abandoned_transactions: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gatekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("gatekv Server v{}", gatekv::VERSION);
    tracing::info!("Listen address: {}", args.listen);
    tracing::info!(
        "Capacities: {} keys, {} subscriptions, {} connections",
        args.store_capacity,
        args.subscription_capacity,
        args.max_connections
    );

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .store_capacity(args.store_capacity)
        .subscription_capacity(args.subscription_capacity)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .release_gate_on_disconnect(!args.keep_abandoned_transactions)
        .build();

    if args.keep_abandoned_transactions {
        tracing::warn!("Abandoned transactions will stall the store until restart");
    }

    let engine = match Engine::new(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to create engine: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, engine) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
