//! Network Module
//!
//! TCP server, per-connection sessions and a blocking client.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking accept polled for shutdown)
//! - One reader/dispatch thread per connection
//! - One writer thread per connection draining its outbox
//! - Commands routed through Engine

mod server;
mod connection;
mod client;

pub use server::Server;
pub use connection::Connection;
pub use client::Client;
