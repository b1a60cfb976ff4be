//! # gatekv
//!
//! A concurrent in-memory key-value server with:
//! - Point GET/PUT/DEL over a line-oriented TCP protocol
//! - A system-wide transaction gate spanning multiple requests (BEG..END)
//! - Key-scoped publish/subscribe notifications on writes
//! - One thread per client connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │          (one reader + one writer thread per client)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Engine (dispatcher)                        │
//! └───────┬─────────────────────┬─────────────────────┬─────────┘
//!         │ BEG/END             │ GET/PUT/DEL         │ SUB
//!         ▼                     ▼                     ▼
//!  ┌─────────────┐  admit  ┌─────────────┐  PUT  ┌─────────────┐
//!  │    Gate     │────────▶│    Store    │──────▶│  Registry   │
//!  │ (owner+cv)  │         │   (Mutex)   │       │   (Mutex)   │
//!  └─────────────┘         └─────────────┘       └──────┬──────┘
//!                                                       │ PUB lines
//!                                                       ▼
//!                                              subscriber outboxes
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod session;
pub mod store;
pub mod pubsub;
pub mod gate;
pub mod protocol;
pub mod engine;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of gatekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
