//! Configuration for gatekv
//!
//! Centralized configuration with sensible defaults.

use crate::error::{KvError, Result};

/// Main configuration for a gatekv instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = wait forever)
    ///
    /// Subscribers and transaction owners sit idle between requests, so the
    /// default never times out.
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, must be > 0)
    ///
    /// Also bounds teardown, which waits for the writer to drain the outbox.
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Capacity Configuration
    // -------------------------------------------------------------------------
    /// Max number of distinct keys in the store
    pub store_capacity: usize,

    /// Max number of subscription records across all connections
    pub subscription_capacity: usize,

    // -------------------------------------------------------------------------
    // Transaction Configuration
    // -------------------------------------------------------------------------
    /// Release the transaction gate when its owner disconnects without END.
    ///
    /// When false, an abandoned transaction keeps the gate held forever and
    /// every other connection's GET/PUT/DEL stalls.
    pub release_gate_on_disconnect: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5678".to_string(),
            max_connections: 100,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
            store_capacity: 100,
            subscription_capacity: 100,
            release_gate_on_disconnect: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject configurations the server can't run with
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(KvError::Config("max_connections must be > 0".to_string()));
        }
        if self.store_capacity == 0 {
            return Err(KvError::Config("store_capacity must be > 0".to_string()));
        }
        if self.subscription_capacity == 0 {
            return Err(KvError::Config(
                "subscription_capacity must be > 0".to_string(),
            ));
        }
        if self.write_timeout_ms == 0 {
            return Err(KvError::Config("write_timeout_ms must be > 0".to_string()));
        }
        if self.listen_addr.is_empty() {
            return Err(KvError::Config("listen_addr must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the store capacity (distinct keys)
    pub fn store_capacity(mut self, capacity: usize) -> Self {
        self.config.store_capacity = capacity;
        self
    }

    /// Set the subscription registry capacity (records)
    pub fn subscription_capacity(mut self, capacity: usize) -> Self {
        self.config.subscription_capacity = capacity;
        self
    }

    /// Choose whether an owner's disconnect releases the transaction gate
    pub fn release_gate_on_disconnect(mut self, release: bool) -> Self {
        self.config.release_gate_on_disconnect = release;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
