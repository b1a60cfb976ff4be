//! Engine Module
//!
//! The command dispatcher that coordinates all shared state.
//!
//! ## Responsibilities
//! - Allocate connection identities and sessions
//! - Route BEG/END to the gate, SUB to the registry
//! - Admit GET/PUT/DEL through the gate, then run them on the store
//! - Clean up gate ownership and subscriptions when a session ends

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::gate::{BeginOutcome, EndOutcome, TransactionGate};
use crate::protocol::{Command, CommandType, Response};
use crate::pubsub::SubscriptionRegistry;
use crate::session::{ConnectionId, Outbox, Session};
use crate::store::Store;

/// The shared engine, one per server
///
/// ## Concurrency Model
///
/// - **Gate**: logical ownership spans BEG..END. Its internal lock is only
///   held for one admission (one store operation).
/// - **Store**: one exclusive lock linearizes GET/PUT/DEL.
/// - **Registry**: its own lock, taken inside PUT's store critical section.
///
/// Nested acquisition always follows gate → store → registry.
///
/// A connection other than the owner that issues GET/PUT/DEL during a
/// transaction waits until the transaction ends; it is never rejected.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Key-value table
    store: Store,

    /// Subscriptions, shared with the store for PUT fan-out
    registry: Arc<SubscriptionRegistry>,

    /// System-wide transaction lock
    gate: TransactionGate,

    /// Source of connection identities
    next_connection_id: AtomicU64,
}

impl Engine {
    /// Create an engine with the given config
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(SubscriptionRegistry::new(config.subscription_capacity));
        let store = Store::new(config.store_capacity, Arc::clone(&registry));

        Ok(Self {
            config,
            store,
            registry,
            gate: TransactionGate::new(),
            next_connection_id: AtomicU64::new(1),
        })
    }

    /// Start a session for a new connection whose output goes to `outbox`
    pub fn open_session(&self, outbox: Outbox) -> Session {
        let id = ConnectionId::new(self.next_connection_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!("Session {} opened", id);
        Session::new(id, outbox)
    }

    /// Tear down a session
    ///
    /// Must run on every exit path of a connection. Releases the gate if the
    /// session still owns it (unless configured to keep abandoned
    /// transactions) and drops the session's subscriptions.
    pub fn close_session(&self, session: Session) {
        let id = session.id();

        if self.gate.owner() == Some(id) {
            if self.config.release_gate_on_disconnect {
                self.gate.release(id);
                tracing::warn!("Session {} ended inside a transaction; gate released", id);
            } else {
                tracing::warn!(
                    "Session {} ended inside a transaction; gate stays held and store access is stalled",
                    id
                );
            }
        }

        let removed = self.registry.remove_connection(id);
        tracing::debug!("Session {} closed ({} subscription(s) removed)", id, removed);
    }

    /// Execute a command on behalf of `session`
    ///
    /// Returns the response line to send, or `None` for QUIT.
    pub fn execute(&self, session: &mut Session, command: Command) -> Option<Response> {
        let id = session.id();
        // Held until the store operation is done
        let _admission = command.is_gated().then(|| self.gate.admit(id));

        let response = match command {
            Command::Begin => self.begin(session),
            Command::End => self.end(session),
            Command::Subscribe { key } => self.subscribe(session, key),
            Command::Get { key } => {
                let value = self.store.get(&key);
                Response::Value { key, value }
            }
            Command::Put { key, value } => match self.store.put(&key, &value) {
                Ok(value) => Response::Stored { key, value },
                Err(KvError::CapacityExceeded { .. }) => Response::CapacityExceeded {
                    command: CommandType::Put.as_str(),
                    key,
                },
                Err(e) => Response::error(e.to_string()),
            },
            Command::Delete { key } => {
                let existed = self.store.delete(&key);
                Response::Deleted { key, existed }
            }
            Command::Quit => return None,
            Command::Unknown { verb } => {
                tracing::debug!("Session {} sent unknown command {:?}", id, verb);
                Response::error("unknown_command")
            }
        };

        Some(response)
    }

    fn begin(&self, session: &mut Session) -> Response {
        if session.in_transaction() {
            return Response::TransactionAlreadyStarted;
        }

        match self.gate.begin(session.id()) {
            BeginOutcome::Started => {
                session.set_in_transaction(true);
                tracing::debug!("Session {} started a transaction", session.id());
                Response::TransactionStarted
            }
            BeginOutcome::AlreadyOwner => {
                session.set_in_transaction(true);
                Response::TransactionAlreadyStarted
            }
        }
    }

    fn end(&self, session: &mut Session) -> Response {
        match self.gate.end(session.id()) {
            EndOutcome::Ended => {
                session.set_in_transaction(false);
                tracing::debug!("Session {} ended its transaction", session.id());
                Response::TransactionEnded
            }
            EndOutcome::NotOwner => Response::NoTransactionToEnd,
        }
    }

    fn subscribe(&self, session: &Session, key: String) -> Response {
        match self
            .registry
            .subscribe(session.id(), &key, session.outbox().clone())
        {
            Ok(()) => Response::Subscribed { key },
            Err(KvError::CapacityExceeded { .. }) => Response::CapacityExceeded {
                command: CommandType::Subscribe.as_str(),
                key,
            },
            Err(e) => Response::error(e.to_string()),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the store
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get the subscription registry
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Get the transaction gate
    pub fn gate(&self) -> &TransactionGate {
        &self.gate
    }
}
