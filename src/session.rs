//! Session state
//!
//! Per-connection identity, output destination and transaction flag.

use std::fmt;

use crossbeam::channel::{Receiver, Sender};

/// Output destination of a connection.
///
/// Carries complete lines (without the trailing newline). A dedicated writer
/// drains the receiving end, so responses and pushed notifications never
/// interleave mid-line and publishers never wait on a socket.
pub type Outbox = Sender<String>;

/// Create a new unbounded outbox and the receiver that drains it
pub fn outbox() -> (Outbox, Receiver<String>) {
    crossbeam::channel::unbounded()
}

/// Identity of a client connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// State the dispatcher keeps for one connection
#[derive(Debug)]
pub struct Session {
    id: ConnectionId,

    /// Where responses for this connection are queued
    outbox: Outbox,

    /// Whether this connection currently owns the transaction gate
    in_transaction: bool,
}

impl Session {
    pub fn new(id: ConnectionId, outbox: Outbox) -> Self {
        Self {
            id,
            outbox,
            in_transaction: false,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub(crate) fn set_in_transaction(&mut self, active: bool) {
        self.in_transaction = active;
    }
}
