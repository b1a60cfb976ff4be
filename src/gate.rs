//! Transaction Gate
//!
//! A system-wide exclusive lock with an owner, held across requests from
//! `BEG` to `END`.
//!
//! ## States
//! ```text
//!            begin(c)                end(c) / release(c)
//!   Idle ──────────────▶ Active(c) ─────────────────────▶ Idle
//! ```
//!
//! While `Active(c)`, store access from `c` is admitted immediately and
//! store access from any other connection waits until the gate is Idle.
//! Waiters are woken together; no fairness among them is guaranteed.

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::session::ConnectionId;

/// Result of [`TransactionGate::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    /// The caller now owns the gate
    Started,

    /// The caller already owned the gate; nothing changed
    AlreadyOwner,
}

/// Result of [`TransactionGate::end`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOutcome {
    /// The caller owned the gate and released it
    Ended,

    /// The caller did not own the gate; nothing changed
    NotOwner,
}

/// The system-wide transaction lock
pub struct TransactionGate {
    /// `None` while Idle, `Some(owner)` while Active
    owner: Mutex<Option<ConnectionId>>,

    /// Signalled whenever the gate returns to Idle
    released: Condvar,
}

/// Permission to run one store operation
///
/// Holds the gate's state lock, so no transaction can start between
/// admission and the end of the store operation. Lock order is gate, then
/// store, then registry.
pub struct Admission<'a> {
    _state: MutexGuard<'a, Option<ConnectionId>>,
}

impl TransactionGate {
    pub fn new() -> Self {
        Self {
            owner: Mutex::new(None),
            released: Condvar::new(),
        }
    }

    /// Acquire the gate for `conn`, blocking while another connection owns it
    ///
    /// Ownership is checked before waiting, so a second `begin` by the owner
    /// returns [`BeginOutcome::AlreadyOwner`] instead of waiting on itself.
    pub fn begin(&self, conn: ConnectionId) -> BeginOutcome {
        let mut owner = self.owner.lock();

        if *owner == Some(conn) {
            return BeginOutcome::AlreadyOwner;
        }

        while owner.is_some() {
            self.released.wait(&mut owner);
        }

        *owner = Some(conn);
        BeginOutcome::Started
    }

    /// Release the gate if `conn` owns it
    pub fn end(&self, conn: ConnectionId) -> EndOutcome {
        let mut owner = self.owner.lock();

        if *owner != Some(conn) {
            return EndOutcome::NotOwner;
        }

        *owner = None;
        self.released.notify_all();
        EndOutcome::Ended
    }

    /// Wait until `conn` may touch the store
    ///
    /// Returns immediately when the gate is Idle or owned by `conn`.
    pub fn admit(&self, conn: ConnectionId) -> Admission<'_> {
        let mut owner = self.owner.lock();

        while matches!(*owner, Some(current) if current != conn) {
            self.released.wait(&mut owner);
        }

        Admission { _state: owner }
    }

    /// Teardown hook: release the gate if `conn` still owns it
    ///
    /// Returns true when the gate was released.
    pub fn release(&self, conn: ConnectionId) -> bool {
        self.end(conn) == EndOutcome::Ended
    }

    /// Current owner, if any
    pub fn owner(&self) -> Option<ConnectionId> {
        *self.owner.lock()
    }

    pub fn is_idle(&self) -> bool {
        self.owner.lock().is_none()
    }
}

impl Default for TransactionGate {
    fn default() -> Self {
        Self::new()
    }
}
