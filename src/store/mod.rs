//! Store Module
//!
//! The shared in-memory key-value table.
//!
//! ## Responsibilities
//! - Point reads, writes and deletes under one exclusive lock
//! - Enforce the configured key capacity
//! - Trigger subscription fan-out for every successful PUT
//!
//! ## Data Structure Choice
//! A Vec of entries with linear lookup: capacity is small and fixed by
//! configuration, and deletes use swap-remove so survivor order is not kept.
//!
//! ## Lock Order
//! PUT publishes while still holding the store lock, so the registry lock is
//! always taken after the store lock.

mod table;

pub use table::Store;

/// A key and its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub key: String,
    pub value: String,
}
