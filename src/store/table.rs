//! Store implementation
//!
//! Vec-based table with a parking_lot Mutex.

use std::sync::Arc;

use parking_lot::Mutex;

use super::StoreEntry;
use crate::error::{KvError, Result};
use crate::pubsub::SubscriptionRegistry;

/// Bounded key-value table
pub struct Store {
    entries: Mutex<Vec<StoreEntry>>,

    /// Max number of distinct keys
    capacity: usize,

    /// Receives a publish for every successful put
    registry: Arc<SubscriptionRegistry>,
}

impl Store {
    /// Create an empty store holding at most `capacity` keys
    pub fn new(capacity: usize, registry: Arc<SubscriptionRegistry>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            capacity,
            registry,
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock();
        entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.clone())
    }

    /// Put a key-value pair and notify the key's subscribers
    ///
    /// Overwrites an existing key in place or inserts a new one. Fails with
    /// [`KvError::CapacityExceeded`] when a new key doesn't fit; nothing is
    /// published in that case. Returns the stored value.
    pub fn put(&self, key: &str, value: &str) -> Result<String> {
        let mut entries = self.entries.lock();

        match entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.value = value.to_string(),
            None => {
                if entries.len() >= self.capacity {
                    return Err(KvError::CapacityExceeded {
                        resource: "store",
                        limit: self.capacity,
                    });
                }
                entries.push(StoreEntry {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        // Still under the store lock: notifications follow the store's
        // linearization order.
        let delivered = self.registry.publish(key, value);
        if delivered > 0 {
            tracing::trace!("PUT {:?} notified {} subscriber(s)", key, delivered);
        }

        Ok(value.to_string())
    }

    /// Delete a key, returning whether it existed
    ///
    /// The last entry takes the removed entry's slot.
    pub fn delete(&self, key: &str) -> bool {
        let mut entries = self.entries.lock();
        match entries.iter().position(|entry| entry.key == key) {
            Some(index) => {
                entries.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Copy of all entries, in storage order
    pub fn snapshot(&self) -> Vec<StoreEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
