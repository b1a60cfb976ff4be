//! Subscription registry
//!
//! Vec-based registry guarded by a single Mutex.

use parking_lot::Mutex;

use crate::error::{KvError, Result};
use crate::protocol::Notification;
use crate::session::{ConnectionId, Outbox};

/// One subscription of one connection to one key
#[derive(Debug, Clone)]
pub struct SubscriptionRecord {
    pub connection: ConnectionId,
    pub key: String,
    outbox: Outbox,
}

/// Registry of all subscriptions, bounded by `capacity` records
pub struct SubscriptionRegistry {
    records: Mutex<Vec<SubscriptionRecord>>,
    capacity: usize,
}

impl SubscriptionRegistry {
    /// Create an empty registry holding at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Append a subscription record
    ///
    /// Not idempotent: subscribing twice to the same key yields two records
    /// and two notifications per PUT.
    pub fn subscribe(&self, connection: ConnectionId, key: &str, outbox: Outbox) -> Result<()> {
        let mut records = self.records.lock();

        if records.len() >= self.capacity {
            return Err(KvError::CapacityExceeded {
                resource: "subscription registry",
                limit: self.capacity,
            });
        }

        records.push(SubscriptionRecord {
            connection,
            key: key.to_string(),
            outbox,
        });

        tracing::trace!("{} subscribed to {:?} ({} records)", connection, key, records.len());
        Ok(())
    }

    /// Notify every subscriber of `key`
    ///
    /// Returns the number of notifications delivered. Records whose outbox
    /// has been disconnected are removed instead of being retried forever.
    pub fn publish(&self, key: &str, value: &str) -> usize {
        let line = Notification::new(key, value).to_string();
        let mut records = self.records.lock();
        let before = records.len();
        let mut delivered = 0;

        records.retain(|record| {
            if record.key != key {
                return true;
            }
            match record.outbox.send(line.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });

        let reaped = before - records.len();
        if reaped > 0 {
            tracing::debug!("Reaped {} dead subscription(s) on {:?}", reaped, key);
        }

        delivered
    }

    /// Drop every record owned by `connection`, returning how many were removed
    pub fn remove_connection(&self, connection: ConnectionId) -> usize {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|record| record.connection != connection);
        before - records.len()
    }

    /// Number of records subscribed to `key`
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.records.lock().iter().filter(|r| r.key == key).count()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
