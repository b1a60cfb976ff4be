//! Pub/Sub Module
//!
//! Key-scoped subscriptions with write notifications.
//!
//! ## Responsibilities
//! - Record (connection, key) subscriptions, duplicates included
//! - Fan out `PUB:<key>:<value>` to every matching record on PUT
//! - Reap records of torn-down connections and dead outboxes
//!
//! ## Delivery
//! Fan-out only enqueues lines onto each subscriber's unbounded outbox. A
//! slow subscriber therefore never stalls the publisher, which matters
//! because publishing happens inside the store's critical section.

mod registry;

pub use registry::{SubscriptionRecord, SubscriptionRegistry};
