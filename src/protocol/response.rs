//! Response definitions
//!
//! Represents lines sent to clients: one response per request, plus
//! asynchronous notifications pushed to subscribers.

use std::fmt;

/// A response to send to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `BEG:transaction_started`
    TransactionStarted,

    /// `BEG:transaction_already_started`
    TransactionAlreadyStarted,

    /// `END:transaction_ended`
    TransactionEnded,

    /// `END:no_transaction_to_end`
    NoTransactionToEnd,

    /// `SUB:<key>:key_subscribed`
    Subscribed { key: String },

    /// `GET:<key>:<value>` or `GET:<key>:key_nonexistent`
    Value { key: String, value: Option<String> },

    /// `PUT:<key>:<value>`
    Stored { key: String, value: String },

    /// `DEL:<key>:key_deleted` or `DEL:<key>:key_nonexistent`
    Deleted { key: String, existed: bool },

    /// `<CMD>:<key>:capacity_exceeded` for a full store or registry
    CapacityExceeded { command: &'static str, key: String },

    /// `ERROR:<reason>`
    Error(String),
}

impl Response {
    /// Create an ERROR response
    pub fn error(reason: impl Into<String>) -> Self {
        Response::Error(reason.into())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::TransactionStarted => f.write_str("BEG:transaction_started"),
            Response::TransactionAlreadyStarted => f.write_str("BEG:transaction_already_started"),
            Response::TransactionEnded => f.write_str("END:transaction_ended"),
            Response::NoTransactionToEnd => f.write_str("END:no_transaction_to_end"),
            Response::Subscribed { key } => write!(f, "SUB:{}:key_subscribed", key),
            Response::Value { key, value: Some(value) } => write!(f, "GET:{}:{}", key, value),
            Response::Value { key, value: None } => write!(f, "GET:{}:key_nonexistent", key),
            Response::Stored { key, value } => write!(f, "PUT:{}:{}", key, value),
            Response::Deleted { key, existed: true } => write!(f, "DEL:{}:key_deleted", key),
            Response::Deleted { key, existed: false } => write!(f, "DEL:{}:key_nonexistent", key),
            Response::CapacityExceeded { command, key } => {
                write!(f, "{}:{}:capacity_exceeded", command, key)
            }
            Response::Error(reason) => write!(f, "ERROR:{}", reason),
        }
    }
}

/// Notification pushed to subscribers of a key after a successful PUT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> Notification<'a> {
    pub fn new(key: &'a str, value: &'a str) -> Self {
        Self { key, value }
    }
}

impl fmt::Display for Notification<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PUB:{}:{}", self.key, self.value)
    }
}
