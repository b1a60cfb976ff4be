//! Command definitions
//!
//! Represents commands from clients.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Begin,
    End,
    Subscribe,
    Get,
    Put,
    Delete,
    Quit,
}

impl CommandType {
    /// Wire token of the command, also used as the response prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Begin => "BEG",
            CommandType::End => "END",
            CommandType::Subscribe => "SUB",
            CommandType::Get => "GET",
            CommandType::Put => "PUT",
            CommandType::Delete => "DEL",
            CommandType::Quit => "QUIT",
        }
    }

    /// Match a command token, ignoring ASCII case
    pub fn from_token(token: &str) -> Option<Self> {
        [
            CommandType::Begin,
            CommandType::End,
            CommandType::Subscribe,
            CommandType::Get,
            CommandType::Put,
            CommandType::Delete,
            CommandType::Quit,
        ]
        .into_iter()
        .find(|ty| ty.as_str().eq_ignore_ascii_case(token))
    }
}

/// A parsed command
///
/// Missing arguments are carried as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a transaction (acquire the gate)
    Begin,

    /// End the caller's transaction (release the gate)
    End,

    /// Subscribe to writes of a key
    Subscribe { key: String },

    /// Get a value by key
    Get { key: String },

    /// Put a key-value pair
    Put { key: String, value: String },

    /// Delete a key
    Delete { key: String },

    /// Close the connection
    Quit,

    /// Anything else
    Unknown { verb: String },
}

impl Command {
    /// Whether the command touches the store and must pass the gate
    pub fn is_gated(&self) -> bool {
        matches!(
            self,
            Command::Get { .. } | Command::Put { .. } | Command::Delete { .. }
        )
    }
}
