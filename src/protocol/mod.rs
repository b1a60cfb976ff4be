//! Protocol Module
//!
//! Defines the line protocol for client-server communication.
//!
//! ## Requests
//! - `BEG`               - start a transaction
//! - `END`               - end the caller's transaction
//! - `SUB <key>`         - subscribe to writes of a key
//! - `GET <key>`         - read a value
//! - `PUT <key> <value>` - write a value
//! - `DEL <key>`         - delete a key
//! - `QUIT`              - close the connection (no response)
//!
//! ## Responses
//! ```text
//! BEG:transaction_started | BEG:transaction_already_started
//! END:transaction_ended   | END:no_transaction_to_end
//! SUB:<key>:key_subscribed
//! GET:<key>:<value>       | GET:<key>:key_nonexistent
//! PUT:<key>:<value>
//! DEL:<key>:key_deleted   | DEL:<key>:key_nonexistent
//! <CMD>:<key>:capacity_exceeded
//! ERROR:<reason>
//! ```
//!
//! ## Push
//! `PUB:<key>:<value>` is sent to every subscriber of a key after a PUT.

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Notification, Response};
pub use codec::{
    encode_command, parse_line, read_command, read_line, write_command, write_line,
    write_response, MAX_COMMAND_LEN, MAX_LINE_LEN, MAX_TOKEN_LEN,
};
