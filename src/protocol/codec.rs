//! Protocol codec
//!
//! Line framing plus parsing/encoding of commands.
//!
//! ## Wire Format
//!
//! ```text
//! <CMD> [<key> [<value>]]\n
//! ```
//!
//! Tokens are separated by ASCII whitespace. Tokens past the value are
//! ignored, missing ones are empty strings, and a trailing `\r` is stripped.

use std::io::{BufRead, Read, Write};

use super::{Command, CommandType, Response};
use crate::error::{KvError, Result};

/// Longest accepted command token; longer tokens never match a command
pub const MAX_COMMAND_LEN: usize = 15;

/// Longest accepted key or value token
pub const MAX_TOKEN_LEN: usize = 127;

/// Longest accepted request line, excluding the newline
pub const MAX_LINE_LEN: usize = 1024;

// =============================================================================
// Command Parsing/Encoding
// =============================================================================

/// Parse one request line into a command
///
/// Unknown verbs are not an error here; they come back as
/// [`Command::Unknown`] so the caller can answer them. Oversized key or value
/// tokens are rejected with a [`KvError::Protocol`] naming the offending token.
pub fn parse_line(line: &str) -> Result<Command> {
    let mut tokens = line.split_ascii_whitespace();

    let verb = tokens
        .next()
        .ok_or_else(|| KvError::Protocol("empty_command".to_string()))?;
    let key = tokens.next().unwrap_or("");
    let value = tokens.next().unwrap_or("");

    let command_type = if verb.len() <= MAX_COMMAND_LEN {
        CommandType::from_token(verb)
    } else {
        None
    };

    let Some(command_type) = command_type else {
        return Ok(Command::Unknown {
            verb: verb.to_string(),
        });
    };

    let command = match command_type {
        CommandType::Begin => Command::Begin,
        CommandType::End => Command::End,
        CommandType::Quit => Command::Quit,
        CommandType::Subscribe => Command::Subscribe {
            key: checked_key(key)?,
        },
        CommandType::Get => Command::Get {
            key: checked_key(key)?,
        },
        CommandType::Delete => Command::Delete {
            key: checked_key(key)?,
        },
        CommandType::Put => Command::Put {
            key: checked_key(key)?,
            value: checked_value(value)?,
        },
    };

    Ok(command)
}

fn checked_key(key: &str) -> Result<String> {
    if key.len() > MAX_TOKEN_LEN {
        return Err(KvError::Protocol("key_too_long".to_string()));
    }
    Ok(key.to_string())
}

fn checked_value(value: &str) -> Result<String> {
    if value.len() > MAX_TOKEN_LEN {
        return Err(KvError::Protocol("value_too_long".to_string()));
    }
    Ok(value.to_string())
}

/// Encode a command as a request line (without the newline)
pub fn encode_command(command: &Command) -> String {
    match command {
        Command::Begin => "BEG".to_string(),
        Command::End => "END".to_string(),
        Command::Quit => "QUIT".to_string(),
        Command::Subscribe { key } => format!("SUB {}", key),
        Command::Get { key } => format!("GET {}", key),
        Command::Delete { key } => format!("DEL {}", key),
        Command::Put { key, value } => format!("PUT {} {}", key, value),
        Command::Unknown { verb } => verb.clone(),
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one line from a stream
///
/// Returns `None` on a clean EOF. A final line without a newline is still
/// returned. When more than [`MAX_LINE_LEN`] bytes arrive without a newline,
/// the rest of the line is discarded and [`KvError::LineTooLong`] is returned,
/// leaving the reader at the start of the next line.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE_LEN as u64 + 1)
        .read_until(b'\n', &mut buf)?;

    if read == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.len() > MAX_LINE_LEN {
        discard_line(reader)?;
        return Err(KvError::LineTooLong {
            limit: MAX_LINE_LEN,
        });
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| KvError::Protocol("invalid_encoding".to_string()))
}

/// Skip input up to and including the next newline (or EOF)
fn discard_line<R: BufRead>(reader: &mut R) -> Result<()> {
    loop {
        let (found, used) = {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => (true, i + 1),
                None => (false, available.len()),
            }
        };
        reader.consume(used);
        if found {
            return Ok(());
        }
    }
}

/// Read a complete command from a stream
///
/// Blocks until a full line is received. EOF surfaces as an
/// `UnexpectedEof` I/O error.
pub fn read_command<R: BufRead>(reader: &mut R) -> Result<Command> {
    match read_line(reader)? {
        Some(line) => parse_line(&line),
        None => Err(KvError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "connection closed",
        ))),
    }
}

/// Write a line and its newline terminator (does not flush)
pub fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    write_line(writer, &encode_command(command))?;
    writer.flush()?;
    Ok(())
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    write_line(writer, &response.to_string())?;
    writer.flush()?;
    Ok(())
}
