//! Codec Tests
//!
//! Tests for line parsing, framing and response formatting.

use std::io::Cursor;

use gatekv::protocol::{
    encode_command, parse_line, read_command, read_line, write_response, Command, CommandType,
    Notification, Response, MAX_LINE_LEN, MAX_TOKEN_LEN,
};
use gatekv::KvError;

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parse_each_command() {
    assert_eq!(parse_line("BEG").unwrap(), Command::Begin);
    assert_eq!(parse_line("END").unwrap(), Command::End);
    assert_eq!(parse_line("QUIT").unwrap(), Command::Quit);
    assert_eq!(
        parse_line("SUB a").unwrap(),
        Command::Subscribe { key: "a".to_string() }
    );
    assert_eq!(parse_line("GET a").unwrap(), Command::Get { key: "a".to_string() });
    assert_eq!(parse_line("DEL a").unwrap(), Command::Delete { key: "a".to_string() });
    assert_eq!(
        parse_line("PUT a 1").unwrap(),
        Command::Put { key: "a".to_string(), value: "1".to_string() }
    );
}

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!(parse_line("beg").unwrap(), Command::Begin);
    assert_eq!(
        parse_line("pUt K V").unwrap(),
        Command::Put { key: "K".to_string(), value: "V".to_string() }
    );
}

#[test]
fn test_keys_and_values_keep_their_case() {
    assert_eq!(
        parse_line("put Key Value").unwrap(),
        Command::Put { key: "Key".to_string(), value: "Value".to_string() }
    );
}

#[test]
fn test_missing_arguments_become_empty() {
    assert_eq!(parse_line("GET").unwrap(), Command::Get { key: String::new() });
    assert_eq!(
        parse_line("PUT k").unwrap(),
        Command::Put { key: "k".to_string(), value: String::new() }
    );
    assert_eq!(
        parse_line("PUT").unwrap(),
        Command::Put { key: String::new(), value: String::new() }
    );
}

#[test]
fn test_extra_tokens_are_ignored() {
    assert_eq!(
        parse_line("PUT k v extra tokens").unwrap(),
        Command::Put { key: "k".to_string(), value: "v".to_string() }
    );
    assert_eq!(parse_line("BEG now please").unwrap(), Command::Begin);
}

#[test]
fn test_whitespace_is_collapsed() {
    assert_eq!(
        parse_line("  PUT\tk   v  ").unwrap(),
        Command::Put { key: "k".to_string(), value: "v".to_string() }
    );
}

#[test]
fn test_unknown_command() {
    assert_eq!(
        parse_line("SET a 1").unwrap(),
        Command::Unknown { verb: "SET".to_string() }
    );
}

#[test]
fn test_overlong_command_token_is_unknown() {
    let verb = "G".repeat(16);
    assert!(matches!(parse_line(&verb).unwrap(), Command::Unknown { .. }));
}

#[test]
fn test_empty_line_is_rejected() {
    match parse_line("   ") {
        Err(KvError::Protocol(reason)) => assert_eq!(reason, "empty_command"),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_token_length_limits() {
    let max = "k".repeat(MAX_TOKEN_LEN);
    let over = "k".repeat(MAX_TOKEN_LEN + 1);

    assert!(parse_line(&format!("GET {}", max)).is_ok());
    assert!(parse_line(&format!("PUT {} {}", max, max)).is_ok());

    match parse_line(&format!("GET {}", over)) {
        Err(KvError::Protocol(reason)) => assert_eq!(reason, "key_too_long"),
        other => panic!("Expected protocol error, got {:?}", other),
    }
    match parse_line(&format!("PUT k {}", over)) {
        Err(KvError::Protocol(reason)) => assert_eq!(reason, "value_too_long"),
        other => panic!("Expected protocol error, got {:?}", other),
    }
}

#[test]
fn test_command_type_tokens() {
    assert_eq!(CommandType::from_token("del"), Some(CommandType::Delete));
    assert_eq!(CommandType::from_token("DELETE"), None);
    assert_eq!(CommandType::Subscribe.as_str(), "SUB");
    assert!(Command::Get { key: String::new() }.is_gated());
    assert!(!Command::Subscribe { key: String::new() }.is_gated());
    assert!(!Command::Begin.is_gated());
}

#[test]
fn test_encode_command_parses_back() {
    let cmd = Command::Put { key: "a".to_string(), value: "1".to_string() };
    assert_eq!(encode_command(&cmd), "PUT a 1");
    assert_eq!(parse_line(&encode_command(&cmd)).unwrap(), cmd);
}

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_read_line_strips_newlines() {
    let mut cursor = Cursor::new(b"GET a\r\nPUT b 2\n".to_vec());

    assert_eq!(read_line(&mut cursor).unwrap(), Some("GET a".to_string()));
    assert_eq!(read_line(&mut cursor).unwrap(), Some("PUT b 2".to_string()));
    assert_eq!(read_line(&mut cursor).unwrap(), None);
}

#[test]
fn test_read_line_accepts_unterminated_last_line() {
    let mut cursor = Cursor::new(b"QUIT".to_vec());

    assert_eq!(read_line(&mut cursor).unwrap(), Some("QUIT".to_string()));
    assert_eq!(read_line(&mut cursor).unwrap(), None);
}

#[test]
fn test_read_line_rejects_overlong_line() {
    let mut bytes = vec![b'x'; MAX_LINE_LEN + 10];
    bytes.extend_from_slice(b"\nGET a\n");
    let mut cursor = Cursor::new(bytes);

    assert!(matches!(
        read_line(&mut cursor),
        Err(KvError::LineTooLong { limit: MAX_LINE_LEN })
    ));
    // The rest of the oversized line is skipped
    assert_eq!(read_line(&mut cursor).unwrap(), Some("GET a".to_string()));
}

#[test]
fn test_read_line_rejects_invalid_utf8() {
    let mut cursor = Cursor::new(b"GET \xff\nGET a\n".to_vec());

    match read_line(&mut cursor) {
        Err(KvError::Protocol(reason)) => assert_eq!(reason, "invalid_encoding"),
        other => panic!("Expected invalid_encoding, got {:?}", other),
    }
    assert_eq!(read_line(&mut cursor).unwrap(), Some("GET a".to_string()));
}

#[test]
fn test_read_line_accepts_line_at_limit() {
    let mut bytes = vec![b'x'; MAX_LINE_LEN];
    bytes.push(b'\n');
    let mut cursor = Cursor::new(bytes);

    assert_eq!(read_line(&mut cursor).unwrap().unwrap().len(), MAX_LINE_LEN);
}

#[test]
fn test_read_command_eof() {
    let mut cursor = Cursor::new(Vec::new());

    match read_command(&mut cursor) {
        Err(e) => assert!(e.is_disconnect()),
        Ok(cmd) => panic!("Expected EOF, got {:?}", cmd),
    }
}

// =============================================================================
// Response Formatting Tests
// =============================================================================

#[test]
fn test_response_lines() {
    let key = || "a".to_string();

    assert_eq!(Response::TransactionStarted.to_string(), "BEG:transaction_started");
    assert_eq!(
        Response::TransactionAlreadyStarted.to_string(),
        "BEG:transaction_already_started"
    );
    assert_eq!(Response::TransactionEnded.to_string(), "END:transaction_ended");
    assert_eq!(Response::NoTransactionToEnd.to_string(), "END:no_transaction_to_end");
    assert_eq!(Response::Subscribed { key: key() }.to_string(), "SUB:a:key_subscribed");
    assert_eq!(
        Response::Value { key: key(), value: Some("1".to_string()) }.to_string(),
        "GET:a:1"
    );
    assert_eq!(
        Response::Value { key: key(), value: None }.to_string(),
        "GET:a:key_nonexistent"
    );
    assert_eq!(
        Response::Stored { key: key(), value: "1".to_string() }.to_string(),
        "PUT:a:1"
    );
    assert_eq!(Response::Deleted { key: key(), existed: true }.to_string(), "DEL:a:key_deleted");
    assert_eq!(
        Response::Deleted { key: key(), existed: false }.to_string(),
        "DEL:a:key_nonexistent"
    );
    assert_eq!(
        Response::CapacityExceeded { command: "PUT", key: key() }.to_string(),
        "PUT:a:capacity_exceeded"
    );
    assert_eq!(Response::error("unknown_command").to_string(), "ERROR:unknown_command");
}

#[test]
fn test_notification_line() {
    assert_eq!(Notification::new("a", "42").to_string(), "PUB:a:42");
}

#[test]
fn test_write_response_appends_newline() {
    let mut out = Vec::new();

    write_response(&mut out, &Response::TransactionEnded).unwrap();

    assert_eq!(out, b"END:transaction_ended\n");
}
