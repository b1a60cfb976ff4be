//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::Receiver;

use crate::engine::Engine;
use crate::error::{KvError, Result};
use crate::protocol::{read_command, write_line, Response};
use crate::session::{self, Session};

/// Handles a single client connection
///
/// Dropping the connection tears the session down: the gate is released if
/// this connection still owns it, its subscriptions are removed, queued
/// output is flushed and the socket is closed. This runs on every exit path,
/// including unwinding.
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// Handle kept for shutting the socket down on drop
    stream: TcpStream,

    /// Thread draining the session's outbox into the socket
    writer: Option<JoinHandle<()>>,

    /// Reference to the shared engine
    engine: Arc<Engine>,

    /// Dispatcher state; taken on drop
    session: Option<Session>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Opens a session on the engine and starts the writer thread.
    pub fn new(stream: TcpStream, engine: Arc<Engine>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream.try_clone()?;

        let (outbox, pending) = session::outbox();
        let session = engine.open_session(outbox);

        let writer_peer = peer_addr.clone();
        let writer = thread::Builder::new()
            .name(format!("{}-writer", session.id()))
            .spawn(move || pump_outbox(BufWriter::new(write_stream), pending, writer_peer))?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            stream,
            writer: Some(writer),
            engine,
            session: Some(session),
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves reads without a timeout)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.stream
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.stream
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads commands in a loop and queues one response per command.
    /// Returns on QUIT, when the client disconnects, or on an error.
    pub fn handle(&mut self) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        tracing::debug!("Connection {} established from {}", session.id(), self.peer_addr);

        loop {
            let command = match read_command(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(KvError::Protocol(reason)) => {
                    tracing::debug!("Malformed request from {}: {}", self.peer_addr, reason);
                    if session.outbox().send(Response::Error(reason).to_string()).is_err() {
                        return Ok(());
                    }
                    continue;
                }
                Err(e) if e.is_disconnect() => {
                    tracing::debug!("Client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Err(KvError::LineTooLong { limit }) => {
                    tracing::debug!("Request from {} exceeds {} bytes", self.peer_addr, limit);
                    if session
                        .outbox()
                        .send(Response::error("line_too_long").to_string())
                        .is_err()
                    {
                        return Ok(());
                    }
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            tracing::trace!("Received command from {}: {:?}", self.peer_addr, command);

            let Some(response) = self.engine.execute(session, command) else {
                tracing::debug!("Client {} quit", self.peer_addr);
                return Ok(());
            };

            // The writer only goes away after a failed write, i.e. the peer is gone
            if session.outbox().send(response.to_string()).is_err() {
                tracing::debug!(
                    "Client {} disconnected before response could be sent",
                    self.peer_addr
                );
                return Ok(());
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.engine.close_session(session);
        }

        // Every outbox sender is gone now, so the writer drains and exits
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                tracing::warn!("Writer thread for {} panicked", self.peer_addr);
            }
        }

        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

/// Drain an outbox into the socket until every sender is dropped
///
/// Flushes whenever the queue runs dry. Stops at the first failed write,
/// which disconnects the outbox for all remaining senders.
fn pump_outbox(mut writer: BufWriter<TcpStream>, pending: Receiver<String>, peer_addr: String) {
    for line in pending.iter() {
        let mut result = write_line(&mut writer, &line);
        if result.is_ok() && pending.is_empty() {
            result = writer.flush().map_err(KvError::from);
        }
        if let Err(e) = result {
            tracing::debug!("Write to {} failed: {}", peer_addr, e);
            return;
        }
    }

    if let Err(e) = writer.flush() {
        tracing::debug!("Final flush to {} failed: {}", peer_addr, e);
    }
}
