//! Blocking line client
//!
//! Used by the CLI and by tests. Responses and `PUB` pushes arrive on the same
//! stream, so a subscribed client may read a push where it expected a
//! response.

use std::io::{BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{KvError, Result};
use crate::protocol::{read_line, write_command, write_line, Command};

/// A connection to a gatekv server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        })
    }

    /// Send a raw request line
    pub fn send(&mut self, line: &str) -> Result<()> {
        write_line(&mut self.writer, line)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Send a command
    pub fn send_command(&mut self, command: &Command) -> Result<()> {
        write_command(&mut self.writer, command)
    }

    /// Read the next line from the server; `None` once the server closed
    pub fn read_line(&mut self) -> Result<Option<String>> {
        read_line(&mut self.reader)
    }

    /// Send a request line and wait for the next line back
    pub fn request(&mut self, line: &str) -> Result<String> {
        self.send(line)?;
        self.read_line()?
            .ok_or_else(|| KvError::Network("server closed the connection".to_string()))
    }

    /// Send a command and wait for the next line back
    pub fn execute(&mut self, command: &Command) -> Result<String> {
        self.send_command(command)?;
        self.read_line()?
            .ok_or_else(|| KvError::Network("server closed the connection".to_string()))
    }

    /// Bound how long reads wait (`None` waits forever)
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        Ok(())
    }

    /// Split off a handle for reading on another thread
    pub fn try_clone_reader(&self) -> Result<BufReader<TcpStream>> {
        Ok(BufReader::new(self.reader.get_ref().try_clone()?))
    }
}
