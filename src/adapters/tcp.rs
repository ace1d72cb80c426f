//! TCP byte-stream adapter.
//!
//! Implements [`StreamPort`] and [`ByteStream`] on top of
//! `std::net::TcpStream`. ESP-IDF ships a std-compatible socket layer
//! (lwIP underneath), so the same code runs on the device and on the
//! host; no cfg gating is needed here.
//!
//! ## Connection model
//!
//! 1. `open()` resolves `host:port` and connects with a bounded timeout.
//! 2. Each `read()` sets the socket read timeout to the caller's remaining
//!    budget, so a silent server can never stall the main loop forever.
//! 3. `close()` shuts the socket down; dropping the stream does the same.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::app::ports::{ByteStream, ReadStatus, StreamPort};
use crate::error::TransportError;

/// Zero is not a valid socket timeout.
fn timeout(ms: u64) -> Duration {
    Duration::from_millis(ms.max(1))
}

/// What is left of `budget_ms` since `started`, or `None` once it is spent.
fn remaining(budget_ms: u64, started: Instant) -> Option<Duration> {
    Duration::from_millis(budget_ms)
        .checked_sub(started.elapsed())
        .filter(|left| !left.is_zero())
}

/// Opens plaintext TCP connections.
#[derive(Debug, Default)]
pub struct TcpTransport;

impl TcpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl StreamPort for TcpTransport {
    type Stream = TcpByteStream;

    fn open(&mut self, host: &str, port: u16, timeout_ms: u64) -> Result<TcpByteStream, TransportError> {
        let started = Instant::now();
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| {
                warn!("TCP: lookup of '{}' failed: {}", host, e);
                TransportError::Resolve
            })?
            .next()
            .ok_or(TransportError::Resolve)?;

        // Lookup time counts against the budget.
        let connect_budget = remaining(timeout_ms, started).ok_or_else(|| {
            warn!("TCP: budget spent resolving '{}'", host);
            TransportError::Connect
        })?;
        let stream = TcpStream::connect_timeout(&addr, connect_budget).map_err(|e| {
            warn!("TCP: connect to {} failed: {}", addr, e);
            TransportError::Connect
        })?;

        // The request write gets whatever the connect left over.
        let write_budget = remaining(timeout_ms, started).ok_or_else(|| {
            warn!("TCP: budget spent connecting to {}", addr);
            TransportError::Connect
        })?;
        if let Err(e) = stream.set_write_timeout(Some(write_budget)) {
            warn!("TCP: could not set write timeout: {}", e);
        }
        if let Err(e) = stream.set_nodelay(true) {
            warn!("TCP: could not set nodelay: {}", e);
        }
        debug!("TCP: connected to {}", addr);

        Ok(TcpByteStream { stream: Some(stream) })
    }
}

/// One open TCP connection.
#[derive(Debug)]
pub struct TcpByteStream {
    stream: Option<TcpStream>,
}

impl TcpByteStream {
    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

impl ByteStream for TcpByteStream {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::Write)?;
        stream.write(data).map_err(|e| {
            warn!("TCP: write failed: {}", e);
            TransportError::Write
        })
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u64) -> Result<ReadStatus, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::Read)?;
        stream
            .set_read_timeout(Some(timeout(timeout_ms)))
            .map_err(|_| TransportError::Read)?;
        match stream.read(buf) {
            Ok(0) => Ok(ReadStatus::Eof),
            Ok(n) => Ok(ReadStatus::Data(n)),
            Err(ref e)
                if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted) =>
            {
                Ok(ReadStatus::TimedOut)
            }
            Err(e) => {
                warn!("TCP: read failed: {}", e);
                Err(TransportError::Read)
            }
        }
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            debug!("TCP: closed");
        }
    }
}

impl Drop for TcpByteStream {
    fn drop(&mut self) {
        self.close();
    }
}

// ───────────────────────────────────────────────────────────────
// Tests (loopback sockets)
// ───────────────────────────────────────────────────────────────
