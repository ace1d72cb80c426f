//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ButtonController (domain)
//! ```
//!
//! Driven adapters (GPIO, WiFi driver, TCP stack, clock, status sinks)
//! implement these traits. The [`ButtonController`](super::service::ButtonController)
//! and the components it owns consume them via generics, so the domain
//! core never touches hardware directly and runs unchanged against the
//! mocks in `tests/integration/mock_hw.rs`.

use embedded_hal::delay::DelayNs;

use crate::error::{LinkError, TransportError};

use super::events::PressOutcome;

// ───────────────────────────────────────────────────────────────
// Pin port (driven adapter: GPIO → domain)
// ───────────────────────────────────────────────────────────────

/// Instantaneous read of the button pin.
pub trait PinPort {
    /// Raw electrical level, `true` = HIGH. Polarity is resolved by the
    /// debouncer, not here.
    fn read_pin(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: domain ↔ WiFi station driver)
// ───────────────────────────────────────────────────────────────

/// What the WiFi driver reports about the association.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Not associated and no join in progress.
    Down,
    /// A join was issued and has not settled yet.
    Joining,
    /// Associated with an IP address; sockets can be opened.
    Up,
    /// The join failed terminally (bad credentials, AP not found).
    Rejected,
}

/// Link-layer join primitive.
pub trait LinkPort {
    /// Start associating. Returns once the request is issued; the outcome
    /// is observed through [`status`](Self::status). An `Err` here means
    /// the driver refused the request outright.
    fn join(&mut self, ssid: &str, passphrase: &str) -> Result<(), LinkError>;

    /// Current driver-side view of the association.
    fn status(&mut self) -> LinkStatus;

    /// Tear down the association or abort a pending join.
    fn disconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Stream ports (driven adapter: domain ↔ TCP stack)
// ───────────────────────────────────────────────────────────────

/// Result of a single bounded read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// `n` bytes were written into the caller's buffer (`n > 0`).
    Data(usize),
    /// The peer closed the stream.
    Eof,
    /// Nothing arrived within the timeout.
    TimedOut,
}

/// An open, exclusively owned byte stream.
pub trait ByteStream {
    /// Write some of `data`; returns how many bytes were accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    /// Wait at most `timeout_ms` for bytes.
    fn read(&mut self, buf: &mut [u8], timeout_ms: u64) -> Result<ReadStatus, TransportError>;

    /// Release the stream. Must be safe to call more than once.
    fn close(&mut self);
}

/// Opens byte streams to `host:port`.
pub trait StreamPort {
    type Stream: ByteStream;

    /// Connect, waiting at most `timeout_ms`.
    fn open(&mut self, host: &str, port: u16, timeout_ms: u64) -> Result<Self::Stream, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock that can also block for a while.
///
/// Every bounded wait in the domain (join polling, read deadlines) is
/// measured against this clock so tests can run on simulated time.
pub trait Clock: DelayNs {
    /// Milliseconds since boot. Never goes backwards.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Outcome sink (driven adapter: domain → LED / log)
// ───────────────────────────────────────────────────────────────

/// Receives exactly one [`PressOutcome`] per handled press.
pub trait OutcomeSink {
    fn report(&mut self, outcome: &PressOutcome);
}

/// Fan an outcome out to two sinks (e.g. the log and the status LED).
impl<A: OutcomeSink, B: OutcomeSink> OutcomeSink for (A, B) {
    fn report(&mut self, outcome: &PressOutcome) {
        self.0.report(outcome);
        self.1.report(outcome);
    }
}

impl<T: OutcomeSink + ?Sized> OutcomeSink for &mut T {
    fn report(&mut self, outcome: &PressOutcome) {
        (**self).report(outcome);
    }
}
