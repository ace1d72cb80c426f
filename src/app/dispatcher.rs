//! Single-shot HTTP GET over a fresh byte stream.
//!
//! One call = one connection = one request. The stream lives inside a
//! [`StreamGuard`] for the whole call, so it is closed on every exit path,
//! including parse failures and timeouts.
//!
//! | What happened                               | Outcome          |
//! |---------------------------------------------|------------------|
//! | open / write / read error                   | `TransportError` |
//! | stream closed before a full status line     | `ProtocolError`  |
//! | status line malformed or too long           | `ProtocolError`  |
//! | budget elapsed before a full status line    | `Timeout`        |
//! | status line parsed                          | `Success(code)`  |

use log::{debug, info, warn};

use crate::http::{self, RequestBuf, STATUS_LINE_CAP};

use super::events::{RequestOutcome, RequestStatus};
use super::ports::{ByteStream, Clock, ReadStatus, StreamPort};

/// Owns an open stream and closes it on drop.
struct StreamGuard<S: ByteStream>(S);

impl<S: ByteStream> Drop for StreamGuard<S> {
    fn drop(&mut self) {
        self.0.close();
    }
}

pub struct RequestDispatcher<T> {
    transport: T,
    port: u16,
}

impl<T: StreamPort> RequestDispatcher<T> {
    pub fn new(transport: T, port: u16) -> Self {
        Self { transport, port }
    }

    /// Send `GET {path}` to `host` and classify what comes back.
    ///
    /// `budget_ms` covers connect, write, and waiting for the status line.
    pub fn send_request(
        &mut self,
        clock: &mut impl Clock,
        host: &str,
        path: &str,
        http_version: &str,
        budget_ms: u64,
    ) -> RequestOutcome {
        let started = clock.now_ms();

        let mut request = RequestBuf::new();
        if http::write_request(&mut request, host, path, http_version).is_err() {
            warn!("Dispatch: request for '{}' does not fit the buffer", path);
            return RequestOutcome::failed(RequestStatus::ProtocolError);
        }

        let stream = match self.transport.open(host, self.port, budget_ms) {
            Ok(s) => s,
            Err(e) => {
                warn!("Dispatch: open {}:{} failed: {}", host, self.port, e);
                return RequestOutcome::failed(RequestStatus::TransportError);
            }
        };
        let mut stream = StreamGuard(stream);
        debug!("Dispatch: connected to {}:{}", host, self.port);

        if let Err(status) = write_all(&mut stream.0, request.as_bytes()) {
            return RequestOutcome::failed(status);
        }

        let deadline = started.saturating_add(budget_ms);
        let outcome = read_status_line(&mut stream.0, &*clock, deadline);
        info!(
            "Dispatch: GET {} -> {:?} {:?} in {}ms",
            path,
            outcome.status,
            outcome.http_status,
            clock.now_ms().saturating_sub(started)
        );
        outcome
    }
}

fn write_all(stream: &mut impl ByteStream, mut data: &[u8]) -> Result<(), RequestStatus> {
    while !data.is_empty() {
        match stream.write(data) {
            Ok(0) => {
                warn!("Dispatch: peer stopped accepting data");
                return Err(RequestStatus::TransportError);
            }
            Ok(n) => data = &data[n.min(data.len())..],
            Err(e) => {
                warn!("Dispatch: {}", e);
                return Err(RequestStatus::TransportError);
            }
        }
    }
    Ok(())
}

fn read_status_line(stream: &mut impl ByteStream, clock: &impl Clock, deadline_ms: u64) -> RequestOutcome {
    let mut line: heapless::Vec<u8, STATUS_LINE_CAP> = heapless::Vec::new();
    let mut chunk = [0u8; 64];

    loop {
        let remaining = deadline_ms.saturating_sub(clock.now_ms());
        if remaining == 0 {
            warn!("Dispatch: no status line before deadline");
            return RequestOutcome::failed(RequestStatus::Timeout);
        }

        // Never read past the status line we have room for.
        let room = (STATUS_LINE_CAP - line.len()).min(chunk.len());
        match stream.read(&mut chunk[..room], remaining) {
            Ok(ReadStatus::Data(n)) => {
                // `room` bytes always fit.
                let _ = line.extend_from_slice(&chunk[..n.min(room)]);
                if let Some(end) = http::line_end(&line) {
                    return match http::parse_status_line(&line[..end]) {
                        Ok(status) => RequestOutcome::success(status.code),
                        Err(e) => {
                            warn!("Dispatch: malformed status line ({})", e);
                            RequestOutcome::failed(RequestStatus::ProtocolError)
                        }
                    };
                }
                if line.is_full() {
                    warn!("Dispatch: status line longer than {} bytes", STATUS_LINE_CAP);
                    return RequestOutcome::failed(RequestStatus::ProtocolError);
                }
            }
            Ok(ReadStatus::Eof) => {
                warn!("Dispatch: stream closed after {} bytes, no status line", line.len());
                return RequestOutcome::failed(RequestStatus::ProtocolError);
            }
            Ok(ReadStatus::TimedOut) => {
                if clock.now_ms() >= deadline_ms {
                    warn!("Dispatch: no status line before deadline");
                    return RequestOutcome::failed(RequestStatus::Timeout);
                }
            }
            Err(e) => {
                warn!("Dispatch: {}", e);
                return RequestOutcome::failed(RequestStatus::TransportError);
            }
        }
    }
}
