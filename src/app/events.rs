//! Outbound results of a press.
//!
//! The [`ButtonController`](super::service::ButtonController) hands one
//! [`PressOutcome`] per press to the [`OutcomeSink`](super::ports::OutcomeSink)
//! port. Adapters on the other side decide what to do with it: log it,
//! blink the status LED, or both.

use crate::error::LinkError;

/// How a single dispatch attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// A well-formed status line came back (any status code).
    Success,
    /// The stream could not be opened, written, or read.
    TransportError,
    /// Bytes came back but no valid status line.
    ProtocolError,
    /// No complete status line within the budget.
    Timeout,
}

/// Result of one [`RequestDispatcher::send_request`](super::dispatcher::RequestDispatcher::send_request).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    pub status: RequestStatus,
    /// Present only when `status` is [`RequestStatus::Success`].
    pub http_status: Option<u16>,
}

impl RequestOutcome {
    pub const fn success(code: u16) -> Self {
        Self { status: RequestStatus::Success, http_status: Some(code) }
    }

    pub const fn failed(status: RequestStatus) -> Self {
        Self { status, http_status: None }
    }

    pub fn is_success(&self) -> bool {
        self.status == RequestStatus::Success
    }

    /// Success with a 2xx code. Deciding what a 4xx/5xx means is left to
    /// whoever consumes the outcome.
    pub fn is_http_ok(&self) -> bool {
        matches!(self.http_status, Some(200..=299))
    }
}

/// Combined result of one press, reported exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// The link could not be brought up; no request was sent.
    LinkFailed(LinkError),
    /// The link was up and a request was attempted.
    Request(RequestOutcome),
}

impl PressOutcome {
    /// The remote service answered with a 2xx.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Request(r) if r.is_http_ok())
    }
}
