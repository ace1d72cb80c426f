//! Log-based outcome sink adapter.
//!
//! Implements [`OutcomeSink`] by writing one line per press to the
//! ESP-IDF logger (UART / USB-CDC in production). Anything that is not a
//! 2xx answer is logged at warn level.

use log::{info, warn};

use crate::app::events::{PressOutcome, RequestStatus};
use crate::app::ports::OutcomeSink;

/// Adapter that logs every [`PressOutcome`] to the serial console.
#[derive(Debug, Default)]
pub struct LogOutcomeSink {
    reported: u32,
}

impl LogOutcomeSink {
    pub fn new() -> Self {
        Self { reported: 0 }
    }

    /// Outcomes written since boot.
    pub fn reported(&self) -> u32 {
        self.reported
    }
}

impl OutcomeSink for LogOutcomeSink {
    fn report(&mut self, outcome: &PressOutcome) {
        self.reported = self.reported.wrapping_add(1);
        let n = self.reported;
        match outcome {
            PressOutcome::LinkFailed(e) => {
                warn!("PRESS #{} | link failed: {}", n, e);
            }
            PressOutcome::Request(r) => match (r.status, r.http_status) {
                (RequestStatus::Success, Some(code)) if r.is_http_ok() => {
                    info!("PRESS #{} | delivered | HTTP {}", n, code);
                }
                (RequestStatus::Success, Some(code)) => {
                    warn!("PRESS #{} | server answered HTTP {}", n, code);
                }
                (status, _) => {
                    warn!("PRESS #{} | request failed: {:?}", n, status);
                }
            },
        }
    }
}
