//! Single-colour status LED driver.
//!
//! Shows the result of the most recent press as a short blink pattern.
//! The driver is an [`OutcomeSink`]: the controller reports the outcome,
//! and the main loop calls [`StatusLed::tick`] every sampling tick to
//! advance the pattern.
//!
//! | Outcome                    | Pattern     | Rate   | Shown for |
//! |----------------------------|-------------|--------|-----------|
//! | Delivered (2xx)            | Solid       | n/a    | 1 s       |
//! | Server answered non-2xx    | DoubleBlink | 1 Hz   | 2 s       |
//! | Request failed             | FastBlink   | 4 Hz   | 2 s       |
//! | Link failed                | RapidFlash  | 8 Hz   | 2 s       |
//!
//! A new outcome replaces whatever is showing and restarts the phase.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::events::PressOutcome;
use crate::app::ports::OutcomeSink;

const SHOW_DELIVERED_MS: u32 = 1_000;
const SHOW_FAILURE_MS: u32 = 2_000;

/// Pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPattern {
    Off,
    Solid,
    DoubleBlink,
    FastBlink,
    RapidFlash,
}

impl BlinkPattern {
    /// Pattern and display time for a press outcome.
    pub fn for_outcome(outcome: &PressOutcome) -> (Self, u32) {
        match outcome {
            PressOutcome::LinkFailed(_) => (Self::RapidFlash, SHOW_FAILURE_MS),
            PressOutcome::Request(r) if r.is_http_ok() => (Self::Solid, SHOW_DELIVERED_MS),
            PressOutcome::Request(r) if r.is_success() => (Self::DoubleBlink, SHOW_FAILURE_MS),
            PressOutcome::Request(_) => (Self::FastBlink, SHOW_FAILURE_MS),
        }
    }

    /// Whether the LED is lit `phase_ms` into the pattern.
    pub fn is_lit(self, phase_ms: u32) -> bool {
        match self {
            Self::Off => false,
            Self::Solid => true,
            Self::DoubleBlink => {
                let cycle = phase_ms % 1000;
                cycle < 100 || (200..300).contains(&cycle)
            }
            Self::FastBlink => (phase_ms % 250) < 125,
            Self::RapidFlash => (phase_ms % 125) < 63,
        }
    }
}

pub struct StatusLed<P> {
    pin: P,
    pattern: BlinkPattern,
    duration_ms: u32,
    /// Set on the first tick after a report.
    started_ms: Option<u64>,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Take the pin and drive it low.
    pub fn new(mut pin: P) -> Self {
        if let Err(e) = pin.set_low() {
            warn!("LED: initial set_low failed: {:?}", e);
        }
        Self {
            pin,
            pattern: BlinkPattern::Off,
            duration_ms: 0,
            started_ms: None,
            lit: false,
        }
    }

    pub fn pattern(&self) -> BlinkPattern {
        self.pattern
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Advance the active pattern and drive the pin if its level changed.
    pub fn tick(&mut self, now_ms: u64) {
        let started = *self.started_ms.get_or_insert(now_ms);
        let phase = now_ms.saturating_sub(started);
        if self.pattern != BlinkPattern::Off && phase >= self.duration_ms as u64 {
            self.pattern = BlinkPattern::Off;
        }

        let lit = self.pattern.is_lit(phase as u32);
        if lit != self.lit {
            self.set(lit);
        }
    }

    fn set(&mut self, lit: bool) {
        let res = if lit { self.pin.set_high() } else { self.pin.set_low() };
        match res {
            Ok(()) => self.lit = lit,
            Err(e) => warn!("LED: pin write failed: {:?}", e),
        }
    }
}

impl<P: OutputPin> OutcomeSink for StatusLed<P> {
    fn report(&mut self, outcome: &PressOutcome) {
        let (pattern, duration_ms) = BlinkPattern::for_outcome(outcome);
        self.pattern = pattern;
        self.duration_ms = duration_ms;
        self.started_ms = None;
    }
}
