//! Polled button debouncer.
//!
//! ## Hardware
//!
//! Momentary switch read through any `embedded-hal` input pin. The main
//! loop samples the pin every `tick_interval_ms` and feeds the raw level
//! to [`Debouncer::sample`], which runs the stabilisation state machine.
//!
//! ## Debounce rule
//!
//! | Raw input                                  | Result                     |
//! |--------------------------------------------|----------------------------|
//! | Level differs from candidate               | New candidate, window restarts |
//! | Candidate differs from stable for ≥ window | Stable flips, event emitted |
//! | Candidate equals stable                    | Nothing                    |
//!
//! Chatter inside one window collapses to whatever level is present when
//! the window finally expires, so a bouncy press yields one `Pressed`.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::PinPort;

/// Debounced edge kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    Pressed,
    Released,
}

/// A debounced edge, stamped with the tick that confirmed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressEvent {
    pub kind: PressKind,
    pub at_ms: u64,
}

pub struct Debouncer {
    window_ms: u64,
    pressed_level: bool,
    stable: bool,
    candidate: bool,
    candidate_since_ms: u64,
}

impl Debouncer {
    /// `pressed_level` is the raw level that means "pressed". The button
    /// is assumed released at boot.
    pub fn new(window_ms: u32, pressed_level: bool) -> Self {
        Self {
            window_ms: window_ms as u64,
            pressed_level,
            stable: !pressed_level,
            candidate: !pressed_level,
            candidate_since_ms: 0,
        }
    }

    /// Debounced state.
    pub fn is_pressed(&self) -> bool {
        self.stable == self.pressed_level
    }

    /// Call from the main loop at each sampling tick.
    /// Returns an edge once a new level has held for the whole window.
    pub fn sample(&mut self, raw_level: bool, now_ms: u64) -> Option<PressEvent> {
        if raw_level != self.candidate {
            self.candidate = raw_level;
            self.candidate_since_ms = now_ms;
        }

        if self.candidate == self.stable {
            return None;
        }
        if now_ms.saturating_sub(self.candidate_since_ms) < self.window_ms {
            return None;
        }

        self.stable = self.candidate;
        let kind = if self.stable == self.pressed_level {
            PressKind::Pressed
        } else {
            PressKind::Released
        };
        Some(PressEvent { kind, at_ms: now_ms })
    }
}

// ───────────────────────────────────────────────────────────────
// Pin adapter
// ───────────────────────────────────────────────────────────────

/// Wraps an `embedded-hal` input as a [`PinPort`].
///
/// A failed read repeats the last good level, which the debouncer sees
/// as "no change".
pub struct ButtonPin<P> {
    pin: P,
    last_level: bool,
}

impl<P: InputPin> ButtonPin<P> {
    /// `idle_level` is what the pin reads while released.
    pub fn new(pin: P, idle_level: bool) -> Self {
        Self { pin, last_level: idle_level }
    }
}

impl<P: InputPin> PinPort for ButtonPin<P> {
    fn read_pin(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => self.last_level = level,
            Err(e) => warn!("Button: pin read failed ({:?}), holding last level", e),
        }
        self.last_level
    }
}
