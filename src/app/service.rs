//! Button controller, the hexagonal core.
//!
//! [`ButtonController`] owns the debouncer, the link manager, and the
//! request dispatcher. The main loop calls [`on_tick`](ButtonController::on_tick)
//! at the sampling cadence; everything else happens inside that call.
//!
//! ```text
//!  PinPort ──▶ ┌──────────────────────────────────┐ ──▶ OutcomeSink
//!              │          ButtonController        │
//!   LinkPort ◀─│  Debouncer · LinkManager ·       │
//! StreamPort ◀─│  RequestDispatcher               │
//!              └──────────────────────────────────┘
//! ```
//!
//! A press is handled synchronously: join (if needed), then one GET. The
//! tick that sees the press blocks for at most
//! `link_timeout_ms + request_timeout_ms`. Releases are ignored. Failed
//! presses are never retried; the next press is the retry.

use log::{info, warn};

use crate::config::ButtonConfig;
use crate::drivers::button::{Debouncer, PressKind};

use super::dispatcher::RequestDispatcher;
use super::events::PressOutcome;
use super::link::{LinkManager, LinkState};
use super::ports::{Clock, LinkPort, OutcomeSink, PinPort, StreamPort};

pub struct ButtonController<'c, L, T> {
    config: &'c ButtonConfig,
    debouncer: Debouncer,
    link: LinkManager<'c, L>,
    dispatcher: RequestDispatcher<T>,
    presses: u32,
}

impl<'c, L: LinkPort, T: StreamPort> ButtonController<'c, L, T> {
    /// Construct the controller from an already validated configuration.
    pub fn new(config: &'c ButtonConfig, link_driver: L, transport: T) -> Self {
        Self {
            config,
            debouncer: Debouncer::new(config.debounce_ms, config.pressed_level()),
            link: LinkManager::new(config, link_driver),
            dispatcher: RequestDispatcher::new(transport, config.port),
            presses: 0,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one sampling tick: read pin → debounce → (on press) link → request.
    ///
    /// Returns the outcome when this tick handled a press; the same value
    /// has already been handed to `sink`.
    pub fn on_tick(
        &mut self,
        now_ms: u64,
        pin: &mut impl PinPort,
        clock: &mut impl Clock,
        sink: &mut impl OutcomeSink,
    ) -> Option<PressOutcome> {
        self.link.supervise();

        let event = self.debouncer.sample(pin.read_pin(), now_ms)?;
        if event.kind == PressKind::Released {
            return None;
        }

        self.presses = self.presses.wrapping_add(1);
        info!("Button: press #{} at {}ms", self.presses, event.at_ms);

        let outcome = self.handle_press(clock);
        sink.report(&outcome);
        Some(outcome)
    }

    fn handle_press(&mut self, clock: &mut impl Clock) -> PressOutcome {
        let cfg = self.config;

        if let Err(e) = self.link.ensure_connected(clock, cfg.link_timeout_ms as u64) {
            return PressOutcome::LinkFailed(e);
        }

        let outcome = self.dispatcher.send_request(
            clock,
            &cfg.host,
            &cfg.path,
            &cfg.http_version,
            cfg.request_timeout_ms as u64,
        );
        if !outcome.is_success() {
            // Start the next press from a fresh association.
            warn!("Button: request failed ({:?}), dropping link", outcome.status);
            self.link.mark_disconnected();
        }
        PressOutcome::Request(outcome)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current association state.
    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Debounced button state.
    pub fn is_pressed(&self) -> bool {
        self.debouncer.is_pressed()
    }

    /// Presses handled since boot.
    pub fn press_count(&self) -> u32 {
        self.presses
    }
}
