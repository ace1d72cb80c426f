//! WiFi association lifecycle.
//!
//! ```text
//!                 ensure_connected()
//!  Disconnected ─────────────────────▶ Connecting ──▶ Connected
//!       ▲  ▲                               │              │
//!       │  └──── retry on next press ── Failed ◀──────────┘ (never)
//!       │                                                 │
//!       └──────── link lost / request failed ◀────────────┘
//! ```
//!
//! One join per call, no internal backoff: the next physical press is
//! the retry. The join is bounded by the caller's budget, polling the
//! driver every `link_poll_interval_ms`.

use log::{debug, info, warn};

use crate::config::ButtonConfig;
use crate::error::LinkError;

use super::ports::{Clock, LinkPort, LinkStatus};

/// Association state, owned and mutated only by [`LinkManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

pub struct LinkManager<'c, L> {
    config: &'c ButtonConfig,
    driver: L,
    state: LinkState,
    joins: u32,
}

impl<'c, L: LinkPort> LinkManager<'c, L> {
    pub fn new(config: &'c ButtonConfig, driver: L) -> Self {
        Self {
            config,
            driver,
            state: LinkState::Disconnected,
            joins: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Join attempts issued since boot.
    pub fn join_count(&self) -> u32 {
        self.joins
    }

    /// Make sure the link is up, joining if needed.
    ///
    /// Returns immediately when already connected. Otherwise issues exactly
    /// one join and polls until the driver reports the link up, rejects
    /// the join, or `budget_ms` runs out.
    pub fn ensure_connected(&mut self, clock: &mut impl Clock, budget_ms: u64) -> Result<(), LinkError> {
        if self.state == LinkState::Connected {
            return Ok(());
        }

        info!("Link: joining '{}' (budget {}ms)", self.config.ssid, budget_ms);
        self.transition(LinkState::Connecting);
        self.joins = self.joins.wrapping_add(1);

        if let Err(e) = self.driver.join(&self.config.ssid, &self.config.passphrase) {
            warn!("Link: driver refused join request");
            return Err(self.fail(e));
        }

        let started = clock.now_ms();
        let poll_ms = self.config.link_poll_interval_ms;
        loop {
            match self.driver.status() {
                LinkStatus::Up => {
                    let took = clock.now_ms().saturating_sub(started);
                    info!("Link: connected after {}ms", took);
                    self.transition(LinkState::Connected);
                    return Ok(());
                }
                LinkStatus::Rejected => {
                    warn!("Link: join rejected by driver");
                    return Err(self.fail(LinkError::Refused));
                }
                LinkStatus::Down | LinkStatus::Joining => {}
            }

            let elapsed = clock.now_ms().saturating_sub(started);
            if elapsed >= budget_ms {
                warn!("Link: join timed out after {}ms", elapsed);
                return Err(self.fail(LinkError::Timeout));
            }

            let wait = (budget_ms - elapsed).min(poll_ms as u64) as u32;
            clock.delay_ms(wait);
        }
    }

    /// Check a connected link is still up. Cheap enough to call every tick.
    pub fn supervise(&mut self) {
        if self.state != LinkState::Connected {
            return;
        }
        match self.driver.status() {
            LinkStatus::Up => {}
            status => {
                warn!("Link: lost ({:?})", status);
                self.mark_disconnected();
            }
        }
    }

    /// Drop the association so the next press re-joins from scratch.
    pub fn mark_disconnected(&mut self) {
        self.driver.disconnect();
        self.transition(LinkState::Disconnected);
    }

    fn fail(&mut self, err: LinkError) -> LinkError {
        self.driver.disconnect();
        self.transition(LinkState::Failed);
        err
    }

    fn transition(&mut self, to: LinkState) {
        if self.state != to {
            debug!("Link: {:?} -> {:?}", self.state, to);
            self.state = to;
        }
    }
}
