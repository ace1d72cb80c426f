//! WiFi station-mode adapter.
//!
//! Implements [`LinkPort`], the link-layer join primitive the
//! [`LinkManager`](crate::app::link::LinkManager) drives.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//!   `connect()` on `EspWifi` is non-blocking; completion is observed by
//!   polling `is_up()` (associated + DHCP lease), and a terminal failure by
//!   a `StaDisconnected` event arriving while the join is pending.
//! - **all other targets**: a simulated radio for host-side tests.

use log::info;

use crate::app::ports::{LinkPort, LinkStatus};
use crate::error::LinkError;

#[cfg(target_os = "espidf")]
use std::sync::Arc;
#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::eventloop::{EspSubscription, EspSystemEventLoop, System};
#[cfg(target_os = "espidf")]
use esp_idf_sys::EspError;
#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi, WifiEvent};

// ───────────────────────────────────────────────────────────────
// Simulated radio (host only)
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Debug)]
struct SimRadio {
    /// Status polls a join stays pending before the link comes up.
    join_polls: u32,
    polls: u32,
    reject_joins: bool,
    up: bool,
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    joining: bool,
    joins: u32,

    // ── ESP-IDF fields ──────────────────────────────────────────
    #[cfg(target_os = "espidf")]
    wifi: EspWifi<'static>,
    /// Set by the event loop when the station drops off (or fails to get on).
    #[cfg(target_os = "espidf")]
    sta_dropped: Arc<AtomicBool>,
    #[cfg(target_os = "espidf")]
    _events: EspSubscription<'static, System>,

    // ── Simulation fields ───────────────────────────────────────
    #[cfg(not(target_os = "espidf"))]
    sim: SimRadio,
}

impl WifiAdapter {
    // ── Constructors (platform-specific) ──────────────────────

    /// Wrap a configured-but-not-started `EspWifi` driver.
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: EspWifi<'static>, sysloop: &EspSystemEventLoop) -> Result<Self, EspError> {
        let sta_dropped = Arc::new(AtomicBool::new(false));
        let flag = sta_dropped.clone();
        let events = sysloop.subscribe::<WifiEvent, _>(move |event| {
            if matches!(event, WifiEvent::StaDisconnected { .. }) {
                flag.store(true, Ordering::Release);
            }
        })?;

        Ok(Self {
            joining: false,
            joins: 0,
            wifi,
            sta_dropped,
            _events: events,
        })
    }

    /// Simulated radio whose joins succeed after `join_polls` status polls.
    #[cfg(not(target_os = "espidf"))]
    pub fn simulated(join_polls: u32) -> Self {
        Self {
            joining: false,
            joins: 0,
            sim: SimRadio {
                join_polls,
                polls: 0,
                reject_joins: false,
                up: false,
            },
        }
    }

    /// Join requests issued to the driver since boot.
    pub fn join_count(&self) -> u32 {
        self.joins
    }

    // ── Simulation controls ───────────────────────────────────

    /// Make subsequent joins fail as if the credentials were wrong.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_reject_joins(&mut self, reject: bool) {
        self.sim.reject_joins = reject;
    }

    /// Drop an established link as if the AP went away.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_link(&mut self) {
        self.sim.up = false;
    }

    // ── Platform helpers: join ────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_join(&mut self, ssid: &str, passphrase: &str) -> Result<(), LinkError> {
        let auth_method = if passphrase.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: ssid.try_into().map_err(|_| LinkError::Refused)?,
            password: passphrase.try_into().map_err(|_| LinkError::Refused)?,
            auth_method,
            ..Default::default()
        };

        let driver_err = |e: EspError| {
            log::warn!("WiFi(espidf): driver error {}", e);
            LinkError::Refused
        };
        self.wifi
            .set_configuration(&Configuration::Client(client))
            .map_err(driver_err)?;
        if !self.wifi.is_started().map_err(driver_err)? {
            self.wifi.start().map_err(driver_err)?;
        }
        self.sta_dropped.store(false, Ordering::Release);
        self.wifi.connect().map_err(driver_err)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_join(&mut self, ssid: &str, _passphrase: &str) -> Result<(), LinkError> {
        self.sim.polls = 0;
        self.sim.up = false;
        info!("WiFi(sim): join '{}' issued", ssid);
        Ok(())
    }

    // ── Platform helpers: status ──────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_is_up(&mut self) -> bool {
        self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_up(&mut self) -> bool {
        if self.joining && !self.sim.reject_joins {
            self.sim.polls += 1;
            if self.sim.polls > self.sim.join_polls {
                self.sim.up = true;
            }
        }
        self.sim.up
    }

    #[cfg(target_os = "espidf")]
    fn platform_join_rejected(&mut self) -> bool {
        self.sta_dropped.load(Ordering::Acquire)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_join_rejected(&mut self) -> bool {
        self.sim.reject_joins
    }

    // ── Platform helpers: disconnect ──────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.wifi.disconnect() {
            log::warn!("WiFi(espidf): disconnect failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        self.sim.up = false;
        info!("WiFi(sim): disconnected");
    }
}

// ───────────────────────────────────────────────────────────────
// LinkPort
// ───────────────────────────────────────────────────────────────

impl LinkPort for WifiAdapter {
    fn join(&mut self, ssid: &str, passphrase: &str) -> Result<(), LinkError> {
        self.joins = self.joins.wrapping_add(1);
        self.platform_join(ssid, passphrase)?;
        self.joining = true;
        Ok(())
    }

    fn status(&mut self) -> LinkStatus {
        if self.platform_is_up() {
            if self.joining {
                info!("WiFi: link up");
                self.joining = false;
            }
            return LinkStatus::Up;
        }
        if self.joining {
            if self.platform_join_rejected() {
                return LinkStatus::Rejected;
            }
            return LinkStatus::Joining;
        }
        LinkStatus::Down
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.joining = false;
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
