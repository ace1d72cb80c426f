//! System configuration parameters
//!
//! Everything the firmware needs to know about its network and endpoint,
//! plus the timing constants of the press → request cycle. The value is
//! built once at boot and then only ever borrowed.
//!
//! Sources, first match wins:
//! 1. `BUTTON_CONFIG_JSON`: a full JSON document embedded at build time.
//! 2. Per-field build-time overrides (`BUTTON_WIFI_SSID`, ...).
//! 3. The defaults below.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::{self, ConfigError};

pub const SSID_CAP: usize = 32;
pub const PASSPHRASE_CAP: usize = 64;
pub const HOST_CAP: usize = 64;
pub const PATH_CAP: usize = 192;
pub const HTTP_VERSION_CAP: usize = 8;

const DEFAULT_SSID: &str = "yourWifiSSID";
const DEFAULT_PASSPHRASE: &str = "yourWifiPassphrase";
const DEFAULT_HOST: &str = "api.myhost.com";
const DEFAULT_PATH: &str = "/button/press.php?buttonId=1";
const DEFAULT_HTTP_VERSION: &str = "1.1";

/// Core button configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    // --- WiFi ---
    pub ssid: String<SSID_CAP>,
    /// Empty for an open network.
    pub passphrase: String<PASSPHRASE_CAP>,

    // --- Endpoint ---
    pub host: String<HOST_CAP>,
    pub port: u16,
    /// Request target, query string included. Must start with `/`.
    pub path: String<PATH_CAP>,
    /// Goes after `HTTP/` on the request line.
    pub http_version: String<HTTP_VERSION_CAP>,

    // --- Button ---
    /// Pressed reads as a low level (switch to ground, pull-up enabled).
    pub button_active_low: bool,

    // --- Timing ---
    /// Stabilisation window before a level change counts (milliseconds)
    pub debounce_ms: u32,
    /// Pin sampling cadence (milliseconds)
    pub tick_interval_ms: u32,
    /// Budget for one join attempt (milliseconds)
    pub link_timeout_ms: u32,
    /// Link status polling cadence while joining (milliseconds)
    pub link_poll_interval_ms: u32,
    /// Budget for connect + request + status line (milliseconds)
    pub request_timeout_ms: u32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            ssid: fixed(DEFAULT_SSID),
            passphrase: fixed(DEFAULT_PASSPHRASE),

            host: fixed(DEFAULT_HOST),
            port: 80,
            path: fixed(DEFAULT_PATH),
            http_version: fixed(DEFAULT_HTTP_VERSION),

            button_active_low: true,

            debounce_ms: 40,
            tick_interval_ms: 5,         // 200 Hz sampling
            link_timeout_ms: 10_000,
            link_poll_interval_ms: 100,
            request_timeout_ms: 5_000,
        }
    }
}

impl ButtonConfig {
    /// Build and validate the configuration baked into this firmware image.
    pub fn load() -> error::Result<Self> {
        let config = match option_env!("BUTTON_CONFIG_JSON") {
            Some(json) => Self::from_json(json)?,
            None => Self::from_build_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|_| ConfigError::Malformed)
    }

    /// Defaults with any per-field build-time overrides applied.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let mut c = Self::default();
        if let Some(v) = option_env!("BUTTON_WIFI_SSID") {
            c.ssid = bounded(v, ConfigError::InvalidSsid)?;
        }
        if let Some(v) = option_env!("BUTTON_WIFI_PASSPHRASE") {
            c.passphrase = bounded(v, ConfigError::InvalidPassphrase)?;
        }
        if let Some(v) = option_env!("BUTTON_SERVER_HOST") {
            c.host = bounded(v, ConfigError::InvalidHost)?;
        }
        if let Some(v) = option_env!("BUTTON_SERVER_PATH") {
            c.path = bounded(v, ConfigError::InvalidPath)?;
        }
        if let Some(v) = option_env!("BUTTON_HTTP_VERSION") {
            c.http_version = bounded(v, ConfigError::InvalidHttpVersion)?;
        }
        Ok(c)
    }

    /// Logic level the button pin reads while pressed.
    pub fn pressed_level(&self) -> bool {
        !self.button_active_low
    }

    /// Range-check every field. Called once at boot; an invalid config
    /// never reaches the tick loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ssid(&self.ssid)?;
        validate_passphrase(&self.passphrase)?;

        if self.host.is_empty() || !self.host.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ConfigError::InvalidHost);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if !self.path.starts_with('/') || !self.path.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ConfigError::InvalidPath);
        }
        match self.http_version.as_bytes() {
            [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {}
            _ => return Err(ConfigError::InvalidHttpVersion),
        }

        if self.debounce_ms == 0 {
            return Err(ConfigError::InvalidTiming("debounce_ms must be > 0"));
        }
        if self.tick_interval_ms == 0 || self.tick_interval_ms >= self.debounce_ms {
            return Err(ConfigError::InvalidTiming("tick_interval_ms must be in 1..debounce_ms"));
        }
        if self.link_timeout_ms == 0 {
            return Err(ConfigError::InvalidTiming("link_timeout_ms must be > 0"));
        }
        if self.link_poll_interval_ms == 0 || self.link_poll_interval_ms > self.link_timeout_ms {
            return Err(ConfigError::InvalidTiming(
                "link_poll_interval_ms must be in 1..=link_timeout_ms",
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidTiming("request_timeout_ms must be > 0"));
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Validation helpers
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConfigError> {
    if ssid.is_empty() || ssid.len() > SSID_CAP || !is_printable_ascii(ssid) {
        return Err(ConfigError::InvalidSsid);
    }
    Ok(())
}

fn validate_passphrase(passphrase: &str) -> Result<(), ConfigError> {
    if passphrase.is_empty() {
        return Ok(());
    }
    if passphrase.len() < 8 || passphrase.len() > PASSPHRASE_CAP {
        return Err(ConfigError::InvalidPassphrase);
    }
    Ok(())
}

fn bounded<const N: usize>(s: &str, err: ConfigError) -> Result<String<N>, ConfigError> {
    let mut out = String::new();
    out.push_str(s).map_err(|()| err)?;
    Ok(out)
}

/// Compile-time defaults are all well under capacity.
fn fixed<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    let _ = out.push_str(s);
    out
}
