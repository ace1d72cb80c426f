//! Big Red Button firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  ButtonPin     WifiAdapter   TcpTransport   Esp32Clock   │
//! │  (PinPort)     (LinkPort)    (StreamPort)   (Clock)      │
//! │  LogOutcomeSink + StatusLed  (OutcomeSink)               │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ───────────────    │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │          ButtonController (pure logic)             │  │
//! │  │  Debouncer · LinkManager · RequestDispatcher       │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;
use log::{error, info};

use bigredbutton::adapters::log_sink::LogOutcomeSink;
use bigredbutton::adapters::tcp::TcpTransport;
use bigredbutton::adapters::time::Esp32Clock;
use bigredbutton::adapters::wifi::WifiAdapter;
use bigredbutton::app::ports::Clock;
use bigredbutton::app::service::ButtonController;
use bigredbutton::config::ButtonConfig;
use bigredbutton::drivers::button::ButtonPin;
use bigredbutton::drivers::status_led::StatusLed;
use bigredbutton::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Big Red Button v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (baked in at build time) ─────────────
    let config = ButtonConfig::load().inspect_err(|e| error!("Config rejected: {}", e))?;
    info!(
        "Config: ssid='{}' target=http://{}:{}{} HTTP/{}",
        config.ssid, config.host, config.port, config.path, config.http_version
    );
    info!(
        "Config: debounce={}ms tick={}ms link_timeout={}ms request_timeout={}ms",
        config.debounce_ms, config.tick_interval_ms, config.link_timeout_ms, config.request_timeout_ms
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // SAFETY: pin numbers come from `pins`, and nothing else claims them.
    let mut button = PinDriver::input(unsafe { AnyIOPin::new(pins::BUTTON_GPIO) })?;
    button.set_pull(if config.button_active_low { Pull::Up } else { Pull::Down })?;
    let mut button = ButtonPin::new(button, !config.pressed_level());

    // SAFETY: as above.
    let led = PinDriver::output(unsafe { AnyOutputPin::new(pins::STATUS_LED_GPIO) })?;

    // ── 4. Adapters ───────────────────────────────────────────
    let wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let wifi = WifiAdapter::new(wifi, &sysloop)?;
    let mut clock = Esp32Clock::new();
    let mut sinks = (LogOutcomeSink::new(), StatusLed::new(led));

    let mut controller = ButtonController::new(&config, wifi, TcpTransport::new());
    info!("Ready, sampling every {}ms", config.tick_interval_ms);

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        controller.on_tick(clock.now_ms(), &mut button, &mut clock, &mut sinks);
        sinks.1.tick(clock.now_ms());
        clock.delay_ms(config.tick_interval_ms);
    }
}
