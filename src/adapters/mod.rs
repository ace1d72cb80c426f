//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements             | Connects to               |
//! |------------|------------------------|---------------------------|
//! | `wifi`     | LinkPort               | ESP-IDF WiFi STA          |
//! | `tcp`      | StreamPort, ByteStream | lwIP sockets via `std::net` |
//! | `time`     | Clock                  | ESP32 system timer        |
//! | `log_sink` | OutcomeSink            | Serial log output         |

pub mod log_sink;
pub mod tcp;
pub mod time;
pub mod wifi;
