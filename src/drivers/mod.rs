//! GPIO-facing drivers: button input and status indicator.

pub mod button;
pub mod status_led;
