//! GPIO assignments for the button board.
//!
//! Single source of truth: `main` builds its pin drivers from these
//! numbers rather than hard-coding them.

/// Momentary push button, switch to ground. Internal pull-up enabled,
/// so the pin reads LOW while pressed (`button_active_low` in the config).
pub const BUTTON_GPIO: i32 = 9;

/// Status LED, active HIGH through a current-limiting resistor.
pub const STATUS_LED_GPIO: i32 = 8;
