//! Fuzz target: `ButtonConfig::from_json` + `validate`
//!
//! Arbitrary build-time JSON must either be rejected with a
//! `ConfigError` or produce a config that validates without panicking.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use bigredbutton::config::ButtonConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = ButtonConfig::from_json(json) {
        if config.validate().is_ok() {
            assert!(!config.ssid.is_empty());
            assert!(config.path.starts_with('/'));
        }
    }
});
