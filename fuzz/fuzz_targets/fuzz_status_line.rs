//! Fuzz target: `http::parse_status_line`
//!
//! Feeds arbitrary bytes (as a server would send them) through the same
//! line framing the dispatcher uses and asserts the parser never panics
//! and only ever yields a three-digit status code.
//!
//! cargo fuzz run fuzz_status_line

#![no_main]

use bigredbutton::http::{line_end, parse_status_line, STATUS_LINE_CAP};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let data = &data[..data.len().min(STATUS_LINE_CAP)];
    let line = match line_end(data) {
        Some(end) => &data[..end],
        None => data,
    };

    if let Ok(status) = parse_status_line(line) {
        assert!(status.code <= 999, "status code has more than three digits");
        assert!(line.starts_with(b"HTTP/"));
    }
});
