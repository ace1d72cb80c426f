//! Minimal HTTP/1.x client codec.
//!
//! Request (the only bytes this firmware ever sends):
//! ```text
//! GET {path} HTTP/{version}\r\n
//! Host: {host}\r\n
//! Connection: close\r\n
//! \r\n
//! ```
//!
//! Response: only the status line is interpreted.
//! ```text
//! HTTP/<major>.<minor> SP <3-digit code> [SP <reason-phrase>] CRLF
//! ```
//! Headers and body are never parsed.

use core::fmt::{self, Write};

use crate::config::{HOST_CAP, HTTP_VERSION_CAP, PATH_CAP};

/// Room for the longest request a valid config can produce.
pub const REQUEST_CAP: usize = PATH_CAP + HOST_CAP + HTTP_VERSION_CAP + 64;

/// Longest status line we are willing to buffer, CRLF included.
pub const STATUS_LINE_CAP: usize = 256;

pub type RequestBuf = heapless::String<REQUEST_CAP>;

/// Format the GET request into `out`.
pub fn write_request(out: &mut impl Write, host: &str, path: &str, http_version: &str) -> fmt::Result {
    write!(
        out,
        "GET {path} HTTP/{http_version}\r\nHost: {host}\r\nConnection: close\r\n\r\n"
    )
}

/// Parsed status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub major: u8,
    pub minor: u8,
    pub code: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLineError {
    /// Does not start with `HTTP/<digit>.<digit> `.
    BadVersion,
    /// Status code is not exactly three digits.
    BadCode,
    /// Reason phrase missing its separator or contains control bytes.
    BadReason,
}

impl fmt::Display for StatusLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadVersion => write!(f, "bad protocol version"),
            Self::BadCode => write!(f, "bad status code"),
            Self::BadReason => write!(f, "bad reason phrase"),
        }
    }
}

/// Index just past the first line terminator (`\n`), if any.
pub fn line_end(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n').map(|i| i + 1)
}

/// Parse one status line. A trailing `\r\n` (or bare `\n`) is accepted
/// and ignored.
pub fn parse_status_line(line: &[u8]) -> Result<StatusLine, StatusLineError> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    let rest = line.strip_prefix(b"HTTP/").ok_or(StatusLineError::BadVersion)?;
    let (major, minor, rest) = match rest {
        [maj, b'.', min, b' ', rest @ ..] if maj.is_ascii_digit() && min.is_ascii_digit() => {
            (maj - b'0', min - b'0', rest)
        }
        _ => return Err(StatusLineError::BadVersion),
    };

    let (digits, reason) = match rest {
        [a, b, c, reason @ ..] => ([*a, *b, *c], reason),
        _ => return Err(StatusLineError::BadCode),
    };
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(StatusLineError::BadCode);
    }
    let code = digits
        .iter()
        .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));

    // Reason phrase is optional but, when present, follows a single space.
    match reason {
        [] => {}
        [b' ', phrase @ ..] if phrase.iter().all(|&b| b == b'\t' || !b.is_ascii_control()) => {}
        [b' ', ..] => return Err(StatusLineError::BadReason),
        _ => return Err(StatusLineError::BadCode),
    }

    Ok(StatusLine { major, minor, code })
}
