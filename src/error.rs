//! Unified error types for the button firmware.
//!
//! A single `Error` enum that every subsystem can convert into keeps the
//! boot path in `main` uniform. All variants are `Copy` so they can be
//! handed to the status sinks without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Wireless association failed.
    Link(LinkError),
    /// The byte-stream transport failed.
    Transport(TransportError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

/// Why a join attempt did not end in an associated link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The driver rejected the join (bad credentials, AP not found, driver error).
    Refused,
    /// The link did not come up within the timeout budget.
    Timeout,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused => write!(f, "join refused"),
            Self::Timeout => write!(f, "join timed out"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures reported by the byte-stream primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Host name could not be resolved to an address.
    Resolve,
    /// TCP connect failed or timed out.
    Connect,
    /// Writing to the stream failed.
    Write,
    /// Reading from the stream failed.
    Read,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve => write!(f, "host lookup failed"),
            Self::Connect => write!(f, "connect failed"),
            Self::Write => write!(f, "write failed"),
            Self::Read => write!(f, "read failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Startup-time configuration validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// SSID must be 1-32 printable ASCII bytes.
    InvalidSsid,
    /// Passphrase must be empty (open network) or 8-64 bytes.
    InvalidPassphrase,
    /// Host must be 1-64 bytes without whitespace.
    InvalidHost,
    /// Path must begin with `/` and contain no whitespace or control bytes.
    InvalidPath,
    /// HTTP version must look like `1.1`.
    InvalidHttpVersion,
    /// Port must be non-zero.
    InvalidPort,
    /// A timing field is zero or inconsistent.
    InvalidTiming(&'static str),
    /// The embedded JSON document could not be parsed.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassphrase => {
                write!(f, "passphrase invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::InvalidHost => write!(f, "host invalid (must be 1-64 bytes, no whitespace)"),
            Self::InvalidPath => write!(f, "path invalid (must start with '/', no whitespace)"),
            Self::InvalidHttpVersion => write!(f, "HTTP version invalid (expected e.g. \"1.1\")"),
            Self::InvalidPort => write!(f, "port must be non-zero"),
            Self::InvalidTiming(field) => write!(f, "timing invalid: {field}"),
            Self::Malformed => write!(f, "config document malformed"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
