//! Driver error types.

use core::fmt;

/// Errors surfaced by UART driver operations.
///
/// Receive-buffer overflow is deliberately absent: the overflow policy drops
/// the newest byte silently (a documented data-loss condition under sustained
/// overrun), and the console interrupt character travels over a dedicated
/// side channel rather than an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartError {
    /// The peripheral has not been configured (or was deinitialized).
    NotReady,
    /// Malformed configuration; rejected before any hardware mutation.
    InvalidArgs,
    /// A transmit could not complete within the bounded wait.
    Timeout,
    /// The requested unit id does not name a hardware unit.
    NoSuchUnit,
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => f.write_str("peripheral not ready"),
            Self::InvalidArgs => f.write_str("invalid configuration arguments"),
            Self::Timeout => f.write_str("transmit timed out"),
            Self::NoSuchUnit => f.write_str("no such UART unit"),
        }
    }
}
