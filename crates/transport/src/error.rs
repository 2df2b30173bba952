//! Transport error definitions.

use contracts::RigError;
use thiserror::Error;

/// Errors raised by the serial session
#[derive(Debug, Error)]
pub enum TransportError {
    /// No acknowledgment arrived within the link timeout.
    ///
    /// Surfaced once per `send_and_wait`; the caller decides whether the
    /// command is worth re-issuing.
    #[error("timed out waiting for acknowledgment")]
    AckTimeout,

    /// The underlying channel faulted mid-exchange.
    ///
    /// Consumed internally by the reconnect loop; callers of
    /// `send_and_wait` never observe this variant.
    #[error("transport disconnected: {0}")]
    Disconnected(#[source] std::io::Error),

    /// Shutdown was requested while sending or reconnecting
    #[error("shutdown requested")]
    ShutdownRequested,

    /// The serial device could not be opened at startup
    #[error("failed to open serial port '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },
}

impl From<TransportError> for RigError {
    fn from(err: TransportError) -> Self {
        RigError::Transport {
            message: err.to_string(),
        }
    }
}
