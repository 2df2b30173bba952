//! Transport session: send a command frame, wait for its acknowledgment.
//!
//! The device answers every command with a short fixed-length ack. A
//! transport-level fault never escapes a single `send_and_wait`: the
//! session closes the channel, reconnects at a fixed interval for as long
//! as it takes (or until shutdown), and re-issues the command. Only an
//! acknowledgment timeout is the caller's problem.

use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use contracts::{ShutdownFlag, Sleeper};
use metrics::counter;
use protocol::Message;
use tracing::{debug, info, warn};

use crate::error::TransportError;
use crate::link::SerialLink;

/// Fixed acknowledgment frame length
pub const ACK_LEN: usize = 4;

/// Acknowledgment frame returned by the device after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    /// Raw acknowledgment bytes
    pub raw: [u8; ACK_LEN],
}

/// Reconnect behavior on transport faults
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    /// Delay between reconnect attempts
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
        }
    }
}

/// Owns the serial channel and the exchange discipline on it.
///
/// Half-duplex: one command in flight, acknowledged before the next.
pub struct Session<L: SerialLink> {
    link: L,
    policy: ReconnectPolicy,
    sleeper: Arc<dyn Sleeper>,
    shutdown: ShutdownFlag,
}

impl<L: SerialLink> Session<L> {
    /// Create a session over an open link
    pub fn new(
        link: L,
        policy: ReconnectPolicy,
        sleeper: Arc<dyn Sleeper>,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            link,
            policy,
            sleeper,
            shutdown,
        }
    }

    /// Send a message and block for its acknowledgment.
    ///
    /// # Errors
    /// - [`TransportError::AckTimeout`] — the device stayed silent past
    ///   the link timeout; surfaced once, caller decides
    /// - [`TransportError::ShutdownRequested`] — shutdown observed before
    ///   the exchange or during reconnection
    ///
    /// Disconnects are handled internally: reconnect, then re-issue the
    /// same command.
    pub fn send_and_wait(&mut self, message: &Message) -> Result<Ack, TransportError> {
        loop {
            if self.shutdown.is_requested() {
                return Err(TransportError::ShutdownRequested);
            }

            match self.exchange(message) {
                Ok(ack) => return Ok(ack),
                Err(TransportError::AckTimeout) => {
                    counter!("transport_ack_timeouts_total").increment(1);
                    warn!(type_id = message.type_id(), "ack timeout");
                    return Err(TransportError::AckTimeout);
                }
                Err(TransportError::Disconnected(err)) => {
                    counter!("transport_disconnects_total").increment(1);
                    warn!(error = %err, "transport fault, reconnecting");
                    self.reconnect()?;
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// One write + bounded ack read
    fn exchange(&mut self, message: &Message) -> Result<Ack, TransportError> {
        let frame = message.encode();
        self.link
            .write_all(&frame)
            .map_err(TransportError::Disconnected)?;

        debug!(type_id = message.type_id(), len = frame.len(), "frame sent");

        let mut raw = [0u8; ACK_LEN];
        match self.link.read_exact(&mut raw) {
            Ok(()) => Ok(Ack { raw }),
            Err(err) if err.kind() == ErrorKind::TimedOut => Err(TransportError::AckTimeout),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                Err(TransportError::Disconnected(err))
            }
            Err(err) => Err(TransportError::Disconnected(err)),
        }
    }

    /// Fixed-interval reconnect loop, unbounded, shutdown-interruptible
    fn reconnect(&mut self) -> Result<(), TransportError> {
        let mut attempt: u64 = 0;
        loop {
            if self.shutdown.is_requested() {
                return Err(TransportError::ShutdownRequested);
            }

            self.sleeper.sleep(self.policy.interval);
            attempt += 1;

            match self.link.reopen() {
                Ok(()) => {
                    counter!("transport_reconnects_total").increment(1);
                    info!(attempt, "transport reconnected");
                    return Ok(());
                }
                Err(err) => {
                    warn!(attempt, error = %err, "reconnect attempt failed");
                }
            }
        }
    }
}
