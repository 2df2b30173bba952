//! Mock serial link.
//!
//! Implements `SerialLink` against an in-memory script instead of a
//! device: every accepted write queues one acknowledgment, and selected
//! writes can be made to fail so reconnect handling is exercised.

use std::io::ErrorKind;
use std::sync::{Arc, Mutex};

use tracing::debug;
use transport::{SerialLink, ACK_LEN};

/// Mock link configuration
#[derive(Debug, Clone)]
pub struct MockLinkConfig {
    /// 1-based write attempt numbers that fail with a broken pipe
    pub fail_on_writes: Vec<u64>,
    /// Never acknowledge; every read times out
    pub silent: bool,
    /// 1-based write attempt numbers that are accepted but never acked
    pub silent_on_writes: Vec<u64>,
    /// Acknowledgment frame returned after each accepted write
    pub ack: [u8; ACK_LEN],
}

impl Default for MockLinkConfig {
    fn default() -> Self {
        Self {
            fail_on_writes: Vec::new(),
            silent: false,
            silent_on_writes: Vec::new(),
            ack: [0x4F, 0x4B, 0x00, 0x00],
        }
    }
}

/// Observable link history, shared with the test that built the link
#[derive(Debug, Clone, Default)]
pub struct LinkStats {
    /// Frames the device accepted, in order
    pub frames: Vec<Vec<u8>>,
    /// Total write attempts, including failed ones
    pub write_attempts: u64,
    /// Times the link was reopened
    pub reopens: u32,
}

/// Serial link backed by a script instead of a device
pub struct MockLink {
    config: MockLinkConfig,
    stats: Arc<Mutex<LinkStats>>,
    ack_pending: bool,
}

impl MockLink {
    pub fn new(config: MockLinkConfig) -> Self {
        Self {
            config,
            stats: Arc::new(Mutex::new(LinkStats::default())),
            ack_pending: false,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(MockLinkConfig::default())
    }

    /// Handle for inspecting the link after the session takes ownership
    pub fn stats(&self) -> Arc<Mutex<LinkStats>> {
        self.stats.clone()
    }
}

impl SerialLink for MockLink {
    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let mut stats = self.stats.lock().map_err(|_| poisoned())?;
        stats.write_attempts += 1;
        if self.config.fail_on_writes.contains(&stats.write_attempts) {
            debug!(attempt = stats.write_attempts, "mock link dropping write");
            return Err(std::io::Error::from(ErrorKind::BrokenPipe));
        }
        stats.frames.push(bytes.to_vec());
        self.ack_pending = !self.config.silent_on_writes.contains(&stats.write_attempts);
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        if self.config.silent || !self.ack_pending {
            return Err(std::io::Error::from(ErrorKind::TimedOut));
        }
        self.ack_pending = false;
        let len = buf.len().min(ACK_LEN);
        buf[..len].copy_from_slice(&self.config.ack[..len]);
        Ok(())
    }

    fn reopen(&mut self) -> std::io::Result<()> {
        let mut stats = self.stats.lock().map_err(|_| poisoned())?;
        stats.reopens += 1;
        debug!(reopens = stats.reopens, "mock link reopened");
        Ok(())
    }
}

fn poisoned() -> std::io::Error {
    std::io::Error::other("mock link stats lock poisoned")
}
