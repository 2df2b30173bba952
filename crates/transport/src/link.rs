//! SerialLink trait and the serialport-backed implementation.
//!
//! The trait is the seam between the session's retry policy and the
//! actual device, so tests and mock runs can swap in scripted links.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::error::TransportError;

/// A serial-like byte channel.
///
/// Read and write failures are reported as `std::io::Error`; the session
/// distinguishes timeouts (`ErrorKind::TimedOut`) from disconnects.
pub trait SerialLink: Send {
    /// Write the whole buffer
    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()>;

    /// Read exactly `buf.len()` bytes, bounded by the link timeout
    fn read_exact(&mut self, buf: &mut [u8]) -> std::io::Result<()>;

    /// Close and reopen the underlying channel
    fn reopen(&mut self) -> std::io::Result<()>;
}

/// Serial link over a real device via the `serialport` crate.
///
/// Line parameters are fixed by the bus: 115200-class baud, 8 data bits,
/// no parity, 1 stop bit, no flow control.
pub struct SerialPortLink {
    port: Box<dyn SerialPort>,
    path: String,
    baud_rate: u32,
    timeout: Duration,
}

impl SerialPortLink {
    /// Open the serial device
    ///
    /// # Errors
    /// Fails with [`TransportError::Open`] if the device is missing or
    /// busy; this is the one fatal-at-boundary transport error.
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self, TransportError> {
        let port = Self::build(path, baud_rate, timeout).map_err(|source| {
            TransportError::Open {
                path: path.to_string(),
                source,
            }
        })?;

        info!(port = %path, baud_rate, timeout_ms = timeout.as_millis() as u64, "serial port opened");

        Ok(Self {
            port,
            path: path.to_string(),
            baud_rate,
            timeout,
        })
    }

    fn build(
        path: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<Box<dyn SerialPort>, serialport::Error> {
        serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(timeout)
            .open()
    }
}

impl SerialLink for SerialPortLink {
    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> std::io::Result<()> {
        self.port.read_exact(buf)
    }

    fn reopen(&mut self) -> std::io::Result<()> {
        debug!(port = %self.path, "reopening serial port");
        let port = Self::build(&self.path, self.baud_rate, self.timeout)
            .map_err(std::io::Error::other)?;
        self.port = port;
        Ok(())
    }
}
