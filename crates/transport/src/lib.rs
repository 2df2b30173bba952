//! # Transport
//!
//! Owns the serial byte channel to the feeder controller: framed sends,
//! bounded acknowledgment reads, and transparent reconnect-with-retry.
//!
//! The bus is half-duplex with exactly one command in flight, so all
//! calls here block.

mod error;
mod link;
mod session;

pub use error::TransportError;
pub use link::{SerialLink, SerialPortLink};
pub use session::{Ack, ReconnectPolicy, Session, ACK_LEN};
