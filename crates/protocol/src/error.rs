//! Protocol error definitions.
//!
//! All three variants mean "frame rejected": none of them is ever allowed
//! to escalate into a crash. They convert into [`RigError::Protocol`] at
//! crate seams.

use contracts::RigError;
use thiserror::Error;

/// Errors raised while decoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The trailing CRC does not match the frame contents
    #[error("checksum mismatch: computed {computed:#06x}, frame carries {received:#06x}")]
    ChecksumMismatch { computed: u16, received: u16 },

    /// The leading type identifier is not in the registry
    #[error("unrecognized message type {type_id}")]
    UnrecognizedType { type_id: u8 },

    /// The frame length does not match the variant's fixed encoding
    #[error("malformed frame length: expected {expected} bytes, got {actual}")]
    MalformedLength { expected: usize, actual: usize },
}

impl From<ProtocolError> for RigError {
    fn from(err: ProtocolError) -> Self {
        RigError::Protocol {
            message: err.to_string(),
        }
    }
}
