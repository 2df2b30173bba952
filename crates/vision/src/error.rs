//! Vision error definitions.

use contracts::RigError;
use thiserror::Error;

/// Errors raised by the stability gate
#[derive(Debug, Error)]
pub enum VisionError {
    /// The attempt budget ran out without two agreeing frames
    #[error("no stable reading after {attempts} attempts")]
    NoStableReading { attempts: u32 },
}

impl From<VisionError> for RigError {
    fn from(err: VisionError) -> Self {
        RigError::Detector {
            message: err.to_string(),
        }
    }
}
