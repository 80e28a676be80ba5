//! Error types shared by the detection engine

use thiserror::Error;

use crate::screen_reader::region::Region;

/// Structural failures of a capture + scan.
///
/// A missing marker or an unmet splash threshold is never an error; those
/// are reported as `None` / `false` and drive the state machine back to idle.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The requested region does not fit inside the captured frame
    #[error("region {region} is outside the {frame_width}x{frame_height} frame")]
    RegionOutOfBounds {
        region: Region,
        frame_width: u32,
        frame_height: u32,
    },

    /// The capture backend could not produce a frame
    #[error("screen capture unavailable: {0}")]
    CaptureUnavailable(String),
}

/// Result alias for detection operations
pub type DetectResult<T> = Result<T, DetectError>;
