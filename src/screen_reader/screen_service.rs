//! Screen capture service

use anyhow::{Context, Result};
use screenshots::Screen;

use super::region::PixelBuffer;
use crate::error::{DetectError, DetectResult};

/// Source of full-screen frames.
///
/// Implementations may block while the backend produces a frame.
pub trait CaptureBackend {
    fn capture(&mut self) -> DetectResult<PixelBuffer>;
}

impl<T: CaptureBackend + ?Sized> CaptureBackend for &mut T {
    fn capture(&mut self) -> DetectResult<PixelBuffer> {
        (**self).capture()
    }
}

/// Captures the primary screen through the `screenshots` crate
#[derive(Debug, Default)]
pub struct ScreenService;

impl ScreenService {
    /// Create a new screen service
    pub fn new() -> Self {
        Self
    }

    /// Internal capture method
    fn grab(&self) -> Result<PixelBuffer> {
        let screens = Screen::all().context("Failed to get screens")?;

        // Get primary screen (first one)
        let screen = screens.first().context("No screens found")?;

        let image = screen.capture().context("Failed to capture screen")?;

        PixelBuffer::from_raw(image.width(), image.height(), image.to_vec())
            .context("Failed to create image from raw data")
    }
}

impl CaptureBackend for ScreenService {
    fn capture(&mut self) -> DetectResult<PixelBuffer> {
        self.grab().map_err(capture_unavailable)
    }
}

/// Flatten the context chain into the error; callers decide how to log it
fn capture_unavailable(e: anyhow::Error) -> DetectError {
    DetectError::CaptureUnavailable(format!("{:#}", e))
}
