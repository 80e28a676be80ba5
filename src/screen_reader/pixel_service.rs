//! Color search and counting over freshly captured regions

use std::path::Path;

use anyhow::Context;

use super::color::Color;
use super::region::{extract, Coordinate, PixelBuffer, Region};
use super::screen_service::CaptureBackend;
use crate::error::DetectResult;

/// Runs single-frame scans against a capture backend.
///
/// Every call grabs its own frame; nothing is cached between calls.
pub struct PixelService<C> {
    capture: C,
}

impl<C: CaptureBackend> PixelService<C> {
    pub fn new(capture: C) -> Self {
        Self { capture }
    }

    pub fn capture_backend(&self) -> &C {
        &self.capture
    }

    /// Capture one frame and crop it to `region`
    pub fn capture_region(&mut self, region: &Region) -> DetectResult<PixelBuffer> {
        let frame = self.capture.capture()?;
        extract(&frame, region)
    }

    /// Number of pixels in `region` within `tolerance` of `target`
    pub fn count_color(&mut self, region: &Region, target: Color, tolerance: f64) -> DetectResult<usize> {
        let crop = self.capture_region(region)?;
        let count = count_matching(&crop, target, tolerance);
        tracing::trace!("[PIXEL] count_color({}, {}) = {}", target, region, count);
        Ok(count)
    }

    /// Global position of the first pixel in `region` exactly equal to `target`
    pub fn find_color(&mut self, region: &Region, target: Color) -> DetectResult<Option<Coordinate>> {
        let crop = self.capture_region(region)?;
        let found = first_exact(&crop, target).map(|(x, y)| region.to_global(x, y));
        tracing::trace!("[PIXEL] find_color({}, {}) = {:?}", target, region, found);
        Ok(found)
    }

    /// Write `region` of a fresh frame to `path` as PNG, for calibrating the fishing area
    pub fn save_region_snapshot(&mut self, region: &Region, path: &Path) -> anyhow::Result<()> {
        let crop = self.capture_region(region)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        crop.save(path)
            .with_context(|| format!("Failed to write snapshot {:?}", path))?;
        Ok(())
    }
}

/// Fuzzy-match count over every pixel of `crop`
pub fn count_matching(crop: &PixelBuffer, target: Color, tolerance: f64) -> usize {
    crop.pixels()
        .filter(|p| Color::from_pixel(p).fuzzy_matches(target, tolerance))
        .count()
}

/// Local position of the first exact match, scanning rows top to bottom
pub fn first_exact(crop: &PixelBuffer, target: Color) -> Option<(u32, u32)> {
    crop.enumerate_pixels()
        .find(|(_, _, p)| Color::from_pixel(p) == target)
        .map(|(x, y, _)| (x, y))
}
