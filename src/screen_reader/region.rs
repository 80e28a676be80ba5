//! Screen regions, coordinates and cropping

use std::fmt;

use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{DetectError, DetectResult};

/// Full-frame or cropped RGBA pixels, row-major
pub type PixelBuffer = RgbaImage;

/// A point in global screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangular region of interest in global screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Translate a region-local pixel position into global screen space
    pub fn to_global(&self, local_x: u32, local_y: u32) -> Coordinate {
        Coordinate {
            x: self.x + local_x as i32,
            y: self.y + local_y as i32,
        }
    }

    /// Inverse of [`Region::to_global`]; `None` if the point lies outside
    pub fn to_local(&self, point: Coordinate) -> Option<(u32, u32)> {
        let dx = i64::from(point.x) - i64::from(self.x);
        let dy = i64::from(point.y) - i64::from(self.y);
        if dx < 0 || dy < 0 || dx >= i64::from(self.width) || dy >= i64::from(self.height) {
            return None;
        }
        Some((dx as u32, dy as u32))
    }

    /// True if the whole region lies inside a `width` x `height` frame anchored at (0, 0)
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = i64::from(self.x) + i64::from(self.width);
        let bottom = i64::from(self.y) + i64::from(self.height);
        self.x >= 0 && self.y >= 0 && right <= i64::from(width) && bottom <= i64::from(height)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Copy `region` out of a full-screen `buffer`.
///
/// Out-of-bounds regions are rejected rather than clamped.
pub fn extract(buffer: &PixelBuffer, region: &Region) -> DetectResult<PixelBuffer> {
    if region.width == 0 || region.height == 0 || !region.fits_within(buffer.width(), buffer.height()) {
        return Err(DetectError::RegionOutOfBounds {
            region: *region,
            frame_width: buffer.width(),
            frame_height: buffer.height(),
        });
    }

    Ok(imageops::crop_imm(
        buffer,
        region.x as u32,
        region.y as u32,
        region.width,
        region.height,
    )
    .to_image())
}
