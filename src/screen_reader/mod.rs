//! Screen reader module for capturing and analyzing screen content

pub mod color;
pub mod pixel_service;
pub mod region;
pub mod screen_service;

pub use color::{fuzzy_channel_match, Color};
pub use pixel_service::PixelService;
pub use region::{extract, Coordinate, PixelBuffer, Region};
pub use screen_service::{CaptureBackend, ScreenService};
