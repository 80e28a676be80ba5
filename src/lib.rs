//! Splash Angler - pixel-color fishing bot
//!
//! Casts the line, waits for the feather marker to appear in the fishing
//! area, watches the water around it for a splash and reels in with a
//! modifier-held click. Detection works on raw screen pixels: an exact color
//! search for the feather and a fuzzy color count for the splash.

pub mod error;
pub mod fishing;
pub mod input;
pub mod log_main;
pub mod screen_reader;
pub mod utils;

// Re-exports for convenience
pub use error::{DetectError, DetectResult};
pub use fishing::{Clock, FishingState, FishingStateMachine, ManualClock, SessionStats, SystemClock, TickOutcome};
pub use input::{EnigoInput, InputBackend, MouseButton};
pub use screen_reader::{CaptureBackend, Color, Coordinate, PixelBuffer, PixelService, Region, ScreenService};
pub use utils::{get_data_dir, FishingConfig};
