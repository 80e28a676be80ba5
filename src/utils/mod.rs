//! Paths and configuration

pub mod path;
pub mod settings;

pub use path::{get_data_dir, resolve_data_path};
pub use settings::{ConfigError, FishingConfig, JitterRange, SplashWindow, MAX_WAIT_MS};
