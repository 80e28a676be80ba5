//! Bot configuration loaded from `config/settings.json`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::{is_known_key, MouseButton};
use crate::screen_reader::{Color, Coordinate, Region};
use crate::utils::path::get_data_dir;

/// Problems loading or validating the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Upper bound for any configured wait or timeout (ten minutes)
pub const MAX_WAIT_MS: u64 = 10 * 60 * 1000;

/// Placement of the splash search window relative to the feather
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplashWindow {
    pub dx: i32,
    pub dy: i32,
    pub width: u32,
    pub height: u32,
}

impl SplashWindow {
    /// Region to watch for a splash given the feather position
    pub fn around(&self, marker: Coordinate) -> Region {
        Region::new(marker.x + self.dx, marker.y + self.dy, self.width, self.height)
    }
}

/// Half-open millisecond range `[min, max)` for the click delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JitterRange {
    pub min: u64,
    pub max: u64,
}

/// Everything the fishing loop needs, fixed for the life of the process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishingConfig {
    /// Where the feather can appear after a cast
    pub fishing_area: Region,
    /// Exact color of the feather marker
    pub marker_color: Color,
    pub splash_color: Color,
    /// Minimum matching pixels that count as a splash
    pub splash_threshold: usize,
    /// Relative per-channel tolerance for splash pixels, in [0, 1)
    pub splash_tolerance: f64,
    pub splash_window: SplashWindow,
    pub bite_timeout_ms: u64,
    pub splash_timeout_ms: u64,
    pub startup_delay_ms: u64,
    pub cooldown_ms: u64,
    pub click_jitter_ms: JitterRange,
    pub release_delay_ms: u64,
    pub cast_key: String,
    pub modifier_key: String,
    pub catch_button: MouseButton,
    /// PNG of the fishing area written at startup, relative to the data dir
    pub debug_snapshot: Option<PathBuf>,
}

impl Default for FishingConfig {
    fn default() -> Self {
        Self {
            fishing_area: Region::new(500, 580, 1100, 370),
            marker_color: Color::from_hex(0x110c07),
            splash_color: Color::from_hex(0x64989e),
            splash_threshold: 3,
            splash_tolerance: 0.1,
            splash_window: SplashWindow { dx: -60, dy: -35, width: 100, height: 100 },
            bite_timeout_ms: 20_000,
            splash_timeout_ms: 20_000,
            startup_delay_ms: 3_000,
            cooldown_ms: 5_000,
            click_jitter_ms: JitterRange { min: 150, max: 300 },
            release_delay_ms: 200,
            cast_key: "0".to_string(),
            modifier_key: "SHIFT".to_string(),
            catch_button: MouseButton::Right,
            debug_snapshot: Some(PathBuf::from("debug").join("fishing_area.png")),
        }
    }
}

impl FishingConfig {
    /// Parse and validate a JSON document; missing keys keep their defaults
    pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: FishingConfig = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("[CONFIG] {:?} not found, using defaults", path);
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content, path)?;
        tracing::info!("[CONFIG] Loaded {:?}", path);
        Ok(config)
    }

    /// Load from the default location under the data directory
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_settings_path())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.splash_tolerance) {
            return Err(invalid(
                "splash_tolerance",
                format!("{} is outside [0, 1)", self.splash_tolerance),
            ));
        }
        if self.fishing_area.width == 0 || self.fishing_area.height == 0 {
            return Err(invalid("fishing_area", "width and height must be positive".to_string()));
        }
        if self.splash_window.width == 0 || self.splash_window.height == 0 {
            return Err(invalid("splash_window", "width and height must be positive".to_string()));
        }
        if self.splash_threshold == 0 {
            return Err(invalid("splash_threshold", "must be at least 1".to_string()));
        }
        if self.click_jitter_ms.min >= self.click_jitter_ms.max {
            return Err(invalid(
                "click_jitter_ms",
                format!("min {} must be below max {}", self.click_jitter_ms.min, self.click_jitter_ms.max),
            ));
        }
        for (field, ms) in [
            ("bite_timeout_ms", self.bite_timeout_ms),
            ("splash_timeout_ms", self.splash_timeout_ms),
        ] {
            if ms == 0 {
                return Err(invalid(field, "must be positive".to_string()));
            }
        }
        for (field, ms) in [
            ("bite_timeout_ms", self.bite_timeout_ms),
            ("splash_timeout_ms", self.splash_timeout_ms),
            ("startup_delay_ms", self.startup_delay_ms),
            ("cooldown_ms", self.cooldown_ms),
            ("release_delay_ms", self.release_delay_ms),
            ("click_jitter_ms", self.click_jitter_ms.max),
        ] {
            if ms > MAX_WAIT_MS {
                return Err(invalid(field, format!("{} ms exceeds the {} ms limit", ms, MAX_WAIT_MS)));
            }
        }
        for (field, key) in [("cast_key", &self.cast_key), ("modifier_key", &self.modifier_key)] {
            if !is_known_key(key) {
                return Err(invalid(field, format!("unknown key '{}'", key)));
            }
        }
        Ok(())
    }

    pub fn bite_timeout(&self) -> Duration {
        Duration::from_millis(self.bite_timeout_ms)
    }

    pub fn splash_timeout(&self) -> Duration {
        Duration::from_millis(self.splash_timeout_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Get settings file path
pub fn get_settings_path() -> PathBuf {
    get_data_dir().join("config").join("settings.json")
}
