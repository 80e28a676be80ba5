//! Cast → bite → splash → catch sequencing

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use super::clock::Clock;
use super::poll::{await_color_count, await_color_found};
use crate::error::DetectResult;
use crate::input::InputBackend;
use crate::screen_reader::{CaptureBackend, Coordinate, PixelService, Region};
use crate::utils::settings::FishingConfig;

/// Where the bot is in the fishing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishingState {
    /// Ready to cast
    Idle,
    /// Line is out, watching the fishing area for the feather
    AwaitingBite,
    /// Feather seen at `marker`, watching `area` for the splash
    AwaitingSplash { marker: Coordinate, area: Region },
    /// Splash seen, reel in at `marker`
    Catching { marker: Coordinate },
}

impl FishingState {
    /// Get human-readable description of the state
    pub fn description(&self) -> &'static str {
        match self {
            FishingState::Idle => "Idle",
            FishingState::AwaitingBite => "Waiting for the feather...",
            FishingState::AwaitingSplash { .. } => "Waiting for a splash...",
            FishingState::Catching { .. } => "Reeling in",
        }
    }
}

/// What a single [`FishingStateMachine::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickOutcome {
    Cast,
    BiteFound { marker: Coordinate },
    NoBite,
    SplashDetected { marker: Coordinate, count: usize },
    NoSplash,
    Caught { marker: Coordinate },
}

impl TickOutcome {
    /// True for outcomes after which the bot casts again
    pub fn ends_cycle(&self) -> bool {
        matches!(self, TickOutcome::NoBite | TickOutcome::NoSplash | TickOutcome::Caught { .. })
    }
}

/// Counters for the current run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub casts: u32,
    pub catches: u32,
    pub missed_bites: u32,
    pub missed_splashes: u32,
}

impl SessionStats {
    /// Catches per cast, in percent
    pub fn catch_rate(&self) -> f64 {
        if self.casts > 0 {
            (self.catches as f64 / self.casts as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// The fishing loop as an explicit state machine.
///
/// Each [`tick`](Self::tick) runs the current state's work to completion,
/// including any polling or waits, and moves to the next state.
pub struct FishingStateMachine<C, I, K, R> {
    config: FishingConfig,
    pixels: PixelService<C>,
    input: I,
    clock: K,
    rng: R,
    state: FishingState,
    stats: SessionStats,
}

impl<C, I, K, R> FishingStateMachine<C, I, K, R>
where
    C: CaptureBackend,
    I: InputBackend,
    K: Clock,
    R: Rng,
{
    pub fn new(config: FishingConfig, capture: C, input: I, clock: K, rng: R) -> Self {
        Self {
            config,
            pixels: PixelService::new(capture),
            input,
            clock,
            rng,
            state: FishingState::Idle,
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> FishingState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> &FishingConfig {
        &self.config
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn capture_backend(&self) -> &C {
        self.pixels.capture_backend()
    }

    /// Advance by one state. Structural errors leave the state unchanged.
    pub fn tick(&mut self) -> DetectResult<TickOutcome> {
        let (next, outcome) = match self.state {
            FishingState::Idle => {
                tracing::info!("[CAST] Casting line");
                self.input.tap_key(&self.config.cast_key);
                self.stats.casts += 1;
                (FishingState::AwaitingBite, TickOutcome::Cast)
            }

            FishingState::AwaitingBite => {
                let found = await_color_found(
                    &mut self.pixels,
                    &self.clock,
                    self.config.marker_color,
                    &self.config.fishing_area,
                    self.config.bite_timeout(),
                )?;

                match found {
                    Some(marker) => {
                        let area = self.config.splash_window.around(marker);
                        tracing::info!("[BITE] Feather at {}", marker);
                        tracing::debug!("[BITE] Watching {} for splash", area);
                        (
                            FishingState::AwaitingSplash { marker, area },
                            TickOutcome::BiteFound { marker },
                        )
                    }
                    None => {
                        tracing::info!("[BITE] Feather not found, no fish caught");
                        self.stats.missed_bites += 1;
                        (FishingState::Idle, TickOutcome::NoBite)
                    }
                }
            }

            FishingState::AwaitingSplash { marker, area } => {
                let reached = await_color_count(
                    &mut self.pixels,
                    &self.clock,
                    self.config.splash_color,
                    self.config.splash_threshold,
                    self.config.splash_tolerance,
                    &area,
                    self.config.splash_timeout(),
                )?;

                match reached {
                    Some(count) => {
                        tracing::info!("[SPLASH] Splash detected");
                        tracing::debug!("[SPLASH] {} matching pixels in {}", count, area);
                        (
                            FishingState::Catching { marker },
                            TickOutcome::SplashDetected { marker, count },
                        )
                    }
                    // Silent re-cast; a missed bite is the only miss that gets reported
                    None => {
                        self.stats.missed_splashes += 1;
                        (FishingState::Idle, TickOutcome::NoSplash)
                    }
                }
            }

            FishingState::Catching { marker } => {
                self.reel_in(marker);
                self.stats.catches += 1;
                tracing::info!("[CATCH] Fish caught");
                (FishingState::Idle, TickOutcome::Caught { marker })
            }
        };

        self.state = next;
        Ok(outcome)
    }

    /// Tick until `running` is cleared, handing every outcome to `on_outcome`.
    ///
    /// The flag is checked between ticks only; a tick in progress finishes first.
    pub fn run<F>(&mut self, running: &AtomicBool, mut on_outcome: F) -> DetectResult<()>
    where
        F: FnMut(&TickOutcome, &SessionStats),
    {
        while running.load(Ordering::SeqCst) {
            let outcome = self.tick()?;
            on_outcome(&outcome, &self.stats);
        }
        tracing::debug!("[RUN] Stopped in state {:?}", self.state);
        Ok(())
    }

    fn reel_in(&mut self, marker: Coordinate) {
        let jitter = self.click_delay();
        let modifier = self.config.modifier_key.as_str();
        tracing::debug!("[CATCH] Clicking {} after {:?}", marker, jitter);

        self.input.move_cursor(marker.x, marker.y);
        self.input.key_down(modifier);
        self.clock.sleep(jitter);
        self.input.click(self.config.catch_button);
        self.clock.sleep(self.config.release_delay());
        self.input.key_up(modifier);
        self.clock.sleep(self.config.cooldown());
        self.input.move_cursor(Coordinate::ORIGIN.x, Coordinate::ORIGIN.y);
    }

    fn click_delay(&mut self) -> Duration {
        let range = self.config.click_jitter_ms;
        Duration::from_millis(self.rng.random_range(range.min..range.max))
    }
}
