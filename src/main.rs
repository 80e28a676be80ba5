//! Splash Angler - pixel-color fishing bot
//!
//! Startup: logging, configuration, a calibration snapshot of the fishing
//! area, a short grace period to focus the game, then the fishing loop until
//! Ctrl+C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use splash_angler::log_main::{
    append_catch, get_fishing_log_path, get_sessions_path, start_session, stop_session, CatchLogEntry,
};
use splash_angler::utils::resolve_data_path;
use splash_angler::{
    get_data_dir, Clock, EnigoInput, FishingConfig, FishingStateMachine, PixelService, ScreenService,
    SessionStats, SystemClock, TickOutcome,
};

/// Log filter configuration:
/// - Sets default level to 'info'
/// - Sets verbose external crates to 'warn' to filter out their debug/trace logs
const LOG_FILTER: &str = "info,splash_angler=info,screenshots=warn";

fn init_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_dir = get_data_dir().join("debug").join("log");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_file_path = log_dir.join("debug.log");
    let file_result = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(LOG_FILTER));

    match file_result {
        Ok(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(tracing_subscriber::fmt::layer())
                .init();

            tracing::info!("[INIT] Logging initialized, file: {:?}", log_file_path);
        }
        Err(e) => {
            // Fallback: stdout-only logging with same filter
            tracing_subscriber::fmt().with_env_filter(env_filter).init();
            tracing::warn!("[INIT] Failed to create debug log file at {:?}: {}", log_file_path, e);
        }
    }
}

fn record_outcome(outcome: &TickOutcome, stats: &SessionStats) {
    let Some(entry) = CatchLogEntry::from_outcome(outcome) else {
        return;
    };
    if let Err(e) = append_catch(&get_fishing_log_path(), entry) {
        tracing::warn!("[LOG] Failed to record catch: {:#}", e);
    }
    tracing::debug!(
        "[STATS] casts={}, catches={}, rate={:.1}%",
        stats.casts,
        stats.catches,
        stats.catch_rate()
    );
}

fn main() -> Result<()> {
    init_logging();
    tracing::info!("Splash Angler {}", env!("CARGO_PKG_VERSION"));

    let config = FishingConfig::load().context("Failed to load configuration")?;
    tracing::info!(
        "[INIT] Fishing area {}, feather {}, splash {} (threshold {}, tolerance {})",
        config.fishing_area,
        config.marker_color,
        config.splash_color,
        config.splash_threshold,
        config.splash_tolerance
    );

    let input = EnigoInput::new().context("Failed to initialize input simulation")?;

    if let Some(snapshot) = &config.debug_snapshot {
        let path = resolve_data_path(snapshot);
        let mut pixels = PixelService::new(ScreenService::new());
        match pixels.save_region_snapshot(&config.fishing_area, &path) {
            Ok(()) => tracing::info!("[INIT] Fishing area snapshot written to {:?}", path),
            Err(e) => tracing::warn!("[INIT] Fishing area snapshot failed: {:#}", e),
        }
    }

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        tracing::info!("Stop requested, finishing current step...");
        handler_flag.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")?;

    tracing::info!("waiting...");
    SystemClock.sleep(config.startup_delay());
    tracing::info!("start");

    let sessions_path = get_sessions_path();
    if let Err(e) = start_session(&sessions_path) {
        tracing::warn!("[SESSION] Failed to record session start: {:#}", e);
    }

    let mut machine = FishingStateMachine::new(
        config,
        ScreenService::new(),
        input,
        SystemClock,
        StdRng::from_os_rng(),
    );
    let result = machine.run(&running, record_outcome);

    if let Err(e) = stop_session(&sessions_path) {
        tracing::warn!("[SESSION] Failed to record session stop: {:#}", e);
    }

    let stats = machine.stats();
    tracing::info!(
        "Session over: casts={}, catches={}, missed bites={}, missed splashes={}, rate={:.1}%",
        stats.casts,
        stats.catches,
        stats.missed_bites,
        stats.missed_splashes,
        stats.catch_rate()
    );

    if let Err(e) = &result {
        tracing::error!("Stopped in state '{}': {}", machine.state().description(), e);
    }
    result.context("Fishing loop failed")
}
