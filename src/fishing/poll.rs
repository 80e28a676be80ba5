//! Timeout-bounded polling on top of the pixel scans

use std::time::Duration;

use super::clock::Clock;
use crate::error::DetectResult;
use crate::screen_reader::{CaptureBackend, Color, Coordinate, PixelService, Region};

/// Invoke `check` back to back until it yields a value or `timeout` passes.
///
/// The deadline is fixed before the first attempt and checked before every
/// attempt, so an attempt that starts in time always runs to completion.
/// A zero timeout makes no attempt at all. There is no pause between
/// attempts; each check's own capture cost paces the loop. Check errors end
/// the poll immediately.
pub fn poll_until<T, K, F>(clock: &K, timeout: Duration, mut check: F) -> DetectResult<Option<T>>
where
    K: Clock + ?Sized,
    F: FnMut() -> DetectResult<Option<T>>,
{
    let deadline = clock.now() + timeout;
    let mut attempts = 0u32;

    while clock.now() < deadline {
        attempts += 1;
        if let Some(value) = check()? {
            tracing::trace!("[POLL] satisfied after {} attempt(s)", attempts);
            return Ok(Some(value));
        }
    }

    tracing::trace!("[POLL] timed out after {} attempt(s) ({:?})", attempts, timeout);
    Ok(None)
}

/// Poll for the first exact `target` pixel in `region`
pub fn await_color_found<C, K>(
    pixels: &mut PixelService<C>,
    clock: &K,
    target: Color,
    region: &Region,
    timeout: Duration,
) -> DetectResult<Option<Coordinate>>
where
    C: CaptureBackend,
    K: Clock + ?Sized,
{
    poll_until(clock, timeout, || pixels.find_color(region, target))
}

/// Poll until at least `threshold` pixels in `region` fuzzily match `target`.
///
/// Returns the count that satisfied the threshold.
pub fn await_color_count<C, K>(
    pixels: &mut PixelService<C>,
    clock: &K,
    target: Color,
    threshold: usize,
    tolerance: f64,
    region: &Region,
    timeout: Duration,
) -> DetectResult<Option<usize>>
where
    C: CaptureBackend,
    K: Clock + ?Sized,
{
    poll_until(clock, timeout, || {
        let count = pixels.count_color(region, target, tolerance)?;
        Ok((count >= threshold).then_some(count))
    })
}
