//! Scroll inertia simulator
//!
//! Emits wheel ticks at display rate with an acceleration/decay velocity
//! envelope, so a scroll gesture ramps up, cruises, and eases out instead
//! of jumping. Runs occasionally pause mid-flight to read revealed
//! content and occasionally reverse a short way afterwards, the way
//! readers back up to something they scrolled past.

use super::reading::read_regions;
use crate::driver::Driver;
use crate::error::Result;
use crate::sampling::Sampler;
use crate::stats::{ReadingStats, ScrollingStats};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;

/// Vertical scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Toward the bottom of the page (positive wheel delta)
    Down,
    /// Toward the top of the page
    Up,
}

impl ScrollDirection {
    fn sign(self) -> f64 {
        match self {
            ScrollDirection::Down => 1.0,
            ScrollDirection::Up => -1.0,
        }
    }

    fn reversed(self) -> Self {
        match self {
            ScrollDirection::Down => ScrollDirection::Up,
            ScrollDirection::Up => ScrollDirection::Down,
        }
    }
}

/// Perform one scroll gesture, returning the net signed distance
///
/// With `distance` absent, the length is drawn from the short/medium/long
/// bucket distribution. The requested distance is always delivered in
/// full; the velocity envelope only shapes how it is spread over ticks,
/// with `fatigue` damping the peak velocity and lengthening the reading
/// pause. A mid-run pause hands the newly revealed text to the reading
/// simulator. A possible reversal afterwards subtracts from the
/// returned net, which is positive for [`ScrollDirection::Down`].
#[allow(clippy::too_many_arguments)]
pub async fn scroll_run(
    driver: &dyn Driver,
    sampler: &mut Sampler,
    stats: &ScrollingStats,
    reading: &ReadingStats,
    direction: ScrollDirection,
    distance: Option<f64>,
    fixation_multiplier: f64,
    fatigue: f64,
) -> Result<f64> {
    let distance = match distance {
        Some(d) => d.abs(),
        None => sample_distance(sampler, stats),
    };
    run_inner(
        driver,
        sampler,
        stats,
        reading,
        direction,
        distance,
        fixation_multiplier,
        fatigue,
        true,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
fn run_inner<'a>(
    driver: &'a dyn Driver,
    sampler: &'a mut Sampler,
    stats: &'a ScrollingStats,
    reading: &'a ReadingStats,
    direction: ScrollDirection,
    distance: f64,
    fixation_multiplier: f64,
    fatigue: f64,
    allow_reverse: bool,
) -> Pin<Box<dyn Future<Output = Result<f64>> + Send + 'a>> {
    Box::pin(async move {
        let sign = direction.sign();
        let tick = Duration::from_millis(stats.tick_ms.max(1));
        // A tired session flicks the wheel more gently, spreading the
        // same distance over more, smaller ticks
        let peak = (sampler.range(stats.peak_velocity_min, stats.peak_velocity_max)
            / fatigue.max(1.0))
        .max(stats.acceleration.max(1.0));
        // One mid-run reading pause at most, decided up front
        let mut pause_at = if sampler.chance(stats.read_pause_probability) {
            Some(distance * sampler.range(0.3, 0.7))
        } else {
            None
        };

        let mut remaining = distance;
        let mut velocity = 0.0f64;
        let mut decaying = false;
        while remaining > 0.0 {
            if decaying {
                velocity = (velocity * stats.decay_factor).max(stats.stop_velocity.max(0.5));
            } else {
                velocity = (velocity + stats.acceleration).min(peak);
                // Begin easing out with enough runway to slow down
                if remaining < velocity * 8.0 {
                    decaying = true;
                }
            }

            let delta = velocity.min(remaining);
            driver.scroll_by(delta * sign).await?;
            remaining -= delta;

            if let Some(threshold) = pause_at {
                if distance - remaining >= threshold {
                    pause_at = None;
                    // Glance over whatever the scroll just revealed
                    let pause = sampler.duration_ms(
                        stats.read_pause_min_ms * fatigue.max(1.0),
                        stats.read_pause_max_ms * fatigue.max(1.0),
                    );
                    let regions = driver.text_regions().await?;
                    read_regions(
                        driver,
                        sampler,
                        reading,
                        &regions,
                        fixation_multiplier,
                        fatigue,
                        pause,
                    )
                    .await?;
                }
            }
            sleep(tick).await;
        }

        let mut net = distance * sign;
        if allow_reverse && sampler.chance(stats.reverse_probability) {
            let back = distance * stats.reverse_fraction.clamp(0.0, 1.0);
            if back >= 1.0 {
                sleep(sampler.duration_ms(stats.read_pause_min_ms, stats.read_pause_max_ms))
                    .await;
                net += run_inner(
                    driver,
                    sampler,
                    stats,
                    reading,
                    direction.reversed(),
                    back,
                    fixation_multiplier,
                    fatigue,
                    false,
                )
                .await?;
            }
        }
        Ok(net)
    })
}

/// Draw a scroll length from the bucket distribution
fn sample_distance(sampler: &mut Sampler, stats: &ScrollingStats) -> f64 {
    let weights = [stats.weight_short, stats.weight_medium, stats.weight_long];
    match sampler.weighted_index(&weights) {
        0 => sampler.range(stats.short_min, stats.short_max),
        1 => sampler.range(stats.medium_min, stats.medium_max),
        _ => sampler.range(stats.long_min, stats.long_max),
    }
}
