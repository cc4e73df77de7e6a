//! Reading attention simulator
//!
//! Models eye movement over visible text as fixation/saccade timing:
//! each text region is split into saccade-width segments, each segment
//! gets a fixation pause, and occasional regressions jump back to
//! re-read earlier segments. The pointer tracks each segment's
//! approximate location as a proxy for gaze.

use crate::driver::{BoundingBox, Driver};
use crate::error::Result;
use crate::sampling::Sampler;
use crate::stats::ReadingStats;
use std::time::Duration;
use tokio::time::sleep;

/// Spend `budget` reading the given text regions
///
/// Regions are consumed top to bottom; when the budget runs out the
/// read stops mid-region, and when the regions run out first the
/// remainder of the budget is spent as idle dwell. Returns the total
/// simulated time, which always lands within a fixation of the budget.
pub async fn read_regions(
    driver: &dyn Driver,
    sampler: &mut Sampler,
    stats: &ReadingStats,
    regions: &[BoundingBox],
    fixation_multiplier: f64,
    fatigue: f64,
    budget: Duration,
) -> Result<Duration> {
    let fatigue = fatigue.max(1.0);
    let mut spent = Duration::ZERO;

    'regions: for region in regions {
        if spent >= budget {
            break;
        }
        if !region.is_visible() {
            continue;
        }

        let segments = segment_count(stats, region);
        let segment_width = region.width / segments as f64;
        let mut segment = 0usize;
        while segment < segments {
            gaze_at(driver, sampler, region, segment, segment_width).await?;

            let fixation = sampler.duration_ms(
                stats.fixation_min_ms * fixation_multiplier * fatigue,
                stats.fixation_max_ms * fixation_multiplier * fatigue,
            );
            sleep(fixation).await;
            spent += fixation;
            if spent >= budget {
                break 'regions;
            }

            let saccade = sampler.duration_ms(stats.saccade_min_ms, stats.saccade_max_ms);
            sleep(saccade).await;
            spent += saccade;

            if sampler.chance(stats.regression_probability) {
                let back = sampler.range_u32(
                    stats.regression_min_segments,
                    stats.regression_max_segments,
                ) as usize;
                segment = segment.saturating_sub(back);
            } else {
                segment += 1;
            }
        }
    }

    if spent < budget {
        let remainder = budget - spent;
        timed_wait(remainder).await;
        spent += remainder;
    }
    Ok(spent)
}

/// Idle dwell for pages with nothing left to read
pub async fn timed_wait(duration: Duration) {
    sleep(duration).await;
}

/// Segments a region's text occupies, at least one
fn segment_count(stats: &ReadingStats, region: &BoundingBox) -> usize {
    let chars = region.width / stats.px_per_char.max(1.0);
    let segments = (chars / stats.chars_per_segment.max(1.0)).ceil();
    (segments as usize).max(1)
}

/// Move the pointer near a segment's center, with a loose hand
async fn gaze_at(
    driver: &dyn Driver,
    sampler: &mut Sampler,
    region: &BoundingBox,
    segment: usize,
    segment_width: f64,
) -> Result<()> {
    let x = region.x + (segment as f64 + 0.5) * segment_width + sampler.range(-4.0, 4.0);
    let y = region.y + region.height / 2.0 + sampler.range(-3.0, 3.0);
    driver.move_to(x, y).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(width: f64) -> BoundingBox {
        BoundingBox {
            x: 40.0,
            y: 120.0,
            width,
            height: 22.0,
        }
    }

    #[test]
    fn test_segment_count_scales_with_width() {
        let stats = ReadingStats::default();
        // 8 px/char, 8 chars/segment: 640 px is ten segments
        assert_eq!(segment_count(&stats, &region(640.0)), 10);
        assert_eq!(segment_count(&stats, &region(64.0)), 1);
        // Never zero, even for a sliver
        assert_eq!(segment_count(&stats, &region(1.0)), 1);
    }

    mod playback {
        use super::*;
        use crate::driver::{Point, Viewport};
        use async_trait::async_trait;
        use std::sync::Mutex;

        struct NullDriver {
            moves: Mutex<Vec<Point>>,
        }

        impl NullDriver {
            fn new() -> Self {
                Self {
                    moves: Mutex::new(Vec::new()),
                }
            }
        }

        #[async_trait]
        impl Driver for NullDriver {
            async fn move_to(&self, x: f64, y: f64) -> Result<()> {
                self.moves.lock().unwrap().push(Point::new(x, y));
                Ok(())
            }
            async fn mouse_down(&self) -> Result<()> {
                Ok(())
            }
            async fn mouse_up(&self) -> Result<()> {
                Ok(())
            }
            async fn press_key(&self, _key: &str) -> Result<()> {
                Ok(())
            }
            async fn release_key(&self, _key: &str) -> Result<()> {
                Ok(())
            }
            async fn scroll_by(&self, _delta_y: f64) -> Result<()> {
                Ok(())
            }
            async fn bounding_box(&self, _selector: &str) -> Result<Option<BoundingBox>> {
                Ok(None)
            }
            async fn text_regions(&self) -> Result<Vec<BoundingBox>> {
                Ok(Vec::new())
            }
            async fn interactive_regions(&self, _limit: usize) -> Result<Vec<BoundingBox>> {
                Ok(Vec::new())
            }
            async fn read_value(&self, _selector: &str) -> Result<Option<String>> {
                Ok(None)
            }
            async fn viewport(&self) -> Result<Option<Viewport>> {
                Ok(None)
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_budget_is_spent_even_without_regions() {
            let driver = NullDriver::new();
            let mut sampler = Sampler::seeded(1);
            let stats = ReadingStats::default();
            let budget = Duration::from_millis(400);
            let spent = read_regions(&driver, &mut sampler, &stats, &[], 1.0, 1.0, budget)
                .await
                .unwrap();
            assert_eq!(spent, budget);
        }

        #[tokio::test(start_paused = true)]
        async fn test_reading_covers_at_least_the_budget() {
            let driver = NullDriver::new();
            let mut sampler = Sampler::seeded(2);
            let stats = ReadingStats::default();
            let regions = vec![region(600.0), region(480.0), region(520.0)];
            let budget = Duration::from_millis(1500);
            let spent = read_regions(
                &driver,
                &mut sampler,
                &stats,
                &regions,
                1.0,
                1.0,
                budget,
            )
            .await
            .unwrap();
            assert!(spent >= budget);
            // Overshoot bounded by a single fixation plus saccade
            let slack = Duration::from_millis(
                (stats.fixation_max_ms + stats.saccade_max_ms) as u64 + 1,
            );
            assert!(spent <= budget + slack);
        }

        #[tokio::test(start_paused = true)]
        async fn test_pointer_tracks_the_text_being_read() {
            let driver = NullDriver::new();
            let mut sampler = Sampler::seeded(8);
            let stats = ReadingStats::default();
            let line = region(640.0);
            let budget = Duration::from_secs(10);
            read_regions(&driver, &mut sampler, &stats, &[line], 1.0, 1.0, budget)
                .await
                .unwrap();

            let moves = driver.moves.lock().unwrap();
            assert!(!moves.is_empty(), "gaze proxy moved at least once");
            // Every gaze point sits on the line, within the jitter margin
            for p in moves.iter() {
                assert!(p.x >= line.x - 5.0 && p.x <= line.x + line.width + 5.0);
                assert!((p.y - (line.y + line.height / 2.0)).abs() <= 4.0);
            }
            // Gaze spreads across the line rather than pinning one spot
            let min_x = moves.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
            let max_x = moves.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
            assert!(max_x - min_x > line.width / 2.0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_invisible_regions_skipped() {
            let driver = NullDriver::new();
            let mut sampler = Sampler::seeded(3);
            let stats = ReadingStats::default();
            let hidden = BoundingBox {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            };
            let budget = Duration::from_millis(200);
            let spent = read_regions(
                &driver,
                &mut sampler,
                &stats,
                &[hidden],
                1.0,
                1.0,
                budget,
            )
            .await
            .unwrap();
            // Hidden region contributes nothing; the budget is idle dwell
            assert_eq!(spent, budget);
            assert!(driver.moves.lock().unwrap().is_empty());
        }
    }
}
