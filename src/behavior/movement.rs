//! Pointer movement planner
//!
//! Turns a start point, target point, and target width into a
//! time-annotated path: a cubic Bézier curve with perturbed control
//! points, mid-flight submovement corrections, optional overshoot with
//! a corrective sub-path, per-waypoint hand tremor, and an asymmetric
//! velocity profile. Total travel time comes from Fitts's Law scaled by
//! the profile's pointer speed and the session fatigue multiplier.

use crate::driver::{Driver, Point};
use crate::error::Result;
use crate::sampling::{fitts_duration_ms, Sampler};
use crate::stats::MotionStats;
use std::time::Duration;
use tokio::time::sleep;

/// One waypoint with the dwell before moving past it
#[derive(Debug, Clone, Copy)]
pub struct MovementStep {
    /// Page coordinates to move through
    pub point: Point,
    /// Delay after reaching this waypoint
    pub delay: Duration,
}

/// A fully planned pointer gesture
#[derive(Debug, Clone)]
pub struct MovementPlan {
    /// Ordered waypoints, already jittered
    pub steps: Vec<MovementStep>,
    /// Exact final coordinates, replayed once after the waypoints
    pub target: Point,
    /// Sum of all step delays
    pub total: Duration,
}

/// Plan a pointer movement from `start` to `target`
///
/// `target_width` feeds the Fitts's-Law precision term; smaller targets
/// take longer. `speed_multiplier` is the profile's pointer speed
/// (divides the duration), `fatigue` the session multiplier (extends
/// it). A zero-distance movement still produces the minimum waypoint
/// count so the gesture reads as a settling hand, not a teleport.
pub fn plan_movement(
    sampler: &mut Sampler,
    stats: &MotionStats,
    start: Point,
    target: Point,
    target_width: f64,
    speed_multiplier: f64,
    fatigue: f64,
) -> MovementPlan {
    let distance = start.distance_to(target);
    let base_ms = fitts_duration_ms(distance, target_width, stats.fitts_a_ms, stats.fitts_b_ms);
    let duration_ms = (base_ms / speed_multiplier.max(0.05) * fatigue.max(1.0))
        .clamp(stats.min_duration_ms, stats.max_duration_ms);

    let count = ((duration_ms / 1000.0) * stats.samples_per_second) as usize;
    let count = count.max(stats.min_waypoints);

    let mut points = bezier_waypoints(sampler, stats, start, target, distance, count);
    inject_submovements(sampler, stats, &mut points);
    apply_tremor(sampler, stats, &mut points);
    if distance > 0.0 && sampler.chance(stats.overshoot_probability) {
        append_overshoot(sampler, stats, target, &mut points);
    }

    let steps = pace_waypoints(sampler, stats, points, duration_ms);
    let total = steps.iter().map(|s| s.delay).sum();

    MovementPlan {
        steps,
        target,
        total,
    }
}

/// Play a plan through the driver
///
/// Each waypoint is issued and its dwell awaited before the next; after
/// the last waypoint the driver is commanded to the exact target once
/// more, so accumulated jitter never shifts the landing pixel.
pub async fn play_movement(driver: &dyn Driver, plan: &MovementPlan) -> Result<()> {
    for step in &plan.steps {
        driver.move_to(step.point.x, step.point.y).await?;
        sleep(step.delay).await;
    }
    driver.move_to(plan.target.x, plan.target.y).await
}

/// Sample the cubic Bézier spine of the path
fn bezier_waypoints(
    sampler: &mut Sampler,
    stats: &MotionStats,
    start: Point,
    target: Point,
    distance: f64,
    count: usize,
) -> Vec<Point> {
    // Control-point spread shrinks with short movements so small
    // corrections do not loop across the page.
    let spread = stats.control_point_spread.min(distance * 0.4).max(2.0);
    let cp1 = Point::new(
        start.x + (target.x - start.x) * 0.25 + sampler.range(-spread, spread),
        start.y + (target.y - start.y) * 0.25 + sampler.range(-spread, spread),
    );
    let cp2 = Point::new(
        start.x + (target.x - start.x) * 0.75 + sampler.range(-spread * 0.6, spread * 0.6),
        start.y + (target.y - start.y) * 0.75 + sampler.range(-spread * 0.6, spread * 0.6),
    );

    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let t = if count > 1 {
            i as f64 / (count - 1) as f64
        } else {
            1.0
        };
        points.push(cubic_bezier(t, start, cp1, cp2, target));
    }
    points
}

fn cubic_bezier(t: f64, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    Point::new(
        mt2 * mt * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t2 * t * p3.x,
        mt2 * mt * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t2 * t * p3.y,
    )
}

/// Small deviations in the final ~30% of the path, where a real hand
/// makes its closed-loop corrections
fn inject_submovements(sampler: &mut Sampler, stats: &MotionStats, points: &mut [Point]) {
    if points.len() < 4 {
        return;
    }
    let from = (points.len() as f64 * 0.7) as usize;
    let to = points.len() - 1;
    if from >= to {
        return;
    }
    let count = sampler.range_u32(stats.submovement_min, stats.submovement_max);
    for _ in 0..count {
        let idx = from + (sampler.range(0.0, (to - from) as f64) as usize).min(to - from - 1);
        let amp = stats.submovement_amplitude;
        points[idx].x += sampler.range(-amp, amp);
        points[idx].y += sampler.range(-amp, amp);
    }
}

/// Per-waypoint micro-tremor, resampled at every point
fn apply_tremor(sampler: &mut Sampler, stats: &MotionStats, points: &mut [Point]) {
    let amp = stats.tremor_amplitude;
    if amp <= 0.0 {
        return;
    }
    for point in points.iter_mut().skip(1) {
        point.x += sampler.range(-amp, amp);
        point.y += sampler.range(-amp, amp);
    }
}

/// Shoot past the target along the approach vector, then walk back
fn append_overshoot(
    sampler: &mut Sampler,
    stats: &MotionStats,
    target: Point,
    points: &mut Vec<Point>,
) {
    let approach_from = if points.len() >= 2 {
        points[points.len() - 2]
    } else {
        return;
    };
    let dx = target.x - approach_from.x;
    let dy = target.y - approach_from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < f64::EPSILON {
        return;
    }
    let magnitude = sampler.range(stats.overshoot_min, stats.overshoot_max);
    let over = Point::new(
        target.x + dx / len * magnitude,
        target.y + dy / len * magnitude,
    );
    points.push(over);
    // Fixed-length corrective sub-path back to the target
    for i in 1..=stats.correction_steps {
        let t = i as f64 / stats.correction_steps as f64;
        points.push(Point::new(
            over.x + (target.x - over.x) * t,
            over.y + (target.y - over.y) * t,
        ));
    }
}

/// Distribute the total duration over the waypoints with an asymmetric
/// velocity profile: linear rise to full speed at the sampled peak
/// fraction, then linear decay to half speed at the end
fn pace_waypoints(
    sampler: &mut Sampler,
    stats: &MotionStats,
    points: Vec<Point>,
    duration_ms: f64,
) -> Vec<MovementStep> {
    let count = points.len().max(1);
    let peak = sampler.range(stats.velocity_peak_min, stats.velocity_peak_max);
    let base_step_ms = duration_ms / count as f64;

    points
        .into_iter()
        .enumerate()
        .map(|(i, point)| {
            let progress = if count > 1 {
                i as f64 / (count - 1) as f64
            } else {
                1.0
            };
            let velocity = velocity_at(progress, peak);
            let delay_ms = (base_step_ms / velocity).max(0.0);
            MovementStep {
                point,
                delay: Duration::from_micros((delay_ms * 1000.0) as u64),
            }
        })
        .collect()
}

/// Velocity multiplier at a path fraction; bounded within [0.4, 1.0]
/// so no step delay degenerates to zero or infinity
fn velocity_at(progress: f64, peak: f64) -> f64 {
    const START_VELOCITY: f64 = 0.4;
    const END_VELOCITY: f64 = 0.5;
    let peak = peak.clamp(0.05, 0.95);
    if progress <= peak {
        START_VELOCITY + (1.0 - START_VELOCITY) * (progress / peak)
    } else {
        1.0 - (1.0 - END_VELOCITY) * ((progress - peak) / (1.0 - peak))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MotionStats;

    fn quick_stats() -> MotionStats {
        MotionStats {
            min_duration_ms: 10.0,
            max_duration_ms: 60.0,
            ..MotionStats::default()
        }
    }

    #[test]
    fn test_plan_meets_minimum_waypoints() {
        let mut sampler = Sampler::seeded(1);
        let stats = MotionStats::default();
        let plan = plan_movement(
            &mut sampler,
            &stats,
            Point::new(100.0, 100.0),
            Point::new(100.0, 100.0),
            100.0,
            1.0,
            1.0,
        );
        assert!(plan.steps.len() >= stats.min_waypoints);
        assert_eq!(plan.target, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_longer_distance_longer_duration() {
        let stats = MotionStats::default();
        let mut sampler = Sampler::seeded(2);
        let near = plan_movement(
            &mut sampler,
            &stats,
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            40.0,
            1.0,
            1.0,
        );
        let far = plan_movement(
            &mut sampler,
            &stats,
            Point::new(0.0, 0.0),
            Point::new(1200.0, 600.0),
            40.0,
            1.0,
            1.0,
        );
        assert!(far.total > near.total);
        assert!(far.steps.len() > near.steps.len());
    }

    #[test]
    fn test_all_delays_non_negative_and_bounded() {
        let stats = MotionStats::default();
        for seed in 0..20 {
            let mut sampler = Sampler::seeded(seed);
            let plan = plan_movement(
                &mut sampler,
                &stats,
                Point::new(10.0, 10.0),
                Point::new(900.0, 400.0),
                24.0,
                0.8,
                1.3,
            );
            for step in &plan.steps {
                assert!(step.delay >= Duration::ZERO);
                // A single step never exceeds the whole budget
                assert!(step.delay.as_secs_f64() * 1000.0 <= stats.max_duration_ms * 2.5 + 1.0);
            }
        }
    }

    #[test]
    fn test_fatigue_extends_duration() {
        let stats = MotionStats::default();
        let mut a = Sampler::seeded(7);
        let mut b = Sampler::seeded(7);
        let fresh = plan_movement(
            &mut a,
            &stats,
            Point::new(0.0, 0.0),
            Point::new(600.0, 300.0),
            40.0,
            1.0,
            1.0,
        );
        let tired = plan_movement(
            &mut b,
            &stats,
            Point::new(0.0, 0.0),
            Point::new(600.0, 300.0),
            40.0,
            1.0,
            1.4,
        );
        assert!(tired.total > fresh.total);
    }

    #[test]
    fn test_velocity_profile_bounds() {
        for peak in [0.35, 0.4, 0.5] {
            for i in 0..=100 {
                let v = velocity_at(i as f64 / 100.0, peak);
                assert!((0.4..=1.0).contains(&v));
            }
            // Full speed exactly at the peak, half speed at the end
            assert!((velocity_at(peak, peak) - 1.0).abs() < 1e-9);
            assert!((velocity_at(1.0, peak) - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_path_is_curved_not_straight() {
        let stats = MotionStats::default();
        let mut sampler = Sampler::seeded(5);
        let plan = plan_movement(
            &mut sampler,
            &stats,
            Point::new(0.0, 0.0),
            Point::new(800.0, 0.0),
            40.0,
            1.0,
            1.0,
        );
        // With perturbed control points at least one waypoint leaves the
        // straight line between start and target by more than the tremor
        let max_off_axis = plan
            .steps
            .iter()
            .map(|s| s.point.y.abs())
            .fold(0.0, f64::max);
        assert!(max_off_axis > stats.tremor_amplitude);
    }

    #[tokio::test]
    async fn test_playback_lands_exactly_on_target() {
        use crate::driver::{BoundingBox, Viewport};
        use async_trait::async_trait;
        use std::sync::Mutex;

        struct RecordingDriver {
            moves: Mutex<Vec<Point>>,
        }

        #[async_trait]
        impl Driver for RecordingDriver {
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

        let driver = RecordingDriver {
            moves: Mutex::new(Vec::new()),
        };
        let mut sampler = Sampler::seeded(9);
        let stats = quick_stats();
        let target = Point::new(640.0, 360.0);
        let plan = plan_movement(
            &mut sampler,
            &stats,
            Point::new(5.0, 5.0),
            target,
            30.0,
            1.0,
            1.0,
        );
        play_movement(&driver, &plan).await.unwrap();

        let moves = driver.moves.lock().unwrap();
        assert!(moves.len() >= stats.min_waypoints);
        assert_eq!(*moves.last().unwrap(), target);
    }
}
