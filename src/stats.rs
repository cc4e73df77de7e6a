//! Statistical configuration tables for human behavior
//!
//! These tables describe the population-level distributions the
//! simulators sample from: pointer kinematics, inter-keystroke latency,
//! reading fixations, scroll inertia, and interaction pauses. They are
//! supplied once at construction, shared read-only for the life of the
//! session, and never mutated at runtime. `Default` carries the built-in
//! values; a bundle can also be deserialized wholesale from JSON to
//! override them.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Full statistics bundle consumed by a simulator instance
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatsBundle {
    /// Pointer motion distributions
    pub motion: MotionStats,
    /// Keystroke timing distributions
    pub typing: TypingStats,
    /// Reading fixation/saccade distributions
    pub reading: ReadingStats,
    /// Scroll inertia distributions
    pub scrolling: ScrollingStats,
    /// Composite interaction pause distributions
    pub interaction: InteractionStats,
    /// Session fatigue curve
    pub fatigue: FatigueStats,
}

/// Pointer motion distributions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionStats {
    /// Fitts's Law intercept in milliseconds
    pub fitts_a_ms: f64,
    /// Fitts's Law slope in ms per bit of difficulty
    pub fitts_b_ms: f64,
    /// Floor for any planned movement duration
    pub min_duration_ms: f64,
    /// Ceiling for any planned movement duration
    pub max_duration_ms: f64,
    /// Waypoint sampling rate along the path
    pub samples_per_second: f64,
    /// Minimum waypoint count regardless of duration
    pub min_waypoints: usize,
    /// Maximum perpendicular spread of the Bézier control points, px
    pub control_point_spread: f64,
    /// Fewest mid-flight submovement corrections
    pub submovement_min: u32,
    /// Most mid-flight submovement corrections
    pub submovement_max: u32,
    /// Largest single submovement deviation, px
    pub submovement_amplitude: f64,
    /// Probability of overshooting the target before correcting
    pub overshoot_probability: f64,
    /// Minimum overshoot distance past the target, px
    pub overshoot_min: f64,
    /// Maximum overshoot distance past the target, px
    pub overshoot_max: f64,
    /// Waypoints in the corrective sub-path back from an overshoot
    pub correction_steps: usize,
    /// Hand micro-tremor amplitude, px, resampled per waypoint
    pub tremor_amplitude: f64,
    /// Earliest fraction of the path at which velocity peaks
    pub velocity_peak_min: f64,
    /// Latest fraction of the path at which velocity peaks
    pub velocity_peak_max: f64,
}

impl Default for MotionStats {
    fn default() -> Self {
        Self {
            fitts_a_ms: 50.0,
            fitts_b_ms: 150.0,
            min_duration_ms: 80.0,
            max_duration_ms: 3500.0,
            samples_per_second: 60.0,
            min_waypoints: 20,
            control_point_spread: 90.0,
            submovement_min: 1,
            submovement_max: 3,
            submovement_amplitude: 6.0,
            overshoot_probability: 0.12,
            overshoot_min: 4.0,
            overshoot_max: 18.0,
            correction_steps: 4,
            tremor_amplitude: 1.2,
            velocity_peak_min: 0.35,
            velocity_peak_max: 0.5,
        }
    }
}

/// Keystroke timing distributions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TypingStats {
    /// Relative latency multipliers for common digraphs
    ///
    /// Keys are two-character strings ("th", "he"). Practiced pairs run
    /// faster than the per-character base delay, awkward ones slower.
    pub digraph_latency: HashMap<String, f64>,
    /// Probability the fallback hand-alternation model picks "same hand"
    pub same_hand_probability: f64,
    /// Same-hand digraph multiplier range (slower: one hand repositions)
    pub same_hand_min: f64,
    /// Upper bound of the same-hand multiplier range
    pub same_hand_max: f64,
    /// Different-hand digraph multiplier range (faster: hands overlap)
    pub different_hand_min: f64,
    /// Upper bound of the different-hand multiplier range
    pub different_hand_max: f64,
    /// Mean key hold time before release, ms
    pub hold_mean_ms: f64,
    /// Hold time standard deviation, ms
    pub hold_std_ms: f64,
    /// Hold time floor, ms
    pub hold_min_ms: f64,
    /// Hold time ceiling, ms
    pub hold_max_ms: f64,
    /// Probability of a hesitation pause before a character
    pub thinking_pause_probability: f64,
    /// Shortest hesitation pause, ms
    pub thinking_pause_min_ms: f64,
    /// Longest hesitation pause, ms
    pub thinking_pause_max_ms: f64,
    /// Weight of substitution errors (wrong key pressed)
    pub weight_substitution: f64,
    /// Weight of insertion errors (extra key pressed)
    pub weight_insertion: f64,
    /// Weight of deletion errors (key skipped, then caught)
    pub weight_deletion: f64,
    /// Weight of transposition errors (next key arrives early)
    pub weight_transposition: f64,
    /// Probability a typo is backspaced immediately
    pub immediate_correction_probability: f64,
    /// Shortest pause while noticing a typo, ms
    pub correction_pause_min_ms: f64,
    /// Longest pause while noticing a typo, ms
    pub correction_pause_max_ms: f64,
}

impl Default for TypingStats {
    fn default() -> Self {
        Self {
            digraph_latency: default_digraph_latencies(),
            same_hand_probability: 0.42,
            same_hand_min: 1.05,
            same_hand_max: 1.35,
            different_hand_min: 0.75,
            different_hand_max: 1.05,
            hold_mean_ms: 85.0,
            hold_std_ms: 20.0,
            hold_min_ms: 35.0,
            hold_max_ms: 160.0,
            thinking_pause_probability: 0.04,
            thinking_pause_min_ms: 200.0,
            thinking_pause_max_ms: 700.0,
            weight_substitution: 0.55,
            weight_insertion: 0.2,
            weight_deletion: 0.15,
            weight_transposition: 0.1,
            immediate_correction_probability: 0.85,
            correction_pause_min_ms: 180.0,
            correction_pause_max_ms: 500.0,
        }
    }
}

/// Reading fixation/saccade distributions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadingStats {
    /// Shortest fixation pause on a segment, ms
    pub fixation_min_ms: f64,
    /// Longest fixation pause on a segment, ms
    pub fixation_max_ms: f64,
    /// Shortest saccade jump between segments, ms
    pub saccade_min_ms: f64,
    /// Longest saccade jump between segments, ms
    pub saccade_max_ms: f64,
    /// Characters covered by one saccade segment
    pub chars_per_segment: f64,
    /// Approximate rendered character width, px
    pub px_per_char: f64,
    /// Probability of a backward re-read at each segment
    pub regression_probability: f64,
    /// Fewest segments a regression jumps back
    pub regression_min_segments: u32,
    /// Most segments a regression jumps back
    pub regression_max_segments: u32,
    /// Default reading duration floor when none is requested, ms
    pub default_duration_min_ms: f64,
    /// Default reading duration ceiling when none is requested, ms
    pub default_duration_max_ms: f64,
}

impl Default for ReadingStats {
    fn default() -> Self {
        Self {
            fixation_min_ms: 150.0,
            fixation_max_ms: 320.0,
            saccade_min_ms: 20.0,
            saccade_max_ms: 45.0,
            chars_per_segment: 8.0,
            px_per_char: 8.0,
            regression_probability: 0.07,
            regression_min_segments: 1,
            regression_max_segments: 3,
            default_duration_min_ms: 2500.0,
            default_duration_max_ms: 8000.0,
        }
    }
}

/// Scroll inertia distributions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrollingStats {
    /// Short scroll distance range, px
    pub short_min: f64,
    /// Upper bound of the short bucket, px
    pub short_max: f64,
    /// Medium scroll distance range, px
    pub medium_min: f64,
    /// Upper bound of the medium bucket, px
    pub medium_max: f64,
    /// Long scroll distance range, px
    pub long_min: f64,
    /// Upper bound of the long bucket, px
    pub long_max: f64,
    /// Weight of the short bucket in the distance choice
    pub weight_short: f64,
    /// Weight of the medium bucket
    pub weight_medium: f64,
    /// Weight of the long bucket
    pub weight_long: f64,
    /// Lowest sampled peak velocity, px per tick
    pub peak_velocity_min: f64,
    /// Highest sampled peak velocity, px per tick
    pub peak_velocity_max: f64,
    /// Velocity gained per tick while accelerating, px per tick
    pub acceleration: f64,
    /// Multiplicative velocity decay per tick after the peak
    pub decay_factor: f64,
    /// Wheel tick interval, ms (~60 Hz)
    pub tick_ms: u64,
    /// Velocity below which the scroll run stops, px per tick
    pub stop_velocity: f64,
    /// Probability of pausing mid-scroll to read revealed content
    pub read_pause_probability: f64,
    /// Shortest mid-scroll reading pause, ms
    pub read_pause_min_ms: f64,
    /// Longest mid-scroll reading pause, ms
    pub read_pause_max_ms: f64,
    /// Probability of reversing direction after a completed run
    pub reverse_probability: f64,
    /// Fraction of the original distance covered by a reversal
    pub reverse_fraction: f64,
}

impl Default for ScrollingStats {
    fn default() -> Self {
        Self {
            short_min: 120.0,
            short_max: 350.0,
            medium_min: 350.0,
            medium_max: 900.0,
            long_min: 900.0,
            long_max: 2200.0,
            weight_short: 0.45,
            weight_medium: 0.4,
            weight_long: 0.15,
            peak_velocity_min: 18.0,
            peak_velocity_max: 55.0,
            acceleration: 6.0,
            decay_factor: 0.90,
            tick_ms: 16,
            stop_velocity: 1.5,
            read_pause_probability: 0.18,
            read_pause_min_ms: 900.0,
            read_pause_max_ms: 3200.0,
            reverse_probability: 0.1,
            reverse_fraction: 0.25,
        }
    }
}

/// Composite interaction pause distributions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionStats {
    /// Probability of hovering before pressing
    pub pre_click_pause_probability: f64,
    /// Shortest pre-click hover, ms
    pub pre_click_pause_min_ms: f64,
    /// Longest pre-click hover, ms
    pub pre_click_pause_max_ms: f64,
    /// Mean mouse button hold during a click, ms
    pub click_hold_mean_ms: f64,
    /// Click hold standard deviation, ms
    pub click_hold_std_ms: f64,
    /// Click hold floor, ms
    pub click_hold_min_ms: f64,
    /// Click hold ceiling, ms
    pub click_hold_max_ms: f64,
    /// Probability of a settle pause after release
    pub post_click_pause_probability: f64,
    /// Shortest post-click settle, ms
    pub post_click_pause_min_ms: f64,
    /// Longest post-click settle, ms
    pub post_click_pause_max_ms: f64,
    /// Largest click offset from center, as a fraction of element size
    pub click_offset_fraction: f64,
    /// Shortest pause before typing into a focused field, ms
    pub field_thinking_min_ms: f64,
    /// Longest pause before typing into a focused field, ms
    pub field_thinking_max_ms: f64,
    /// Shortest pause between form fields, ms
    pub inter_field_min_ms: f64,
    /// Longest pause between form fields, ms
    pub inter_field_max_ms: f64,
    /// Probability of re-reading a field after typing it
    pub field_reread_probability: f64,
    /// Probability of a final review read after filling a form
    pub form_review_probability: f64,
    /// Most interactive elements visited by one explore pass
    pub explore_max_elements: u32,
    /// Shortest hover dwell while exploring, ms
    pub hover_dwell_min_ms: f64,
    /// Longest hover dwell while exploring, ms
    pub hover_dwell_max_ms: f64,
    /// Radius of small jitter movements while hovering, px
    pub hover_jitter_radius: f64,
}

impl Default for InteractionStats {
    fn default() -> Self {
        Self {
            pre_click_pause_probability: 0.6,
            pre_click_pause_min_ms: 80.0,
            pre_click_pause_max_ms: 350.0,
            click_hold_mean_ms: 85.0,
            click_hold_std_ms: 25.0,
            click_hold_min_ms: 40.0,
            click_hold_max_ms: 180.0,
            post_click_pause_probability: 0.7,
            post_click_pause_min_ms: 150.0,
            post_click_pause_max_ms: 600.0,
            click_offset_fraction: 0.3,
            field_thinking_min_ms: 250.0,
            field_thinking_max_ms: 1200.0,
            inter_field_min_ms: 300.0,
            inter_field_max_ms: 1100.0,
            field_reread_probability: 0.08,
            form_review_probability: 0.25,
            explore_max_elements: 5,
            hover_dwell_min_ms: 400.0,
            hover_dwell_max_ms: 1600.0,
            hover_jitter_radius: 5.0,
        }
    }
}

/// Session fatigue curve parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FatigueStats {
    /// Session time after which timings begin to slow, seconds
    pub onset_secs: u64,
    /// Cap on the fatigue multiplier
    pub max_multiplier: f64,
}

impl Default for FatigueStats {
    fn default() -> Self {
        Self {
            onset_secs: 20 * 60,
            max_multiplier: 1.4,
        }
    }
}

impl FatigueStats {
    /// Onset threshold as a [`Duration`]
    pub fn onset(&self) -> Duration {
        Duration::from_secs(self.onset_secs)
    }
}

/// Built-in digraph latency multipliers
///
/// The handful of highest-frequency English digraphs; everything absent
/// falls through to the hand-alternation model. Values below 1.0 are
/// pairs practiced typists roll through quickly.
fn default_digraph_latencies() -> HashMap<String, f64> {
    [
        ("th", 0.72),
        ("he", 0.74),
        ("in", 0.78),
        ("er", 0.80),
        ("an", 0.79),
        ("re", 0.82),
        ("on", 0.84),
        ("at", 0.81),
        ("en", 0.83),
        ("nd", 0.88),
        ("ti", 0.86),
        ("es", 0.84),
        ("or", 0.87),
        ("te", 0.83),
        ("of", 0.90),
        ("ed", 0.89),
        ("is", 0.85),
        ("it", 0.82),
        ("al", 0.88),
        ("ar", 0.86),
        ("st", 0.87),
        ("to", 0.85),
        ("nt", 0.91),
        ("ng", 0.93),
        ("se", 0.88),
        ("ha", 0.84),
        ("as", 0.86),
        ("ou", 0.89),
        ("io", 0.92),
        ("le", 0.87),
        // Awkward same-finger pairs run slow
        ("ce", 1.12),
        ("un", 1.08),
        ("ny", 1.15),
        ("my", 1.18),
        ("ws", 1.22),
        ("sw", 1.20),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

impl TypingStats {
    /// Look up the latency multiplier for a character pair
    pub fn digraph(&self, prev: char, current: char) -> Option<f64> {
        let mut key = String::with_capacity(8);
        key.push(prev.to_ascii_lowercase());
        key.push(current.to_ascii_lowercase());
        self.digraph_latency.get(&key).copied()
    }

    /// Error-type weights in canonical order
    ///
    /// Order matches [`crate::behavior::keystroke::ErrorKind`]:
    /// substitution, insertion, deletion, transposition.
    pub fn error_weights(&self) -> [f64; 4] {
        [
            self.weight_substitution,
            self.weight_insertion,
            self.weight_deletion,
            self.weight_transposition,
        ]
    }
}
