//! Per-session behavior profile
//!
//! A [`BehaviorProfile`] pins down the individual operating the session:
//! how fast they type, how fast they move the pointer, how fast they
//! read, and how often they mistype. It is created with the simulator,
//! mutated only through an explicit [`ProfileUpdate`], and lives for the
//! whole session.

use crate::error::ProfileError;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Typing proficiency category, mapped to a words-per-minute range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingSpeed {
    /// Hunt-and-peck, ~20-35 WPM
    Slow,
    /// Typical office typist, ~35-55 WPM
    Average,
    /// Practiced touch typist, ~55-80 WPM
    Fast,
    /// Professional, ~80-110 WPM
    Expert,
}

impl TypingSpeed {
    /// Words-per-minute range for this category
    pub fn wpm_range(self) -> (f64, f64) {
        match self {
            TypingSpeed::Slow => (20.0, 35.0),
            TypingSpeed::Average => (35.0, 55.0),
            TypingSpeed::Fast => (55.0, 80.0),
            TypingSpeed::Expert => (80.0, 110.0),
        }
    }
}

/// Reading pace category, applied as a fixation-duration multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingSpeed {
    /// Deliberate reader, longer fixations
    Slow,
    /// Population-average pace
    Average,
    /// Skimming reader, shorter fixations
    Fast,
}

impl ReadingSpeed {
    /// Multiplier applied to sampled fixation durations
    pub fn fixation_multiplier(self) -> f64 {
        match self {
            ReadingSpeed::Slow => 1.3,
            ReadingSpeed::Average => 1.0,
            ReadingSpeed::Fast => 0.75,
        }
    }
}

/// The session operator's behavioral identity
#[derive(Debug, Clone)]
pub struct BehaviorProfile {
    /// Typing proficiency
    pub typing_speed: TypingSpeed,
    /// Pointer speed relative to the population average (1.0)
    pub mouse_speed_multiplier: f64,
    /// Reading pace
    pub reading_speed: ReadingSpeed,
    /// Probability of a typing error per character, in `[0, 1]`
    pub error_rate: f64,
    /// When this session started; fatigue derives from this alone
    pub session_started: Instant,
    /// How many sessions this identity has run (learning effect counter)
    pub session_count: u32,
    /// Completion time of the most recent public operation
    pub last_activity: Instant,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            typing_speed: TypingSpeed::Average,
            mouse_speed_multiplier: 1.0,
            reading_speed: ReadingSpeed::Average,
            error_rate: 0.02,
            session_started: now,
            session_count: 1,
            last_activity: now,
        }
    }
}

impl BehaviorProfile {
    /// Create a profile with explicit behavioral parameters
    pub fn new(
        typing_speed: TypingSpeed,
        mouse_speed_multiplier: f64,
        reading_speed: ReadingSpeed,
        error_rate: f64,
    ) -> Result<Self, ProfileError> {
        let profile = Self {
            typing_speed,
            mouse_speed_multiplier,
            reading_speed,
            error_rate,
            ..Self::default()
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check the numeric invariants
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(ProfileError::InvalidErrorRate(self.error_rate));
        }
        if self.mouse_speed_multiplier <= 0.0 || !self.mouse_speed_multiplier.is_finite() {
            return Err(ProfileError::InvalidSpeedMultiplier(
                self.mouse_speed_multiplier,
            ));
        }
        Ok(())
    }

    /// Apply a partial update, validating the result before committing
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), ProfileError> {
        let mut next = self.clone();
        if let Some(speed) = update.typing_speed {
            next.typing_speed = speed;
        }
        if let Some(multiplier) = update.mouse_speed_multiplier {
            next.mouse_speed_multiplier = multiplier;
        }
        if let Some(speed) = update.reading_speed {
            next.reading_speed = speed;
        }
        if let Some(rate) = update.error_rate {
            next.error_rate = rate;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Time elapsed since the session started
    pub fn elapsed(&self) -> Duration {
        self.session_started.elapsed()
    }

    /// Record that a public operation just completed
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Partial profile replacement
///
/// Absent fields leave the current value untouched. No partial or
/// streaming semantics beyond this: an update is applied wholesale or,
/// if validation fails, not at all.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    /// New typing category, if changing
    pub typing_speed: Option<TypingSpeed>,
    /// New pointer speed multiplier, if changing
    pub mouse_speed_multiplier: Option<f64>,
    /// New reading category, if changing
    pub reading_speed: Option<ReadingSpeed>,
    /// New per-character error probability, if changing
    pub error_rate: Option<f64>,
}
