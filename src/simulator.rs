//! Composite interaction orchestrator
//!
//! [`InteractionSimulator`] ties the behavior simulators together behind
//! the operations callers actually want: click this, type that, fill
//! this form, read for a while, wander around. It owns the session's
//! sampler, statistics bundle, and behavior profile, threads the fatigue
//! multiplier through every gesture, and tags all logging with a session
//! id.

use crate::behavior::{
    plan_keystrokes, plan_movement, play_keystrokes, play_movement, read_regions, scroll_run,
    timed_wait, ScrollDirection,
};
use crate::driver::{BoundingBox, Driver, Point};
use crate::error::{Error, GeometryError, Result};
use crate::fatigue::fatigue_multiplier;
use crate::profile::{BehaviorProfile, ProfileUpdate};
use crate::sampling::Sampler;
use crate::stats::StatsBundle;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// One form field to fill, in order
#[derive(Debug, Clone)]
pub struct FormField {
    /// CSS selector of the input
    pub selector: String,
    /// Text to type into it
    pub value: String,
}

impl FormField {
    /// Construct a field entry
    pub fn new(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            value: value.into(),
        }
    }
}

/// Human-paced interaction session over a [`Driver`]
pub struct InteractionSimulator<D: Driver> {
    driver: D,
    sampler: Sampler,
    stats: StatsBundle,
    profile: BehaviorProfile,
    session_id: Uuid,
    pointer: Point,
}

impl<D: Driver> InteractionSimulator<D> {
    /// Create a simulator with default statistics and profile
    pub fn new(driver: D) -> Self {
        SimulatorBuilder::default().build(driver)
    }

    /// This session's identifier, present on all its log events
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The current behavior profile
    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    /// The statistics bundle this session samples from
    pub fn stats(&self) -> &StatsBundle {
        &self.stats
    }

    /// The underlying driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Apply a partial profile update, atomically
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<()> {
        self.profile.apply(update)?;
        info!(session = %self.session_id, "profile updated");
        Ok(())
    }

    /// Current fatigue multiplier for this session
    pub fn fatigue(&self) -> f64 {
        fatigue_multiplier(
            self.profile.elapsed(),
            self.stats.fatigue.onset(),
            self.stats.fatigue.max_multiplier,
        )
    }

    /// Move the pointer to an element along a human path
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub async fn move_to(&mut self, selector: &str) -> Result<()> {
        let rect = self.locate(selector).await?;
        let target = self.aim_point(&rect);
        self.glide_to(target, rect.width.min(rect.height)).await?;
        self.profile.touch();
        Ok(())
    }

    /// Move the pointer to explicit page coordinates
    ///
    /// `target_width` feeds the precision term of the duration estimate,
    /// the same way an element's size would.
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub async fn move_to_point(&mut self, x: f64, y: f64, target_width: f64) -> Result<()> {
        self.glide_to(Point::new(x, y), target_width).await?;
        self.profile.touch();
        Ok(())
    }

    /// Move to an element and click it
    ///
    /// The full sequence: approach movement, optional hover pause, press,
    /// sampled hold, release, optional settle pause.
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub async fn click(&mut self, selector: &str) -> Result<()> {
        let rect = self.locate(selector).await?;
        let target = self.aim_point(&rect);
        self.glide_to(target, rect.width.min(rect.height)).await?;

        let pauses = &self.stats.interaction;
        if self.sampler.chance(pauses.pre_click_pause_probability) {
            let pause = self
                .sampler
                .duration_ms(pauses.pre_click_pause_min_ms, pauses.pre_click_pause_max_ms);
            sleep(pause).await;
        }
        self.driver.mouse_down().await?;
        let hold = self.sampler.normal_clamped(
            pauses.click_hold_mean_ms,
            pauses.click_hold_std_ms,
            pauses.click_hold_min_ms,
            pauses.click_hold_max_ms,
        );
        sleep(Duration::from_millis(hold as u64)).await;
        self.driver.mouse_up().await?;
        if self.sampler.chance(pauses.post_click_pause_probability) {
            let pause = self
                .sampler
                .duration_ms(pauses.post_click_pause_min_ms, pauses.post_click_pause_max_ms);
            sleep(pause).await;
        }
        debug!(selector, "click complete");
        self.profile.touch();
        Ok(())
    }

    /// Click a field and type text into it at the profile's pace
    #[instrument(skip(self, text), fields(session = %self.session_id, chars = text.len()))]
    pub async fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        self.click(selector).await?;

        let thinking = self.sampler.duration_ms(
            self.stats.interaction.field_thinking_min_ms,
            self.stats.interaction.field_thinking_max_ms,
        );
        sleep(thinking).await;

        let fatigue = self.fatigue();
        let presses = plan_keystrokes(
            &mut self.sampler,
            &self.stats.typing,
            text,
            self.profile.typing_speed,
            self.profile.error_rate,
            fatigue,
        );
        play_keystrokes(&self.driver, &presses).await?;
        debug!(selector, presses = presses.len(), "text entered");
        self.profile.touch();
        Ok(())
    }

    /// Fill a form field by field, in the given order
    ///
    /// Fields are strictly sequential; each gets its inter-field pause
    /// before focus. With the configured probability a field is re-read
    /// after typing and, if its value disagrees with what was intended,
    /// cleared and retyped. A final review pass over the filled fields
    /// happens with its own probability.
    #[instrument(skip(self, fields), fields(session = %self.session_id, count = fields.len()))]
    pub async fn fill_form(&mut self, fields: &[FormField]) -> Result<()> {
        for (index, field) in fields.iter().enumerate() {
            if index > 0 {
                let pause = self.sampler.duration_ms(
                    self.stats.interaction.inter_field_min_ms,
                    self.stats.interaction.inter_field_max_ms,
                );
                sleep(pause).await;
            }
            self.type_text(&field.selector, &field.value).await?;

            if self.sampler.chance(self.stats.interaction.field_reread_probability) {
                let glance = self.sampler.duration_ms(
                    self.stats.reading.fixation_min_ms * 2.0,
                    self.stats.reading.fixation_max_ms * 3.0,
                );
                timed_wait(glance).await;
                if let Some(actual) = self.driver.read_value(&field.selector).await? {
                    if actual != field.value {
                        debug!(selector = %field.selector, "field mismatch, retyping");
                        self.clear_field().await?;
                        let fatigue = self.fatigue();
                        let presses = plan_keystrokes(
                            &mut self.sampler,
                            &self.stats.typing,
                            &field.value,
                            self.profile.typing_speed,
                            self.profile.error_rate,
                            fatigue,
                        );
                        play_keystrokes(&self.driver, &presses).await?;
                    }
                }
            }
        }

        if !fields.is_empty() && self.sampler.chance(self.stats.interaction.form_review_probability)
        {
            let mut rects = Vec::with_capacity(fields.len());
            for field in fields {
                if let Some(rect) = self.driver.bounding_box(&field.selector).await? {
                    rects.push(rect);
                }
            }
            let fatigue = self.fatigue();
            let budget = self.sampler.duration_ms(
                self.stats.reading.fixation_min_ms * rects.len().max(1) as f64,
                self.stats.reading.fixation_max_ms * rects.len().max(1) as f64,
            );
            read_regions(
                &self.driver,
                &mut self.sampler,
                &self.stats.reading,
                &rects,
                self.profile.reading_speed.fixation_multiplier(),
                fatigue,
                budget,
            )
            .await?;
        }
        info!(fields = fields.len(), "form filled");
        self.profile.touch();
        Ok(())
    }

    /// Scroll the page with inertia, returning the net signed distance
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub async fn scroll(
        &mut self,
        direction: ScrollDirection,
        distance: Option<f64>,
    ) -> Result<f64> {
        let fatigue = self.fatigue();
        let net = scroll_run(
            &self.driver,
            &mut self.sampler,
            &self.stats.scrolling,
            &self.stats.reading,
            direction,
            distance,
            self.profile.reading_speed.fixation_multiplier(),
            fatigue,
        )
        .await?;
        debug!(net, "scroll complete");
        self.profile.touch();
        Ok(net)
    }

    /// Read the visible text for `duration`, or a sampled default
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub async fn read(&mut self, duration: Option<Duration>) -> Result<Duration> {
        let budget = match duration {
            Some(d) => d,
            None => self.sampler.duration_ms(
                self.stats.reading.default_duration_min_ms,
                self.stats.reading.default_duration_max_ms,
            ),
        };
        let regions = self.driver.text_regions().await?;
        let fatigue = self.fatigue();
        let spent = read_regions(
            &self.driver,
            &mut self.sampler,
            &self.stats.reading,
            &regions,
            self.profile.reading_speed.fixation_multiplier(),
            fatigue,
            budget,
        )
        .await?;
        debug!(spent_ms = spent.as_millis() as u64, regions = regions.len(), "read complete");
        self.profile.touch();
        Ok(spent)
    }

    /// Wander over the page's interactive elements without committing
    ///
    /// Hovers a handful of visible links and buttons with dwell pauses
    /// and small jitter movements, the aimless pass a person makes while
    /// deciding what to do next.
    #[instrument(skip(self), fields(session = %self.session_id))]
    pub async fn explore(&mut self) -> Result<usize> {
        let limit = self.stats.interaction.explore_max_elements as usize;
        let regions = self.driver.interactive_regions(limit).await?;
        let viewport = self.driver.viewport().await?;
        let jitter = self.stats.interaction.hover_jitter_radius;

        let mut visited = 0usize;
        for rect in &regions {
            if !rect.is_visible() {
                continue;
            }
            // Off-screen candidates are not hover targets; without a
            // viewport the query result is trusted as-is
            if let Some(vp) = viewport {
                if !vp.contains(rect.center()) {
                    continue;
                }
            }
            let target = self.aim_point(rect);
            self.glide_to(target, rect.width.min(rect.height)).await?;

            let dwell = self.sampler.duration_ms(
                self.stats.interaction.hover_dwell_min_ms,
                self.stats.interaction.hover_dwell_max_ms,
            );
            // Split the dwell around one or two small restless jitters
            let jitters = self.sampler.range_u32(1, 2);
            let slice = dwell / (jitters + 1);
            sleep(slice).await;
            for _ in 0..jitters {
                let nudge = Point::new(
                    target.x + self.sampler.range(-jitter, jitter),
                    target.y + self.sampler.range(-jitter, jitter),
                );
                self.driver.move_to(nudge.x, nudge.y).await?;
                self.pointer = nudge;
                sleep(slice).await;
            }
            visited += 1;
        }
        info!(visited, "explore pass complete");
        self.profile.touch();
        Ok(visited)
    }

    /// Select-all then delete in the focused field
    async fn clear_field(&mut self) -> Result<()> {
        self.driver.press_key("Control").await?;
        self.driver.press_key("a").await?;
        self.driver.release_key("a").await?;
        self.driver.release_key("Control").await?;
        sleep(self.sampler.duration_ms(60.0, 160.0)).await;
        self.driver.press_key("Backspace").await?;
        self.driver.release_key("Backspace").await?;
        sleep(self.sampler.duration_ms(120.0, 320.0)).await;
        Ok(())
    }

    /// Resolve a selector to a visible rectangle or a geometry error
    async fn locate(&self, selector: &str) -> Result<BoundingBox> {
        let rect = self
            .driver
            .bounding_box(selector)
            .await?
            .ok_or_else(|| Error::from(GeometryError::ElementNotFound(selector.to_string())))?;
        if !rect.is_visible() {
            return Err(GeometryError::EmptyRect(selector.to_string()).into());
        }
        Ok(rect)
    }

    /// Pick a click point inside an element, biased toward the center
    fn aim_point(&mut self, rect: &BoundingBox) -> Point {
        let fraction = self.stats.interaction.click_offset_fraction.clamp(0.0, 0.49);
        let center = rect.center();
        Point::new(
            center.x + self.sampler.range(-rect.width * fraction, rect.width * fraction),
            center.y + self.sampler.range(-rect.height * fraction, rect.height * fraction),
        )
    }

    /// Plan and play a movement from the tracked pointer position
    async fn glide_to(&mut self, target: Point, target_width: f64) -> Result<()> {
        let fatigue = self.fatigue();
        let plan = plan_movement(
            &mut self.sampler,
            &self.stats.motion,
            self.pointer,
            target,
            target_width.max(1.0),
            self.profile.mouse_speed_multiplier,
            fatigue,
        );
        play_movement(&self.driver, &plan).await?;
        self.pointer = target;
        Ok(())
    }
}

/// Configures an [`InteractionSimulator`] before it is bound to a driver
#[derive(Debug, Default)]
pub struct SimulatorBuilder {
    stats: Option<StatsBundle>,
    profile: Option<BehaviorProfile>,
    seed: Option<u64>,
}

impl SimulatorBuilder {
    /// Start configuring a simulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the statistics bundle
    pub fn stats(mut self, stats: StatsBundle) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Set the behavior profile
    pub fn profile(mut self, profile: BehaviorProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Seed the sampler for a reproducible session
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Bind the configuration to a driver
    pub fn build<D: Driver>(self, driver: D) -> InteractionSimulator<D> {
        let session_id = Uuid::new_v4();
        let sampler = match self.seed {
            Some(seed) => Sampler::seeded(seed),
            None => Sampler::new(),
        };
        info!(session = %session_id, seeded = self.seed.is_some(), "session started");
        InteractionSimulator {
            driver,
            sampler,
            stats: self.stats.unwrap_or_default(),
            profile: self.profile.unwrap_or_default(),
            session_id,
            pointer: Point::new(0.0, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_field_constructor() {
        let field = FormField::new("#email", "user@example.com");
        assert_eq!(field.selector, "#email");
        assert_eq!(field.value, "user@example.com");
    }
}
