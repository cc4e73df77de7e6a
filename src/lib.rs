//! Mimic Web - Human Interaction Behavior Simulation for Browser Automation
//!
//! This crate drives a real browser the way a person does: pointer paths
//! with curvature and overshoot, keystrokes with digraph-shaped timing
//! and corrected typos, reading pauses built from fixations and
//! saccades, and inertial scrolling, all slowly degrading as the session
//! fatigues.
//!
//! # Features
//!
//! - **Movement Planner**: Fitts's-Law timing over jittered Bézier paths
//! - **Keystroke Engine**: WPM profiles, digraph latency, self-correcting typos
//! - **Reading & Scrolling**: fixation/saccade attention, inertial wheel runs
//! - **Composite Orchestrator**: click / type / fill-form / read / explore
//! - **CDP Driver**: raw `Input.dispatch*` events via ChromiumOxide
//!
//! # Architecture
//!
//! ```text
//! Caller ──▶ InteractionSimulator ──▶ Driver (CDP)
//!                    │
//!         ┌─────────┼──────────┐
//!         ▼          ▼          ▼
//!    ┌─────────┐ ┌────────┐ ┌─────────┐
//!    │ Motion  │ │ Typing │ │ Reading │  ◀── StatsBundle
//!    └─────────┘ └────────┘ └─────────┘  ◀── BehaviorProfile + fatigue
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mimic_web::driver::CdpDriver;
//! use mimic_web::simulator::InteractionSimulator;
//! use chromiumoxide::Browser;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (browser, mut handler) = Browser::launch(
//!         chromiumoxide::BrowserConfig::builder().build()?,
//!     )
//!     .await?;
//!     tokio::spawn(async move { while handler.next().await.is_some() {} });
//!
//!     let page = browser.new_page("https://example.com").await?;
//!     let mut sim = InteractionSimulator::new(CdpDriver::new(page));
//!
//!     sim.read(None).await?;
//!     sim.click("a").await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod behavior;
pub mod driver;
pub mod error;
pub mod fatigue;
pub mod profile;
pub mod sampling;
pub mod simulator;
pub mod stats;

// Re-exports for convenience
pub use behavior::ScrollDirection;
pub use driver::{CdpDriver, Driver};
pub use error::{Error, Result};
pub use profile::{BehaviorProfile, ProfileUpdate, ReadingSpeed, TypingSpeed};
pub use simulator::{FormField, InteractionSimulator, SimulatorBuilder};
pub use stats::StatsBundle;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
