//! Human behavior simulators
//!
//! Each submodule turns one kind of high-level intent into a timed
//! stream of primitive driver commands: pointer motion, keystrokes,
//! reading attention, and scroll inertia. Planning is separated from
//! playback where the output is testable as data.

pub mod keystroke;
pub mod movement;
pub mod reading;
pub mod scrolling;

pub use keystroke::{plan_keystrokes, play_keystrokes, KeyPress};
pub use movement::{plan_movement, play_movement, MovementPlan, MovementStep};
pub use reading::{read_regions, timed_wait};
pub use scrolling::{scroll_run, ScrollDirection};
