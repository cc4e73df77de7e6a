//! Session fatigue model
//!
//! Fatigue is derived state, never stored: a pure function of elapsed
//! session time against the configured onset threshold. Recomputing on
//! every timing request keeps the model immune to clock-drift bugs; the
//! only stored quantity is the session start instant on the profile.

use std::time::Duration;

/// Compute the timing multiplier for the current session age
///
/// Exactly 1.0 below the onset threshold, then a linear ramp reaching
/// `max_multiplier` at twice the onset, capped there. Monotonically
/// non-decreasing in elapsed time and bounded above by the cap, so no
/// derived delay can grow without limit.
pub fn fatigue_multiplier(elapsed: Duration, onset: Duration, max_multiplier: f64) -> f64 {
    let cap = max_multiplier.max(1.0);
    if onset.is_zero() {
        return cap;
    }
    if elapsed <= onset {
        return 1.0;
    }
    let progress = (elapsed.as_secs_f64() - onset.as_secs_f64()) / onset.as_secs_f64();
    (1.0 + progress * (cap - 1.0)).min(cap)
}
