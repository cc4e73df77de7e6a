//! Keystroke timing engine
//!
//! Plans a text entry as a sequence of timed key presses: per-character
//! latency from the profile's WPM range shaped by digraph statistics and
//! hand alternation, sampled hold times, occasional hesitation pauses,
//! and probabilistic typos that are always backspaced and corrected so
//! the final field value matches the requested text.

use crate::driver::Driver;
use crate::error::Result;
use crate::profile::TypingSpeed;
use crate::sampling::Sampler;
use crate::stats::TypingStats;
use std::time::Duration;
use tokio::time::sleep;

/// One key press with its timing
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPress {
    /// Character ("a", " ") or named key ("Backspace")
    pub key: String,
    /// Latency before the key goes down
    pub pre_delay: Duration,
    /// How long the key stays down
    pub hold: Duration,
}

/// The kinds of typo the planner can inject
///
/// Variant order is canonical; [`TypingStats::error_weights`] returns
/// weights in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A neighbouring key lands instead of the intended one
    Substitution,
    /// An extra neighbouring key lands before the intended one
    Insertion,
    /// The intended key is nearly skipped; surfaces as a hesitation
    Deletion,
    /// The following key arrives one position early
    Transposition,
}

impl ErrorKind {
    fn from_index(index: usize) -> Self {
        match index {
            0 => ErrorKind::Substitution,
            1 => ErrorKind::Insertion,
            3 => ErrorKind::Transposition,
            _ => ErrorKind::Deletion,
        }
    }
}

/// Plan the key presses that type `text`
///
/// The WPM is sampled once per call from the profile category's range,
/// so one field is typed at a consistent pace while successive fields
/// differ. Every latency, and the typo probability itself, is scaled by
/// `fatigue`. With `error_rate` of
/// zero the plan contains exactly one press per character and no
/// backspaces; any injected typo is corrected within the plan, so
/// replaying it always leaves the field holding `text`.
pub fn plan_keystrokes(
    sampler: &mut Sampler,
    stats: &TypingStats,
    text: &str,
    typing_speed: TypingSpeed,
    error_rate: f64,
    fatigue: f64,
) -> Vec<KeyPress> {
    let chars: Vec<char> = text.chars().collect();
    let mut presses = Vec::with_capacity(chars.len());
    if chars.is_empty() {
        return presses;
    }

    let (wpm_lo, wpm_hi) = typing_speed.wpm_range();
    let wpm = sampler.range(wpm_lo, wpm_hi);
    // Standard 5-character word
    let base_char_ms = 60_000.0 / (wpm * 5.0);
    let fatigue = fatigue.max(1.0);
    // Tired hands mistype more often, not just more slowly
    let effective_error_rate = (error_rate * fatigue).clamp(0.0, 1.0);

    let mut prev: Option<char> = None;
    let mut i = 0;
    while i < chars.len() {
        let current = chars[i];
        let mut latency_ms = base_char_ms * pair_multiplier(sampler, stats, prev, current);
        if sampler.chance(stats.thinking_pause_probability) {
            latency_ms +=
                sampler.range(stats.thinking_pause_min_ms, stats.thinking_pause_max_ms);
        }
        latency_ms *= fatigue;

        if sampler.chance(effective_error_rate) {
            let kind = ErrorKind::from_index(sampler.weighted_index(&stats.error_weights()));
            match kind {
                ErrorKind::Substitution => {
                    let wrong = neighbour_key(sampler, current);
                    push_char(sampler, stats, &mut presses, wrong, latency_ms);
                    push_correction(sampler, stats, &mut presses, 1, fatigue);
                    push_char(sampler, stats, &mut presses, current, base_char_ms * fatigue);
                }
                ErrorKind::Insertion => {
                    let extra = neighbour_key(sampler, current);
                    push_char(sampler, stats, &mut presses, extra, latency_ms);
                    push_correction(sampler, stats, &mut presses, 1, fatigue);
                    push_char(sampler, stats, &mut presses, current, base_char_ms * fatigue);
                }
                ErrorKind::Deletion => {
                    // The finger hesitates over the skipped key; the
                    // character still lands, just late.
                    let pause =
                        sampler.range(stats.correction_pause_min_ms, stats.correction_pause_max_ms);
                    push_char(
                        sampler,
                        stats,
                        &mut presses,
                        current,
                        latency_ms + pause * fatigue,
                    );
                }
                ErrorKind::Transposition if i + 1 < chars.len() => {
                    // The next character arrives first, gets backspaced,
                    // then the pair is retyped in order.
                    let next = chars[i + 1];
                    push_char(sampler, stats, &mut presses, next, latency_ms);
                    push_correction(sampler, stats, &mut presses, 1, fatigue);
                    push_char(sampler, stats, &mut presses, current, base_char_ms * fatigue);
                    let pair_mult = pair_multiplier(sampler, stats, Some(current), next);
                    push_char(
                        sampler,
                        stats,
                        &mut presses,
                        next,
                        base_char_ms * pair_mult * fatigue,
                    );
                    prev = Some(next);
                    i += 2;
                    continue;
                }
                ErrorKind::Transposition => {
                    // Last character cannot transpose; degrade to a clean press
                    push_char(sampler, stats, &mut presses, current, latency_ms);
                }
            }
        } else {
            push_char(sampler, stats, &mut presses, current, latency_ms);
        }

        prev = Some(current);
        i += 1;
    }

    presses
}

/// Play a keystroke plan through the driver
///
/// Waits out each press's latency, holds the key for its sampled hold
/// time, then releases it before moving on.
pub async fn play_keystrokes(driver: &dyn Driver, presses: &[KeyPress]) -> Result<()> {
    for press in presses {
        sleep(press.pre_delay).await;
        driver.press_key(&press.key).await?;
        sleep(press.hold).await;
        driver.release_key(&press.key).await?;
    }
    Ok(())
}

fn push_char(
    sampler: &mut Sampler,
    stats: &TypingStats,
    presses: &mut Vec<KeyPress>,
    c: char,
    latency_ms: f64,
) {
    presses.push(KeyPress {
        key: c.to_string(),
        pre_delay: Duration::from_millis(latency_ms.max(0.0) as u64),
        hold: sample_hold(sampler, stats),
    });
}

/// A noticing pause followed by `count` backspaces
fn push_correction(
    sampler: &mut Sampler,
    stats: &TypingStats,
    presses: &mut Vec<KeyPress>,
    count: usize,
    fatigue: f64,
) {
    let noticed_quickly = sampler.chance(stats.immediate_correction_probability);
    let mut pause_ms =
        sampler.range(stats.correction_pause_min_ms, stats.correction_pause_max_ms);
    if !noticed_quickly {
        // The typo sat on screen a beat longer before the eye caught it
        pause_ms *= 2.0;
    }
    for n in 0..count {
        let delay = if n == 0 { pause_ms * fatigue } else { 90.0 * fatigue };
        presses.push(KeyPress {
            key: "Backspace".to_string(),
            pre_delay: Duration::from_millis(delay.max(0.0) as u64),
            hold: sample_hold(sampler, stats),
        });
    }
}

fn sample_hold(sampler: &mut Sampler, stats: &TypingStats) -> Duration {
    let ms = sampler.normal_clamped(
        stats.hold_mean_ms,
        stats.hold_std_ms,
        stats.hold_min_ms,
        stats.hold_max_ms,
    );
    Duration::from_millis(ms.max(0.0) as u64)
}

/// Latency multiplier for a character pair
///
/// Known digraphs take their table value; otherwise the hand-alternation
/// model applies, using actual QWERTY hand assignment when both
/// characters are letters and the statistical fallback when not.
fn pair_multiplier(
    sampler: &mut Sampler,
    stats: &TypingStats,
    prev: Option<char>,
    current: char,
) -> f64 {
    let Some(prev) = prev else {
        return 1.0;
    };
    if let Some(multiplier) = stats.digraph(prev, current) {
        return multiplier;
    }
    let same_hand = match (hand_of(prev), hand_of(current)) {
        (Some(a), Some(b)) => a == b,
        _ => sampler.chance(stats.same_hand_probability),
    };
    if same_hand {
        sampler.range(stats.same_hand_min, stats.same_hand_max)
    } else {
        sampler.range(stats.different_hand_min, stats.different_hand_max)
    }
}

#[derive(PartialEq, Clone, Copy)]
enum Hand {
    Left,
    Right,
}

fn hand_of(c: char) -> Option<Hand> {
    match c.to_ascii_lowercase() {
        'q' | 'w' | 'e' | 'r' | 't' | 'a' | 's' | 'd' | 'f' | 'g' | 'z' | 'x' | 'c' | 'v'
        | 'b' => Some(Hand::Left),
        'y' | 'u' | 'i' | 'o' | 'p' | 'h' | 'j' | 'k' | 'l' | 'n' | 'm' => Some(Hand::Right),
        _ => None,
    }
}

/// QWERTY keys adjacent to each letter and digit
fn neighbours_of(c: char) -> &'static [char] {
    match c.to_ascii_lowercase() {
        'q' => &['w', 'a'],
        'w' => &['q', 'e', 's'],
        'e' => &['w', 'r', 'd'],
        'r' => &['e', 't', 'f'],
        't' => &['r', 'y', 'g'],
        'y' => &['t', 'u', 'h'],
        'u' => &['y', 'i', 'j'],
        'i' => &['u', 'o', 'k'],
        'o' => &['i', 'p', 'l'],
        'p' => &['o', 'l'],
        'a' => &['q', 's', 'z'],
        's' => &['a', 'd', 'w', 'x'],
        'd' => &['s', 'f', 'e', 'c'],
        'f' => &['d', 'g', 'r', 'v'],
        'g' => &['f', 'h', 't', 'b'],
        'h' => &['g', 'j', 'y', 'n'],
        'j' => &['h', 'k', 'u', 'm'],
        'k' => &['j', 'l', 'i'],
        'l' => &['k', 'o', 'p'],
        'z' => &['a', 'x'],
        'x' => &['z', 'c', 's'],
        'c' => &['x', 'v', 'd'],
        'v' => &['c', 'b', 'f'],
        'b' => &['v', 'n', 'g'],
        'n' => &['b', 'm', 'h'],
        'm' => &['n', 'j'],
        '1' => &['2'],
        '2' => &['1', '3'],
        '3' => &['2', '4'],
        '4' => &['3', '5'],
        '5' => &['4', '6'],
        '6' => &['5', '7'],
        '7' => &['6', '8'],
        '8' => &['7', '9'],
        '9' => &['8', '0'],
        '0' => &['9'],
        _ => &[],
    }
}

/// A plausible mis-hit for the intended key
///
/// Keys with no mapped neighbours (punctuation, space) double-tap
/// themselves, which reads as a stutter rather than an impossible reach.
fn neighbour_key(sampler: &mut Sampler, intended: char) -> char {
    let candidates = neighbours_of(intended);
    if candidates.is_empty() {
        return intended;
    }
    let pick = candidates[sampler.weighted_index(&vec![1.0; candidates.len()])];
    if intended.is_ascii_uppercase() {
        pick.to_ascii_uppercase()
    } else {
        pick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::TypingSpeed;

    /// Replay a plan against a text buffer the way a field would see it
    fn reconstruct(presses: &[KeyPress]) -> String {
        let mut out = String::new();
        for press in presses {
            if press.key == "Backspace" {
                out.pop();
            } else {
                out.push_str(&press.key);
            }
        }
        out
    }

    #[test]
    fn test_zero_error_rate_is_one_press_per_char() {
        let mut sampler = Sampler::seeded(1);
        let stats = TypingStats::default();
        let presses = plan_keystrokes(
            &mut sampler,
            &stats,
            "hello",
            TypingSpeed::Average,
            0.0,
            1.0,
        );
        assert_eq!(presses.len(), 5);
        assert!(presses.iter().all(|p| p.key != "Backspace"));
        assert_eq!(reconstruct(&presses), "hello");
    }

    #[test]
    fn test_pace_is_consistent_within_one_plan() {
        // With pair and hesitation variability removed, every latency in
        // a clean plan falls out of the single per-plan pace draw
        let stats = TypingStats {
            digraph_latency: std::collections::HashMap::new(),
            same_hand_min: 1.0,
            same_hand_max: 1.0,
            different_hand_min: 1.0,
            different_hand_max: 1.0,
            thinking_pause_probability: 0.0,
            ..TypingStats::default()
        };
        let mut sampler = Sampler::seeded(23);
        let presses = plan_keystrokes(
            &mut sampler,
            &stats,
            "steady pace",
            TypingSpeed::Average,
            0.0,
            1.0,
        );
        let first = presses[0].pre_delay;
        assert!(presses.iter().all(|p| p.pre_delay == first));
    }

    #[test]
    fn test_typos_always_corrected() {
        let stats = TypingStats::default();
        for seed in 0..50 {
            let mut sampler = Sampler::seeded(seed);
            let presses = plan_keystrokes(
                &mut sampler,
                &stats,
                "the quick brown fox",
                TypingSpeed::Fast,
                1.0,
                1.0,
            );
            assert_eq!(reconstruct(&presses), "the quick brown fox", "seed {seed}");
        }
    }

    #[test]
    fn test_errors_produce_backspaces() {
        let stats = TypingStats::default();
        let mut sampler = Sampler::seeded(3);
        let presses = plan_keystrokes(
            &mut sampler,
            &stats,
            "correct horse battery staple",
            TypingSpeed::Average,
            1.0,
            1.0,
        );
        assert!(presses.iter().any(|p| p.key == "Backspace"));
        assert!(presses.len() > "correct horse battery staple".len());
    }

    #[test]
    fn test_seeded_plans_identical() {
        let stats = TypingStats::default();
        let mut a = Sampler::seeded(42);
        let mut b = Sampler::seeded(42);
        let plan_a =
            plan_keystrokes(&mut a, &stats, "same text", TypingSpeed::Average, 0.05, 1.0);
        let plan_b =
            plan_keystrokes(&mut b, &stats, "same text", TypingSpeed::Average, 0.05, 1.0);
        assert_eq!(plan_a, plan_b);
    }

    #[test]
    fn test_fatigue_slows_typing() {
        let stats = TypingStats::default();
        let mut a = Sampler::seeded(9);
        let mut b = Sampler::seeded(9);
        let fresh: Duration =
            plan_keystrokes(&mut a, &stats, "some steady text", TypingSpeed::Average, 0.0, 1.0)
                .iter()
                .map(|p| p.pre_delay)
                .sum();
        let tired: Duration =
            plan_keystrokes(&mut b, &stats, "some steady text", TypingSpeed::Average, 0.0, 1.4)
                .iter()
                .map(|p| p.pre_delay)
                .sum();
        assert!(tired > fresh);
    }

    #[test]
    fn test_faster_category_types_faster() {
        let stats = TypingStats::default();
        let text = "a reasonably long sentence for averaging out noise";
        let mut slow_total = Duration::ZERO;
        let mut expert_total = Duration::ZERO;
        for seed in 0..10 {
            let mut a = Sampler::seeded(seed);
            let mut b = Sampler::seeded(seed);
            slow_total += plan_keystrokes(&mut a, &stats, text, TypingSpeed::Slow, 0.0, 1.0)
                .iter()
                .map(|p| p.pre_delay)
                .sum::<Duration>();
            expert_total += plan_keystrokes(&mut b, &stats, text, TypingSpeed::Expert, 0.0, 1.0)
                .iter()
                .map(|p| p.pre_delay)
                .sum::<Duration>();
        }
        assert!(expert_total < slow_total);
    }

    #[test]
    fn test_holds_within_configured_bounds() {
        let stats = TypingStats::default();
        let mut sampler = Sampler::seeded(17);
        let presses = plan_keystrokes(
            &mut sampler,
            &stats,
            "hold time check",
            TypingSpeed::Average,
            0.2,
            1.0,
        );
        for press in &presses {
            let ms = press.hold.as_millis() as f64;
            assert!(ms >= stats.hold_min_ms.floor());
            assert!(ms <= stats.hold_max_ms.ceil());
        }
    }

    #[test]
    fn test_neighbour_key_stays_plausible() {
        let mut sampler = Sampler::seeded(5);
        for _ in 0..100 {
            let wrong = neighbour_key(&mut sampler, 'g');
            assert!(neighbours_of('g').contains(&wrong));
        }
        // Unmapped keys stutter instead of substituting
        assert_eq!(neighbour_key(&mut sampler, ' '), ' ');
        // Case is preserved
        let upper = neighbour_key(&mut sampler, 'G');
        assert!(upper.is_ascii_uppercase());
    }

    #[test]
    fn test_empty_text_empty_plan() {
        let mut sampler = Sampler::seeded(1);
        let stats = TypingStats::default();
        let presses =
            plan_keystrokes(&mut sampler, &stats, "", TypingSpeed::Expert, 1.0, 1.4);
        assert!(presses.is_empty());
    }

    #[test]
    fn test_error_kind_canonical_order() {
        assert_eq!(ErrorKind::from_index(0), ErrorKind::Substitution);
        assert_eq!(ErrorKind::from_index(1), ErrorKind::Insertion);
        assert_eq!(ErrorKind::from_index(2), ErrorKind::Deletion);
        assert_eq!(ErrorKind::from_index(3), ErrorKind::Transposition);
    }
}
