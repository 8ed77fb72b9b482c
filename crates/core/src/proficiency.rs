//! Mastery transition functions.
//!
//! Both functions are pure and total on `[0, 1]`. They implement concave
//! curves: correct answers gain less the closer mastery is to 1, and revealed
//! errors cost more the higher mastery was.

/// New mastery after a correct answer: `clamp(m * (2 - m), 0, 1)`.
///
/// Monotonic non-decreasing on `[0, 1]`. A word at mastery 0 stays at 0; it
/// has to be bootstrapped above zero through the persisted word list before
/// correct answers can move it.
#[must_use]
pub fn on_correct(mastery: f64) -> f64 {
    (mastery * (2.0 - mastery)).clamp(0.0, 1.0)
}

/// New mastery after the user acknowledges a wrong answer:
/// `clamp(m * (1 - m), 0, 1)`.
///
/// If the unclamped product evaluates to exactly `1.0` the score resets to
/// `0.5` instead of freezing at the boundary. That product is unreachable for
/// any `m` in `[0, 1]` under exact arithmetic, but the guard keeps degenerate
/// out-of-band inputs from pinning a record at full mastery.
#[must_use]
pub fn on_acknowledge_error(mastery: f64) -> f64 {
    let next = mastery * (1.0 - mastery);
    if next == 1.0 {
        return 0.5;
    }
    next.clamp(0.0, 1.0)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
