//! Kelly criterion stake sizing.
//!
//! ```text
//! f* = (p * odds - 1) / (odds - 1)
//! ```
//!
//! where `p` is the model probability (0-1) and `odds` are decimal odds.

/// Share of the current bankroll scaled by the Kelly edge.
pub const BANKROLL_FRACTION: f64 = 0.02;
pub const MIN_STAKE: f64 = 10.0;
pub const MAX_STAKE: f64 = 100.0;

/// Full Kelly fraction; negative when the bet has negative expectation and
/// zero when the odds pay nothing back.
///
/// ```
/// use correct_score::kelly::kelly_fraction;
/// let kelly = kelly_fraction(0.25, 5.0);
/// assert!((kelly - 0.0625).abs() < 1e-12);
/// ```
pub fn kelly_fraction(probability: f64, odds: f64) -> f64 {
    if odds <= 1.0 {
        return 0.0;
    }
    (probability * odds - 1.0) / (odds - 1.0)
}

/// `clamp(bankroll * 2% * max(0, kelly), 10, 100)`.
///
/// The floor means a stake is always placed, even on a negative edge or a
/// negative bankroll.
pub fn bounded_stake(bankroll: f64, probability: f64, odds: f64) -> f64 {
    let kelly = kelly_fraction(probability, odds).max(0.0);
    (bankroll * BANKROLL_FRACTION * kelly).clamp(MIN_STAKE, MAX_STAKE)
}
