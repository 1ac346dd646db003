use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::score_grid::ScoreProbabilityTable;
use crate::scoreline::Scoreline;

/// Minimum expected value (percent) for a scoreline to be reported.
pub const MIN_EXPECTED_VALUE: f64 = 5.0;
/// Expected value (percent) above which a bet is tagged high confidence.
pub const HIGH_CONFIDENCE_EV: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
        }
    }

    fn from_expected_value(ev: f64) -> Self {
        if ev > HIGH_CONFIDENCE_EV {
            Confidence::High
        } else {
            Confidence::Medium
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    pub scoreline: Scoreline,
    pub model_probability: f64,
    pub fair_odds: f64,
    pub market_odds: f64,
    /// Percent.
    pub expected_value: f64,
    pub confidence: Confidence,
}

/// Compares the model's fair odds against quoted market odds.
///
/// `expected_value = (fair_odds / market_odds - 1) * 100`; only entries above
/// 5% survive, best first. Scorelines quoted by the market but absent from the
/// table (or vice versa) are ignored, as are non-positive quotes.
pub fn find_value_bets(
    table: &ScoreProbabilityTable,
    market_odds: &HashMap<Scoreline, f64>,
) -> Vec<ValueBet> {
    let mut out = Vec::new();
    for cell in &table.cells {
        let Some(&market) = market_odds.get(&cell.scoreline) else {
            continue;
        };
        if market <= 0.0 || !market.is_finite() {
            continue;
        }
        let expected_value = (cell.fair_odds / market - 1.0) * 100.0;
        if expected_value <= MIN_EXPECTED_VALUE {
            continue;
        }
        out.push(ValueBet {
            scoreline: cell.scoreline,
            model_probability: cell.probability,
            fair_odds: cell.fair_odds,
            market_odds: market,
            expected_value,
            confidence: Confidence::from_expected_value(expected_value),
        });
    }

    out.sort_by(|a, b| {
        b.expected_value
            .partial_cmp(&a.expected_value)
            .unwrap_or(Ordering::Equal)
            .then(a.scoreline.cmp(&b.scoreline))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_tiers() {
        assert_eq!(Confidence::from_expected_value(15.0), Confidence::Medium);
        assert_eq!(Confidence::from_expected_value(15.01), Confidence::High);
        assert_eq!(Confidence::from_expected_value(5.1), Confidence::Medium);
    }

    #[test]
    fn confidence_serializes_lowercase() {
        let raw = serde_json::to_string(&Confidence::High).unwrap();
        assert_eq!(raw, "\"high\"");
        assert_eq!(raw.trim_matches('"'), Confidence::High.as_str());
        assert_eq!(Confidence::Medium.as_str(), "medium");
    }
}
