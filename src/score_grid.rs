use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scoreline::{MAX_GOALS, Scoreline};
use crate::team_ratings::{LeagueAverages, TeamRating};

pub const MIN_EXPECTED_GOALS: f64 = 0.10;
pub const MAX_EXPECTED_GOALS: f64 = 4.00;

/// Fair odds reported for a cell whose probability is exactly zero. Finite so
/// the value survives arithmetic and JSON, and above the longest real price
/// the clamped grid can produce (~1.8e14 for 5-5 at 0.1 vs 0.1).
pub const ODDS_UNAVAILABLE: f64 = 1.0e18;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCell {
    pub scoreline: Scoreline,
    /// Percent, renormalised over the 36-cell grid.
    pub probability: f64,
    pub fair_odds: f64,
    /// Joint Poisson mass before renormalisation (0..1).
    pub raw_probability: f64,
    pub expected_home_goals: f64,
    pub expected_away_goals: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreProbabilityTable {
    pub home_team: String,
    pub away_team: String,
    pub expected_home_goals: f64,
    pub expected_away_goals: f64,
    /// Raw mass captured by the grid before renormalisation; the rest sits on
    /// scorelines with 6+ goals for a side.
    pub grid_mass: f64,
    /// Most likely first.
    pub cells: Vec<ScoreCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSplit {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl ScoreProbabilityTable {
    pub fn most_likely(&self) -> Option<&ScoreCell> {
        self.cells.first()
    }

    pub fn get(&self, scoreline: Scoreline) -> Option<&ScoreCell> {
        self.cells.iter().find(|c| c.scoreline == scoreline)
    }

    pub fn top(&self, n: usize) -> &[ScoreCell] {
        &self.cells[..n.min(self.cells.len())]
    }

    pub fn total_probability(&self) -> f64 {
        self.cells.iter().map(|c| c.probability).sum()
    }

    /// Home win / draw / away win percentages summed over the grid.
    pub fn outcome_split(&self) -> OutcomeSplit {
        let mut out = OutcomeSplit {
            home: 0.0,
            draw: 0.0,
            away: 0.0,
        };
        for cell in &self.cells {
            match cell.scoreline.home.cmp(&cell.scoreline.away) {
                Ordering::Greater => out.home += cell.probability,
                Ordering::Equal => out.draw += cell.probability,
                Ordering::Less => out.away += cell.probability,
            }
        }
        out
    }
}

/// Expected goals for each side, clamped to `[0.1, 4.0]`.
///
/// Home: home attack at home x away defense on the road x league home goals.
/// Away: away attack on the road x home defense at home x league away goals.
pub fn expected_goals(home: &TeamRating, away: &TeamRating, league: &LeagueAverages) -> (f64, f64) {
    let lambda_home = home.attack_home * away.defense_away * league.home_goals;
    let lambda_away = away.attack_away * home.defense_home * league.away_goals;
    (
        clamp(lambda_home, MIN_EXPECTED_GOALS, MAX_EXPECTED_GOALS),
        clamp(lambda_away, MIN_EXPECTED_GOALS, MAX_EXPECTED_GOALS),
    )
}

/// Full correct-score table for `home_team` hosting `away_team`.
///
/// Returns `None` when either team has no rating (or both names are the same
/// team); an unrated side is a routine case, not a failure.
///
/// Home and away goal counts are modelled as independent Poisson variables
/// given the two expectations. This is a simplification: no correlation
/// adjustment is applied between the sides.
pub fn score_probabilities(
    ratings: &HashMap<String, TeamRating>,
    league: &LeagueAverages,
    home_team: &str,
    away_team: &str,
) -> Option<ScoreProbabilityTable> {
    if home_team == away_team {
        debug!(team = home_team, "score query for a team against itself");
        return None;
    }
    let (Some(home), Some(away)) = (ratings.get(home_team), ratings.get(away_team)) else {
        debug!(home_team, away_team, "score query for unrated team");
        return None;
    };

    let (lambda_home, lambda_away) = expected_goals(home, away, league);
    let mut table = table_from_expected_goals(lambda_home, lambda_away);
    table.home_team = home_team.to_string();
    table.away_team = away_team.to_string();
    Some(table)
}

/// Builds the normalised grid straight from two expectations. Team names are
/// left empty.
pub fn table_from_expected_goals(lambda_home: f64, lambda_away: f64) -> ScoreProbabilityTable {
    let pmf_h = poisson_pmf_row(lambda_home, MAX_GOALS);
    let pmf_a = poisson_pmf_row(lambda_away, MAX_GOALS);

    let mut cells = Vec::with_capacity(pmf_h.len() * pmf_a.len());
    let mut grid_mass = 0.0;
    for scoreline in Scoreline::grid() {
        let raw = pmf_h[usize::from(scoreline.home)] * pmf_a[usize::from(scoreline.away)];
        grid_mass += raw;
        cells.push(ScoreCell {
            scoreline,
            probability: 0.0,
            fair_odds: ODDS_UNAVAILABLE,
            raw_probability: raw,
            expected_home_goals: lambda_home,
            expected_away_goals: lambda_away,
        });
    }

    // Positive whenever both lambdas are positive, which the clamp guarantees.
    if grid_mass > 0.0 {
        for cell in &mut cells {
            cell.probability = cell.raw_probability / grid_mass * 100.0;
            cell.fair_odds = fair_odds(cell.probability);
        }
    }

    cells.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
            .then(a.scoreline.cmp(&b.scoreline))
    });

    ScoreProbabilityTable {
        home_team: String::new(),
        away_team: String::new(),
        expected_home_goals: lambda_home,
        expected_away_goals: lambda_away,
        grid_mass,
        cells,
    }
}

/// Decimal odds for a percentage probability.
pub fn fair_odds(probability_pct: f64) -> f64 {
    if probability_pct > 0.0 {
        100.0 / probability_pct
    } else {
        ODDS_UNAVAILABLE
    }
}

/// P(X = k) for X ~ Poisson(lambda).
pub fn poisson_pmf(k: u32, lambda: f64) -> f64 {
    let lambda = lambda.max(0.0);
    let mut p = (-lambda).exp();
    for i in 1..=k {
        p *= lambda / i as f64;
    }
    p
}

// Unlike a full-support pmf the tail is NOT folded into the last bucket; the
// grid renormalises instead.
fn poisson_pmf_row(lambda: f64, max_k: u8) -> Vec<f64> {
    let max_k = max_k as usize;
    let lambda = lambda.max(0.0);
    let mut out = vec![0.0; max_k + 1];
    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
