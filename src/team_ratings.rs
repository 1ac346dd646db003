use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::Match;

/// Smallest coefficient a team can carry. A side that never scored (or never
/// conceded) at a venue would otherwise rate exactly 0.
const MIN_COEFFICIENT: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeagueAverages {
    pub matches: usize,
    pub home_goals: f64,
    pub away_goals: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub attack_home: f64,
    pub attack_away: f64,
    pub defense_home: f64,
    pub defense_away: f64,
    pub avg_goals_for_home: f64,
    pub avg_goals_for_away: f64,
    pub avg_goals_against_home: f64,
    pub avg_goals_against_away: f64,
    pub home_games: usize,
    pub away_games: usize,
    pub total_games: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct VenueTotals {
    games: usize,
    goals_for: u64,
    goals_against: u64,
}

impl VenueTotals {
    fn add(&mut self, goals_for: u32, goals_against: u32) {
        self.games += 1;
        self.goals_for += u64::from(goals_for);
        self.goals_against += u64::from(goals_against);
    }

    fn avg_for(&self) -> f64 {
        mean(self.goals_for, self.games)
    }

    fn avg_against(&self) -> f64 {
        mean(self.goals_against, self.games)
    }
}

pub fn compute_league_averages(matches: &[Match]) -> LeagueAverages {
    let mut home = 0u64;
    let mut away = 0u64;
    for m in matches {
        home += u64::from(m.home_score);
        away += u64::from(m.away_score);
    }
    LeagueAverages {
        matches: matches.len(),
        home_goals: mean(home, matches.len()),
        away_goals: mean(away, matches.len()),
    }
}

/// Attack/defense coefficients per team, split by venue.
///
/// Each coefficient is the team's own venue average divided by the league
/// average for the same side of the scoreline:
///
/// | coefficient   | team average            | league average |
/// |---------------|-------------------------|----------------|
/// | attack_home   | scored at home          | home goals     |
/// | attack_away   | scored away             | away goals     |
/// | defense_home  | conceded at home        | away goals     |
/// | defense_away  | conceded away           | home goals     |
///
/// A venue the team never played at, or a league average of zero, gives the
/// neutral coefficient 1.0.
pub fn compute_team_ratings(matches: &[Match]) -> HashMap<String, TeamRating> {
    let league = compute_league_averages(matches);
    compute_team_ratings_with(matches, &league)
}

pub fn compute_team_ratings_with(
    matches: &[Match],
    league: &LeagueAverages,
) -> HashMap<String, TeamRating> {
    let mut totals: HashMap<&str, (VenueTotals, VenueTotals)> = HashMap::new();
    for m in matches {
        totals
            .entry(m.home_team.as_str())
            .or_default()
            .0
            .add(m.home_score, m.away_score);
        totals
            .entry(m.away_team.as_str())
            .or_default()
            .1
            .add(m.away_score, m.home_score);
    }

    let mut out = HashMap::with_capacity(totals.len());
    for (team, (home, away)) in totals {
        let total_games = home.games + away.games;
        if total_games == 0 {
            continue;
        }
        out.insert(
            team.to_string(),
            TeamRating {
                attack_home: coefficient(home.games, home.avg_for(), league.home_goals),
                attack_away: coefficient(away.games, away.avg_for(), league.away_goals),
                defense_home: coefficient(home.games, home.avg_against(), league.away_goals),
                defense_away: coefficient(away.games, away.avg_against(), league.home_goals),
                avg_goals_for_home: home.avg_for(),
                avg_goals_for_away: away.avg_for(),
                avg_goals_against_home: home.avg_against(),
                avg_goals_against_away: away.avg_against(),
                home_games: home.games,
                away_games: away.games,
                total_games,
            },
        );
    }

    info!(
        teams = out.len(),
        matches = league.matches,
        league_home = league.home_goals,
        league_away = league.away_goals,
        "built team ratings"
    );
    out
}

fn coefficient(games: usize, team_avg: f64, league_avg: f64) -> f64 {
    if games == 0 || league_avg <= 0.0 {
        return 1.0;
    }
    (team_avg / league_avg).max(MIN_COEFFICIENT)
}

fn mean(sum: u64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { sum as f64 / n as f64 }
}
