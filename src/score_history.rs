use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Match;
use crate::score_grid::fair_odds;
use crate::scoreline::Scoreline;

const PROFILE_TOP_SCORES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonScore {
    pub scoreline: Scoreline,
    pub frequency: usize,
    /// Share of all matches, in percent.
    pub percentage: f64,
    pub fair_odds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFrequency {
    pub scoreline: Scoreline,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team: String,
    pub home_games: usize,
    pub away_games: usize,
    /// Own goals first, regardless of venue.
    pub top_scores: Vec<ScoreFrequency>,
    pub avg_goals_scored_home: f64,
    pub avg_goals_scored_away: f64,
    pub avg_goals_conceded_home: f64,
    pub avg_goals_conceded_away: f64,
    pub clean_sheets_home_pct: f64,
    pub clean_sheets_away_pct: f64,
}

/// Real scoreline frequencies across the whole history, most common first.
pub fn common_scores(matches: &[Match]) -> Vec<CommonScore> {
    if matches.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<Scoreline, usize> = HashMap::new();
    for m in matches {
        *counts.entry(m.scoreline()).or_insert(0) += 1;
    }

    let total = matches.len() as f64;
    let mut out = counts
        .into_iter()
        .map(|(scoreline, frequency)| {
            let percentage = frequency as f64 / total * 100.0;
            CommonScore {
                scoreline,
                frequency,
                percentage,
                fair_odds: fair_odds(percentage),
            }
        })
        .collect::<Vec<_>>();

    out.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
            .then(a.scoreline.cmp(&b.scoreline))
    });
    out
}

#[derive(Debug, Default)]
struct ProfileAcc {
    home_games: usize,
    away_games: usize,
    scored_home: u64,
    scored_away: u64,
    conceded_home: u64,
    conceded_away: u64,
    clean_home: usize,
    clean_away: usize,
    scores: HashMap<Scoreline, usize>,
}

impl ProfileAcc {
    fn add_home(&mut self, m: &Match) {
        self.home_games += 1;
        self.scored_home += u64::from(m.home_score);
        self.conceded_home += u64::from(m.away_score);
        if m.away_score == 0 {
            self.clean_home += 1;
        }
        *self.scores.entry(m.scoreline()).or_insert(0) += 1;
    }

    fn add_away(&mut self, m: &Match) {
        self.away_games += 1;
        self.scored_away += u64::from(m.away_score);
        self.conceded_away += u64::from(m.home_score);
        if m.home_score == 0 {
            self.clean_away += 1;
        }
        *self.scores.entry(m.scoreline().flipped()).or_insert(0) += 1;
    }

    fn finish(self, team: &str) -> TeamProfile {
        let mut top_scores = self
            .scores
            .into_iter()
            .map(|(scoreline, count)| ScoreFrequency { scoreline, count })
            .collect::<Vec<_>>();
        top_scores.sort_by(|a, b| b.count.cmp(&a.count).then(a.scoreline.cmp(&b.scoreline)));
        top_scores.truncate(PROFILE_TOP_SCORES);

        TeamProfile {
            team: team.to_string(),
            home_games: self.home_games,
            away_games: self.away_games,
            top_scores,
            avg_goals_scored_home: ratio(self.scored_home as f64, self.home_games),
            avg_goals_scored_away: ratio(self.scored_away as f64, self.away_games),
            avg_goals_conceded_home: ratio(self.conceded_home as f64, self.home_games),
            avg_goals_conceded_away: ratio(self.conceded_away as f64, self.away_games),
            clean_sheets_home_pct: ratio(self.clean_home as f64 * 100.0, self.home_games),
            clean_sheets_away_pct: ratio(self.clean_away as f64 * 100.0, self.away_games),
        }
    }
}

/// Score profile for one team, or `None` if it never appears in the history.
pub fn team_profile(matches: &[Match], team: &str) -> Option<TeamProfile> {
    let mut acc = ProfileAcc::default();
    for m in matches {
        if m.home_team == team {
            acc.add_home(m);
        } else if m.away_team == team {
            acc.add_away(m);
        }
    }
    if acc.home_games + acc.away_games == 0 {
        return None;
    }
    Some(acc.finish(team))
}

pub fn team_profiles(matches: &[Match]) -> HashMap<String, TeamProfile> {
    let mut accs: HashMap<&str, ProfileAcc> = HashMap::new();
    for m in matches {
        accs.entry(m.home_team.as_str()).or_default().add_home(m);
        accs.entry(m.away_team.as_str()).or_default().add_away(m);
    }
    accs.into_iter()
        .map(|(team, acc)| (team.to_string(), acc.finish(team)))
        .collect()
}

// Zero matches at a venue reports 0 rather than NaN.
fn ratio(num: f64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { num / n as f64 }
}
