use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::dataset::Match;
use crate::score_grid::{self, ScoreProbabilityTable};
use crate::score_history::{self, CommonScore, TeamProfile};
use crate::scoreline::Scoreline;
use crate::simulator::{self, SimulationSummary};
use crate::team_ratings::{self, LeagueAverages, TeamRating};
use crate::value_bets::{self, ValueBet};

/// Query surface over one immutable match history.
///
/// Ratings are derived once in [`ScoreEngine::new`]; nothing mutates them
/// afterwards, so a shared `&ScoreEngine` can be queried from many threads.
/// New history means building a new engine.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    matches: Vec<Match>,
    league: LeagueAverages,
    ratings: HashMap<String, TeamRating>,
}

impl ScoreEngine {
    pub fn new(matches: Vec<Match>) -> Self {
        let league = team_ratings::compute_league_averages(&matches);
        let ratings = team_ratings::compute_team_ratings_with(&matches, &league);
        Self {
            matches,
            league,
            ratings,
        }
    }

    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    pub fn average_goals_per_match(&self) -> f64 {
        self.league.home_goals + self.league.away_goals
    }

    pub fn league_averages(&self) -> &LeagueAverages {
        &self.league
    }

    pub fn ratings(&self) -> &HashMap<String, TeamRating> {
        &self.ratings
    }

    pub fn get_score_probabilities(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> Option<ScoreProbabilityTable> {
        score_grid::score_probabilities(&self.ratings, &self.league, home_team, away_team)
    }

    pub fn get_common_scores(&self) -> Vec<CommonScore> {
        score_history::common_scores(&self.matches)
    }

    pub fn get_team_profile(&self, team: &str) -> Option<TeamProfile> {
        score_history::team_profile(&self.matches, team)
    }

    pub fn team_profiles(&self) -> HashMap<String, TeamProfile> {
        score_history::team_profiles(&self.matches)
    }

    /// Empty when either team is unrated.
    pub fn find_value_bets(
        &self,
        home_team: &str,
        away_team: &str,
        market_odds: &HashMap<Scoreline, f64>,
    ) -> Vec<ValueBet> {
        self.get_score_probabilities(home_team, away_team)
            .map(|table| value_bets::find_value_bets(&table, market_odds))
            .unwrap_or_default()
    }

    pub fn simulate_strategy(
        &self,
        initial_bankroll: f64,
        bets_per_round: usize,
        rng_seed: u64,
    ) -> SimulationSummary {
        let mut rng = StdRng::seed_from_u64(rng_seed);
        simulator::simulate_strategy(
            &self.ratings,
            &self.league,
            initial_bankroll,
            bets_per_round,
            &mut rng,
        )
    }
}
