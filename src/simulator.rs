use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::kelly;
use crate::score_grid;
use crate::scoreline::Scoreline;
use crate::team_ratings::{LeagueAverages, TeamRating};

pub const SIMULATION_ROUNDS: usize = 100;
/// Simulated bookmaker payout relative to fair odds (8% margin).
pub const MARKET_PAYOUT: f64 = 0.92;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based.
    pub round: usize,
    pub bankroll: f64,
    pub profit: f64,
    pub bets_placed: usize,
    pub winning_bets: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub initial_bankroll: f64,
    pub final_bankroll: f64,
    pub total_return_percent: f64,
    pub history: Vec<RoundRecord>,
}

#[derive(Debug, Clone)]
struct SimulatedBet {
    home_team: String,
    away_team: String,
    scoreline: Scoreline,
    odds: f64,
    stake: f64,
    won: bool,
    profit: f64,
}

/// Runs the fixed 100-round correct-score strategy.
///
/// Each round shuffles the rated teams, pairs them off (home, away) up to
/// `bets_per_round` fixtures, backs the most likely scoreline at fair odds
/// minus the bookmaker margin and settles it with a draw at the model's own
/// probability. The bankroll carries over between rounds and may go negative.
///
/// Reproducible only for an identically seeded `rng`.
pub fn simulate_strategy<R: Rng + ?Sized>(
    ratings: &HashMap<String, TeamRating>,
    league: &LeagueAverages,
    initial_bankroll: f64,
    bets_per_round: usize,
    rng: &mut R,
) -> SimulationSummary {
    // HashMap order is per-process; sort so the seed alone drives the shuffle.
    let mut base_order = ratings.keys().map(String::as_str).collect::<Vec<_>>();
    base_order.sort_unstable();

    let mut bankroll = initial_bankroll;
    let mut history = Vec::with_capacity(SIMULATION_ROUNDS);

    for round_idx in 0..SIMULATION_ROUNDS {
        let mut teams = base_order.clone();
        teams.shuffle(rng);

        let bets = play_round(ratings, league, &teams, bets_per_round, bankroll, rng);
        let profit: f64 = bets.iter().map(|b| b.profit).sum();
        let winning_bets = bets.iter().filter(|b| b.won).count();
        bankroll += profit;

        for bet in bets.iter().filter(|b| b.won) {
            debug!(
                round = round_idx + 1,
                home = %bet.home_team,
                away = %bet.away_team,
                score = %bet.scoreline,
                odds = bet.odds,
                stake = bet.stake,
                "simulated bet won"
            );
        }

        history.push(RoundRecord {
            round: round_idx + 1,
            bankroll,
            profit,
            bets_placed: bets.len(),
            winning_bets,
        });
    }

    let total_return_percent = if initial_bankroll != 0.0 {
        (bankroll - initial_bankroll) / initial_bankroll * 100.0
    } else {
        0.0
    };

    SimulationSummary {
        initial_bankroll,
        final_bankroll: bankroll,
        total_return_percent,
        history,
    }
}

fn play_round<R: Rng + ?Sized>(
    ratings: &HashMap<String, TeamRating>,
    league: &LeagueAverages,
    teams: &[&str],
    bets_per_round: usize,
    bankroll: f64,
    rng: &mut R,
) -> Vec<SimulatedBet> {
    let mut bets = Vec::with_capacity(bets_per_round);
    // Stakes are sized off the bankroll at the start of the round.
    for pair in teams.chunks_exact(2).take(bets_per_round) {
        let (home_team, away_team) = (pair[0], pair[1]);
        let Some(table) = score_grid::score_probabilities(ratings, league, home_team, away_team)
        else {
            continue;
        };
        let Some(pick) = table.most_likely() else {
            continue;
        };

        let probability = pick.probability / 100.0;
        let odds = pick.fair_odds * MARKET_PAYOUT;
        let stake = kelly::bounded_stake(bankroll, probability, odds);
        let won = rng.gen_bool(probability.clamp(0.0, 1.0));
        let profit = if won { stake * (odds - 1.0) } else { -stake };

        bets.push(SimulatedBet {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            scoreline: pick.scoreline,
            odds,
            stake,
            won,
            profit,
        });
    }
    bets
}
