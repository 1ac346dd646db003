use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use correct_score::ScoreEngine;
use correct_score::dataset::parse_season_json;
use correct_score::simulator::{SIMULATION_ROUNDS, simulate_strategy};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

/// Picks index 0 for every shuffle step and loses every settlement draw, since
/// `gen_bool` compares a full `u64` against the win threshold.
struct LosingRng;

impl RngCore for LosingRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

fn fixture_engine() -> ScoreEngine {
    let data =
        parse_season_json(&read_fixture("season_results.json")).expect("fixture should parse");
    ScoreEngine::new(data.all_matches())
}

#[test]
fn same_seed_replays_exactly() {
    let engine = fixture_engine();
    let a = engine.simulate_strategy(1_000.0, 5, 42);
    let b = engine.simulate_strategy(1_000.0, 5, 42);
    assert_eq!(a, b);
    assert_eq!(a.final_bankroll.to_bits(), b.final_bankroll.to_bits());
}

#[test]
fn engine_seed_matches_explicit_rng() {
    let engine = fixture_engine();
    let via_engine = engine.simulate_strategy(500.0, 3, 7);
    let mut rng = StdRng::seed_from_u64(7);
    let direct = simulate_strategy(
        engine.ratings(),
        engine.league_averages(),
        500.0,
        3,
        &mut rng,
    );
    assert_eq!(via_engine, direct);
}

#[test]
fn different_seeds_diverge() {
    let engine = fixture_engine();
    let finals = (1..=5u64)
        .map(|seed| engine.simulate_strategy(1_000.0, 5, seed).final_bankroll)
        .collect::<Vec<_>>();
    assert!(finals.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn history_is_a_running_ledger() {
    let engine = fixture_engine();
    let summary = engine.simulate_strategy(1_000.0, 5, 42);
    assert_eq!(summary.history.len(), SIMULATION_ROUNDS);

    let teams = engine.ratings().len();
    let mut prev = summary.initial_bankroll;
    for (idx, row) in summary.history.iter().enumerate() {
        assert_eq!(row.round, idx + 1);
        assert!((row.bankroll - (prev + row.profit)).abs() < 1e-9);
        assert!(row.bets_placed <= 5.min(teams / 2));
        assert!(row.winning_bets <= row.bets_placed);
        prev = row.bankroll;
    }

    let last = summary.history.last().expect("rounds were played");
    assert_eq!(summary.final_bankroll, last.bankroll);
    let expected_return =
        (summary.final_bankroll - summary.initial_bankroll) / summary.initial_bankroll * 100.0;
    assert!((summary.total_return_percent - expected_return).abs() < 1e-9);
}

#[test]
fn zero_bets_leave_bankroll_untouched() {
    let engine = fixture_engine();
    let summary = engine.simulate_strategy(1_000.0, 0, 42);
    assert_eq!(summary.history.len(), SIMULATION_ROUNDS);
    assert!(summary.history.iter().all(|r| r.bets_placed == 0 && r.profit == 0.0));
    assert_eq!(summary.final_bankroll, 1_000.0);
    assert_eq!(summary.total_return_percent, 0.0);
}

#[test]
fn empty_history_runs_without_bets() {
    let engine = ScoreEngine::new(Vec::new());
    let summary = engine.simulate_strategy(250.0, 5, 1);
    assert_eq!(summary.history.len(), SIMULATION_ROUNDS);
    assert_eq!(summary.final_bankroll, 250.0);
}

#[test]
fn bankroll_has_no_floor() {
    let engine = fixture_engine();
    let pairs = engine.ratings().len() / 2;
    let summary = simulate_strategy(
        engine.ratings(),
        engine.league_averages(),
        5.0,
        5,
        &mut LosingRng,
    );

    // Market odds are fair x 0.92, so Kelly is never positive and every stake
    // sits on the 10-unit floor, even once the bankroll is gone.
    for row in &summary.history {
        assert_eq!(row.bets_placed, pairs);
        assert_eq!(row.winning_bets, 0);
        assert!((row.profit + 10.0 * pairs as f64).abs() < 1e-9);
        let expected = 5.0 - 10.0 * pairs as f64 * row.round as f64;
        assert!((row.bankroll - expected).abs() < 1e-6);
    }
    assert!(summary.history[0].bankroll < 0.0);
    assert!(summary.final_bankroll < 0.0);
    assert!(summary.total_return_percent < -100.0);
}
