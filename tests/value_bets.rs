use std::collections::HashMap;

use correct_score::score_grid::table_from_expected_goals;
use correct_score::value_bets::{HIGH_CONFIDENCE_EV, MIN_EXPECTED_VALUE, find_value_bets};
use correct_score::{Confidence, Match, ScoreEngine, Scoreline};

fn fair(table: &correct_score::ScoreProbabilityTable, h: u8, a: u8) -> f64 {
    table
        .get(Scoreline::new(h, a))
        .expect("cell in grid")
        .fair_odds
}

#[test]
fn only_quotes_above_five_percent_survive() {
    let table = table_from_expected_goals(1.5, 1.1);
    let market = HashMap::from([
        (Scoreline::new(1, 0), fair(&table, 1, 0) / 1.2),
        (Scoreline::new(1, 1), fair(&table, 1, 1) / 1.1),
        (Scoreline::new(0, 0), fair(&table, 0, 0) / 1.03),
        (Scoreline::new(2, 1), fair(&table, 2, 1) * 1.5),
    ]);

    let bets = find_value_bets(&table, &market);
    assert_eq!(bets.len(), 2);

    assert_eq!(bets[0].scoreline, Scoreline::new(1, 0));
    assert!((bets[0].expected_value - 20.0).abs() < 1e-6);
    assert_eq!(bets[0].confidence, Confidence::High);

    assert_eq!(bets[1].scoreline, Scoreline::new(1, 1));
    assert!((bets[1].expected_value - 10.0).abs() < 1e-6);
    assert_eq!(bets[1].confidence, Confidence::Medium);

    for bet in &bets {
        assert!(bet.expected_value > MIN_EXPECTED_VALUE);
        assert_eq!(
            bet.confidence == Confidence::High,
            bet.expected_value > HIGH_CONFIDENCE_EV
        );
        let cell = table.get(bet.scoreline).expect("in grid");
        assert_eq!(bet.model_probability, cell.probability);
        assert_eq!(bet.fair_odds, cell.fair_odds);
        assert_eq!(bet.market_odds, market[&bet.scoreline]);
    }
}

#[test]
fn unusable_quotes_are_ignored() {
    let table = table_from_expected_goals(1.2, 1.2);
    let market = HashMap::from([
        (Scoreline::new(7, 7), 2.0),
        (Scoreline::new(0, 0), 0.0),
        (Scoreline::new(0, 1), -3.0),
        (Scoreline::new(1, 0), f64::NAN),
    ]);
    assert!(find_value_bets(&table, &market).is_empty());
    assert!(find_value_bets(&table, &HashMap::new()).is_empty());
}

#[test]
fn results_are_sorted_by_expected_value() {
    let table = table_from_expected_goals(1.3, 0.9);
    let mut market = HashMap::new();
    for (idx, cell) in table.cells.iter().take(10).enumerate() {
        market.insert(cell.scoreline, cell.fair_odds / (1.06 + idx as f64 * 0.03));
    }
    let bets = find_value_bets(&table, &market);
    assert_eq!(bets.len(), 10);
    for pair in bets.windows(2) {
        assert!(pair[0].expected_value >= pair[1].expected_value);
    }
}

#[test]
fn engine_returns_empty_for_unrated_team() {
    let engine = ScoreEngine::new(vec![
        Match::new("A", "B", 2, 1),
        Match::new("B", "A", 1, 1),
    ]);
    let market = HashMap::from([(Scoreline::new(1, 1), 100.0)]);
    assert!(engine.find_value_bets("A", "Z", &market).is_empty());

    // Absurd odds on a real cell make EV negative, never a value bet.
    assert!(engine.find_value_bets("A", "B", &market).is_empty());
    let generous = HashMap::from([(Scoreline::new(1, 1), 1.01)]);
    assert_eq!(engine.find_value_bets("A", "B", &generous).len(), 1);
}
