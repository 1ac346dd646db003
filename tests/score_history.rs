use std::fs;
use std::path::PathBuf;

use correct_score::dataset::{Match, parse_season_json};
use correct_score::score_history::{common_scores, team_profile};
use correct_score::{ScoreEngine, Scoreline};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn common_scores_three_match_history() {
    let matches = vec![
        Match::new("A", "B", 1, 0),
        Match::new("C", "D", 1, 0),
        Match::new("B", "A", 0, 0),
    ];
    let rows = common_scores(&matches);
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].scoreline, Scoreline::new(1, 0));
    assert_eq!(rows[0].frequency, 2);
    assert!((rows[0].percentage - 200.0 / 3.0).abs() < 1e-9);
    assert!((rows[0].fair_odds - 1.5).abs() < 1e-9);

    assert_eq!(rows[1].scoreline, Scoreline::new(0, 0));
    assert_eq!(rows[1].frequency, 1);
    assert!((rows[1].percentage - 100.0 / 3.0).abs() < 1e-9);
    assert!((rows[1].fair_odds - 3.0).abs() < 1e-9);
}

#[test]
fn common_scores_cover_every_match_in_fixture() {
    let data =
        parse_season_json(&read_fixture("season_results.json")).expect("fixture should parse");
    let engine = ScoreEngine::new(data.all_matches());
    let rows = engine.get_common_scores();

    let frequency: usize = rows.iter().map(|r| r.frequency).sum();
    assert_eq!(frequency, engine.total_matches());
    let pct: f64 = rows.iter().map(|r| r.percentage).sum();
    assert!((pct - 100.0).abs() < 1e-6);
    for pair in rows.windows(2) {
        assert!(pair[0].frequency >= pair[1].frequency);
    }
}

#[test]
fn team_without_away_games_has_zero_away_clean_sheets() {
    let matches = vec![
        Match::new("Home Only", "Visitor", 2, 0),
        Match::new("Home Only", "Other", 1, 1),
    ];
    let profile = team_profile(&matches, "Home Only").expect("team has matches");
    assert_eq!(profile.home_games, 2);
    assert_eq!(profile.away_games, 0);
    assert_eq!(profile.clean_sheets_away_pct, 0.0);
    assert_eq!(profile.avg_goals_scored_away, 0.0);
    assert!((profile.clean_sheets_home_pct - 50.0).abs() < 1e-9);
    assert!((profile.avg_goals_scored_home - 1.5).abs() < 1e-9);
    assert!((profile.avg_goals_conceded_home - 0.5).abs() < 1e-9);
}

#[test]
fn profile_scorelines_are_from_the_team_perspective() {
    let matches = vec![
        Match::new("A", "B", 0, 2),
        Match::new("B", "A", 0, 2),
        Match::new("A", "C", 1, 1),
    ];
    let profile = team_profile(&matches, "B").expect("B played");
    // 0-2 at home and 2-0 away read as one loss and one win for B.
    let scores = profile
        .top_scores
        .iter()
        .map(|s| s.scoreline)
        .collect::<Vec<_>>();
    assert!(scores.contains(&Scoreline::new(0, 2)));
    assert!(scores.contains(&Scoreline::new(2, 0)));

    // Three distinct scorelines once each; ties fall back to scoreline order.
    let a = team_profile(&matches, "A").expect("A played");
    let scores = a.top_scores.iter().map(|s| s.scoreline).collect::<Vec<_>>();
    assert_eq!(
        scores,
        vec![Scoreline::new(0, 2), Scoreline::new(1, 1), Scoreline::new(2, 0)]
    );
    assert!(a.top_scores.iter().all(|s| s.count == 1));
}

#[test]
fn fixture_profiles_are_bounded() {
    let data =
        parse_season_json(&read_fixture("season_results.json")).expect("fixture should parse");
    let engine = ScoreEngine::new(data.all_matches());
    let profiles = engine.team_profiles();
    assert_eq!(profiles.len(), 5);

    for profile in profiles.values() {
        assert_eq!(profile.home_games, 8);
        assert_eq!(profile.away_games, 8);
        assert!(profile.top_scores.len() <= 5);
        assert!((0.0..=100.0).contains(&profile.clean_sheets_home_pct));
        assert!((0.0..=100.0).contains(&profile.clean_sheets_away_pct));
        assert!(profile.avg_goals_scored_home >= 0.0);
        assert!(profile.avg_goals_conceded_away >= 0.0);
    }

    assert!(engine.get_team_profile("Bahia").is_none());
}
