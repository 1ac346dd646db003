use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use correct_score::ScoreEngine;
use correct_score::config::AppConfig;
use correct_score::dataset::{self, Match};
use correct_score::market_odds::{self, FixtureQuotes};
use correct_score::report;

const REPORT_JSON: &str = "correct_score_report.json";
const REPORT_XLSX: &str = "correct_score_report.xlsx";

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let config = AppConfig::from_env();
    let matches = load_matches(&config)?;
    if matches.is_empty() {
        return Err(anyhow!(
            "no historical matches loaded; run hist_ingest or set MATCHES_JSON_PATH"
        ));
    }

    let engine = ScoreEngine::new(matches);
    let sim = &config.simulation;
    let summary = engine.simulate_strategy(sim.initial_bankroll, sim.bets_per_round, sim.seed);
    let market = load_market(&config)?;
    let report = report::build_report(&engine, &config.fixtures, &market, Some(summary));

    println!("Correct score analysis");
    println!(
        "Matches: {}  Teams rated: {}  Goals/match: {:.2}",
        report.metadata.total_matches,
        report.metadata.rated_teams,
        report.metadata.avg_goals_per_match
    );
    println!();
    println!("Most common scores:");
    for (idx, row) in report.common_scores.iter().take(5).enumerate() {
        println!(
            "  {}. {}: {:.2}% (fair odds {:.2})",
            idx + 1,
            row.scoreline,
            row.percentage,
            row.fair_odds
        );
    }

    println!();
    println!("Featured fixtures:");
    if report.predictions.is_empty() {
        println!("  (no featured fixture has two rated teams)");
    }
    for pred in &report.predictions {
        println!(
            "  {} vs {} [{}]: {} ({:.2}%)  xG {:.2}-{:.2}  1X2 {:.1}/{:.1}/{:.1}",
            pred.home,
            pred.away,
            pred.description,
            pred.most_likely.scoreline,
            pred.most_likely.probability,
            pred.expected_home_goals,
            pred.expected_away_goals,
            pred.outcome.home,
            pred.outcome.draw,
            pred.outcome.away
        );
    }

    if !report.value_bets.is_empty() {
        println!();
        println!("Value bets (EV > 5%):");
    }
    for fixture in &report.value_bets {
        if fixture.bets.is_empty() {
            println!("  {} vs {}: none", fixture.home, fixture.away);
            continue;
        }
        for bet in &fixture.bets {
            println!(
                "  {} vs {}: {} @ {:.2} (fair {:.2}, EV {:+.1}%, {})",
                fixture.home,
                fixture.away,
                bet.scoreline,
                bet.market_odds,
                bet.fair_odds,
                bet.expected_value,
                bet.confidence.as_str()
            );
        }
    }

    if let Some(sim) = &report.simulation {
        println!();
        println!(
            "Strategy simulation (seed {}): bankroll {:.2} -> {:.2} ({:+.2}%)",
            config.simulation.seed,
            sim.initial_bankroll,
            sim.final_bankroll,
            sim.total_return_percent
        );
    }

    let out_dir = parse_path_arg("--out").unwrap_or_else(|| config.output_dir.clone());
    let json_path = out_dir.join(REPORT_JSON);
    report::write_json(&report, &json_path)?;
    println!();
    println!("Report: {}", json_path.display());

    if config.export_xlsx || has_flag("--xlsx") {
        let xlsx_path = out_dir.join(REPORT_XLSX);
        report::export_xlsx(&report, &xlsx_path)?;
        println!("Workbook: {}", xlsx_path.display());
    }

    Ok(())
}

fn load_matches(config: &AppConfig) -> Result<Vec<Match>> {
    let db_path = parse_path_arg("--db").or_else(|| config.db_path.clone());
    if let Some(db_path) = db_path {
        let conn = dataset::open_db(&db_path)?;
        return dataset::load_matches(&conn, None)
            .with_context(|| format!("load matches from {}", db_path.display()));
    }

    let json_path = parse_path_arg("--json").unwrap_or_else(|| config.matches_json.clone());
    let data = dataset::load_season_file(&json_path)?;
    if data.skipped > 0 {
        println!("Skipped {} malformed match records", data.skipped);
    }
    Ok(data.all_matches())
}

fn load_market(config: &AppConfig) -> Result<Vec<FixtureQuotes>> {
    let Some(path) = parse_path_arg("--odds").or_else(|| config.market_odds.clone()) else {
        return Ok(Vec::new());
    };
    let market = market_odds::load_market_odds(&path)?;
    if market.skipped > 0 {
        println!("Skipped {} malformed market quotes", market.skipped);
    }
    Ok(market.fixtures)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "correct_score=info".into()),
        )
        .with_target(true)
        .init();
}

fn parse_path_arg(name: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&format!("{name}=")) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
