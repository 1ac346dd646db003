use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use correct_score::ScoreEngine;
use correct_score::config::AppConfig;
use correct_score::dataset;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "correct_score=warn".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let seed = parse_arg::<u64>("--seed").unwrap_or(config.simulation.seed);
    let bankroll = parse_arg::<f64>("--bankroll")
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(config.simulation.initial_bankroll);
    let bets = parse_arg::<usize>("--bets")
        .unwrap_or(config.simulation.bets_per_round)
        .clamp(1, 50);

    let matches = match parse_arg::<PathBuf>("--db").or_else(|| config.db_path.clone()) {
        Some(db_path) => {
            let conn = dataset::open_db(&db_path)?;
            dataset::load_matches(&conn, None)
                .with_context(|| format!("load matches from {}", db_path.display()))?
        }
        None => {
            let json_path = parse_arg::<PathBuf>("--json").unwrap_or(config.matches_json);
            dataset::load_season_file(&json_path)?.all_matches()
        }
    };

    let engine = ScoreEngine::new(matches);
    if engine.ratings().len() < 2 {
        return Err(anyhow!("need at least two rated teams to simulate"));
    }

    let summary = engine.simulate_strategy(bankroll, bets, seed);

    println!("Correct score strategy simulation");
    println!(
        "Teams: {}  Bets/round: {}  Seed: {}",
        engine.ratings().len(),
        bets,
        seed
    );
    println!();
    for row in &summary.history {
        println!(
            "round {:>3}: bankroll={:>10.2} profit={:>+9.2} bets={} wins={}",
            row.round, row.bankroll, row.profit, row.bets_placed, row.winning_bets
        );
    }
    println!();
    println!(
        "final bankroll {:.2} (start {:.2}, return {:+.2}%)",
        summary.final_bankroll, summary.initial_bankroll, summary.total_return_percent
    );

    Ok(())
}

fn parse_arg<T: std::str::FromStr>(name: &str) -> Option<T> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<T>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<T>()
        {
            return Some(v);
        }
    }
    None
}
