use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use correct_score::config::AppConfig;
use correct_score::dataset;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "correct_score=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let json_path = parse_path_arg("--json").unwrap_or_else(|| config.matches_json.clone());
    let db_path = parse_path_arg("--db")
        .or_else(|| config.db_path.clone())
        .or_else(dataset::default_db_path)
        .context("unable to resolve sqlite path")?;

    let data = dataset::load_season_file(&json_path)?;
    if data.seasons.is_empty() {
        return Err(anyhow!("no seasons found in {}", json_path.display()));
    }

    let mut conn = dataset::open_db(&db_path)?;
    let mut upserted = 0usize;
    for (season, matches) in &data.seasons {
        upserted += dataset::upsert_season(&mut conn, season, matches)
            .with_context(|| format!("ingest season {season}"))?;
    }

    println!("Historical ingest complete");
    println!("Source: {}", json_path.display());
    println!("DB: {}", db_path.display());
    println!("Rows stored: {upserted}");
    if data.skipped > 0 {
        println!("Malformed records skipped: {}", data.skipped);
    }
    for (season, count) in dataset::stored_seasons(&conn)? {
        println!("season {season}: {count} matches stored");
    }

    Ok(())
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
