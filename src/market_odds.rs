use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::warn;

use crate::config::split_fixture;
use crate::scoreline::Scoreline;

/// Bookmaker correct-score quotes for one fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureQuotes {
    pub home: String,
    pub away: String,
    pub odds: HashMap<Scoreline, f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketOdds {
    pub fixtures: Vec<FixtureQuotes>,
    /// Fixture keys or individual quotes that could not be used.
    pub skipped: usize,
}

/// Reads a quotes file shaped `{"Home v Away": {"2-1": 8.5, ...}, ...}`.
pub fn load_market_odds(path: &Path) -> Result<MarketOdds> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read market odds {}", path.display()))?;
    parse_market_odds_json(&raw).with_context(|| format!("parse market odds {}", path.display()))
}

pub fn parse_market_odds_json(raw: &str) -> Result<MarketOdds> {
    let value: Value = serde_json::from_str(raw.trim()).context("invalid market odds json")?;
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("market odds json must be an object keyed by fixture"))?;

    let mut out = MarketOdds::default();
    for (key, quotes) in obj {
        let (Some((home, away)), Some(quotes)) = (split_fixture(key), quotes.as_object()) else {
            warn!(fixture = %key, "unusable market odds entry");
            out.skipped += 1;
            continue;
        };

        let mut odds = HashMap::with_capacity(quotes.len());
        for (score, price) in quotes {
            let scoreline = score.parse::<Scoreline>();
            let price = price.as_f64().filter(|p| p.is_finite() && *p > 0.0);
            match (scoreline, price) {
                (Ok(scoreline), Some(price)) => {
                    odds.insert(scoreline, price);
                }
                _ => out.skipped += 1,
            }
        }
        out.fixtures.push(FixtureQuotes {
            home: home.to_string(),
            away: away.to_string(),
            odds,
        });
    }

    if out.skipped > 0 {
        warn!(skipped = out.skipped, "dropped malformed market quotes");
    }
    Ok(out)
}
