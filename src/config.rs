use std::env;
use std::path::PathBuf;

const CACHE_DIR: &str = "correct_score";

const DEFAULT_MATCHES_JSON: &str = "brasileirao_collection_results.json";
const DEFAULT_INITIAL_BANKROLL: f64 = 1_000.0;
const DEFAULT_BETS_PER_ROUND: usize = 5;
const DEFAULT_SEED: u64 = 42;

const DEFAULT_FIXTURES: &[(&str, &str, &str)] = &[
    ("Flamengo", "Palmeiras", "Clássico nacional"),
    ("São Paulo", "Corinthians", "Majestoso"),
    ("Grêmio", "Internacional", "Grenal"),
    ("Flamengo", "Fluminense", "Fla-Flu"),
    ("Atlético-MG", "Cruzeiro", "Clássico Mineiro"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub home: String,
    pub away: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_bankroll: f64,
    pub bets_per_round: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub matches_json: PathBuf,
    pub db_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub export_xlsx: bool,
    pub market_odds: Option<PathBuf>,
    pub simulation: SimulationConfig,
    pub fixtures: Vec<Fixture>,
}

impl AppConfig {
    /// Reads process env. Call `dotenvy` first if `.env` files should apply.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let matches_json = opt("MATCHES_JSON_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MATCHES_JSON));
        let db_path = opt("HIST_DB_PATH").map(PathBuf::from);
        let output_dir = opt("REPORT_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let export_xlsx = opt("REPORT_XLSX").map(|v| parse_bool(&v)).unwrap_or(false);
        let market_odds = opt("MARKET_ODDS_PATH").map(PathBuf::from);

        let initial_bankroll = opt("SIM_INITIAL_BANKROLL")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_INITIAL_BANKROLL);
        let bets_per_round = opt("SIM_BETS_PER_ROUND")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_BETS_PER_ROUND)
            .clamp(1, 50);
        let seed = opt("SIM_SEED")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEED);

        let fixtures = opt("FEATURED_FIXTURES")
            .map(|raw| parse_fixtures(&raw))
            .filter(|f| !f.is_empty())
            .unwrap_or_else(default_fixtures);

        Self {
            matches_json,
            db_path,
            output_dir,
            export_xlsx,
            market_odds,
            simulation: SimulationConfig {
                initial_bankroll,
                bets_per_round,
                seed,
            },
            fixtures,
        }
    }
}

pub fn default_fixtures() -> Vec<Fixture> {
    DEFAULT_FIXTURES
        .iter()
        .map(|(home, away, description)| Fixture {
            home: home.to_string(),
            away: away.to_string(),
            description: description.to_string(),
        })
        .collect()
}

/// `"Home v Away; Home v Away=Derby"`. The optional `=...` suffix is the
/// description; malformed entries are dropped.
pub fn parse_fixtures(raw: &str) -> Vec<Fixture> {
    raw.split(';')
        .filter_map(|entry| {
            let (pair, description) = match entry.split_once('=') {
                Some((pair, desc)) => (pair, desc.trim()),
                None => (entry, ""),
            };
            let (home, away) = split_fixture(pair)?;
            Some(Fixture {
                home: home.to_string(),
                away: away.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}

/// `"Home v Away"` -> `("Home", "Away")`; `None` for blank or identical sides.
pub fn split_fixture(pair: &str) -> Option<(&str, &str)> {
    let (home, away) = pair.split_once(" v ")?;
    let (home, away) = (home.trim(), away.trim());
    if home.is_empty() || away.is_empty() || home == away {
        return None;
    }
    Some((home, away))
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn parse_bool(raw: &str) -> bool {
    let t = raw.trim().to_ascii_lowercase();
    !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
}
