use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::app_cache_dir;
use crate::scoreline::Scoreline;

/// A completed match. Scores are non-negative by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
}

impl Match {
    pub fn new(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_score: u32,
        away_score: u32,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_score,
            away_score,
        }
    }

    pub fn scoreline(&self) -> Scoreline {
        Scoreline::from_goals(self.home_score, self.away_score)
    }
}

/// Matches grouped by season label ("2023", "2024", ...).
#[derive(Debug, Clone, Default)]
pub struct SeasonData {
    pub seasons: BTreeMap<String, Vec<Match>>,
    pub skipped: usize,
}

impl SeasonData {
    /// All seasons concatenated, oldest season label first.
    pub fn all_matches(&self) -> Vec<Match> {
        self.seasons.values().flatten().cloned().collect()
    }

    pub fn total_matches(&self) -> usize {
        self.seasons.values().map(Vec::len).sum()
    }
}

/// Reads a results file shaped `{"2023": [{home_team, away_team, home_score,
/// away_score}, ...], "2024": [...]}`.
pub fn load_season_file(path: &Path) -> Result<SeasonData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read season file {}", path.display()))?;
    parse_season_json(&raw).with_context(|| format!("parse season file {}", path.display()))
}

pub fn parse_season_json(raw: &str) -> Result<SeasonData> {
    let value: Value = serde_json::from_str(raw.trim()).context("invalid season json")?;
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow!("season json must be an object keyed by season"))?;

    let mut out = SeasonData::default();
    for (season, rows) in obj {
        let Some(rows) = rows.as_array() else {
            warn!(season = %season, "season entry is not an array; skipped");
            continue;
        };
        let mut matches = Vec::with_capacity(rows.len());
        for row in rows {
            match parse_match(row) {
                Some(m) => matches.push(m),
                None => out.skipped += 1,
            }
        }
        out.seasons.insert(season.clone(), matches);
    }

    if out.skipped > 0 {
        warn!(skipped = out.skipped, "dropped malformed match records");
    }
    Ok(out)
}

fn parse_match(v: &Value) -> Option<Match> {
    let home_team = v.get("home_team")?.as_str()?.trim().to_string();
    let away_team = v.get("away_team")?.as_str()?.trim().to_string();
    if home_team.is_empty() || away_team.is_empty() || home_team == away_team {
        return None;
    }
    let home_score = as_u32_any(v.get("home_score")?)?;
    let away_score = as_u32_any(v.get("away_score")?)?;
    Some(Match {
        home_team,
        away_team,
        home_score,
        away_score,
    })
}

// Scrapers hand us both 2 and "2"; floats like 2.0 are accepted too.
fn as_u32_any(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return u32::try_from(n).ok();
    }
    if let Some(f) = v.as_f64() {
        if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
            return Some(f as u32);
        }
        return None;
    }
    v.as_str()?.trim().parse::<u32>().ok()
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join("historical_matches.sqlite"))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS matches (
            season TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_score INTEGER NOT NULL,
            away_score INTEGER NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (season, home_team, away_team)
        );
        CREATE INDEX IF NOT EXISTS idx_matches_season ON matches(season);
        CREATE INDEX IF NOT EXISTS idx_matches_home ON matches(home_team);
        CREATE INDEX IF NOT EXISTS idx_matches_away ON matches(away_team);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Inserts or refreshes every match of a season; returns the number of
/// distinct `(home_team, away_team)` rows stored. A repeated pairing within a
/// season overwrites the earlier one.
pub fn upsert_season(conn: &mut Connection, season: &str, matches: &[Match]) -> Result<usize> {
    let tx = conn.transaction().context("begin ingest transaction")?;
    let updated_at = Utc::now().to_rfc3339();
    let mut keys = HashSet::with_capacity(matches.len());
    for m in matches {
        keys.insert((m.home_team.as_str(), m.away_team.as_str()));
        tx.execute(
            r#"
            INSERT INTO matches (season, home_team, away_team, home_score, away_score, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(season, home_team, away_team) DO UPDATE SET
                home_score = excluded.home_score,
                away_score = excluded.away_score,
                updated_at = excluded.updated_at
            "#,
            params![
                season,
                m.home_team,
                m.away_team,
                i64::from(m.home_score),
                i64::from(m.away_score),
                updated_at,
            ],
        )
        .context("upsert match")?;
    }
    tx.commit().context("commit ingest transaction")?;

    let collapsed = matches.len() - keys.len();
    if collapsed > 0 {
        warn!(season, collapsed, "repeated home/away pairing in season; later result kept");
    }
    Ok(keys.len())
}

/// Loads stored matches, optionally restricted to one season, in a stable
/// (season, home, away) order.
pub fn load_matches(conn: &Connection, season: Option<&str>) -> Result<Vec<Match>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT home_team, away_team, home_score, away_score
            FROM matches
            WHERE ?1 IS NULL OR season = ?1
            ORDER BY season ASC, home_team ASC, away_team ASC
            "#,
        )
        .context("prepare load matches query")?;

    let rows = stmt
        .query_map(params![season], |row| {
            Ok(Match {
                home_team: row.get(0)?,
                away_team: row.get(1)?,
                home_score: row.get::<_, u32>(2)?,
                away_score: row.get::<_, u32>(3)?,
            })
        })
        .context("query load matches")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode match row")?);
    }
    Ok(out)
}

pub fn stored_seasons(conn: &Connection) -> Result<Vec<(String, usize)>> {
    let mut stmt = conn
        .prepare("SELECT season, COUNT(*) FROM matches GROUP BY season ORDER BY season ASC")
        .context("prepare seasons query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
        })
        .context("query seasons")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode season row")?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_values_accept_strings_and_whole_floats() {
        assert_eq!(as_u32_any(&Value::from(3)), Some(3));
        assert_eq!(as_u32_any(&Value::from("2")), Some(2));
        assert_eq!(as_u32_any(&Value::from(1.0)), Some(1));
        assert_eq!(as_u32_any(&Value::from(-1)), None);
        assert_eq!(as_u32_any(&Value::from(1.5)), None);
        assert_eq!(as_u32_any(&Value::from("x")), None);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let raw = r#"{
            "2024": [
                {"home_team": "A", "away_team": "B", "home_score": 1, "away_score": 0},
                {"home_team": "A", "away_team": "A", "home_score": 1, "away_score": 0},
                {"home_team": "", "away_team": "B", "home_score": 1, "away_score": 0},
                {"home_team": "C", "away_team": "B", "home_score": -2, "away_score": 0},
                {"home_team": "C", "away_team": "B"}
            ]
        }"#;
        let data = parse_season_json(raw).unwrap();
        assert_eq!(data.total_matches(), 1);
        assert_eq!(data.skipped, 4);
    }

    #[test]
    fn non_object_root_is_an_error() {
        assert!(parse_season_json("[]").is_err());
        assert!(parse_season_json("not json").is_err());
    }
}
