use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::config::Fixture;
use crate::engine::ScoreEngine;
use crate::market_odds::FixtureQuotes;
use crate::score_grid::{OutcomeSplit, ScoreCell};
use crate::score_history::{CommonScore, TeamProfile};
use crate::simulator::SimulationSummary;
use crate::value_bets::{self, ValueBet};

const PREDICTION_TOP_CELLS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub total_matches: usize,
    pub avg_goals_per_match: f64,
    pub rated_teams: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixturePrediction {
    pub home: String,
    pub away: String,
    pub description: String,
    pub expected_home_goals: f64,
    pub expected_away_goals: f64,
    pub most_likely: ScoreCell,
    pub top_scores: Vec<ScoreCell>,
    pub outcome: OutcomeSplit,
}

/// Quotes that beat the model for one fixture, best first. Empty `bets` means
/// the fixture was priced but nothing cleared the threshold.
#[derive(Debug, Clone, Serialize)]
pub struct FixtureValueBets {
    pub home: String,
    pub away: String,
    pub bets: Vec<ValueBet>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub metadata: ReportMetadata,
    pub common_scores: Vec<CommonScore>,
    pub team_profiles: HashMap<String, TeamProfile>,
    pub predictions: Vec<FixturePrediction>,
    pub value_bets: Vec<FixtureValueBets>,
    pub simulation: Option<SimulationSummary>,
}

/// Fixtures involving an unrated team are left out of both `predictions` and
/// `value_bets`.
pub fn build_report(
    engine: &ScoreEngine,
    fixtures: &[Fixture],
    market: &[FixtureQuotes],
    simulation: Option<SimulationSummary>,
) -> ScoreReport {
    let predictions = fixtures
        .par_iter()
        .filter_map(|fixture| predict_fixture(engine, fixture))
        .collect::<Vec<_>>();
    let value_bets = market
        .par_iter()
        .filter_map(|quotes| price_fixture(engine, quotes))
        .collect::<Vec<_>>();

    ScoreReport {
        metadata: ReportMetadata {
            generated_at: Utc::now().to_rfc3339(),
            total_matches: engine.total_matches(),
            avg_goals_per_match: engine.average_goals_per_match(),
            rated_teams: engine.ratings().len(),
        },
        common_scores: engine.get_common_scores(),
        team_profiles: engine.team_profiles(),
        predictions,
        value_bets,
        simulation,
    }
}

fn predict_fixture(engine: &ScoreEngine, fixture: &Fixture) -> Option<FixturePrediction> {
    let table = engine.get_score_probabilities(&fixture.home, &fixture.away)?;
    let most_likely = table.most_likely()?.clone();
    Some(FixturePrediction {
        home: fixture.home.clone(),
        away: fixture.away.clone(),
        description: fixture.description.clone(),
        expected_home_goals: table.expected_home_goals,
        expected_away_goals: table.expected_away_goals,
        most_likely,
        top_scores: table.top(PREDICTION_TOP_CELLS).to_vec(),
        outcome: table.outcome_split(),
    })
}

fn price_fixture(engine: &ScoreEngine, quotes: &FixtureQuotes) -> Option<FixtureValueBets> {
    let table = engine.get_score_probabilities(&quotes.home, &quotes.away)?;
    Some(FixtureValueBets {
        home: quotes.home.clone(),
        away: quotes.away.clone(),
        bets: value_bets::find_value_bets(&table, &quotes.odds),
    })
}

pub fn write_json(report: &ScoreReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(report).context("serialize score report")?;
    fs::write(&tmp, json).context("write score report")?;
    fs::rename(&tmp, path).context("swap score report")?;
    Ok(())
}

/// Four sheets: CommonScores, TeamProfiles, Predictions, ValueBets.
pub fn export_xlsx(report: &ScoreReport, path: &Path) -> Result<()> {
    let mut common_rows = vec![vec![
        "Score".to_string(),
        "Frequency".to_string(),
        "Percentage".to_string(),
        "Fair Odds".to_string(),
    ]];
    for row in &report.common_scores {
        common_rows.push(vec![
            row.scoreline.to_string(),
            row.frequency.to_string(),
            format!("{:.2}", row.percentage),
            format!("{:.2}", row.fair_odds),
        ]);
    }

    let mut profile_rows = vec![vec![
        "Team".to_string(),
        "Most Common Score".to_string(),
        "Score Frequency".to_string(),
        "Avg Scored Home".to_string(),
        "Avg Scored Away".to_string(),
        "Avg Conceded Home".to_string(),
        "Avg Conceded Away".to_string(),
        "Clean Sheets Home %".to_string(),
        "Clean Sheets Away %".to_string(),
    ]];
    let mut teams = report.team_profiles.keys().collect::<Vec<_>>();
    teams.sort_unstable();
    for team in teams {
        let p = &report.team_profiles[team];
        let (top_score, top_count) = p
            .top_scores
            .first()
            .map(|s| (s.scoreline.to_string(), s.count))
            .unwrap_or_else(|| ("0-0".to_string(), 0));
        profile_rows.push(vec![
            p.team.clone(),
            top_score,
            top_count.to_string(),
            format!("{:.2}", p.avg_goals_scored_home),
            format!("{:.2}", p.avg_goals_scored_away),
            format!("{:.2}", p.avg_goals_conceded_home),
            format!("{:.2}", p.avg_goals_conceded_away),
            format!("{:.1}", p.clean_sheets_home_pct),
            format!("{:.1}", p.clean_sheets_away_pct),
        ]);
    }

    let mut prediction_rows = vec![vec![
        "Match".to_string(),
        "Score".to_string(),
        "Probability".to_string(),
        "Fair Odds".to_string(),
        "Expected Home Goals".to_string(),
        "Expected Away Goals".to_string(),
    ]];
    for pred in &report.predictions {
        let label = format!("{} vs {}", pred.home, pred.away);
        for cell in &pred.top_scores {
            prediction_rows.push(vec![
                label.clone(),
                cell.scoreline.to_string(),
                format!("{:.3}", cell.probability),
                format!("{:.2}", cell.fair_odds),
                format!("{:.2}", pred.expected_home_goals),
                format!("{:.2}", pred.expected_away_goals),
            ]);
        }
    }

    let mut value_rows = vec![vec![
        "Match".to_string(),
        "Score".to_string(),
        "Model Probability".to_string(),
        "Fair Odds".to_string(),
        "Market Odds".to_string(),
        "Expected Value %".to_string(),
        "Confidence".to_string(),
    ]];
    for fixture in &report.value_bets {
        let label = format!("{} vs {}", fixture.home, fixture.away);
        for bet in &fixture.bets {
            value_rows.push(vec![
                label.clone(),
                bet.scoreline.to_string(),
                format!("{:.3}", bet.model_probability),
                format!("{:.2}", bet.fair_odds),
                format!("{:.2}", bet.market_odds),
                format!("{:.1}", bet.expected_value),
                bet.confidence.as_str().to_string(),
            ]);
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("CommonScores")?;
        write_rows(sheet, &common_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("TeamProfiles")?;
        write_rows(sheet, &profile_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Predictions")?;
        write_rows(sheet, &prediction_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("ValueBets")?;
        write_rows(sheet, &value_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
