//! Correct-score probability engine.
//!
//! Rates teams from historical results, turns two ratings into a normalised
//! 0-0 ..= 5-5 Poisson score grid with fair odds, compares those odds to
//! market quotes, summarises real scoreline frequencies and simulates a
//! fractional-Kelly correct-score betting strategy.
//!
//! ```no_run
//! use correct_score::{Match, ScoreEngine};
//!
//! let engine = ScoreEngine::new(vec![
//!     Match::new("Flamengo", "Palmeiras", 2, 1),
//!     Match::new("Palmeiras", "Flamengo", 1, 1),
//! ]);
//! if let Some(table) = engine.get_score_probabilities("Flamengo", "Palmeiras") {
//!     let top = table.most_likely().unwrap();
//!     println!("{} at {:.2}%", top.scoreline, top.probability);
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod engine;
pub mod kelly;
pub mod market_odds;
pub mod report;
pub mod score_grid;
pub mod score_history;
pub mod scoreline;
pub mod simulator;
pub mod team_ratings;
pub mod value_bets;

pub use dataset::Match;
pub use engine::ScoreEngine;
pub use score_grid::{ScoreCell, ScoreProbabilityTable};
pub use score_history::{CommonScore, TeamProfile};
pub use scoreline::Scoreline;
pub use simulator::SimulationSummary;
pub use team_ratings::{LeagueAverages, TeamRating};
pub use value_bets::{Confidence, ValueBet};
