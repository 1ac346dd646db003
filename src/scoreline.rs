use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Highest goal count per side covered by the score grid (inclusive).
pub const MAX_GOALS: u8 = 5;

/// A final score, always from the home side's perspective unless a caller
/// says otherwise (team profiles flip it so the profiled team comes first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Scoreline {
    pub home: u8,
    pub away: u8,
}

impl Scoreline {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    /// Saturates instead of failing so absurd historical scores still get a key.
    pub fn from_goals(home: u32, away: u32) -> Self {
        Self {
            home: u8::try_from(home).unwrap_or(u8::MAX),
            away: u8::try_from(away).unwrap_or(u8::MAX),
        }
    }

    pub fn flipped(self) -> Self {
        Self {
            home: self.away,
            away: self.home,
        }
    }

    pub fn in_grid(self) -> bool {
        self.home <= MAX_GOALS && self.away <= MAX_GOALS
    }

    /// Every scoreline of the 0-0 ..= 5-5 grid, row-major.
    pub fn grid() -> impl Iterator<Item = Scoreline> {
        (0..=MAX_GOALS).flat_map(|h| (0..=MAX_GOALS).map(move |a| Scoreline::new(h, a)))
    }
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

impl FromStr for Scoreline {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let mut nums = raw
            .split(|ch: char| !ch.is_ascii_digit())
            .filter(|s| !s.is_empty());
        let home = nums
            .next()
            .and_then(|s| s.parse::<u8>().ok())
            .ok_or_else(|| anyhow!("missing home goals in scoreline {raw:?}"))?;
        let away = nums
            .next()
            .and_then(|s| s.parse::<u8>().ok())
            .ok_or_else(|| anyhow!("missing away goals in scoreline {raw:?}"))?;
        if nums.next().is_some() {
            return Err(anyhow!("trailing data in scoreline {raw:?}"));
        }
        Ok(Self { home, away })
    }
}
