use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crease_types::{PlayerId, PlayerStats};
use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Figure players are ranked by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingCategory {
    Runs,
    Wickets,
    /// Batting average.
    Average,
}

impl RankingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Runs => "runs",
            Self::Wickets => "wickets",
            Self::Average => "average",
        }
    }

    pub fn value(&self, stats: &PlayerStats) -> f64 {
        match self {
            Self::Runs => f64::from(stats.runs),
            Self::Wickets => f64::from(stats.wickets),
            Self::Average => stats.batting_average(),
        }
    }
}

impl fmt::Display for RankingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingCategory {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "runs" => Ok(Self::Runs),
            "wickets" => Ok(Self::Wickets),
            "average" => Ok(Self::Average),
            other => Err(StatsError::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub player: PlayerId,
    pub value: f64,
    pub stats: PlayerStats,
}

/// Rank `stats` by `category`: highest first, ties broken by player id,
/// truncated to `limit` entries.
pub fn rank(stats: Vec<PlayerStats>, category: RankingCategory, limit: usize) -> Vec<RankingEntry> {
    let mut scored: Vec<(f64, PlayerStats)> =
        stats.into_iter().map(|s| (category.value(&s), s)).collect();
    scored.sort_by(|(va, a), (vb, b)| {
        vb.partial_cmp(va)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player.cmp(&b.player))
    });
    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (value, stats))| RankingEntry {
            rank: i as u32 + 1,
            player: stats.player.clone(),
            value,
            stats,
        })
        .collect()
}
