use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{BallId, InningsId, PlayerId, UserId};
use crate::innings::BALLS_PER_OVER;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattingHand {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BowlingHand {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BowlingStyle {
    Fast,
    Medium,
    Spin,
    OffSpin,
    LegSpin,
}

/// A player known to the roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub batting_hand: Option<BattingHand>,
    #[serde(default)]
    pub bowling_hand: Option<BowlingHand>,
    #[serde(default)]
    pub bowling_style: Option<BowlingStyle>,
    #[serde(default)]
    pub linked_user: Option<UserId>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            batting_hand: None,
            bowling_hand: None,
            bowling_style: None,
            linked_user: None,
        }
    }
}

/// Cumulative figures for one player across all matches.
///
/// Overs bowled are kept as a legal-ball count so repeated apply/undo cycles
/// cannot drift the way fractional sixths would.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: PlayerId,
    pub matches: u32,
    pub innings: u32,
    pub runs: u32,
    pub balls_faced: u32,
    pub wickets: u32,
    pub balls_bowled: u32,
    pub runs_conceded: u32,
    pub fours: u32,
    pub sixes: u32,
    pub last_updated: Option<DateTime<Utc>>,
}

impl PlayerStats {
    pub fn zeroed(player: PlayerId) -> Self {
        Self {
            player,
            matches: 0,
            innings: 0,
            runs: 0,
            balls_faced: 0,
            wickets: 0,
            balls_bowled: 0,
            runs_conceded: 0,
            fours: 0,
            sixes: 0,
            last_updated: None,
        }
    }

    pub fn overs_bowled(&self) -> f64 {
        f64::from(self.balls_bowled) / f64::from(BALLS_PER_OVER)
    }

    pub fn batting_average(&self) -> f64 {
        ratio(self.runs, f64::from(self.innings))
    }

    pub fn strike_rate(&self) -> f64 {
        ratio(self.runs, f64::from(self.balls_faced)) * 100.0
    }

    pub fn bowling_average(&self) -> f64 {
        ratio(self.runs_conceded, f64::from(self.wickets))
    }

    pub fn economy(&self) -> f64 {
        ratio(self.runs_conceded, self.overs_bowled())
    }

    pub fn apply(&mut self, line: &StatLine) {
        self.matches += line.matches;
        self.innings += line.innings;
        self.runs += line.runs;
        self.balls_faced += line.balls_faced;
        self.wickets += line.wickets;
        self.balls_bowled += line.balls_bowled;
        self.runs_conceded += line.runs_conceded;
        self.fours += line.fours;
        self.sixes += line.sixes;
    }

    /// Subtract a previously applied line. Saturates so a missing apply can
    /// never wrap a counter.
    pub fn revert(&mut self, line: &StatLine) {
        self.matches = self.matches.saturating_sub(line.matches);
        self.innings = self.innings.saturating_sub(line.innings);
        self.runs = self.runs.saturating_sub(line.runs);
        self.balls_faced = self.balls_faced.saturating_sub(line.balls_faced);
        self.wickets = self.wickets.saturating_sub(line.wickets);
        self.balls_bowled = self.balls_bowled.saturating_sub(line.balls_bowled);
        self.runs_conceded = self.runs_conceded.saturating_sub(line.runs_conceded);
        self.fours = self.fours.saturating_sub(line.fours);
        self.sixes = self.sixes.saturating_sub(line.sixes);
    }
}

/// Increment to one player's counters contributed by a single source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub matches: u32,
    pub innings: u32,
    pub runs: u32,
    pub balls_faced: u32,
    pub wickets: u32,
    pub balls_bowled: u32,
    pub runs_conceded: u32,
    pub fours: u32,
    pub sixes: u32,
}

impl StatLine {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn merge(&mut self, other: &StatLine) {
        self.matches += other.matches;
        self.innings += other.innings;
        self.runs += other.runs;
        self.balls_faced += other.balls_faced;
        self.wickets += other.wickets;
        self.balls_bowled += other.balls_bowled;
        self.runs_conceded += other.runs_conceded;
        self.fours += other.fours;
        self.sixes += other.sixes;
    }
}

/// What a journaled statistics credit was derived from.
///
/// Each source is applied at most once; undoing the source subtracts exactly
/// what was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditSource {
    Ball(BallId),
    InningsClosed(InningsId),
}

/// Per-player lines applied for one [`CreditSource`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsCredit {
    pub source: CreditSource,
    pub lines: Vec<(PlayerId, StatLine)>,
}

fn ratio(numerator: u32, denominator: f64) -> f64 {
    if denominator > 0.0 {
        f64::from(numerator) / denominator
    } else {
        0.0
    }
}
