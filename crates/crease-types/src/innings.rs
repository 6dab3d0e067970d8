use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{InningsId, MatchId, PlayerId};
use crate::matches::TeamSide;

/// Legal deliveries in one over.
pub const BALLS_PER_OVER: u32 = 6;

/// Lifecycle of an innings.
///
/// `not_started -> in_progress -> {completed | all_out | target_chased}`.
/// Terminal states accept no further ball events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsStatus {
    NotStarted,
    InProgress,
    Completed,
    AllOut,
    TargetChased,
}

impl InningsStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::AllOut | Self::TargetChased)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::AllOut => "all_out",
            Self::TargetChased => "target_chased",
        }
    }
}

impl fmt::Display for InningsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Over/ball pointer: completed overs plus legal balls into the current over.
///
/// `ball` is always in `0..BALLS_PER_OVER`; the sixth legal ball rolls the
/// pointer over to the next over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverPosition {
    pub over: u32,
    pub ball: u32,
}

impl OverPosition {
    pub const START: Self = Self { over: 0, ball: 0 };

    pub fn new(over: u32, ball: u32) -> Self {
        debug_assert!(ball < BALLS_PER_OVER);
        Self { over, ball }
    }

    /// Pointer after `legal_balls` legal deliveries.
    pub fn from_legal_balls(legal_balls: u32) -> Self {
        Self {
            over: legal_balls / BALLS_PER_OVER,
            ball: legal_balls % BALLS_PER_OVER,
        }
    }

    /// Saturates at `u32::MAX`.
    pub fn legal_balls(&self) -> u32 {
        self.over.saturating_mul(BALLS_PER_OVER).saturating_add(self.ball)
    }

    /// The pointer after one more legal delivery, with over rollover.
    pub fn next(&self) -> Self {
        Self::from_legal_balls(self.legal_balls().saturating_add(1))
    }

    /// Fractional overs (`over + ball/6`), for comparison with an overs limit.
    pub fn as_overs(&self) -> f64 {
        f64::from(self.over) + f64::from(self.ball) / f64::from(BALLS_PER_OVER)
    }

    /// Whether at least `overs` complete overs have been bowled.
    pub fn reached(&self, overs: u32) -> bool {
        u64::from(self.over) * u64::from(BALLS_PER_OVER) + u64::from(self.ball)
            >= u64::from(overs) * u64::from(BALLS_PER_OVER)
    }
}

/// Cricket notation: whole overs and balls joined by a literal dot ("8.2"),
/// or just the whole overs when no balls are into the current over.
impl fmt::Display for OverPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ball == 0 {
            write!(f, "{}", self.over)
        } else {
            write!(f, "{}.{}", self.over, self.ball)
        }
    }
}

/// Running state of one side's innings.
///
/// Counters are mutated only by the scoring engine, atomically with the
/// ledger append or removal that justifies them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Innings {
    pub id: InningsId,
    pub match_id: MatchId,
    pub batting_side: TeamSide,
    pub innings_number: u32,
    pub runs: u32,
    pub wickets: u32,
    pub position: OverPosition,
    pub status: InningsStatus,
    /// Runs needed to win (first innings total + 1) when chasing.
    pub target: Option<u32>,
    pub striker: Option<PlayerId>,
    pub non_striker: Option<PlayerId>,
    pub bowler: Option<PlayerId>,
    /// Number of committed ball events; the next event gets `balls_recorded + 1`.
    pub balls_recorded: u32,
}

impl Innings {
    pub fn start(
        match_id: MatchId,
        batting_side: TeamSide,
        innings_number: u32,
        target: Option<u32>,
    ) -> Self {
        Self {
            id: InningsId::new(),
            match_id,
            batting_side,
            innings_number,
            runs: 0,
            wickets: 0,
            position: OverPosition::START,
            status: InningsStatus::InProgress,
            target,
            striker: None,
            non_striker: None,
            bowler: None,
            balls_recorded: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn overs_faced(&self) -> f64 {
        self.position.as_overs()
    }

    pub fn display_score(&self) -> String {
        format!("{}/{}", self.runs, self.wickets)
    }

    pub fn display_overs(&self) -> String {
        self.position.to_string()
    }

    /// Runs still required when chasing, saturating at zero.
    pub fn runs_required(&self) -> Option<u32> {
        self.target.map(|t| t.saturating_sub(self.runs))
    }
}
