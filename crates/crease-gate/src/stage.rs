use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use crease_types::{Delivery, Innings, InningsId, Match, PlayerId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::GateError;

// ---------------------------------------------------------------------------
// ScoringProposal
// ---------------------------------------------------------------------------

/// A mutation of an innings a caller wants to make.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum ScoringAction {
    RecordBall(Delivery),
    UndoLastBall,
    SetBatters {
        striker: PlayerId,
        non_striker: PlayerId,
    },
    SetBowler {
        bowler: PlayerId,
    },
}

impl ScoringAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RecordBall(_) => "record_ball",
            Self::UndoLastBall => "undo_last_ball",
            Self::SetBatters { .. } => "set_batters",
            Self::SetBowler { .. } => "set_bowler",
        }
    }
}

/// A proposal evaluated by the gate pipeline before any store write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringProposal {
    /// Authenticated caller, as supplied by the identity provider.
    pub caller: UserId,
    pub innings: InningsId,
    pub action: ScoringAction,
    /// Sequence number the caller expects the new ball to receive.
    #[serde(default)]
    pub expected_sequence: Option<u32>,
}

impl ScoringProposal {
    pub fn new(caller: UserId, innings: InningsId, action: ScoringAction) -> Self {
        Self {
            caller,
            innings,
            action,
            expected_sequence: None,
        }
    }

    pub fn fenced(mut self, expected_sequence: u32) -> Self {
        self.expected_sequence = Some(expected_sequence);
        self
    }
}

// ---------------------------------------------------------------------------
// StageDecision
// ---------------------------------------------------------------------------

/// Category of a rejection, mirrored by the engine's error taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Validation,
    Authorization,
    NotFound,
    Consistency,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::NotFound => "not found",
            Self::Consistency => "consistency",
        })
    }
}

/// The outcome of a single gate stage evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    /// The stage passed; proceed to the next stage.
    Pass,
    /// The stage failed; the proposal is rejected.
    Fail { kind: Rejection, reason: String },
}

impl StageDecision {
    pub fn fail(kind: Rejection, reason: impl Into<String>) -> Self {
        Self::Fail {
            kind,
            reason: reason.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// Recorded result from a completed stage evaluation.
#[derive(Clone, Debug)]
pub struct StageResult {
    pub stage_name: String,
    pub passed: bool,
    /// Populated on failure.
    pub reason: Option<String>,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// State the stages decide against, loaded inside the caller's transaction.
pub struct GateContext {
    pub match_record: Match,
    pub innings: Innings,
    /// Registered players among those the proposal names.
    pub known_players: BTreeSet<PlayerId>,
    /// Results from stages that have already run in this evaluation.
    pub previous_stages: Vec<StageResult>,
}

impl GateContext {
    pub fn new(match_record: Match, innings: Innings) -> Self {
        Self {
            match_record,
            innings,
            known_players: BTreeSet::new(),
            previous_stages: Vec::new(),
        }
    }

    pub fn with_known_players(mut self, players: impl IntoIterator<Item = PlayerId>) -> Self {
        self.known_players.extend(players);
        self
    }

    pub fn is_known(&self, player: &PlayerId) -> bool {
        self.known_players.contains(player)
    }
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// A single evaluation stage in the gate pipeline.
///
/// Stages are evaluated in order. Each stage receives the proposal and a
/// shared context, and returns a pass/fail decision.
pub trait GateStage: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        proposal: &ScoringProposal,
        context: &GateContext,
    ) -> Result<StageDecision, GateError>;
}
