use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crease_types::{BallEvent, Innings, InningsId, Match, MatchId, MatchTransfer};

/// Classification of scoring events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MatchCreated,
    InningsStarted,
    BallRecorded,
    BallUndone,
    /// An innings reached a terminal status.
    InningsClosed,
    /// Batters or bowler reassigned.
    LineupChanged,
    TransferRequested,
    TransferAccepted,
    /// Toss, completion or abandonment.
    MatchStatusChanged,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MatchCreated => "MatchCreated",
            Self::InningsStarted => "InningsStarted",
            Self::BallRecorded => "BallRecorded",
            Self::BallUndone => "BallUndone",
            Self::InningsClosed => "InningsClosed",
            Self::LineupChanged => "LineupChanged",
            Self::TransferRequested => "TransferRequested",
            Self::TransferAccepted => "TransferAccepted",
            Self::MatchStatusChanged => "MatchStatusChanged",
        };
        write!(f, "{s}")
    }
}

/// Snapshot carried by a scoring event, taken after the commit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum EventPayload {
    Match { record: Match },
    Innings { innings: Innings },
    /// The ball that was recorded or undone, with the innings as it stands
    /// afterwards.
    Ball { ball: BallEvent, innings: Innings },
    Transfer { transfer: MatchTransfer },
}

/// One published scoring change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Fabric-wide publication order, starting at 1.
    pub seq: u64,
    pub match_id: MatchId,
    pub innings_id: Option<InningsId>,
    pub kind: EventKind,
    pub payload: EventPayload,
    pub emitted_at: DateTime<Utc>,
}

impl ScoreEvent {
    /// The post-commit innings snapshot, when the event carries one.
    pub fn innings(&self) -> Option<&Innings> {
        match &self.payload {
            EventPayload::Innings { innings } | EventPayload::Ball { innings, .. } => Some(innings),
            EventPayload::Match { .. } | EventPayload::Transfer { .. } => None,
        }
    }
}
