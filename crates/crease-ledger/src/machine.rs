use chrono::{DateTime, Utc};
use crease_types::{
    BallEvent, BallId, Delivery, Innings, InningsStatus, MatchFormat, OverPosition,
};
use serde::Serialize;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

/// Thresholds that end an innings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionRules {
    pub max_wickets: u32,
    pub overs_per_innings: u32,
}

impl CompletionRules {
    pub const DEFAULT_MAX_WICKETS: u32 = 10;

    pub fn new(overs_per_innings: u32) -> Self {
        Self {
            max_wickets: Self::DEFAULT_MAX_WICKETS,
            overs_per_innings,
        }
    }

    pub fn for_format(format: &MatchFormat, max_wickets: u32) -> Self {
        Self {
            max_wickets,
            overs_per_innings: format.overs_per_innings,
        }
    }

    /// Terminal status reached by `tally`, if any.
    ///
    /// Checked in priority order: all out, then overs complete, then target
    /// chased. The first condition that holds wins.
    pub fn evaluate(&self, tally: &Tally, target: Option<u32>) -> Option<InningsStatus> {
        if tally.wickets >= self.max_wickets {
            Some(InningsStatus::AllOut)
        } else if tally.position().reached(self.overs_per_innings) {
            Some(InningsStatus::Completed)
        } else if target.is_some_and(|t| tally.runs >= t) {
            Some(InningsStatus::TargetChased)
        } else {
            None
        }
    }
}

/// Running totals derived from ledger events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub runs: u32,
    pub wickets: u32,
    pub legal_balls: u32,
    pub events: u32,
}

impl Tally {
    pub fn from_events(events: &[BallEvent]) -> Self {
        let mut tally = Self::default();
        for event in events {
            tally.push(event);
        }
        tally
    }

    pub fn push(&mut self, event: &BallEvent) {
        self.runs += event.total_runs();
        if event.is_wicket {
            self.wickets += 1;
        }
        if event.is_legal_delivery() {
            self.legal_balls += 1;
        }
        self.events += 1;
    }

    /// Over/ball pointer after the tallied events.
    pub fn position(&self) -> OverPosition {
        OverPosition::from_legal_balls(self.legal_balls)
    }

    /// Copy the counters onto an innings record.
    pub fn write_to(&self, innings: &mut Innings) {
        innings.runs = self.runs;
        innings.wickets = self.wickets;
        innings.position = self.position();
        innings.balls_recorded = self.events;
    }
}

/// Status change caused by one applied event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub before: InningsStatus,
    pub after: InningsStatus,
}

impl Transition {
    /// Whether this event ended the innings.
    pub fn closed(&self) -> bool {
        !self.before.is_terminal() && self.after.is_terminal()
    }
}

/// The innings state machine: per-ball derivation and completion checks.
pub struct InningsMachine;

impl InningsMachine {
    /// Fail unless `innings` is in progress.
    pub fn ensure_accepting(innings: &Innings) -> LedgerResult<()> {
        match innings.status {
            InningsStatus::InProgress => Ok(()),
            InningsStatus::NotStarted => Err(LedgerError::InningsNotStarted(innings.id)),
            status => Err(LedgerError::InningsClosed {
                innings: innings.id,
                status,
            }),
        }
    }

    /// Turn a proposed delivery into the next ledger event of `innings`.
    ///
    /// The event takes the next gapless sequence number and the slot the
    /// pointer currently holds: the sixth legal ball of over N is stamped
    /// `(N, 5)`. Wides and no-balls share the slot of the next legal ball.
    pub fn stamp(
        innings: &Innings,
        delivery: &Delivery,
        format: &MatchFormat,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<BallEvent> {
        Self::ensure_accepting(innings)?;
        let extras = u32::from(!delivery.is_legal() && format.wide_no_ball_runs);
        Ok(BallEvent {
            id: BallId::new(),
            innings_id: innings.id,
            ball_sequence: innings.balls_recorded + 1,
            over_number: innings.position.over,
            ball_number: innings.position.ball,
            batter: delivery.batter.clone(),
            bowler: delivery.bowler.clone(),
            runs_scored: delivery.runs_scored,
            extras,
            is_wide: delivery.is_wide,
            is_no_ball: delivery.is_no_ball,
            is_wicket: delivery.wicket.is_some(),
            wicket_type: delivery.wicket,
            run_out_batter: delivery.run_out_batter.clone(),
            grant_without_ball: delivery.grant_without_ball,
            timestamp,
        })
    }

    /// Apply a stamped event to the running innings counters.
    ///
    /// The event must carry the next sequence number and the current slot;
    /// anything else means the ledger and the counters have drifted apart.
    pub fn apply(
        innings: &mut Innings,
        event: &BallEvent,
        rules: &CompletionRules,
    ) -> LedgerResult<Transition> {
        Self::ensure_accepting(innings)?;
        if event.innings_id != innings.id {
            return Err(LedgerError::ForeignEvent {
                expected: innings.id,
                found: event.innings_id,
            });
        }
        let expected = innings.balls_recorded + 1;
        if event.ball_sequence != expected {
            return Err(LedgerError::IntegrityViolation {
                seq: event.ball_sequence,
                reason: format!("expected sequence {expected}"),
            });
        }
        if event.slot() != innings.position {
            return Err(LedgerError::IntegrityViolation {
                seq: event.ball_sequence,
                reason: format!(
                    "stamped at {}.{} but pointer is at {}.{}",
                    event.over_number, event.ball_number, innings.position.over, innings.position.ball
                ),
            });
        }

        let before = innings.status;
        innings.runs += event.total_runs();
        if event.is_wicket {
            innings.wickets += 1;
        }
        if event.is_legal_delivery() {
            innings.position = innings.position.next();
        }
        innings.balls_recorded = event.ball_sequence;

        let tally = Tally {
            runs: innings.runs,
            wickets: innings.wickets,
            legal_balls: innings.position.legal_balls(),
            events: innings.balls_recorded,
        };
        innings.status = rules
            .evaluate(&tally, innings.target)
            .unwrap_or(InningsStatus::InProgress);

        debug!(
            innings = %innings.id,
            seq = event.ball_sequence,
            ball = %event.label(),
            score = %innings.display_score(),
            status = %innings.status,
            "ball applied"
        );
        Ok(Transition {
            before,
            after: innings.status,
        })
    }
}
