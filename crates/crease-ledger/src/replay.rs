use crease_store::StoreRead;
use crease_types::{BallEvent, Innings, InningsId, InningsStatus};
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::machine::{CompletionRules, Tally};

/// Result of replaying an innings ledger into counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplayResult {
    pub innings: InningsId,
    pub tally: Tally,
    /// Status the ledger implies: the first terminal state reached, or
    /// in progress.
    pub status: InningsStatus,
    /// Sequence of the event that closed the innings.
    pub closed_at: Option<u32>,
}

/// Deterministic recomputation of innings state from its ledger.
pub struct ReplayEngine;

impl ReplayEngine {
    pub fn replay(
        innings: InningsId,
        events: &[BallEvent],
        rules: &CompletionRules,
        target: Option<u32>,
    ) -> ReplayResult {
        let mut tally = Tally::default();
        let mut status = InningsStatus::InProgress;
        let mut closed_at = None;

        for event in events {
            tally.push(event);
            if closed_at.is_none() {
                if let Some(terminal) = rules.evaluate(&tally, target) {
                    status = terminal;
                    closed_at = Some(event.ball_sequence);
                }
            }
        }

        ReplayResult {
            innings,
            tally,
            status,
            closed_at,
        }
    }

    /// Reset `innings` to the counters implied by `remaining` and reopen it.
    ///
    /// Used after removing the last event: the remaining ledger is the
    /// source of truth, never arithmetic on the removed event.
    pub fn rewind(innings: &mut Innings, remaining: &[BallEvent]) {
        Tally::from_events(remaining).write_to(innings);
        innings.status = InningsStatus::InProgress;
    }

    /// Replay a stored innings.
    pub fn replay_stored<R: StoreRead + ?Sized>(
        reader: &R,
        innings: &InningsId,
        max_wickets: u32,
    ) -> LedgerResult<ReplayResult> {
        let record = reader
            .get_innings(innings)?
            .ok_or(LedgerError::InningsNotFound(*innings))?;
        let format = reader
            .get_match(&record.match_id)?
            .map(|m| m.format)
            .unwrap_or_default();
        let events = reader.ball_events(innings)?;
        let rules = CompletionRules::for_format(&format, max_wickets);
        Ok(Self::replay(*innings, &events, &rules, record.target))
    }
}
