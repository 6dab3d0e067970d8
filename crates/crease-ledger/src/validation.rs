use crease_store::StoreRead;
use crease_types::{BallEvent, Innings, InningsId, MatchFormat, OverPosition, WicketType};
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::machine::CompletionRules;
use crate::replay::ReplayEngine;

/// Result of innings ledger validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub innings: InningsId,
    pub event_count: u32,
    pub sequence_gapless: bool,
    pub slots_consistent: bool,
    pub counters_match: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Sequence of the offending event, or 0 for innings-level findings.
    pub seq: u32,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    SequenceGap,
    ForeignEvent,
    SlotMismatch,
    ExtrasMismatch,
    MalformedWicket,
    EventAfterClose,
    CounterMismatch,
}

/// Innings ledger validator.
pub struct StreamValidator;

impl StreamValidator {
    /// Check an innings record against its ledger.
    pub fn validate_events(
        innings: &Innings,
        events: &[BallEvent],
        format: &MatchFormat,
        rules: &CompletionRules,
    ) -> ValidationReport {
        let mut violations = Vec::new();
        let mut sequence_gapless = true;
        let mut slots_consistent = true;
        let mut counters_match = true;
        let mut pointer = OverPosition::START;

        let mut push = |seq: u32, kind: ViolationKind, description: String| {
            violations.push(Violation {
                seq,
                kind,
                description,
            });
        };

        let replay = ReplayEngine::replay(innings.id, events, rules, innings.target);

        for (index, event) in events.iter().enumerate() {
            let seq = event.ball_sequence;
            let expected_seq = index as u32 + 1;
            if seq != expected_seq {
                sequence_gapless = false;
                push(
                    seq,
                    ViolationKind::SequenceGap,
                    format!("expected sequence {expected_seq}, found {seq}"),
                );
            }

            if event.innings_id != innings.id {
                push(
                    seq,
                    ViolationKind::ForeignEvent,
                    format!("event belongs to innings {}", event.innings_id),
                );
            }

            if event.slot() != pointer {
                slots_consistent = false;
                push(
                    seq,
                    ViolationKind::SlotMismatch,
                    format!(
                        "stamped at {}.{} but pointer was at {}.{}",
                        event.over_number, event.ball_number, pointer.over, pointer.ball
                    ),
                );
            }
            if event.is_legal_delivery() {
                pointer = pointer.next();
            }

            let expected_extras = u32::from(!event.is_legal_delivery() && format.wide_no_ball_runs);
            if event.is_wide && event.is_no_ball {
                push(
                    seq,
                    ViolationKind::ExtrasMismatch,
                    "event is flagged both wide and no-ball".into(),
                );
            } else if event.extras != expected_extras {
                push(
                    seq,
                    ViolationKind::ExtrasMismatch,
                    format!("extras {} where {expected_extras} expected", event.extras),
                );
            }

            if event.is_wicket != event.wicket_type.is_some()
                || (event.run_out_batter.is_some()
                    && event.wicket_type != Some(WicketType::RunOut))
            {
                push(
                    seq,
                    ViolationKind::MalformedWicket,
                    "wicket flag, wicket type and run-out batter disagree".into(),
                );
            }

            if replay.closed_at.is_some_and(|closed| seq > closed) {
                push(
                    seq,
                    ViolationKind::EventAfterClose,
                    format!("recorded after the innings closed at ball {}", replay.closed_at.unwrap_or(0)),
                );
            }
        }

        let tally = replay.tally;
        let counters = [
            ("runs", innings.runs, tally.runs),
            ("wickets", innings.wickets, tally.wickets),
            ("legal balls", innings.position.legal_balls(), tally.legal_balls),
            ("balls recorded", innings.balls_recorded, tally.events),
        ];
        for (name, stored, derived) in counters {
            if stored != derived {
                counters_match = false;
                push(
                    0,
                    ViolationKind::CounterMismatch,
                    format!("{name}: innings holds {stored}, ledger implies {derived}"),
                );
            }
        }
        if innings.status.is_terminal() != replay.status.is_terminal()
            || (replay.status.is_terminal() && innings.status != replay.status)
        {
            counters_match = false;
            push(
                0,
                ViolationKind::CounterMismatch,
                format!(
                    "status: innings is {}, ledger implies {}",
                    innings.status, replay.status
                ),
            );
        }

        ValidationReport {
            innings: innings.id,
            event_count: events.len() as u32,
            sequence_gapless,
            slots_consistent,
            counters_match,
            violations,
        }
    }

    /// Validate a stored innings against its stored ledger.
    pub fn validate_stored<R: StoreRead + ?Sized>(
        reader: &R,
        innings: &InningsId,
        max_wickets: u32,
    ) -> LedgerResult<ValidationReport> {
        let record = reader
            .get_innings(innings)?
            .ok_or(LedgerError::InningsNotFound(*innings))?;
        let format = reader
            .get_match(&record.match_id)?
            .map(|m| m.format)
            .unwrap_or_default();
        let events = reader.ball_events(innings)?;
        let rules = CompletionRules::for_format(&format, max_wickets);
        Ok(Self::validate_events(&record, &events, &format, &rules))
    }
}
