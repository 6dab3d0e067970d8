use crease_types::InningsStatus;

use crate::error::GateError;
use crate::stage::{GateContext, GateStage, Rejection, ScoringAction, ScoringProposal, StageDecision};

/// Innings state stage.
///
/// Checks that the targeted innings belongs to a live match and is in a
/// state that allows the requested action.
pub struct InningsStateStage;

impl GateStage for InningsStateStage {
    fn name(&self) -> &str {
        "innings_state"
    }

    fn evaluate(
        &self,
        proposal: &ScoringProposal,
        context: &GateContext,
    ) -> Result<StageDecision, GateError> {
        let innings = &context.innings;
        if innings.id != proposal.innings || innings.match_id != context.match_record.id {
            return Err(GateError::stage(
                self.name(),
                format!("context holds innings {}, proposal targets {}", innings.id, proposal.innings),
            ));
        }

        if !context.match_record.status.is_ongoing() {
            return Ok(StageDecision::fail(
                Rejection::Validation,
                format!("match {} is no longer ongoing", context.match_record.id),
            ));
        }

        match &proposal.action {
            ScoringAction::RecordBall(_) => {
                if innings.status != InningsStatus::InProgress {
                    return Ok(StageDecision::fail(
                        Rejection::Validation,
                        format!("innings {} is {}; no ball can be recorded", innings.id, innings.status),
                    ));
                }
                let next = innings.balls_recorded + 1;
                if let Some(expected) = proposal.expected_sequence {
                    if expected != next {
                        return Ok(StageDecision::fail(
                            Rejection::Consistency,
                            format!("caller expected ball {expected}, ledger is at ball {next}"),
                        ));
                    }
                }
            }
            ScoringAction::UndoLastBall => {
                if innings.balls_recorded == 0 {
                    return Ok(StageDecision::fail(
                        Rejection::NotFound,
                        format!("innings {} has no ball to undo", innings.id),
                    ));
                }
            }
            ScoringAction::SetBatters { .. } | ScoringAction::SetBowler { .. } => {}
        }

        Ok(StageDecision::Pass)
    }
}
