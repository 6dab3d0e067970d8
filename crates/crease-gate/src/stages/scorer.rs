use crate::error::GateError;
use crate::stage::{GateContext, GateStage, Rejection, ScoringProposal, StageDecision};

/// Single-writer authorization stage.
///
/// Only the match's current scorer may mutate its innings. This is the sole
/// authorization check the engine applies to scoring operations.
pub struct ScorerStage;

impl GateStage for ScorerStage {
    fn name(&self) -> &str {
        "scorer"
    }

    fn evaluate(
        &self,
        proposal: &ScoringProposal,
        context: &GateContext,
    ) -> Result<StageDecision, GateError> {
        if context.match_record.is_scorer(&proposal.caller) {
            Ok(StageDecision::Pass)
        } else {
            Ok(StageDecision::fail(
                Rejection::Authorization,
                format!(
                    "{} is not the current scorer of match {}",
                    proposal.caller, context.match_record.id
                ),
            ))
        }
    }
}
