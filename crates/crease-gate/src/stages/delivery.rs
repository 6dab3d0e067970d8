use crease_types::WicketType;

use crate::error::GateError;
use crate::stage::{GateContext, GateStage, Rejection, ScoringAction, ScoringProposal, StageDecision};

/// Delivery sanity stage.
///
/// A proposed ball cannot be both wide and no-ball, a run-out batter is only
/// named on a run-out, and every player it names must be registered.
pub struct DeliveryStage;

impl GateStage for DeliveryStage {
    fn name(&self) -> &str {
        "delivery"
    }

    fn evaluate(
        &self,
        proposal: &ScoringProposal,
        context: &GateContext,
    ) -> Result<StageDecision, GateError> {
        let ScoringAction::RecordBall(delivery) = &proposal.action else {
            return Ok(StageDecision::Pass);
        };

        if delivery.is_wide && delivery.is_no_ball {
            return Ok(StageDecision::fail(
                Rejection::Validation,
                "a delivery cannot be both wide and no-ball",
            ));
        }

        if delivery.run_out_batter.is_some() && delivery.wicket != Some(WicketType::RunOut) {
            return Ok(StageDecision::fail(
                Rejection::Validation,
                "run-out batter given without a run-out",
            ));
        }

        if delivery.batter == delivery.bowler {
            return Ok(StageDecision::fail(
                Rejection::Validation,
                format!("{} cannot bat and bowl the same delivery", delivery.batter),
            ));
        }

        let named = [Some(&delivery.batter), Some(&delivery.bowler), delivery.run_out_batter.as_ref()];
        for player in named.into_iter().flatten() {
            if !context.is_known(player) {
                return Ok(StageDecision::fail(
                    Rejection::NotFound,
                    format!("player {player} is not registered"),
                ));
            }
        }

        Ok(StageDecision::Pass)
    }
}
