use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::GateError;
use crate::stage::{GateContext, GateStage, Rejection, ScoringProposal, StageDecision, StageResult};
use crate::stages::{DeliveryStage, InningsStateStage, ScorerStage};

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected { kind: Rejection, reason: String },
}

/// The outcome of running a proposal through the full gate pipeline.
#[derive(Clone, Debug)]
pub struct GateResult {
    pub verdict: Verdict,
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
    pub elapsed: Duration,
}

impl GateResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self.verdict, Verdict::Accepted)
    }

    /// The rejection, if the proposal was turned down.
    pub fn rejection(&self) -> Option<(Rejection, &str)> {
        match &self.verdict {
            Verdict::Accepted => None,
            Verdict::Rejected { kind, reason } => Some((*kind, reason.as_str())),
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringGate
// ---------------------------------------------------------------------------

/// The scoring gate: a pipeline of stages every innings mutation passes
/// through before anything is written.
pub struct ScoringGate {
    stages: Vec<Box<dyn GateStage>>,
}

impl ScoringGate {
    /// An empty pipeline. Use [`Self::add_stage`] to add stages, or
    /// [`Self::with_default_stages`] for the standard pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Scorer -> InningsState -> Delivery
    pub fn with_default_stages() -> Self {
        let mut gate = Self::new();
        gate.add_stage(Box::new(ScorerStage));
        gate.add_stage(Box::new(InningsStateStage));
        gate.add_stage(Box::new(DeliveryStage));
        gate
    }

    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Evaluate a proposal through the full pipeline.
    ///
    /// The pipeline is **fail-fast**: the first stage that fails stops
    /// evaluation and produces a rejection. If all stages pass the
    /// proposal is accepted.
    pub fn evaluate(
        &self,
        proposal: &ScoringProposal,
        context: &mut GateContext,
    ) -> Result<GateResult, GateError> {
        let pipeline_start = Instant::now();
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_start = Instant::now();
            let decision = stage.evaluate(proposal, context)?;

            let result = StageResult {
                stage_name: stage.name().to_string(),
                passed: decision.is_pass(),
                reason: match &decision {
                    StageDecision::Pass => None,
                    StageDecision::Fail { reason, .. } => Some(reason.clone()),
                },
                elapsed: stage_start.elapsed(),
            };
            stage_results.push(result.clone());
            context.previous_stages.push(result);

            if let StageDecision::Fail { kind, reason } = decision {
                warn!(
                    stage = stage.name(),
                    action = proposal.action.name(),
                    caller = %proposal.caller,
                    %kind,
                    %reason,
                    "proposal rejected"
                );
                return Ok(GateResult {
                    verdict: Verdict::Rejected { kind, reason },
                    stage_results,
                    elapsed: pipeline_start.elapsed(),
                });
            }
        }

        Ok(GateResult {
            verdict: Verdict::Accepted,
            stage_results,
            elapsed: pipeline_start.elapsed(),
        })
    }
}

impl Default for ScoringGate {
    fn default() -> Self {
        Self::with_default_stages()
    }
}
