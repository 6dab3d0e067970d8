//! Scoring gate pipeline for crease.
//!
//! Every innings mutation (recording a ball, undoing one, assigning batters
//! or the bowler) passes through the gate before the engine writes
//! anything. The gate runs a pipeline of stages and produces an
//! accept/reject verdict whose rejection category maps onto the engine's
//! error taxonomy.
//!
//! Default pipeline: [`ScorerStage`] -> [`InningsStateStage`] ->
//! [`DeliveryStage`].

pub mod error;
pub mod gate;
pub mod stage;
pub mod stages;

pub use error::GateError;
pub use gate::{GateResult, ScoringGate, Verdict};
pub use stage::{
    GateContext, GateStage, Rejection, ScoringAction, ScoringProposal, StageDecision, StageResult,
};
pub use stages::{DeliveryStage, InningsStateStage, ScorerStage};
