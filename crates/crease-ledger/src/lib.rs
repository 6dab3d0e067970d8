//! Ball event ledger rules for crease.
//!
//! An innings ledger is an append-only, gapless sequence of [`BallEvent`]s.
//! This crate owns the arithmetic that turns it into running state:
//! - [`InningsMachine`] stamps proposed deliveries and applies them, with
//!   legal-ball counting, over rollover and completion checks
//! - [`ReplayEngine`] recomputes counters from a ledger (used by undo)
//! - [`StreamValidator`] checks a stored innings against its ledger
//! - [`ProjectionBuilder`] builds scorecards and match summaries
//!
//! [`BallEvent`]: crease_types::BallEvent

pub mod error;
pub mod machine;
pub mod projection;
pub mod replay;
pub mod validation;

pub use error::{LedgerError, LedgerResult};
pub use machine::{CompletionRules, InningsMachine, Tally, Transition};
pub use projection::{
    BattingLine, BowlingLine, ExtrasLine, FallOfWicket, InningsLine, MatchResult, MatchSummary,
    OverSummary, ProjectionBuilder, Scorecard,
};
pub use replay::{ReplayEngine, ReplayResult};
pub use validation::{StreamValidator, ValidationReport, Violation, ViolationKind};
