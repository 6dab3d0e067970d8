//! Scoring engine for crease.
//!
//! [`ScoringEngine`] is the single entry point for everything that changes
//! a match: starting innings, recording and undoing balls, assigning the
//! batters and bowler, managing rosters and the player registry, and
//! handing scoring rights from one user to another. It is generic over the
//! persistence port ([`crease_store::ScoreStore`]) it is constructed with.
//!
//! Each mutation is one store transaction:
//!
//! ```text
//! gate (scorer, innings state, delivery) -> stamp -> apply -> append
//!     -> innings counters -> ball stats -> [innings credit] -> commit
//!     -> publish on the event fabric
//! ```
//!
//! Failures map onto [`EngineError`]: `Validation`, `Authorization`,
//! `NotFound` and `Consistency` are raised before anything commits;
//! `Store` wraps backend failures and is retryable only when the backend
//! was unavailable.

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod queries;
pub mod scoring;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, EngineConfig};
pub use coordinator::{NewMatch, NewMember};
pub use engine::ScoringEngine;
pub use error::{EngineError, EngineResult};
pub use scoring::{BallOutcome, UndoOutcome};

// Re-export the types callers need to drive the engine.
pub use crease_fabric::{EventFilter, EventKind, EventPayload, EventStream, ScoreEvent};
pub use crease_ledger::{MatchResult, MatchSummary, ReplayResult, Scorecard, ValidationReport};
pub use crease_stats::{InningsCreditPolicy, RankingCategory, RankingEntry};
pub use crease_store::{InMemoryStore, ScoreStore};
