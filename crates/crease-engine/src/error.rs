use crease_fabric::FabricError;
use crease_gate::{GateError, Rejection};
use crease_ledger::LedgerError;
use crease_stats::StatsError;
use crease_store::StoreError;
use crease_types::TypeError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by engine operations.
///
/// Every variant except `Store` is raised before the operation's
/// transaction commits, so a failed call never leaves partial state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request is not allowed in the current state.
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller does not hold scoring rights.
    #[error("not authorized: {0}")]
    Authorization(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Stored state and the ledger disagree, or the caller's sequence fence
    /// is stale. The operation was aborted.
    #[error("consistency error: {0}")]
    Consistency(String),

    /// The backing store failed.
    #[error("store error: {0}")]
    Store(StoreError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("subscription error: {0}")]
    Subscription(#[from] FabricError),
}

impl EngineError {
    /// Whether the caller may retry. Only a transient store outage
    /// qualifies; the caller must first confirm the failed call did not
    /// commit (for example by fencing on the expected sequence).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }

    pub(crate) fn rejected(kind: Rejection, reason: String) -> Self {
        match kind {
            Rejection::Validation => Self::Validation(reason),
            Rejection::Authorization => Self::Authorization(reason),
            Rejection::NotFound => Self::NotFound(reason),
            Rejection::Consistency => Self::Consistency(reason),
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SequenceConflict { .. } => Self::Consistency(err.to_string()),
            StoreError::UnknownInnings(id) => Self::NotFound(format!("innings {id}")),
            other => Self::Store(other),
        }
    }
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InningsClosed { .. } | LedgerError::InningsNotStarted(_) => {
                Self::Validation(err.to_string())
            }
            LedgerError::ForeignEvent { .. } | LedgerError::IntegrityViolation { .. } => {
                Self::Consistency(err.to_string())
            }
            LedgerError::InningsNotFound(id) => Self::NotFound(format!("innings {id}")),
            LedgerError::Store(e) => e.into(),
        }
    }
}

impl From<StatsError> for EngineError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::UnknownCategory(_) => Self::Validation(err.to_string()),
            StatsError::Store(e) => e.into(),
        }
    }
}

impl From<GateError> for EngineError {
    fn from(err: GateError) -> Self {
        Self::Consistency(err.to_string())
    }
}

impl From<TypeError> for EngineError {
    fn from(err: TypeError) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use crease_types::{InningsId, InningsStatus};

    use super::*;

    #[test]
    fn only_unavailable_store_is_retryable() {
        assert!(EngineError::from(StoreError::Unavailable("down".into())).is_retryable());
        assert!(!EngineError::from(StoreError::Poisoned).is_retryable());
        assert!(!EngineError::Validation("no".into()).is_retryable());
    }

    #[test]
    fn sequence_conflict_is_consistency() {
        let err = EngineError::from(StoreError::SequenceConflict {
            innings: InningsId::new(),
            expected: 3,
            found: 2,
        });
        assert!(matches!(err, EngineError::Consistency(_)));
    }

    #[test]
    fn closed_innings_is_validation() {
        let err = EngineError::from(LedgerError::InningsClosed {
            innings: InningsId::new(),
            status: InningsStatus::AllOut,
        });
        assert!(matches!(err, EngineError::Validation(ref m) if m.contains("all_out")));
    }
}
