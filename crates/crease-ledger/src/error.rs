use crease_store::StoreError;
use crease_types::{InningsId, InningsStatus};

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("innings {innings} is {status} and accepts no ball events")]
    InningsClosed {
        innings: InningsId,
        status: InningsStatus,
    },

    #[error("innings {0} has not started")]
    InningsNotStarted(InningsId),

    #[error("ball event belongs to innings {found}, not {expected}")]
    ForeignEvent {
        expected: InningsId,
        found: InningsId,
    },

    #[error("integrity violation at ball {seq}: {reason}")]
    IntegrityViolation { seq: u32, reason: String },

    #[error("innings {0} not found")]
    InningsNotFound(InningsId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
