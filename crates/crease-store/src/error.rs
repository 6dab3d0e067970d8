use crease_types::InningsId;

/// Errors from record store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend cannot be reached right now. Safe to retry once the
    /// caller knows the failed operation did not commit.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A ball event was appended out of sequence.
    #[error("ledger sequence conflict in innings {innings}: expected {expected}, found {found}")]
    SequenceConflict {
        innings: InningsId,
        expected: u32,
        found: u32,
    },

    /// A ball event was appended to an innings the store does not hold.
    #[error("innings {0} does not exist")]
    UnknownInnings(InningsId),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
