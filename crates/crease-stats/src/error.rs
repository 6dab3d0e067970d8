use crease_store::StoreError;

/// Errors from statistics aggregation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("unknown ranking category: {0}")]
    UnknownCategory(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type StatsResult<T> = Result<T, StatsError>;
