/// Errors produced by the event fabric.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FabricError {
    /// A thread panicked while holding the subscriber table.
    #[error("subscriber table lock poisoned")]
    Poisoned,

    /// Channel capacity must be at least one.
    #[error("invalid channel capacity {0}")]
    InvalidCapacity(usize),
}

/// Convenience alias used throughout the fabric crate.
pub type Result<T> = std::result::Result<T, FabricError>;
