//! Persistence port for crease.
//!
//! The scoring engine reads and writes every record through a
//! [`ScoreStore`]. A store exposes two entry points: [`ScoreStore::transact`]
//! runs a closure as one all-or-nothing unit, and [`ScoreStore::read`] hands
//! out a consistent read-only view.
//!
//! # Storage Backends
//!
//! - [`InMemoryStore`] -- lock-guarded tables with an undo journal, for
//!   tests, the CLI, and embedding
//!
//! # Design Rules
//!
//! 1. A failed transaction leaves no visible writes.
//! 2. Ball ledgers are gapless: the store rejects out-of-sequence appends.
//! 3. Only the highest-sequence ball event can be removed.
//! 4. Backend failures surface as [`StoreError`], never as panics.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use traits::{ScoreStore, StoreRead, StoreTx};
