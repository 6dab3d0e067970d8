//! Player statistics aggregation for crease.
//!
//! Each committed ball contributes a [`StatsCredit`] built by
//! [`ball_credit`]; each closed innings contributes one built by
//! [`innings_credit`]. [`StatsAggregator`] applies credits inside the
//! recording transaction, journaled by source so they apply at most once
//! and reverse exactly on undo. [`rank`] orders players for leaderboards.
//!
//! [`StatsCredit`]: crease_types::StatsCredit

pub mod aggregator;
pub mod credit;
pub mod error;
pub mod ranking;

pub use aggregator::StatsAggregator;
pub use credit::{ball_credit, innings_credit, InningsCreditPolicy};
pub use error::{StatsError, StatsResult};
pub use ranking::{rank, RankingCategory, RankingEntry};
