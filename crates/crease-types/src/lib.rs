//! Foundation types for crease.
//!
//! Every other crease crate depends on `crease-types`. It holds the records
//! the scoring engine reads and writes, the identifiers that key them, and
//! the derived figures computed from player statistics.
//!
//! # Key Types
//!
//! - [`Match`] / [`MatchFormat`]: match setup and current-scorer identity
//! - [`Innings`] / [`OverPosition`]: running innings counters and the over/ball pointer
//! - [`BallEvent`] / [`Delivery`]: committed ledger entries and scorer proposals
//! - [`PlayerStats`]: cumulative per-player figures
//! - [`MatchTransfer`]: single-writer handoff requests

pub mod ball;
pub mod error;
pub mod id;
pub mod innings;
pub mod matches;
pub mod player;

pub use ball::{BallEvent, Delivery, WicketType};
pub use error::TypeError;
pub use id::{BallId, InningsId, MatchId, MembershipId, PlayerId, TransferId, UserId};
pub use innings::{Innings, InningsStatus, OverPosition, BALLS_PER_OVER};
pub use matches::{
    Match, MatchFormat, MatchStatus, MatchTeam, MatchTransfer, TeamSide, Toss, TossDecision,
    TransferStatus, MAX_OVERS_PER_INNINGS,
};
pub use player::{
    BattingHand, BowlingHand, BowlingStyle, CreditSource, Player, PlayerStats, StatLine, StatsCredit,
};
