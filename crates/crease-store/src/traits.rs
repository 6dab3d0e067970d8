use crease_types::{
    BallEvent, CreditSource, Innings, InningsId, Match, MatchId, MatchTeam, MatchTransfer,
    MembershipId, Player, PlayerId, PlayerStats, StatsCredit, TransferId,
};

use crate::error::{StoreError, StoreResult};

/// Read access to stored records.
///
/// Query results are ordered: innings by number, ball events by sequence,
/// everything else by id.
pub trait StoreRead {
    fn get_match(&self, id: &MatchId) -> StoreResult<Option<Match>>;
    fn team_members(&self, match_id: &MatchId) -> StoreResult<Vec<MatchTeam>>;
    fn get_member(&self, id: &MembershipId) -> StoreResult<Option<MatchTeam>>;
    fn get_innings(&self, id: &InningsId) -> StoreResult<Option<Innings>>;
    fn innings_for_match(&self, match_id: &MatchId) -> StoreResult<Vec<Innings>>;
    fn ball_events(&self, innings: &InningsId) -> StoreResult<Vec<BallEvent>>;
    fn ball_count(&self, innings: &InningsId) -> StoreResult<u32>;
    fn get_transfer(&self, id: &TransferId) -> StoreResult<Option<MatchTransfer>>;
    fn transfers_for_match(&self, match_id: &MatchId) -> StoreResult<Vec<MatchTransfer>>;
    fn get_player(&self, id: &PlayerId) -> StoreResult<Option<Player>>;
    fn players(&self) -> StoreResult<Vec<Player>>;
    fn get_stats(&self, player: &PlayerId) -> StoreResult<Option<PlayerStats>>;
    fn all_stats(&self) -> StoreResult<Vec<PlayerStats>>;
    fn get_credit(&self, source: &CreditSource) -> StoreResult<Option<StatsCredit>>;
}

/// Record access inside one store transaction.
///
/// All implementations must satisfy these invariants:
/// - Writes become visible to other transactions only when the enclosing
///   [`ScoreStore::transact`] call returns `Ok`; on `Err` every write made
///   through this handle is discarded.
/// - `append_ball` enforces the gapless ledger sequence: an event must carry
///   `ball_sequence == ball_count + 1` or the append fails with
///   [`StoreError::SequenceConflict`].
/// - `pop_ball` removes only the highest-sequence event.
pub trait StoreTx: StoreRead {
    fn put_match(&mut self, record: Match) -> StoreResult<()>;
    fn put_member(&mut self, member: MatchTeam) -> StoreResult<()>;
    fn remove_member(&mut self, id: &MembershipId) -> StoreResult<Option<MatchTeam>>;
    fn put_innings(&mut self, innings: Innings) -> StoreResult<()>;
    fn append_ball(&mut self, event: BallEvent) -> StoreResult<()>;
    fn pop_ball(&mut self, innings: &InningsId) -> StoreResult<Option<BallEvent>>;
    fn put_transfer(&mut self, transfer: MatchTransfer) -> StoreResult<()>;
    fn put_player(&mut self, player: Player) -> StoreResult<()>;
    fn remove_player(&mut self, id: &PlayerId) -> StoreResult<Option<Player>>;
    fn put_stats(&mut self, stats: PlayerStats) -> StoreResult<()>;
    fn remove_stats(&mut self, player: &PlayerId) -> StoreResult<Option<PlayerStats>>;
    fn put_credit(&mut self, credit: StatsCredit) -> StoreResult<()>;
    fn remove_credit(&mut self, source: &CreditSource) -> StoreResult<Option<StatsCredit>>;
}

/// Transactional record store: the persistence port of the scoring engine.
///
/// The engine never holds a global store handle; a `ScoreStore` is passed in
/// at construction. Backends without native transactions must provide the
/// all-or-nothing guarantee some other way (optimistic versioning or a
/// single-writer queue).
pub trait ScoreStore: Send + Sync {
    /// Run `f` as one atomic read-modify-write unit.
    ///
    /// If `f` returns `Err`, nothing it wrote is kept.
    fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, E>,
        E: From<StoreError>;

    /// Run `f` against a consistent read-only view.
    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn StoreRead) -> Result<T, E>,
        E: From<StoreError>;
}
