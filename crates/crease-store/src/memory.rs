use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crease_types::{
    BallEvent, CreditSource, Innings, InningsId, Match, MatchId, MatchTeam, MatchTransfer,
    MembershipId, Player, PlayerId, PlayerStats, StatsCredit, TransferId,
};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{ScoreStore, StoreRead, StoreTx};

/// In-memory record store for tests, the CLI, and embedding.
///
/// Transactions run under a single write lock and keep an undo journal;
/// a failed transaction replays the journal backwards before releasing the
/// lock, so readers never observe partial writes.
pub struct InMemoryStore {
    inner: RwLock<StoreState>,
    available: AtomicBool,
}

#[derive(Default)]
struct StoreState {
    matches: BTreeMap<MatchId, Match>,
    members: BTreeMap<MembershipId, MatchTeam>,
    innings: BTreeMap<InningsId, Innings>,
    ledgers: HashMap<InningsId, Vec<BallEvent>>,
    transfers: BTreeMap<TransferId, MatchTransfer>,
    players: BTreeMap<PlayerId, Player>,
    stats: BTreeMap<PlayerId, PlayerStats>,
    credits: BTreeMap<CreditSource, StatsCredit>,
}

/// Inverse of one write, recorded before the write is applied.
enum Undo {
    Match(MatchId, Option<Match>),
    Member(MembershipId, Option<MatchTeam>),
    Innings(InningsId, Option<Innings>),
    BallAppended(InningsId),
    BallPopped(BallEvent),
    Transfer(TransferId, Option<MatchTransfer>),
    Player(PlayerId, Option<Player>),
    Stats(PlayerId, Option<PlayerStats>),
    Credit(CreditSource, Option<StatsCredit>),
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backend going away (or coming back). While unavailable
    /// every operation fails with [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store switched off".into()))
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore for InMemoryStore {
    fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.ensure_available()?;
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let mut tx = MemoryTx {
            state: &mut *state,
            journal: Vec::new(),
        };

        match f(&mut tx) {
            Ok(value) => Ok(value),
            Err(err) => {
                let writes = tx.journal.len();
                tx.rollback();
                debug!(writes, "transaction rolled back");
                Err(err)
            }
        }
    }

    fn read<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&dyn StoreRead) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.ensure_available()?;
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        f(&*state)
    }
}

fn restore<K: Ord, V>(table: &mut BTreeMap<K, V>, key: K, previous: Option<V>) {
    match previous {
        Some(value) => {
            table.insert(key, value);
        }
        None => {
            table.remove(&key);
        }
    }
}

impl StoreRead for StoreState {
    fn get_match(&self, id: &MatchId) -> StoreResult<Option<Match>> {
        Ok(self.matches.get(id).cloned())
    }

    fn team_members(&self, match_id: &MatchId) -> StoreResult<Vec<MatchTeam>> {
        Ok(self
            .members
            .values()
            .filter(|m| &m.match_id == match_id)
            .cloned()
            .collect())
    }

    fn get_member(&self, id: &MembershipId) -> StoreResult<Option<MatchTeam>> {
        Ok(self.members.get(id).cloned())
    }

    fn get_innings(&self, id: &InningsId) -> StoreResult<Option<Innings>> {
        Ok(self.innings.get(id).cloned())
    }

    fn innings_for_match(&self, match_id: &MatchId) -> StoreResult<Vec<Innings>> {
        let mut found: Vec<Innings> = self
            .innings
            .values()
            .filter(|i| &i.match_id == match_id)
            .cloned()
            .collect();
        found.sort_by_key(|i| i.innings_number);
        Ok(found)
    }

    fn ball_events(&self, innings: &InningsId) -> StoreResult<Vec<BallEvent>> {
        Ok(self.ledgers.get(innings).cloned().unwrap_or_default())
    }

    fn ball_count(&self, innings: &InningsId) -> StoreResult<u32> {
        Ok(self.ledgers.get(innings).map_or(0, |l| l.len() as u32))
    }

    fn get_transfer(&self, id: &TransferId) -> StoreResult<Option<MatchTransfer>> {
        Ok(self.transfers.get(id).cloned())
    }

    fn transfers_for_match(&self, match_id: &MatchId) -> StoreResult<Vec<MatchTransfer>> {
        Ok(self
            .transfers
            .values()
            .filter(|t| &t.match_id == match_id)
            .cloned()
            .collect())
    }

    fn get_player(&self, id: &PlayerId) -> StoreResult<Option<Player>> {
        Ok(self.players.get(id).cloned())
    }

    fn players(&self) -> StoreResult<Vec<Player>> {
        Ok(self.players.values().cloned().collect())
    }

    fn get_stats(&self, player: &PlayerId) -> StoreResult<Option<PlayerStats>> {
        Ok(self.stats.get(player).cloned())
    }

    fn all_stats(&self) -> StoreResult<Vec<PlayerStats>> {
        Ok(self.stats.values().cloned().collect())
    }

    fn get_credit(&self, source: &CreditSource) -> StoreResult<Option<StatsCredit>> {
        Ok(self.credits.get(source).cloned())
    }
}

struct MemoryTx<'a> {
    state: &'a mut StoreState,
    journal: Vec<Undo>,
}

impl MemoryTx<'_> {
    fn rollback(&mut self) {
        while let Some(undo) = self.journal.pop() {
            let state = &mut *self.state;
            match undo {
                Undo::Match(id, prev) => restore(&mut state.matches, id, prev),
                Undo::Member(id, prev) => restore(&mut state.members, id, prev),
                Undo::Innings(id, prev) => restore(&mut state.innings, id, prev),
                Undo::BallAppended(innings) => {
                    if let Some(ledger) = state.ledgers.get_mut(&innings) {
                        ledger.pop();
                    }
                }
                Undo::BallPopped(event) => {
                    state
                        .ledgers
                        .entry(event.innings_id)
                        .or_default()
                        .push(event);
                }
                Undo::Transfer(id, prev) => restore(&mut state.transfers, id, prev),
                Undo::Player(id, prev) => restore(&mut state.players, id, prev),
                Undo::Stats(id, prev) => restore(&mut state.stats, id, prev),
                Undo::Credit(source, prev) => restore(&mut state.credits, source, prev),
            }
        }
    }
}

impl StoreRead for MemoryTx<'_> {
    fn get_match(&self, id: &MatchId) -> StoreResult<Option<Match>> {
        self.state.get_match(id)
    }

    fn team_members(&self, match_id: &MatchId) -> StoreResult<Vec<MatchTeam>> {
        self.state.team_members(match_id)
    }

    fn get_member(&self, id: &MembershipId) -> StoreResult<Option<MatchTeam>> {
        self.state.get_member(id)
    }

    fn get_innings(&self, id: &InningsId) -> StoreResult<Option<Innings>> {
        self.state.get_innings(id)
    }

    fn innings_for_match(&self, match_id: &MatchId) -> StoreResult<Vec<Innings>> {
        self.state.innings_for_match(match_id)
    }

    fn ball_events(&self, innings: &InningsId) -> StoreResult<Vec<BallEvent>> {
        self.state.ball_events(innings)
    }

    fn ball_count(&self, innings: &InningsId) -> StoreResult<u32> {
        self.state.ball_count(innings)
    }

    fn get_transfer(&self, id: &TransferId) -> StoreResult<Option<MatchTransfer>> {
        self.state.get_transfer(id)
    }

    fn transfers_for_match(&self, match_id: &MatchId) -> StoreResult<Vec<MatchTransfer>> {
        self.state.transfers_for_match(match_id)
    }

    fn get_player(&self, id: &PlayerId) -> StoreResult<Option<Player>> {
        self.state.get_player(id)
    }

    fn players(&self) -> StoreResult<Vec<Player>> {
        self.state.players()
    }

    fn get_stats(&self, player: &PlayerId) -> StoreResult<Option<PlayerStats>> {
        self.state.get_stats(player)
    }

    fn all_stats(&self) -> StoreResult<Vec<PlayerStats>> {
        self.state.all_stats()
    }

    fn get_credit(&self, source: &CreditSource) -> StoreResult<Option<StatsCredit>> {
        self.state.get_credit(source)
    }
}

impl StoreTx for MemoryTx<'_> {
    fn put_match(&mut self, record: Match) -> StoreResult<()> {
        let prev = self.state.matches.insert(record.id, record.clone());
        self.journal.push(Undo::Match(record.id, prev));
        Ok(())
    }

    fn put_member(&mut self, member: MatchTeam) -> StoreResult<()> {
        let id = member.id;
        let prev = self.state.members.insert(id, member);
        self.journal.push(Undo::Member(id, prev));
        Ok(())
    }

    fn remove_member(&mut self, id: &MembershipId) -> StoreResult<Option<MatchTeam>> {
        let prev = self.state.members.remove(id);
        self.journal.push(Undo::Member(*id, prev.clone()));
        Ok(prev)
    }

    fn put_innings(&mut self, innings: Innings) -> StoreResult<()> {
        let id = innings.id;
        let prev = self.state.innings.insert(id, innings);
        self.journal.push(Undo::Innings(id, prev));
        Ok(())
    }

    fn append_ball(&mut self, event: BallEvent) -> StoreResult<()> {
        if !self.state.innings.contains_key(&event.innings_id) {
            return Err(StoreError::UnknownInnings(event.innings_id));
        }
        let ledger = self.state.ledgers.entry(event.innings_id).or_default();
        let expected = ledger.len() as u32 + 1;
        if event.ball_sequence != expected {
            return Err(StoreError::SequenceConflict {
                innings: event.innings_id,
                expected,
                found: event.ball_sequence,
            });
        }
        let innings = event.innings_id;
        ledger.push(event);
        self.journal.push(Undo::BallAppended(innings));
        Ok(())
    }

    fn pop_ball(&mut self, innings: &InningsId) -> StoreResult<Option<BallEvent>> {
        let popped = self.state.ledgers.get_mut(innings).and_then(Vec::pop);
        if let Some(event) = &popped {
            self.journal.push(Undo::BallPopped(event.clone()));
        }
        Ok(popped)
    }

    fn put_transfer(&mut self, transfer: MatchTransfer) -> StoreResult<()> {
        let id = transfer.id;
        let prev = self.state.transfers.insert(id, transfer);
        self.journal.push(Undo::Transfer(id, prev));
        Ok(())
    }

    fn put_player(&mut self, player: Player) -> StoreResult<()> {
        let id = player.id.clone();
        let prev = self.state.players.insert(id.clone(), player);
        self.journal.push(Undo::Player(id, prev));
        Ok(())
    }

    fn remove_player(&mut self, id: &PlayerId) -> StoreResult<Option<Player>> {
        let prev = self.state.players.remove(id);
        self.journal.push(Undo::Player(id.clone(), prev.clone()));
        Ok(prev)
    }

    fn put_stats(&mut self, stats: PlayerStats) -> StoreResult<()> {
        let id = stats.player.clone();
        let prev = self.state.stats.insert(id.clone(), stats);
        self.journal.push(Undo::Stats(id, prev));
        Ok(())
    }

    fn remove_stats(&mut self, player: &PlayerId) -> StoreResult<Option<PlayerStats>> {
        let prev = self.state.stats.remove(player);
        self.journal.push(Undo::Stats(player.clone(), prev.clone()));
        Ok(prev)
    }

    fn put_credit(&mut self, credit: StatsCredit) -> StoreResult<()> {
        let source = credit.source;
        let prev = self.state.credits.insert(source, credit);
        self.journal.push(Undo::Credit(source, prev));
        Ok(())
    }

    fn remove_credit(&mut self, source: &CreditSource) -> StoreResult<Option<StatsCredit>> {
        let prev = self.state.credits.remove(source);
        self.journal.push(Undo::Credit(*source, prev.clone()));
        Ok(prev)
    }
}
