use crease_fabric::{EventFabric, EventFilter, EventKind, EventPayload, EventStream, FabricConfig};
use crease_gate::{GateContext, ScoringGate, ScoringProposal, Verdict};
use crease_store::{ScoreStore, StoreRead};
use crease_types::{Innings, InningsId, Match, MatchId, PlayerId, UserId};
use tracing::warn;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// The scoring engine: innings lifecycle, ball recording and undo, roster
/// management, single-scorer handoff, and statistics, over an injected
/// [`ScoreStore`].
///
/// Every mutating operation runs as one store transaction and returns only
/// after it has committed or rolled back. Committed changes are then
/// published on the engine's event fabric.
pub struct ScoringEngine<S: ScoreStore> {
    pub(crate) store: S,
    pub(crate) gate: ScoringGate,
    pub(crate) fabric: EventFabric,
    pub(crate) config: EngineConfig,
}

impl<S: ScoreStore> ScoringEngine<S> {
    /// Build an engine over `store` with the default gate pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if `config` does not validate.
    pub fn new(store: S, config: EngineConfig) -> EngineResult<Self> {
        Self::with_gate(store, config, ScoringGate::with_default_stages())
    }

    /// Build an engine with a custom gate pipeline.
    pub fn with_gate(store: S, config: EngineConfig, gate: ScoringGate) -> EngineResult<Self> {
        config.validate()?;
        let fabric = EventFabric::new(FabricConfig {
            channel_capacity: config.channel_capacity,
        })?;
        Ok(Self {
            store,
            gate,
            fabric,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Subscribe to committed changes matching `filter`.
    pub fn subscribe(&self, filter: EventFilter) -> EngineResult<EventStream> {
        Ok(self.fabric.subscribe(filter)?)
    }

    /// Run `proposal` through the gate against the current records.
    pub(crate) fn admit(
        &self,
        proposal: &ScoringProposal,
        record: Match,
        innings: Innings,
        known_players: Vec<PlayerId>,
    ) -> EngineResult<()> {
        let mut context = GateContext::new(record, innings).with_known_players(known_players);
        let result = self.gate.evaluate(proposal, &mut context)?;
        match result.verdict {
            Verdict::Accepted => Ok(()),
            Verdict::Rejected { kind, reason } => Err(EngineError::rejected(kind, reason)),
        }
    }

    /// Publish a committed change. The change already stands, so a fabric
    /// failure is logged and not returned.
    pub(crate) fn publish(
        &self,
        match_id: MatchId,
        innings_id: Option<InningsId>,
        kind: EventKind,
        payload: EventPayload,
    ) {
        if let Err(e) = self.fabric.emit(match_id, innings_id, kind, payload) {
            warn!(%match_id, %kind, error = %e, "failed to publish committed change");
        }
    }
}

pub(crate) fn load_match<R: StoreRead + ?Sized>(reader: &R, id: &MatchId) -> EngineResult<Match> {
    reader
        .get_match(id)?
        .ok_or_else(|| EngineError::NotFound(format!("match {id}")))
}

pub(crate) fn load_innings<R: StoreRead + ?Sized>(
    reader: &R,
    id: &InningsId,
) -> EngineResult<Innings> {
    reader
        .get_innings(id)?
        .ok_or_else(|| EngineError::NotFound(format!("innings {id}")))
}

/// Fail unless `caller` holds scoring rights on `record`.
pub(crate) fn require_scorer(record: &Match, caller: &UserId) -> EngineResult<()> {
    if record.is_scorer(caller) {
        Ok(())
    } else {
        Err(EngineError::Authorization(format!(
            "{caller} is not the current scorer of match {}",
            record.id
        )))
    }
}

pub(crate) fn require_ongoing(record: &Match) -> EngineResult<()> {
    if record.status.is_ongoing() {
        Ok(())
    } else {
        Err(EngineError::Validation(format!(
            "match {} is {:?}",
            record.id, record.status
        )))
    }
}

/// The innings of `match_id` that is still accepting balls, if any.
pub(crate) fn open_innings<R: StoreRead + ?Sized>(
    reader: &R,
    match_id: &MatchId,
) -> EngineResult<Option<Innings>> {
    Ok(reader
        .innings_for_match(match_id)?
        .into_iter()
        .find(|i| !i.is_complete()))
}
