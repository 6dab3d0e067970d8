use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::debug;

use crease_types::{InningsId, MatchId};

use crate::error::{FabricError, Result};
use crate::event::{EventKind, EventPayload, ScoreEvent};

/// Filter for subscribing to a subset of scoring events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events for these matches are delivered.
    pub matches: Option<Vec<MatchId>>,
    /// If set, only events for these innings are delivered.
    pub innings: Option<Vec<InningsId>>,
    /// If set, only events of these kinds are delivered.
    pub kinds: Option<Vec<EventKind>>,
}

impl EventFilter {
    pub fn for_match(match_id: MatchId) -> Self {
        Self {
            matches: Some(vec![match_id]),
            ..Default::default()
        }
    }

    pub fn for_innings(innings: InningsId) -> Self {
        Self {
            innings: Some(vec![innings]),
            ..Default::default()
        }
    }

    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = EventKind>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &ScoreEvent) -> bool {
        if let Some(ref matches) = self.matches {
            if !matches.contains(&event.match_id) {
                return false;
            }
        }
        if let Some(ref innings) = self.innings {
            if !event.innings_id.is_some_and(|id| innings.contains(&id)) {
                return false;
            }
        }
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind) {
                return false;
            }
        }
        true
    }
}

/// A broadcast channel receiver for scoring events.
pub type EventStream = broadcast::Receiver<ScoreEvent>;

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<ScoreEvent>,
}

/// Fan-out router that delivers events to matching subscribers.
struct EventRouter {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventRouter {
    fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    fn subscribe(&self, filter: EventFilter, capacity: usize) -> Result<EventStream> {
        let (tx, rx) = broadcast::channel(capacity);
        self.subscribers
            .write()
            .map_err(|_| FabricError::Poisoned)?
            .push(Subscriber { filter, sender: tx });
        Ok(rx)
    }

    /// Route an event to all matching subscribers, pruning those whose
    /// receivers have all been dropped. Returns the number of deliveries.
    fn route(&self, event: &ScoreEvent) -> Result<usize> {
        let mut subs = self.subscribers.write().map_err(|_| FabricError::Poisoned)?;
        let mut delivered = 0;
        subs.retain(|sub| {
            if sub.filter.matches(event) {
                let sent = sub.sender.send(event.clone()).is_ok();
                delivered += usize::from(sent);
                sent
            } else {
                sub.sender.receiver_count() > 0
            }
        });
        Ok(delivered)
    }

    fn subscriber_count(&self) -> Result<usize> {
        Ok(self
            .subscribers
            .read()
            .map_err(|_| FabricError::Poisoned)?
            .len())
    }
}

/// Configuration for the [`EventFabric`].
#[derive(Clone, Debug)]
pub struct FabricConfig {
    /// Capacity of per-subscriber broadcast channels. A subscriber that falls
    /// further behind than this observes `RecvError::Lagged`.
    pub channel_capacity: usize,
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// In-process publication of committed scoring changes.
pub struct EventFabric {
    router: EventRouter,
    next_seq: AtomicU64,
    config: FabricConfig,
}

impl EventFabric {
    pub fn new(config: FabricConfig) -> Result<Self> {
        if config.channel_capacity == 0 {
            return Err(FabricError::InvalidCapacity(config.channel_capacity));
        }
        Ok(Self {
            router: EventRouter::new(),
            next_seq: AtomicU64::new(1),
            config,
        })
    }

    /// Publish one event to matching subscribers.
    pub fn emit(
        &self,
        match_id: MatchId,
        innings_id: Option<InningsId>,
        kind: EventKind,
        payload: EventPayload,
    ) -> Result<ScoreEvent> {
        let event = ScoreEvent {
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            match_id,
            innings_id,
            kind,
            payload,
            emitted_at: Utc::now(),
        };
        let delivered = self.router.route(&event)?;
        debug!(seq = event.seq, kind = %event.kind, delivered, "event emitted");
        Ok(event)
    }

    /// Subscribe to events matching the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> Result<EventStream> {
        self.router.subscribe(filter, self.config.channel_capacity)
    }

    /// Current number of active subscribers.
    pub fn subscriber_count(&self) -> Result<usize> {
        self.router.subscriber_count()
    }
}
